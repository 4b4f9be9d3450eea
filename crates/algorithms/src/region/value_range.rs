//! Value ranges in interval notation

use priorgen_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// An interval of raster values
///
/// Parsed from interval notation with `-` between the bounds: `(0-]` is
/// every value above zero, `[-10-5)` is `-10 <= v < 5`. An empty bound is
/// unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
}

impl ValueRange {
    /// Every value strictly above `min`
    pub fn above(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            min_inclusive: false,
            max_inclusive: false,
        }
    }

    /// Closed interval `[min, max]`
    pub fn closed(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            min_inclusive: true,
            max_inclusive: true,
        }
    }

    /// Whether `value` falls in the range; NaN never does
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let above_min = match self.min {
            Some(min) if self.min_inclusive => value >= min,
            Some(min) => value > min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.max_inclusive => value <= max,
            Some(max) => value < max,
            None => true,
        };
        above_min && below_max
    }
}

fn parse_bound(text: &str) -> Option<Option<f64>> {
    let text = text.trim();
    if text.is_empty() {
        return Some(None);
    }
    text.parse::<f64>().ok().map(Some)
}

impl FromStr for ValueRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidParameter {
            name: "value_range",
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let text = s.trim();
        let min_inclusive = match text.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Err(invalid("must start with '[' or '('")),
        };
        let max_inclusive = match text.chars().last() {
            Some(']') if text.len() > 1 => true,
            Some(')') if text.len() > 1 => false,
            _ => return Err(invalid("must end with ']' or ')'")),
        };
        let inner = &text[1..text.len() - 1];

        // the separator is the first '-' that leaves two valid bounds
        let (min, max) = inner
            .match_indices('-')
            .find_map(|(i, _)| Some((parse_bound(&inner[..i])?, parse_bound(&inner[i + 1..])?)))
            .ok_or_else(|| invalid("expected '<min>-<max>'"))?;

        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(invalid("lower bound exceeds upper bound"));
            }
        }

        Ok(Self {
            min,
            max,
            min_inclusive,
            max_inclusive,
        })
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: Option<f64>| b.map(|v| v.to_string()).unwrap_or_default();
        write!(
            f,
            "{}{}-{}{}",
            if self.min_inclusive { '[' } else { '(' },
            bound(self.min),
            bound(self.max),
            if self.max_inclusive { ']' } else { ')' },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open_upper() {
        let range: ValueRange = "(0-]".parse().unwrap();
        assert_eq!(range, ValueRange { max_inclusive: true, ..ValueRange::above(0.0) });
        assert!(!range.contains(0.0));
        assert!(range.contains(0.001));
        assert!(range.contains(8000.0));
        assert!(!range.contains(-3.0));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_parse_negative_bounds() {
        let range: ValueRange = "[-10--2.5)".parse().unwrap();
        assert_eq!(range.min, Some(-10.0));
        assert_eq!(range.max, Some(-2.5));
        assert!(range.contains(-10.0));
        assert!(!range.contains(-2.5));

        let range: ValueRange = "(-5-]".parse().unwrap();
        assert_eq!((range.min, range.max), (Some(-5.0), None));

        let range: ValueRange = "(-)".parse().unwrap();
        assert!(range.contains(f64::MAX));
    }

    #[test]
    fn test_parse_errors() {
        assert!("0-1".parse::<ValueRange>().is_err());
        assert!("[1-0]".parse::<ValueRange>().is_err());
        assert!("[a-b]".parse::<ValueRange>().is_err());
        assert!("[".parse::<ValueRange>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        let range = ValueRange::closed(-1.5, 3.0);
        assert_eq!(range.to_string(), "[-1.5-3]");
        assert_eq!(range.to_string().parse::<ValueRange>().unwrap(), range);
    }
}
