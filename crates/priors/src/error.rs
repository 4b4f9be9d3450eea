//! Error types for prior generation

use crate::config::Side;
use thiserror::Error;

/// Errors raised while generating a prior
#[derive(Error, Debug)]
pub enum PriorError {
    #[error(transparent)]
    Core(#[from] priorgen_core::Error),

    #[error("Unknown {side} country code: {code}")]
    UnknownCountry { code: String, side: Side },

    #[error("Invalid country code '{0}': expected two uppercase ASCII letters")]
    InvalidCountryCode(String),

    #[error("Empty geometry: {0}")]
    EmptyGeometry(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for prior generation
pub type Result<T> = std::result::Result<T, PriorError>;
