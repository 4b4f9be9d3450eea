//! GDAL metadata domain encoding.
//!
//! GDAL stores dataset metadata items in the `GDAL_METADATA` TIFF tag
//! (42112) as a small XML document:
//! ```text
//! <GDALMetadata>
//!   <Item name="UNIT">meters</Item>
//! </GDALMetadata>
//! ```

/// Ordered `(key, value)` metadata items
pub type MetadataItems = Vec<(String, String)>;

/// Encode metadata items in GDAL's XML layout
pub fn to_gdal_xml(items: &[(String, String)]) -> String {
    let mut xml = String::from("<GDALMetadata>\n");
    for (key, value) in items {
        xml.push_str(&format!("  <Item name=\"{}\">{}</Item>\n", escape(key), escape(value)));
    }
    xml.push_str("</GDALMetadata>");
    xml
}

/// Decode GDAL metadata XML. Items that cannot be parsed are skipped.
pub fn parse_gdal_xml(xml: &str) -> MetadataItems {
    let mut items = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<Item") {
        rest = &rest[start + 5..];
        let Some(tag_end) = rest.find('>') else { break };
        let attrs = &rest[..tag_end];
        let body_start = tag_end + 1;
        let Some(body_len) = rest[body_start..].find("</Item>") else { break };
        let value = &rest[body_start..body_start + body_len];
        rest = &rest[body_start + body_len..];

        if let Some(name) = attribute(attrs, "name") {
            items.push((unescape(name), unescape(value)));
        }
    }

    items
}

/// Look up one item by key
pub fn find<'a>(items: &'a [(String, String)], key: &str) -> Option<&'a str> {
    items.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let start = attrs.find(&needle)? + needle.len();
    let len = attrs[start..].find('"')?;
    Some(&attrs[start..start + len])
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn unescape(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_preserves_order_and_special_chars() {
        let items: MetadataItems = vec![
            ("DISPLAY_NAME".into(), "shore_proximity".into()),
            ("VALUE_MAP".into(), r#"{"0": "<=0.00", "254": "untouched"}"#.into()),
            ("DESCRIPTION".into(), "A & B".into()),
        ];
        let xml = to_gdal_xml(&items);
        assert!(xml.contains("&lt;=0.00"));
        assert!(xml.contains("&quot;254&quot;"));

        let parsed = parse_gdal_xml(&xml);
        assert_eq!(parsed, items);
        assert_eq!(find(&parsed, "DESCRIPTION"), Some("A & B"));
        assert_eq!(find(&parsed, "MISSING"), None);
    }

    #[test]
    fn test_parse_gdal_written_xml() {
        let xml = "<GDALMetadata>\n  <Item name=\"UNIT\" domain=\"\">meters</Item>\n  <Item>orphan</Item>\n</GDALMetadata>\n";
        assert_eq!(parse_gdal_xml(xml), vec![("UNIT".to_string(), "meters".to_string())]);
    }
}
