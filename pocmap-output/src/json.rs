use crate::traits::{OutputError, OutputFormatter};
use pocmap_types::Finding;

/// Formats findings as a pretty-printed JSON array.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, findings: &[Finding]) -> Result<Vec<u8>, OutputError> {
        serde_json::to_vec_pretty(findings)
            .map_err(|e| OutputError::FormatError(format!("JSON serialization error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_of_findings() {
        let bytes = JsonFormatter
            .format(&[Finding::new("http://a:80", "x", "low")])
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["check_id"], "x");
    }

    #[test]
    fn empty_report_is_empty_array() {
        let bytes = JsonFormatter.format(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "[]");
    }
}
