//! Shared form-field helpers for drafts and the order ticket.

use std::fmt;

/// A field value that could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: &str, msg: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            msg: msg.into(),
        }
    }

    pub fn unknown_field(field: &str) -> Self {
        Self::new(field, "unknown field")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.msg)
    }
}

impl std::error::Error for FieldError {}

/// Clamp input to `max` characters, the way a length-limited input does.
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Parse an optional enum field: empty input clears it.
pub fn parse_optional<T: std::str::FromStr>(field: &str, value: &str) -> Result<Option<T>, FieldError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| FieldError::new(field, format!("unrecognised value '{}'", value)))
}

pub fn parse_date(field: &str, value: &str) -> Result<Option<chrono::NaiveDate>, FieldError> {
    if value.is_empty() {
        return Ok(None);
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| FieldError::new(field, format!("expected YYYY-MM-DD: {}", e)))
}

/// Text for a form field taken from JSON input. `null` reads as an empty field.
pub fn field_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("ABCDEFGHIJKL", 10), "ABCDEFGHIJ");
        assert_eq!(truncate_chars("éééé", 2), "éé");
        assert_eq!(truncate_chars("X", 10), "X");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("dob", "").unwrap(), None);
        assert!(parse_date("dob", "1980-02-30").is_err());
        let d = parse_date("dob", "1980-02-29").unwrap().unwrap();
        assert_eq!(d.to_string(), "1980-02-29");
    }

    #[test]
    fn test_json_null_is_empty_field() {
        use serde_json::json;
        assert_eq!(field_text(json!(null)), "");
        assert_eq!(field_text(json!("A")), "A");
        assert_eq!(field_text(json!(10)), "10");
    }
}
