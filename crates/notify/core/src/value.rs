//! Loosely typed scalar fields from row snapshots.

use std::fmt;

/// A scalar column value that may arrive as a JSON string or number.
///
/// Webhook row snapshots serialize numeric columns either way depending on
/// the column type, so ids and totals accept both.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_integer_form() {
        let v: FieldValue = serde_json::from_str("499").unwrap();
        assert_eq!(v.to_string(), "499");

        let v: FieldValue = serde_json::from_str("1299.5").unwrap();
        assert_eq!(v.to_string(), "1299.5");
    }

    #[test]
    fn test_text_value() {
        let v: FieldValue = serde_json::from_str(r#""ORD123""#).unwrap();
        assert_eq!(v, FieldValue::from("ORD123"));
        assert_eq!(v.to_string(), "ORD123");
    }
}
