use std::fmt;
use serde::{Deserialize, Serialize};

/// Value extracted from a transcript before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Decimal number, or 1/0 for a spoken yes/no
    Number(f64),
    /// Literal term such as "Male"
    Term(String),
}

impl RawValue {
    pub fn is_one(&self) -> bool {
        matches!(self, RawValue::Number(n) if *n == 1.0)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Term(term) => f.write_str(term),
        }
    }
}

/// Field value in the representation the schema expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<RawValue> for FieldValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Number(n) => FieldValue::Number(n),
            RawValue::Term(term) => FieldValue::Text(term),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_drops_trailing_zero() {
        assert_eq!(FieldValue::Number(130.0).to_string(), "130");
        assert_eq!(FieldValue::Number(1.5).to_string(), "1.5");
        assert_eq!(FieldValue::Integer(2).to_string(), "2");
    }

    #[test]
    fn test_serializes_untagged() {
        let values = vec![
            FieldValue::Number(1.5),
            FieldValue::Integer(1),
            FieldValue::text("ASY"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1.5,1,"ASY"]"#);
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(FieldValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::text(" 4.5 ").as_f64(), Some(4.5));
        assert_eq!(FieldValue::text("Male").as_f64(), None);
        assert_eq!(FieldValue::text("NaN").as_f64(), None);
    }

    #[test]
    fn test_raw_is_one() {
        assert!(RawValue::Number(1.0).is_one());
        assert!(!RawValue::Number(0.0).is_one());
        assert!(!RawValue::Term("1".to_string()).is_one());
    }
}
