//! Loosely-typed values as supplied by clients.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A single client-supplied feature value.
///
/// Only JSON scalars are accepted; arrays and objects fail to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FeatureValue {
    /// JSON `null`
    #[default]
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number, integer or floating point
    Number(Number),
    /// JSON string
    Text(String),
}

impl FeatureValue {
    /// Check if this is `null`
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }

    /// Truthiness as a loosely-typed client would see it.
    ///
    /// `null`, `false`, zero and the empty string are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            FeatureValue::Null => false,
            FeatureValue::Bool(b) => *b,
            FeatureValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            FeatureValue::Text(s) => !s.is_empty(),
        }
    }

    /// Borrow the string contents, if this is a string
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Number(value.into())
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        FeatureValue::Number(value.into())
    }
}

impl From<f64> for FeatureValue {
    /// Non-finite floats have no JSON form and become `null`
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(FeatureValue::Null, FeatureValue::Number)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Null => write!(f, "null"),
            FeatureValue::Bool(b) => write!(f, "{b}"),
            FeatureValue::Number(n) => write!(f, "{n}"),
            FeatureValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_scalars() {
        let values: Vec<FeatureValue> =
            serde_json::from_str(r#"[null, true, 3, 2.5, "north"]"#).unwrap();

        assert_eq!(values[0], FeatureValue::Null);
        assert_eq!(values[1], FeatureValue::Bool(true));
        assert_eq!(values[2], FeatureValue::from(3));
        assert_eq!(values[3], FeatureValue::from(2.5));
        assert_eq!(values[4], FeatureValue::from("north"));
    }

    #[test]
    fn test_rejects_nested_values() {
        assert!(serde_json::from_str::<FeatureValue>("[1, 2]").is_err());
        assert!(serde_json::from_str::<FeatureValue>(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_truthiness() {
        assert!(!FeatureValue::Null.is_truthy());
        assert!(!FeatureValue::Bool(false).is_truthy());
        assert!(!FeatureValue::from(0).is_truthy());
        assert!(!FeatureValue::from(0.0).is_truthy());
        assert!(!FeatureValue::from("").is_truthy());

        assert!(FeatureValue::from("Whitefield").is_truthy());
        assert!(FeatureValue::from(-1).is_truthy());
        assert!(FeatureValue::Bool(true).is_truthy());
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(FeatureValue::from(f64::NAN), FeatureValue::Null);
    }
}
