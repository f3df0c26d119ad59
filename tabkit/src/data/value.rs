//! Scalar values held by dataset cells

use serde::{Deserialize, Serialize};

/// A single raw value in a dataset.
///
/// In JSON a scalar is written untagged: a string, a number, or `null`
/// for a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Free text
    Text(String),
    /// Absent value
    #[default]
    Missing,
}

impl Scalar {
    /// Create a text scalar
    pub fn text(value: impl Into<String>) -> Self {
        Scalar::Text(value.into())
    }

    /// Check if this value is numeric-typed (integer or float)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Integer(_) | Scalar::Float(_))
    }

    /// Check if this value is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, Scalar::Missing)
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }
}

/// Plain rendering: text as-is, integers in decimal, floats in their
/// shortest round-trip form, missing as the empty string.
impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Integer(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Missing => Ok(()),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Scalar::Missing)
    }
}
