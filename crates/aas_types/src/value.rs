//! Scalar values held by submodel elements
//!
//! An element holds exactly one of four scalar kinds. The set is closed: there
//! is no null, array or object variant.

use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Element Value
// ─────────────────────────────────────────────────────────────────────────────

/// Value of a submodel element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ElementValue {
    /// UTF-8 string (also used for date-like values)
    String(String),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point
    Float(f64),
    /// Boolean flag
    Boolean(bool),
}

impl ElementValue {
    /// Name of the value kind, used as the default declared type tag
    pub fn kind_name(&self) -> &'static str {
        match self {
            ElementValue::String(_) => "string",
            ElementValue::Integer(_) => "int",
            ElementValue::Float(_) => "float",
            ElementValue::Boolean(_) => "bool",
        }
    }

    /// Get as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ElementValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ElementValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 (also converts from integer)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ElementValue::Float(f) => Some(*f),
            ElementValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ElementValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric reading for threshold checks and averaging.
    ///
    /// Integers and floats convert directly; strings count only when they
    /// parse as a number. Booleans are never numeric.
    pub fn numeric_reading(&self) -> Option<f64> {
        match self {
            ElementValue::String(s) => s.trim().parse().ok(),
            ElementValue::Boolean(_) => None,
            other => other.as_f64(),
        }
    }
}

impl fmt::Display for ElementValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementValue::String(s) => write!(f, "{}", s),
            ElementValue::Integer(i) => write!(f, "{}", i),
            // Whole floats keep one decimal: 80.0, not 80
            ElementValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            ElementValue::Float(v) => write!(f, "{}", v),
            ElementValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// From Implementations
// ─────────────────────────────────────────────────────────────────────────────

impl From<bool> for ElementValue {
    fn from(v: bool) -> Self {
        ElementValue::Boolean(v)
    }
}

impl From<i32> for ElementValue {
    fn from(v: i32) -> Self {
        ElementValue::Integer(v as i64)
    }
}

impl From<i64> for ElementValue {
    fn from(v: i64) -> Self {
        ElementValue::Integer(v)
    }
}

impl From<u32> for ElementValue {
    fn from(v: u32) -> Self {
        ElementValue::Integer(v as i64)
    }
}

impl From<f32> for ElementValue {
    fn from(v: f32) -> Self {
        ElementValue::Float(v as f64)
    }
}

impl From<f64> for ElementValue {
    fn from(v: f64) -> Self {
        ElementValue::Float(v)
    }
}

impl From<String> for ElementValue {
    fn from(v: String) -> Self {
        ElementValue::String(v)
    }
}

impl From<&str> for ElementValue {
    fn from(v: &str) -> Self {
        ElementValue::String(v.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TryFrom Implementations
// ─────────────────────────────────────────────────────────────────────────────

/// Error when converting from ElementValue
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Expected {expected}, got {actual}")]
pub struct ValueKindMismatch {
    pub expected: &'static str,
    pub actual: &'static str,
}

impl TryFrom<ElementValue> for String {
    type Error = ValueKindMismatch;
    fn try_from(v: ElementValue) -> Result<Self, Self::Error> {
        match v {
            ElementValue::String(s) => Ok(s),
            other => Err(ValueKindMismatch {
                expected: "string",
                actual: other.kind_name(),
            }),
        }
    }
}

impl TryFrom<ElementValue> for i64 {
    type Error = ValueKindMismatch;
    fn try_from(v: ElementValue) -> Result<Self, Self::Error> {
        v.as_i64().ok_or(ValueKindMismatch {
            expected: "int",
            actual: v.kind_name(),
        })
    }
}

impl TryFrom<ElementValue> for f64 {
    type Error = ValueKindMismatch;
    fn try_from(v: ElementValue) -> Result<Self, Self::Error> {
        v.as_f64().ok_or(ValueKindMismatch {
            expected: "float",
            actual: v.kind_name(),
        })
    }
}

impl TryFrom<ElementValue> for bool {
    type Error = ValueKindMismatch;
    fn try_from(v: ElementValue) -> Result<Self, Self::Error> {
        v.as_bool().ok_or(ValueKindMismatch {
            expected: "bool",
            actual: v.kind_name(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
