//! Element attributes
//!
//! The editor stores loosely-typed attribute values on elements (ids, heading
//! levels, list start numbers, image sources). This module gives them a small
//! closed type with lenient accessors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute holding the stable segment identifier of an element
pub const SEGMENT_ID: &str = "segmentId";

/// Attribute holding the merge group identifier of an element
pub const MERGE_GROUP_ID: &str = "mergeGroupId";

/// Attribute map of an element, ordered by key
pub type Attributes = BTreeMap<String, AttrValue>;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Explicit null (treated as absent by all accessors)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String value
    Str(String),
}

impl AttrValue {
    /// Borrow the value as a string, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interpret the value as an integer.
    ///
    /// Numeric strings are accepted (`"3"`), as are floats without a
    /// fractional part. Anything else yields `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(n) => Some(*n),
            AttrValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            AttrValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Check whether the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}
