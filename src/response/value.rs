//! Typed values produced by response normalization.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Number;

/// A node of a normalized response.
///
/// Unlike [`serde_json::Value`], a normalized tree can hold dates: nodes
/// registered as date nodes in the [`Definitions`](crate::Definitions) are
/// parsed into [`DateTime<Utc>`]. Mapping keys are kept in sorted order.
///
/// Serializes as plain JSON, with dates rendered as RFC 3339 strings.
///
/// # Example
///
/// ```rust
/// use ebay_trading::Value;
///
/// let value = Value::from(serde_json::json!({ "OrderID": "1-2", "Total": 3 }));
/// assert_eq!(value.get("OrderID").and_then(Value::as_str), Some("1-2"));
/// assert_eq!(value.get("Total").and_then(Value::as_u64), Some(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An absent value.
    Null,
    /// A `true`/`false` literal.
    Bool(bool),
    /// A number from a registered numeric node.
    Number(Number),
    /// A timestamp from a registered date node.
    Date(DateTime<Utc>),
    /// Any other text.
    String(String),
    /// A sequence of repeated elements.
    List(Vec<Value>),
    /// An element with child elements.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Looks up a child of a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the value of a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a non-negative integer, parsing numeric strings as well.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the timestamp of a date value.
    #[must_use]
    pub const fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Returns the items of a sequence.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the children of a mapping.
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders a scalar as text. Mappings and sequences return `None`.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Date(date) => Some(date.to_rfc3339()),
            Self::Null | Self::List(_) | Self::Map(_) => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}
