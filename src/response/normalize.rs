//! Turns a decoded response tree into a [`NormalizedResult`].
//!
//! eBay responses are inconsistent: a collection with one element arrives as
//! a bare object, scalars arrive as text, and pagination metadata hides
//! inside list containers. Normalization runs these steps, in order:
//!
//! 1. Unwrap the `<Verb>Response` element
//! 2. Fail on `Ack` = `Error` / `Failure`
//! 3. Flatten `{ "value": text }` leaves through [`cast`]
//! 4. Drop extraneous top-level keys (namespace, version, build, ...)
//! 5. Fold `PaginationResult` into [`Pagination`]
//! 6. Fold every `...Array` / `...List` key into `results`

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Number;
use tracing::{debug, warn};

use crate::config::Definitions;
use crate::request::RequestError;
use crate::response::errors::ApiError;
use crate::response::value::Value;

const PAGINATION_NODE: &str = "PaginationResult";

/// Pagination metadata reported by a paginated call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// `TotalNumberOfPages`, or 0 when missing.
    pub pages: u32,
    /// `TotalNumberOfEntries`, or 0 when missing.
    pub length: u32,
}

impl Pagination {
    fn from_node(node: &Value) -> Self {
        let count = |key: &str| {
            node.get(key)
                .and_then(Value::as_u64)
                .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX))
        };
        Self {
            pages: count("TotalNumberOfPages"),
            length: count("TotalNumberOfEntries"),
        }
    }
}

/// The predictable shape every successful call resolves to.
///
/// Serializes as `{ "results": [...], "pagination": {...}, ...fields }`, with
/// absent parts omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedResult {
    /// Entries of the response's collection, always a sequence when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    /// Pagination metadata, present only if the response carried it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Every other top-level field of the response.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl NormalizedResult {
    /// Looks up a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the collection entries, or an empty slice.
    #[must_use]
    pub fn results(&self) -> &[Value] {
        self.results.as_deref().unwrap_or_default()
    }

    /// Converts the result back into a value tree.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut map = self.fields;
        if let Some(results) = self.results {
            map.insert("results".to_string(), Value::List(results));
        }
        if let Some(pagination) = self.pagination {
            map.insert(
                "pagination".to_string(),
                Value::Map(BTreeMap::from([
                    ("pages".to_string(), Value::from(u64::from(pagination.pages))),
                    ("length".to_string(), Value::from(u64::from(pagination.length))),
                ])),
            );
        }
        Value::Map(map)
    }
}

/// Casts the text of a leaf node.
///
/// Rules, in priority order:
/// 1. `"true"` / `"false"` become booleans, whatever the key
/// 2. registered date nodes become dates (RFC 3339, or `YYYY-MM-DD` at midnight UTC)
/// 3. registered numeric nodes holding a number become numbers
/// 4. anything else stays a string
///
/// Key lookups are case-insensitive. Text that fails to parse as the
/// registered type stays a string.
///
/// # Example
///
/// ```rust
/// use ebay_trading::{response::cast, Definitions, Value};
///
/// let defs = Definitions::standard();
/// assert_eq!(cast("true", "Anything", &defs), Value::Bool(true));
/// assert_eq!(cast("42", "TotalNumberOfPages", &defs), Value::from(42_u64));
/// assert_eq!(cast("42", "ItemID", &defs), Value::from("42"));
/// assert!(cast("2024-01-01", "EndTime", &defs).as_date().is_some());
/// ```
#[must_use]
pub fn cast(text: &str, key: &str, definitions: &Definitions) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if definitions.is_date_node(key) {
        if let Some(date) = parse_date(text) {
            return Value::Date(date);
        }
    } else if definitions.is_numeric_node(key) {
        if let Some(number) = parse_number(text) {
            return Value::Number(number);
        }
    }

    Value::String(text.to_string())
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(n.into());
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Recursively replaces `{ "value": text }` leaves with their cast value.
///
/// Sequence items are cast with the key of the sequence itself.
#[must_use]
pub fn flatten(node: &serde_json::Value, key: &str, definitions: &Definitions) -> Value {
    match node {
        serde_json::Value::Object(children) => match children.get("value") {
            Some(serde_json::Value::String(text)) if !text.is_empty() => {
                cast(text, key, definitions)
            }
            _ => Value::Map(
                children
                    .iter()
                    .map(|(child, value)| (child.clone(), flatten(value, child, definitions)))
                    .collect(),
            ),
        },
        serde_json::Value::Array(items) => Value::List(
            items
                .iter()
                .map(|item| flatten(item, key, definitions))
                .collect(),
        ),
        serde_json::Value::String(text) => cast(text, key, definitions),
        other => Value::from(other.clone()),
    }
}

/// Normalizes the decoded body of a `verb` call.
///
/// # Errors
///
/// - [`RequestError::NoResponseWrapper`] if the tree has no `<verb>Response` element
/// - [`RequestError::Api`] if `Ack` is `Error` or `Failure`; this wins over
///   every later step
pub fn normalize(
    tree: &serde_json::Value,
    verb: &str,
    definitions: &Definitions,
) -> Result<NormalizedResult, RequestError> {
    let wrapper = format!("{verb}Response");
    let Some(response) = tree.get(&wrapper) else {
        return Err(RequestError::NoResponseWrapper { wrapper });
    };

    let ack = response
        .get("Ack")
        .and_then(|ack| flatten(ack, "Ack", definitions).to_text());
    match ack.as_deref() {
        Some(ack @ ("Error" | "Failure")) => {
            let errors = response
                .get("Errors")
                .map_or(Value::Null, |errors| flatten(errors, "Errors", definitions));
            return Err(ApiError::from_errors(ack, errors).into());
        }
        Some("Warning") => {
            let errors = response
                .get("Errors")
                .map_or(Value::Null, |errors| flatten(errors, "Errors", definitions));
            let detail = ApiError::from_errors("Warning", errors);
            warn!("{} returned a warning: {}", verb, detail.message);
        }
        _ => {}
    }

    let fields = match flatten(response, &wrapper, definitions) {
        Value::Map(fields) => fields,
        _ => BTreeMap::new(),
    };
    let fields = fields
        .into_iter()
        .filter(|(key, _)| !definitions.is_extraneous(key))
        .collect();

    Ok(fold(fields))
}

/// Folds pagination metadata and list containers of a flattened response.
///
/// A top-level `PaginationResult` wins over one nested inside a list
/// container. Every key containing `List` or `Array` contributes its entries
/// to `results`, in key order; a single bare entry is wrapped into a
/// one-element sequence. A list key whose value is not a mapping is kept as
/// a plain field.
///
/// Folding a tree without pagination or list keys leaves `results` and
/// `pagination` absent.
#[must_use]
pub fn fold(mut fields: BTreeMap<String, Value>) -> NormalizedResult {
    let mut result = NormalizedResult {
        pagination: fields
            .remove(PAGINATION_NODE)
            .map(|node| Pagination::from_node(&node)),
        ..NormalizedResult::default()
    };

    let mut containers = Vec::new();
    for (key, value) in fields {
        let is_list = key.contains("List");
        if !(is_list || key.contains("Array")) {
            result.fields.insert(key, value);
            continue;
        }

        let mut container = match value {
            Value::Map(container) => container,
            other => {
                result.fields.insert(key, other);
                continue;
            }
        };

        if is_list {
            if let Some(node) = container.remove(PAGINATION_NODE) {
                result
                    .pagination
                    .get_or_insert_with(|| Pagination::from_node(&node));
            }
        }

        let entries = list_entries(container);
        result
            .results
            .get_or_insert_with(Vec::new)
            .extend(entries);
        containers.push(key);
    }

    if containers.len() > 1 {
        debug!(
            "Merged entries of {} list containers into results: {}",
            containers.len(),
            containers.join(", ")
        );
    }

    result
}

fn list_entries(mut container: BTreeMap<String, Value>) -> Vec<Value> {
    let array_key = container
        .keys()
        .rev()
        .find(|key| key.contains("Array"))
        .cloned();

    let parent = match array_key {
        Some(key) => match container.remove(&key) {
            Some(Value::Map(inner)) => inner,
            _ => return Vec::new(),
        },
        None => container,
    };

    match parent.into_iter().next() {
        Some((_, Value::List(items))) => items,
        Some((_, Value::Null)) | None => Vec::new(),
        Some((_, entry)) => vec![entry],
    }
}
