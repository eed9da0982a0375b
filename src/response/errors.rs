//! Remote failure reported through the response `Ack`.

use thiserror::Error;

use crate::response::value::Value;

/// The remote API answered with `Ack` set to `Error` or `Failure`.
///
/// The message is the first error's `LongMessage`, falling back to its
/// `ShortMessage`. The complete normalized `Errors` payload is kept in
/// [`ApiError::errors`] for callers that need every entry.
///
/// # Example
///
/// ```rust
/// use ebay_trading::{ApiError, Value};
/// use serde_json::json;
///
/// let errors = Value::from(json!({
///     "ShortMessage": "Auth token is invalid.",
///     "LongMessage": "Validation of the authentication token in API request failed.",
///     "ErrorCode": "931"
/// }));
/// let error = ApiError::from_errors("Failure", errors);
///
/// assert_eq!(
///     error.message,
///     "Validation of the authentication token in API request failed."
/// );
/// assert_eq!(error.code.as_deref(), Some("931"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("eBay API call failed ({ack}): {message}")]
pub struct ApiError {
    /// Human readable text of the first error.
    pub message: String,
    /// The `Ack` value that triggered the failure.
    pub ack: String,
    /// `ErrorCode` of the first error, if present.
    pub code: Option<String>,
    /// The normalized `Errors` payload (a mapping, or a list of mappings).
    pub errors: Value,
}

impl ApiError {
    /// Builds an error from the normalized `Errors` payload.
    #[must_use]
    pub fn from_errors(ack: &str, errors: Value) -> Self {
        let first = match &errors {
            Value::List(items) => items.first(),
            Value::Null => None,
            other => Some(other),
        };

        let text_of = |key: &str| {
            first
                .and_then(|e| e.get(key))
                .and_then(Value::to_text)
                .filter(|s| !s.is_empty())
        };

        let message = text_of("LongMessage")
            .or_else(|| text_of("ShortMessage"))
            .unwrap_or_else(|| format!("eBay returned Ack '{ack}' without an error message"));
        let code = text_of("ErrorCode");

        Self {
            message,
            ack: ack.to_string(),
            code,
            errors,
        }
    }
}
