//! Error type surfaced by running a request.

use thiserror::Error;

use crate::error::ConfigError;
use crate::response::ApiError;
use crate::transport::HttpError;
use crate::wire::XmlError;

/// Errors that can occur while building, sending or normalizing a call.
///
/// None of these are retried internally. For paginated calls, the first
/// failing page aborts the whole call.
///
/// # Example
///
/// ```rust,ignore
/// use ebay_trading::{RequestError, TradingClient};
///
/// match client.verb("GetOrders").run().await {
///     Ok(response) => println!("{response:?}"),
///     Err(RequestError::Api(e)) => eprintln!("eBay rejected the call: {}", e.message),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request was run before a verb was chosen.
    #[error("No eBay verb defined. Choose one with `verb(\"GetOrders\")` before running the request.")]
    NoVerb,

    /// The request was run without an auth token in its globals.
    #[error("No auth token present. Set one with `TradingClient::auth_token` or the EBAY_TOKEN variable.")]
    NoAuthToken,

    /// The response did not contain the `<Verb>Response` element.
    #[error("Response is missing the '{wrapper}' element.")]
    NoResponseWrapper {
        /// The element name that was expected.
        wrapper: String,
    },

    /// Endpoint resolution or configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP exchange failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The request could not be written or the response could not be read.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The remote API reported `Ack` = `Error` or `Failure`.
    #[error(transparent)]
    Api(#[from] ApiError),
}
