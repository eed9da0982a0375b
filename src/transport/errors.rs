//! HTTP-specific error types for the eBay Trading SDK.
//!
//! # Error Handling
//!
//! - [`HttpError::Response`]: The endpoint answered with a non-2xx status
//! - [`HttpError::Network`]: The underlying HTTP client failed (connection,
//!   TLS, timeout); the `reqwest` error is passed through untouched
//!
//! eBay reports business failures inside a `200 OK` body, so most API
//! problems surface later as [`ApiError`](crate::response::ApiError) rather
//! than here.
//!
//! # Example
//!
//! ```rust,ignore
//! use ebay_trading::transport::HttpError;
//!
//! match transport.send(url, &headers, body).await {
//!     Ok(body) => println!("{body}"),
//!     Err(HttpError::Response { code, .. }) => println!("HTTP {code}"),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Unified error type for transport failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The endpoint returned a non-2xx status code.
    #[error("eBay endpoint returned HTTP {code}: {body}")]
    Response {
        /// The HTTP status code of the response.
        code: u16,
        /// The raw response body.
        body: String,
    },

    /// Network or connection error.
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}
