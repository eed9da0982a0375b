//! Rate-limited HTTP transport for eBay API calls.
//!
//! This module provides the single sending path every request goes through.
//!
//! # Overview
//!
//! - [`Transport`]: POSTs wire documents to an endpoint, queueing on its limiter
//! - [`RateLimiter`]: FIFO limiter admitting a fixed number of calls per window
//! - [`HttpError`]: Non-2xx replies and network failures
//!
//! # Shared Quota
//!
//! eBay applies one call quota per application, no matter how many account
//! handles the application uses. [`Transport::shared`] returns one
//! process-wide transport and every [`TradingClient`](crate::TradingClient)
//! uses it unless another transport is injected with
//! [`TradingClient::with_transport`](crate::TradingClient::with_transport).
//!
//! ```rust,ignore
//! use ebay_trading::transport::{RateLimitConfig, Transport, TransportConfig};
//!
//! // Approved applications may raise the ceiling once, at startup.
//! Transport::install(TransportConfig {
//!     rate_limit: RateLimitConfig::per_day(1_500_000),
//!     timeout: None,
//! })?;
//! ```

mod errors;
mod rate_limiter;
mod sender;

pub use errors::HttpError;
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use sender::{Transport, TransportConfig, SDK_VERSION};
