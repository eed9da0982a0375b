//! Building and running eBay Trading API calls.
//!
//! # Overview
//!
//! - [`TradingRequest`]: Immutable verb + fields + globals, serializable and runnable
//! - [`RequestError`]: Every way running a request can fail
//!
//! Requests are created by a [`TradingClient`](crate::TradingClient); they
//! inherit the client's globals and shared transport.
//!
//! # Pagination
//!
//! A call is paginated when one of its fields is a list field: its name
//! contains `List` but not `Listing` (`ActiveList`, `SoldList`, ...). The
//! list field receives a `Pagination` block on the wire, and
//! [`TradingRequest::run`] keeps fetching pages until every page reported by
//! the first response has been merged.

mod errors;
mod state;

pub use errors::RequestError;
pub use state::{TradingRequest, COMPATIBILITY_LEVEL, DEFAULT_APP_NAME};
