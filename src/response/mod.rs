//! Response handling for eBay Trading API calls.
//!
//! # Overview
//!
//! - [`NormalizedResult`]: The `{ results?, pagination?, ...fields }` shape every call resolves to
//! - [`Value`]: A normalized node (text, number, date, boolean, list or mapping)
//! - [`ApiError`]: Remote failure reported through `Ack`
//! - [`collect_pages`]: Sequential multi-page aggregation
//! - [`TradingResponse`]: Either a normalized result or the raw body
//!
//! # Example
//!
//! ```rust,ignore
//! use ebay_trading::{TradingClient, TradingResponse};
//!
//! let response = TradingClient::from_env()?
//!     .verb("GetMyeBaySelling")
//!     .field("ActiveList", serde_json::json!({ "Include": true }))
//!     .run()
//!     .await?;
//!
//! if let TradingResponse::Normalized(result) = response {
//!     for item in result.results() {
//!         println!("{:?}", item.get("ItemID"));
//!     }
//! }
//! ```

mod errors;
mod normalize;
mod pagination;
mod value;

pub use errors::ApiError;
pub use normalize::{cast, flatten, fold, normalize, NormalizedResult, Pagination};
pub use pagination::{collect_pages, PageSchedule};
pub use value::Value;

/// Outcome of [`TradingRequest::run`](crate::TradingRequest::run).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TradingResponse {
    /// The normalized (and, for listing calls, fully paginated) result.
    Normalized(NormalizedResult),
    /// The unprocessed body of the first page, returned when `raw` is set.
    Raw(String),
}

impl TradingResponse {
    /// Returns the normalized result, if raw mode was off.
    #[must_use]
    pub fn into_normalized(self) -> Option<NormalizedResult> {
        match self {
            Self::Normalized(result) => Some(result),
            Self::Raw(_) => None,
        }
    }

    /// Returns the raw body, if raw mode was on.
    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(body) => Some(body.as_str()),
            Self::Normalized(_) => None,
        }
    }

    /// Returns `true` for a raw body.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}
