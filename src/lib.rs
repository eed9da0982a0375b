//! # eBay Trading API Rust SDK
//!
//! A Rust SDK for the eBay Trading API (XML over HTTP), providing an
//! immutable request builder, a shared rate-limited transport and
//! normalization of eBay's XML responses into a predictable shape.
//!
//! ## Overview
//!
//! This SDK provides:
//! - An immutable client facade via [`TradingClient`] holding session-wide [`Globals`]
//! - Immutable, branchable calls via [`TradingRequest`]
//! - Generic name dispatch against the protocol [`Definitions`] tables
//! - XML envelope writing and response decoding via [`wire`]
//! - One process-wide, FIFO rate-limited [`Transport`] (5000 calls/day by default)
//! - Response normalization into [`NormalizedResult`], including automatic
//!   collection of every page of listing calls
//!
//! ## Quick Start
//!
//! ```rust
//! use ebay_trading::TradingClient;
//! use serde_json::json;
//!
//! let client = TradingClient::new()
//!     .auth_token("your-auth-token")
//!     .cert("your-cert-id")
//!     .app("your-app-id")
//!     .dev_name("your-dev-id");
//!
//! let request = client
//!     .verb("GetOrders")
//!     .field("OrderStatus", "Completed")
//!     .field("NumberOfDays", 30);
//!
//! let xml = request.to_wire_document(1).unwrap();
//! assert!(xml.contains("<GetOrdersRequest xmlns=\"urn:ebay:apis:eBLBaseComponents\">"));
//! assert!(xml.contains("<OrderStatus>Completed</OrderStatus>"));
//! ```
//!
//! ## Running Calls
//!
//! ```rust,ignore
//! use ebay_trading::{TradingClient, TradingResponse};
//! use serde_json::json;
//!
//! // Reads EBAY_TOKEN, EBAY_CERT, EBAY_APP_ID, EBAY_DEV_ID and EBAY_SANDBOX
//! let client = TradingClient::from_env()?;
//!
//! let response = client
//!     .verb("GetMyeBaySelling")
//!     .field("ActiveList", json!({ "Include": true }))
//!     .run()
//!     .await?;
//!
//! if let TradingResponse::Normalized(result) = response {
//!     println!("{} active listings", result.results().len());
//! }
//! ```
//!
//! ## Raising the Rate Limit
//!
//! ```rust,ignore
//! use ebay_trading::transport::{RateLimitConfig, Transport, TransportConfig};
//!
//! // Once, at startup, before the first request runs
//! Transport::install(TransportConfig {
//!     rate_limit: RateLimitConfig::per_day(1_500_000),
//!     timeout: None,
//! })?;
//! ```
//!
//! ## Design Principles
//!
//! - **Immutable values**: Every builder method returns a new client or request
//! - **One quota per process**: All clients share one transport unless one is injected
//! - **Vocabulary is data**: Verbs, fields and globals come from [`Definitions`]
//! - **Thread-safe**: All public types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;
pub mod wire;

// Re-export public types at crate root for convenience
pub use client::{Dispatched, TradingClient};
pub use config::{Definitions, Environment, Globals, NameKind};
pub use error::ConfigError;
pub use request::{RequestError, TradingRequest};
pub use response::{ApiError, NormalizedResult, Pagination, TradingResponse, Value};
pub use transport::{HttpError, Transport};
pub use wire::XmlError;
