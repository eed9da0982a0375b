//! Error types for the eBay Trading SDK.
//!
//! This module contains the configuration error type used throughout the SDK
//! for settings, definition-table and environment failures.
//!
//! # Error Handling
//!
//! Configuration mistakes are reported as soon as they are made: building a
//! client from the environment, pointing it at an unknown service, or trying
//! to change a session-wide global on a single request all return
//! `Result<T, ConfigError>`. Error messages are designed to be clear and
//! actionable.
//!
//! # Example
//!
//! ```rust
//! use ebay_trading::{ConfigError, TradingClient};
//!
//! let request = TradingClient::new().verb("GetOrders");
//! let result = request.set_global("sandbox", true);
//! assert!(matches!(result, Err(ConfigError::Setting { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the SDK or a request chain.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required credential variable is not present in the environment.
    #[error("Missing credential: environment variable '{variable}' is not set.")]
    MissingCredential {
        /// The name of the missing environment variable.
        variable: &'static str,
    },

    /// No endpoint is registered for the service/environment pair.
    #[error("Invalid endpoint: no URL is registered for service '{service}' in the '{environment}' environment.")]
    InvalidEndpoint {
        /// The service name that was looked up.
        service: String,
        /// The environment that was looked up (`production` or `sandbox`).
        environment: String,
    },

    /// A global setting was assigned on a request instead of the client.
    #[error("Cannot configure global '{setting}' on a request. Globals can only be set on the TradingClient.")]
    Setting {
        /// The rejected global name.
        setting: String,
    },

    /// The name is not registered as a verb, field, global or service.
    #[error("Unknown name '{name}': it is not a registered verb, field, global or service.")]
    UnknownName {
        /// The name that could not be resolved.
        name: String,
    },

    /// A definition table could not be loaded.
    #[error("Invalid definitions: {reason}")]
    InvalidDefinitions {
        /// Why the tables were rejected.
        reason: String,
    },

    /// The process-wide transport was configured after it was already in use.
    #[error("The shared transport has already been installed. Configure it once, before the first request.")]
    TransportAlreadyInstalled,
}
