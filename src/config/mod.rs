//! Configuration types for the eBay Trading SDK.
//!
//! This module provides the session-wide settings shared by every request a
//! client produces, the definition tables describing the protocol vocabulary,
//! and environment selection.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Globals`]: Immutable cross-request settings (credentials, sandbox flag, page size)
//! - [`Definitions`]: The verb, field, global and endpoint tables
//! - [`NameKind`]: What a registered name dispatches to
//! - [`Environment`]: Production or sandbox
//!
//! # Example
//!
//! ```rust
//! use ebay_trading::{Environment, Globals};
//! use serde_json::json;
//!
//! let globals = Globals::default().with("sandbox", json!(true));
//! assert_eq!(globals.environment(), Environment::Sandbox);
//! assert_eq!(globals.per_page(), 100);
//! assert_eq!(globals.service_name(), "Trading");
//! ```

mod definitions;
mod environment;

pub use definitions::{Definitions, NameKind};
pub use environment::Environment;

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Environment variable holding the user auth token.
pub const TOKEN_VAR: &str = "EBAY_TOKEN";
/// Environment variable holding the certificate id.
pub const CERT_VAR: &str = "EBAY_CERT";
/// Environment variable holding the application id.
pub const APP_ID_VAR: &str = "EBAY_APP_ID";
/// Environment variable holding the developer id.
pub const DEV_ID_VAR: &str = "EBAY_DEV_ID";
/// Optional environment variable enabling the sandbox.
pub const SANDBOX_VAR: &str = "EBAY_SANDBOX";

/// Required credential variables and the globals they populate, in check order.
const CREDENTIALS: [(&str, &str); 4] = [
    (TOKEN_VAR, "authToken"),
    (CERT_VAR, "cert"),
    (APP_ID_VAR, "app"),
    (DEV_ID_VAR, "devName"),
];

const DEFAULT_SERVICE: &str = "Trading";
const DEFAULT_PER_PAGE: u32 = 100;

/// Session-wide settings shared by every request of a client.
///
/// `Globals` is a plain value: every change produces a new instance and there
/// is no way to mutate one in place. Keys are the global names registered in
/// the [`Definitions`] tables (`authToken`, `sandbox`, `perPage`, ...).
///
/// # Defaults
///
/// - `serviceName`: `"Trading"`
/// - `sandbox`: `false`
/// - `site`: `0`
/// - `raw`: `false`
/// - `perPage`: `100`
///
/// # Security
///
/// The `Debug` implementation masks the auth token.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Globals {
    values: Map<String, Value>,
}

impl Default for Globals {
    fn default() -> Self {
        let mut values = Map::new();
        values.insert("serviceName".to_string(), Value::from(DEFAULT_SERVICE));
        values.insert("sandbox".to_string(), Value::Bool(false));
        values.insert("site".to_string(), Value::from(0));
        values.insert("raw".to_string(), Value::Bool(false));
        values.insert("perPage".to_string(), Value::from(DEFAULT_PER_PAGE));
        Self { values }
    }
}

impl Globals {
    /// Builds globals from the defaults with `settings` merged over them.
    #[must_use]
    pub fn merged<K, I>(settings: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut values = Self::default().values;
        for (key, value) in settings {
            values.insert(key.into(), value);
        }
        Self { values }
    }

    /// Reads credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] naming the first missing
    /// variable, checked in the order `EBAY_TOKEN`, `EBAY_CERT`,
    /// `EBAY_APP_ID`, `EBAY_DEV_ID`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Globals::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Vec::with_capacity(CREDENTIALS.len() + 1);
        for (variable, global) in CREDENTIALS {
            let value = lookup(variable)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential { variable })?;
            settings.push((global, Value::String(value)));
        }

        let sandbox = lookup(SANDBOX_VAR).is_some_and(|v| is_truthy(&v));
        settings.push(("sandbox", Value::Bool(sandbox)));

        Ok(Self::merged(settings))
    }

    /// Returns a copy with one global replaced.
    #[must_use]
    pub fn with(&self, name: impl Into<String>, value: Value) -> Self {
        let mut values = self.values.clone();
        values.insert(name.into(), value);
        Self { values }
    }

    /// Returns the raw value of a global.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns all globals as an ordered map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// The user auth token, if set.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.non_empty_str("authToken")
    }

    /// The certificate id, if set.
    #[must_use]
    pub fn cert(&self) -> Option<&str> {
        self.non_empty_str("cert")
    }

    /// The application id, if set.
    #[must_use]
    pub fn app(&self) -> Option<&str> {
        self.non_empty_str("app")
    }

    /// The developer id, if set.
    #[must_use]
    pub fn dev_name(&self) -> Option<&str> {
        self.non_empty_str("devName")
    }

    /// Whether requests go to the sandbox.
    #[must_use]
    pub fn sandbox(&self) -> bool {
        self.flag("sandbox")
    }

    /// Whether raw response bodies are returned without normalization.
    #[must_use]
    pub fn raw(&self) -> bool {
        self.flag("raw")
    }

    /// The eBay site id, rendered for the site header. Defaults to `"0"`.
    #[must_use]
    pub fn site(&self) -> String {
        match self.values.get("site") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => "0".to_string(),
        }
    }

    /// Entries requested per page on paginated calls. Defaults to 100.
    #[must_use]
    pub fn per_page(&self) -> u32 {
        match self.values.get("perPage") {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(DEFAULT_PER_PAGE),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(DEFAULT_PER_PAGE),
            _ => DEFAULT_PER_PAGE,
        }
    }

    /// The service whose endpoint requests are sent to. Defaults to `"Trading"`.
    #[must_use]
    pub fn service_name(&self) -> &str {
        self.non_empty_str("serviceName").unwrap_or(DEFAULT_SERVICE)
    }

    /// The environment selected by the `sandbox` flag.
    #[must_use]
    pub fn environment(&self) -> Environment {
        Environment::from_sandbox(self.sandbox())
    }

    fn non_empty_str(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn flag(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => is_truthy(s),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        }
    }
}

impl fmt::Debug for Globals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            if key == "authToken" {
                map.entry(key, &"*****");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

// Verify Globals is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Globals>();
};
