//! The client facade for the eBay Trading API.
//!
//! A [`TradingClient`] holds only session-wide globals. Choosing a verb or a
//! field on it starts a [`TradingRequest`] seeded with those globals;
//! changing a global returns a new client. Configure a client once per
//! account and branch it into as many independent calls as needed.

use std::sync::Arc;

use serde_json::Value;

use crate::config::{Definitions, Globals, NameKind};
use crate::error::ConfigError;
use crate::request::TradingRequest;
use crate::transport::Transport;

/// Outcome of [`TradingClient::dispatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// A global or service name produced a reconfigured client.
    Client(TradingClient),
    /// A verb or field name started a request.
    Request(TradingRequest),
}

/// Immutable, session-wide entry point for eBay Trading API calls.
///
/// # Thread Safety
///
/// `TradingClient` is `Send + Sync`. Clones share the same definitions and
/// transport, so every client in the process draws from one call quota.
///
/// # Example
///
/// ```rust
/// use ebay_trading::TradingClient;
///
/// let client = TradingClient::new()
///     .auth_token("token")
///     .sandbox(true)
///     .per_page(50);
///
/// let request = client.verb("GetMyeBaySelling").field("ActiveList", true);
/// assert_eq!(request.globals().per_page(), 50);
/// assert_eq!(request.endpoint(), Ok("https://api.sandbox.ebay.com/ws/api.dll"));
/// ```
#[derive(Clone, Debug)]
pub struct TradingClient {
    globals: Globals,
    definitions: Arc<Definitions>,
    transport: Arc<Transport>,
}

// Verify TradingClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TradingClient>();
};

impl PartialEq for TradingClient {
    fn eq(&self, other: &Self) -> bool {
        self.globals == other.globals
    }
}

impl Eq for TradingClient {}

impl Default for TradingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TradingClient {
    /// Creates a client with default globals, the standard definitions and
    /// the shared transport.
    #[must_use]
    pub fn new() -> Self {
        Self::from_globals(Globals::default())
    }

    /// Creates a client from explicit globals.
    #[must_use]
    pub fn from_globals(globals: Globals) -> Self {
        Self {
            globals,
            definitions: Definitions::standard(),
            transport: Transport::shared(),
        }
    }

    /// Creates a client with `settings` merged over the default globals.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownName`] if a key is not a registered global.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ebay_trading::TradingClient;
    /// use serde_json::json;
    ///
    /// let client = TradingClient::create([("site", json!(3)), ("raw", json!(true))]).unwrap();
    /// assert_eq!(client.globals().site(), "3");
    /// assert!(client.globals().raw());
    ///
    /// assert!(TradingClient::create([("colour", json!("red"))]).is_err());
    /// ```
    pub fn create<K, I>(settings: I) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let definitions = Definitions::standard();
        let settings = settings
            .into_iter()
            .map(|(key, value)| {
                let key = key.into();
                match definitions.resolve(&key) {
                    Some(NameKind::Global) => Ok((key, value)),
                    _ => Err(ConfigError::UnknownName { name: key }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_globals(Globals::merged(settings)))
    }

    /// Creates a client from the `EBAY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] naming the first missing
    /// variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::from_globals(Globals::from_env()?))
    }

    /// Returns a copy of this client sending through `transport`.
    #[must_use]
    pub fn with_transport(&self, transport: Arc<Transport>) -> Self {
        Self {
            transport,
            ..self.clone()
        }
    }

    /// Returns a copy of this client resolving names and endpoints with `definitions`.
    #[must_use]
    pub fn with_definitions(&self, definitions: Arc<Definitions>) -> Self {
        Self {
            definitions,
            ..self.clone()
        }
    }

    /// The client's globals.
    #[must_use]
    pub const fn globals(&self) -> &Globals {
        &self.globals
    }

    /// The definitions used for dispatch and endpoint resolution.
    #[must_use]
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Returns a copy of this client with one global replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownName`] if `name` is not a registered global.
    pub fn set_global(&self, name: &str, value: impl Into<Value>) -> Result<Self, ConfigError> {
        match self.definitions.resolve(name) {
            Some(NameKind::Global) => Ok(self.with_global(name, value.into())),
            _ => Err(ConfigError::UnknownName {
                name: name.to_string(),
            }),
        }
    }

    /// Returns a copy of this client sending to another service of the endpoint table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownName`] if the service is not registered.
    pub fn service(&self, name: &str) -> Result<Self, ConfigError> {
        match self.definitions.resolve(name) {
            Some(NameKind::Service) => Ok(self.with_global("serviceName", Value::from(name))),
            _ => Err(ConfigError::UnknownName {
                name: name.to_string(),
            }),
        }
    }

    /// Starts an empty request carrying this client's globals.
    #[must_use]
    pub fn request(&self) -> TradingRequest {
        TradingRequest::new(
            self.globals.clone(),
            Arc::clone(&self.definitions),
            Arc::clone(&self.transport),
        )
    }

    /// Starts a request calling `name`.
    #[must_use]
    pub fn verb(&self, name: impl Into<String>) -> TradingRequest {
        self.request().verb(name)
    }

    /// Starts a request with one field set.
    #[must_use]
    pub fn field(&self, name: impl Into<String>, value: impl Into<Value>) -> TradingRequest {
        self.request().field(name, value)
    }

    /// Routes `name` to the mutator registered for it in the definitions.
    ///
    /// Verbs and fields start a request; globals and services produce a new
    /// client. Verbs and services ignore `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownName`] for unregistered names.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ebay_trading::{Dispatched, TradingClient};
    /// use serde_json::json;
    ///
    /// let client = TradingClient::new();
    /// let Ok(Dispatched::Request(request)) = client.dispatch("GetOrders", json!(null)) else {
    ///     panic!("verbs start a request");
    /// };
    /// assert_eq!(request.verb_name(), Some("GetOrders"));
    ///
    /// let Ok(Dispatched::Client(client)) = client.dispatch("perPage", json!(10)) else {
    ///     panic!("globals reconfigure the client");
    /// };
    /// assert_eq!(client.globals().per_page(), 10);
    /// ```
    pub fn dispatch(&self, name: &str, value: impl Into<Value>) -> Result<Dispatched, ConfigError> {
        match self.definitions.resolve(name) {
            Some(NameKind::Verb) => Ok(Dispatched::Request(self.verb(name))),
            Some(NameKind::Field) => Ok(Dispatched::Request(self.field(name, value))),
            Some(NameKind::Global) => Ok(Dispatched::Client(self.with_global(name, value.into()))),
            Some(NameKind::Service) => Ok(Dispatched::Client(
                self.with_global("serviceName", Value::from(name)),
            )),
            None => Err(ConfigError::UnknownName {
                name: name.to_string(),
            }),
        }
    }

    fn with_global(&self, name: &str, value: Value) -> Self {
        Self {
            globals: self.globals.with(name, value),
            ..self.clone()
        }
    }
}

/// Generates one typed setter per global, each returning a new client.
macro_rules! global_setters {
    ($($(#[$doc:meta])* $method:ident => $key:literal : $ty:ty;)*) => {
        impl TradingClient {
            $(
                $(#[$doc])*
                #[must_use]
                pub fn $method(&self, value: $ty) -> Self {
                    self.with_global($key, Value::from(value))
                }
            )*
        }
    };
}

global_setters! {
    /// Sets the user auth token (`authToken`).
    auth_token => "authToken": &str;
    /// Sets the certificate id (`cert`).
    cert => "cert": &str;
    /// Sets the application id (`app`).
    app => "app": &str;
    /// Sets the developer id (`devName`).
    dev_name => "devName": &str;
    /// Selects the sandbox (`sandbox`).
    sandbox => "sandbox": bool;
    /// Sets the eBay site id (`site`).
    site => "site": u32;
    /// Returns raw response bodies instead of normalized results (`raw`).
    raw => "raw": bool;
    /// Sets the page size of paginated calls (`perPage`).
    per_page => "perPage": u32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let client = TradingClient::new();
        assert_eq!(client.globals(), &Globals::default());
        assert_eq!(client, TradingClient::default());
    }

    #[test]
    fn test_global_setters_return_new_clients() {
        let base = TradingClient::new();
        let configured = base
            .auth_token("token")
            .cert("cert")
            .app("app")
            .dev_name("dev")
            .sandbox(true)
            .site(77)
            .raw(true)
            .per_page(25);

        assert_eq!(base, TradingClient::new());
        let globals = configured.globals();
        assert_eq!(globals.auth_token(), Some("token"));
        assert_eq!(globals.cert(), Some("cert"));
        assert_eq!(globals.app(), Some("app"));
        assert_eq!(globals.dev_name(), Some("dev"));
        assert_eq!(globals.environment(), Environment::Sandbox);
        assert_eq!(globals.site(), "77");
        assert!(globals.raw());
        assert_eq!(globals.per_page(), 25);
    }

    #[test]
    fn test_requests_are_seeded_with_client_globals() {
        let client = TradingClient::new().auth_token("token");
        let request = client.field("ItemID", "1");

        assert_eq!(request.globals(), client.globals());
        assert_eq!(request.verb_name(), None);
        assert_eq!(request.fields()["ItemID"], json!("1"));
    }

    #[test]
    fn test_branches_do_not_interfere() {
        let client = TradingClient::new().auth_token("token");
        let sandboxed = client.sandbox(true);

        let first = client.verb("GetOrders");
        let second = sandboxed.verb("GetOrders");

        assert!(!first.globals().sandbox());
        assert!(second.globals().sandbox());
        assert!(!client.globals().sandbox());
    }

    #[test]
    fn test_set_global_validates_the_name() {
        let client = TradingClient::new();
        assert!(client.set_global("perPage", 10).is_ok());
        assert_eq!(
            client.set_global("GetOrders", 10),
            Err(ConfigError::UnknownName {
                name: "GetOrders".to_string()
            })
        );
    }

    #[test]
    fn test_service_switching() {
        let client = TradingClient::new().service("Shopping").unwrap();
        assert_eq!(client.globals().service_name(), "Shopping");
        assert_eq!(
            client.request().endpoint(),
            Ok("http://open.api.ebay.com/shopping?")
        );

        let sandboxed = client.sandbox(true);
        assert!(matches!(
            sandboxed.request().endpoint(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));

        assert!(TradingClient::new().service("Nowhere").is_err());
    }

    #[test]
    fn test_dispatch_covers_every_kind() {
        let client = TradingClient::new();

        assert!(matches!(
            client.dispatch("OrderStatus", "Active"),
            Ok(Dispatched::Request(_))
        ));
        assert!(matches!(
            client.dispatch("FindingService", Value::Null),
            Ok(Dispatched::Client(ref c)) if c.globals().service_name() == "FindingService"
        ));
        assert!(matches!(
            client.dispatch("NotAName", Value::Null),
            Err(ConfigError::UnknownName { .. })
        ));
    }

    #[test]
    fn test_create_rejects_unknown_globals() {
        assert!(TradingClient::create([("perPage", json!(5))]).is_ok());
        assert_eq!(
            TradingClient::create([("ItemID", json!(5))]),
            Err(ConfigError::UnknownName {
                name: "ItemID".to_string()
            })
        );
    }

    #[test]
    fn test_with_definitions_changes_endpoints() {
        let definitions = Definitions::standard().with_endpoint(
            "Trading",
            Environment::Production,
            "http://localhost:9999/ws",
        );
        let client = TradingClient::new().with_definitions(Arc::new(definitions));
        assert_eq!(client.request().endpoint(), Ok("http://localhost:9999/ws"));
    }
}
