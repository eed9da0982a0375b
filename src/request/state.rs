//! The immutable request builder.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::config::{Definitions, Globals, NameKind};
use crate::error::ConfigError;
use crate::request::errors::RequestError;
use crate::response::{collect_pages, normalize, NormalizedResult, PageSchedule, TradingResponse};
use crate::transport::Transport;
use crate::wire::{parse_document, write_document};

/// Compatibility level sent with every call.
pub const COMPATIBILITY_LEVEL: &str = "775";

/// Application name sent when no `app` global is set.
pub const DEFAULT_APP_NAME: &str = "Rust::ebay-trading";

const LIST_MARKER: &str = "List";
const LISTING_MARKER: &str = "Listing";
const PAGINATION_FIELD: &str = "Pagination";

/// An immutable eBay Trading call under construction.
///
/// A request holds a verb, the fields of the call and the globals of the
/// [`TradingClient`](crate::TradingClient) that produced it. Every builder
/// method returns a new request and leaves the receiver untouched, so one
/// request can safely branch into several independent calls.
///
/// Globals cannot be changed on a request; set them on the client instead.
///
/// # Thread Safety
///
/// `TradingRequest` is `Send + Sync` and cheap to clone.
///
/// # Example
///
/// ```rust
/// use ebay_trading::TradingClient;
/// use serde_json::json;
///
/// let base = TradingClient::new().auth_token("token").verb("GetOrders");
/// let active = base.field("OrderStatus", "Active");
/// let completed = base.field("OrderStatus", "Completed");
///
/// assert!(base.fields().is_empty());
/// assert_eq!(active.fields()["OrderStatus"], json!("Active"));
/// assert_eq!(completed.fields()["OrderStatus"], json!("Completed"));
/// ```
#[derive(Clone, Debug)]
pub struct TradingRequest {
    verb: Option<String>,
    fields: Map<String, Value>,
    globals: Globals,
    definitions: Arc<Definitions>,
    transport: Arc<Transport>,
}

// Verify TradingRequest is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TradingRequest>();
};

impl PartialEq for TradingRequest {
    fn eq(&self, other: &Self) -> bool {
        self.verb == other.verb && self.fields == other.fields && self.globals == other.globals
    }
}

impl Eq for TradingRequest {}

impl TradingRequest {
    pub(crate) fn new(
        globals: Globals,
        definitions: Arc<Definitions>,
        transport: Arc<Transport>,
    ) -> Self {
        Self {
            verb: None,
            fields: Map::new(),
            globals,
            definitions,
            transport,
        }
    }

    /// Returns a copy of this request calling `name`.
    #[must_use]
    pub fn verb(&self, name: impl Into<String>) -> Self {
        Self {
            verb: Some(name.into()),
            ..self.clone()
        }
    }

    /// Returns a copy of this request with one field replaced.
    ///
    /// Values may be scalars, nested objects or arrays; see
    /// [`write_document`](crate::wire::write_document) for how they are sent.
    #[must_use]
    pub fn field(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.fields.insert(name.into(), value.into());
        next
    }

    /// Always fails: globals are configured on the client, never per call.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Setting`] naming the rejected global.
    pub fn set_global(&self, name: &str, _value: impl Into<Value>) -> Result<Self, ConfigError> {
        Err(ConfigError::Setting {
            setting: name.to_string(),
        })
    }

    /// Routes `name` to the mutator registered for it in the definitions.
    ///
    /// Verbs ignore `value`. Globals and services are rejected the same way
    /// as [`TradingRequest::set_global`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Setting`] for globals and services, and
    /// [`ConfigError::UnknownName`] for unregistered names.
    pub fn dispatch(&self, name: &str, value: impl Into<Value>) -> Result<Self, ConfigError> {
        match self.definitions.resolve(name) {
            Some(NameKind::Verb) => Ok(self.verb(name)),
            Some(NameKind::Field) => Ok(self.field(name, value)),
            Some(NameKind::Global | NameKind::Service) => self.set_global(name, value),
            None => Err(ConfigError::UnknownName {
                name: name.to_string(),
            }),
        }
    }

    /// The verb to call, if one was chosen.
    #[must_use]
    pub fn verb_name(&self) -> Option<&str> {
        self.verb.as_deref()
    }

    /// The fields of the call, in insertion order.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The globals inherited from the client.
    #[must_use]
    pub const fn globals(&self) -> &Globals {
        &self.globals
    }

    /// Resolves the URL for the configured service and environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the definitions have no URL
    /// for that pair.
    pub fn endpoint(&self) -> Result<&str, ConfigError> {
        let service = self.globals.service_name();
        let environment = self.globals.environment();
        self.definitions
            .endpoint(service, environment)
            .ok_or_else(|| ConfigError::InvalidEndpoint {
                service: service.to_string(),
                environment: environment.to_string(),
            })
    }

    /// Builds the eBay headers for this call.
    ///
    /// The call name, compatibility level, site id and application name are
    /// always present (site defaults to `0`). Certificate and developer names
    /// are sent when set.
    #[must_use]
    pub fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "X-EBAY-API-CALL-NAME".to_string(),
            self.verb.clone().unwrap_or_default(),
        );
        headers.insert(
            "X-EBAY-API-COMPATIBILITY-LEVEL".to_string(),
            COMPATIBILITY_LEVEL.to_string(),
        );
        headers.insert("X-EBAY-API-SITEID".to_string(), self.globals.site());
        headers.insert(
            "X-EBAY-API-APP-NAME".to_string(),
            self.globals.app().unwrap_or(DEFAULT_APP_NAME).to_string(),
        );
        if let Some(cert) = self.globals.cert() {
            headers.insert("X-EBAY-API-CERT-NAME".to_string(), cert.to_string());
        }
        if let Some(dev_name) = self.globals.dev_name() {
            headers.insert("X-EBAY-API-DEV-NAME".to_string(), dev_name.to_string());
        }
        headers
    }

    /// Finds the field that makes this a paginated listing call.
    ///
    /// Fields are scanned from the most recently added backwards; the first
    /// name containing `List` but not `Listing` wins.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ebay_trading::TradingClient;
    ///
    /// let request = TradingClient::new()
    ///     .field("FooList", true)
    ///     .field("FooListing", true);
    /// assert_eq!(request.list_field_key(), Some("FooList"));
    /// ```
    #[must_use]
    pub fn list_field_key(&self) -> Option<&str> {
        self.fields
            .keys()
            .rev()
            .find(|key| key.contains(LIST_MARKER) && !key.contains(LISTING_MARKER))
            .map(String::as_str)
    }

    /// Finds the field that carries the page number on the wire.
    ///
    /// The list field wins. Without one, a top-level `Pagination` field set
    /// by the caller (as `GetOrders` and `GetSellerList` take it) is used.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ebay_trading::TradingClient;
    /// use serde_json::json;
    ///
    /// let orders = TradingClient::new()
    ///     .verb("GetOrders")
    ///     .field("Pagination", json!({ "EntriesPerPage": 50 }));
    /// assert_eq!(orders.page_field_key(), Some("Pagination"));
    ///
    /// let item = TradingClient::new().verb("GetItem").field("ItemID", "1");
    /// assert_eq!(item.page_field_key(), None);
    /// ```
    #[must_use]
    pub fn page_field_key(&self) -> Option<&str> {
        self.list_field_key().or_else(|| {
            self.fields
                .keys()
                .find(|key| key.as_str() == PAGINATION_FIELD)
                .map(String::as_str)
        })
    }

    /// Serializes the call for the given page (1-based).
    ///
    /// The root element is `<Verb>Request`. It holds the credentials block
    /// followed by the fields. The list field, if any, receives a
    /// `Pagination` block with `PageNumber` and `EntriesPerPage`; otherwise a
    /// top-level `Pagination` field gets its `PageNumber` set to `page`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NoVerb`] without a verb and
    /// [`RequestError::Xml`] if the writer fails.
    pub fn to_wire_document(&self, page: u32) -> Result<String, RequestError> {
        let verb = self.verb.as_deref().ok_or(RequestError::NoVerb)?;

        let mut children = Map::new();
        children.insert(
            "RequesterCredentials".to_string(),
            json!({ "eBayAuthToken": self.globals.auth_token() }),
        );

        let page_key = self.page_field_key();
        let per_page = self.globals.per_page();
        for (name, value) in &self.fields {
            let value = match page_key {
                Some(key) if key == name.as_str() && key == PAGINATION_FIELD => {
                    with_page_number(value, page, per_page)
                }
                Some(key) if key == name.as_str() => with_pagination(value, page, per_page),
                _ => value.clone(),
            };
            children.insert(name.clone(), value);
        }

        Ok(write_document(&format!("{verb}Request"), &children)?)
    }

    /// Sends the call and resolves to its normalized, fully paginated result.
    ///
    /// With the `raw` global set, the first page's body is returned untouched
    /// and no further pages are fetched. A call without a field to carry the
    /// page number (see [`TradingRequest::page_field_key`]) also stops at the
    /// first page, since every follow-up request would repeat it.
    ///
    /// # Errors
    ///
    /// - [`RequestError::NoAuthToken`] / [`RequestError::NoVerb`] before anything is sent
    /// - [`RequestError::Config`] if the endpoint cannot be resolved
    /// - [`RequestError::Http`] / [`RequestError::Xml`] for transport and decoding failures
    /// - [`RequestError::NoResponseWrapper`] / [`RequestError::Api`] from normalization
    pub async fn run(&self) -> Result<TradingResponse, RequestError> {
        if self.globals.auth_token().is_none() {
            return Err(RequestError::NoAuthToken);
        }
        if self.verb.is_none() {
            return Err(RequestError::NoVerb);
        }

        let body = self.send_page(1).await?;
        if self.globals.raw() {
            return Ok(TradingResponse::Raw(body));
        }

        let first = self.normalize_body(&body)?;
        if self.page_field_key().is_none() {
            if let PageSchedule::Paginating { pages } = PageSchedule::for_first_page(&first) {
                warn!(
                    "{} reported {} pages but has no field to carry a page number; \
                     returning the first page only",
                    self.verb.as_deref().unwrap_or_default(),
                    pages
                );
            }
            return Ok(TradingResponse::Normalized(first));
        }

        let merged = collect_pages(first, |page| self.fetch_page(page)).await?;
        Ok(TradingResponse::Normalized(merged))
    }

    async fn fetch_page(&self, page: u32) -> Result<NormalizedResult, RequestError> {
        let body = self.send_page(page).await?;
        self.normalize_body(&body)
    }

    async fn send_page(&self, page: u32) -> Result<String, RequestError> {
        let endpoint = self.endpoint()?;
        let document = self.to_wire_document(page)?;
        Ok(self
            .transport
            .send(endpoint, &self.headers(), document)
            .await?)
    }

    fn normalize_body(&self, body: &str) -> Result<NormalizedResult, RequestError> {
        let verb = self.verb.as_deref().ok_or(RequestError::NoVerb)?;
        let tree = parse_document(body)?;
        normalize(&tree, verb, &self.definitions)
    }
}

fn with_pagination(value: &Value, page: u32, per_page: u32) -> Value {
    let mut container = match value {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    container.insert(
        PAGINATION_FIELD.to_string(),
        json!({ "PageNumber": page, "EntriesPerPage": per_page }),
    );
    Value::Object(container)
}

fn with_page_number(value: &Value, page: u32, per_page: u32) -> Value {
    let mut block = match value {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    block.insert("PageNumber".to_string(), json!(page));
    block
        .entry("EntriesPerPage")
        .or_insert_with(|| json!(per_page));
    Value::Object(block)
}
