//! Definition tables for the eBay Trading protocol vocabulary.
//!
//! The protocol's verbs, fields and globals are data, not code. This module
//! holds them in a single [`Definitions`] value that is loaded once and shared
//! by every client and request in the process.
//!
//! Besides the four call-building tables (verbs, fields, globals, endpoints),
//! the definitions carry the lookup tables the response normalizer needs:
//! which node names hold dates, which hold numbers, and which top-level keys
//! are transport noise.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::config::Environment;
use crate::error::ConfigError;

/// What kind of mutator a registered name dispatches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// A remote operation name, such as `GetOrders`.
    Verb,
    /// A request parameter name, such as `OrderStatus`.
    Field,
    /// A cross-request setting, such as `authToken`.
    Global,
    /// A service name from the endpoint table, such as `Trading`.
    Service,
}

/// The process-lifetime lookup tables describing the eBay protocol.
///
/// Date and numeric node names are matched case-insensitively.
///
/// # Example
///
/// ```rust
/// use ebay_trading::{Definitions, Environment, NameKind};
///
/// let defs = Definitions::standard();
/// assert_eq!(defs.resolve("GetOrders"), Some(NameKind::Verb));
/// assert_eq!(defs.resolve("authToken"), Some(NameKind::Global));
/// assert_eq!(
///     defs.endpoint("Trading", Environment::Sandbox),
///     Some("https://api.sandbox.ebay.com/ws/api.dll")
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definitions {
    verbs: BTreeSet<String>,
    fields: BTreeSet<String>,
    globals: BTreeSet<String>,
    endpoints: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    date_nodes: BTreeSet<String>,
    #[serde(default)]
    numeric_nodes: BTreeSet<String>,
    #[serde(default)]
    extraneous: Vec<String>,
}

static STANDARD: OnceLock<Arc<Definitions>> = OnceLock::new();

impl Definitions {
    /// Returns the built-in standard tables, built on first use.
    #[must_use]
    pub fn standard() -> Arc<Self> {
        Arc::clone(STANDARD.get_or_init(|| Arc::new(Self::standard_tables())))
    }

    /// Loads definitions from a JSON document.
    ///
    /// The document is an object with `verbs`, `fields` and `globals` arrays,
    /// an `endpoints` object (`service -> environment -> url`) and optional
    /// `dateNodes`, `numericNodes` and `extraneous` arrays.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDefinitions`] if the document does not
    /// match that shape.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let definitions: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidDefinitions {
                reason: e.to_string(),
            })?;
        Ok(definitions.with_lowercase_nodes())
    }

    /// Returns a copy of these definitions with one endpoint URL replaced.
    #[must_use]
    pub fn with_endpoint(
        &self,
        service: impl Into<String>,
        environment: Environment,
        url: impl Into<String>,
    ) -> Self {
        let mut next = self.clone();
        next.endpoints
            .entry(service.into())
            .or_default()
            .insert(environment.as_str().to_string(), url.into());
        next
    }

    /// Resolves a name against the tables.
    ///
    /// Tables are checked in the order verbs, fields, globals, services.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<NameKind> {
        if self.verbs.contains(name) {
            Some(NameKind::Verb)
        } else if self.fields.contains(name) {
            Some(NameKind::Field)
        } else if self.globals.contains(name) {
            Some(NameKind::Global)
        } else if self.endpoints.contains_key(name) {
            Some(NameKind::Service)
        } else {
            None
        }
    }

    /// Looks up the URL for a service in the given environment.
    #[must_use]
    pub fn endpoint(&self, service: &str, environment: Environment) -> Option<&str> {
        self.endpoints
            .get(service)
            .and_then(|by_env| by_env.get(environment.as_str()))
            .map(String::as_str)
    }

    /// Returns `true` if the node name holds a date.
    #[must_use]
    pub fn is_date_node(&self, key: &str) -> bool {
        self.date_nodes.contains(&key.to_lowercase())
    }

    /// Returns `true` if the node name holds a number.
    #[must_use]
    pub fn is_numeric_node(&self, key: &str) -> bool {
        self.numeric_nodes.contains(&key.to_lowercase())
    }

    /// Returns `true` if the top-level key is dropped from normalized results.
    #[must_use]
    pub fn is_extraneous(&self, key: &str) -> bool {
        self.extraneous.iter().any(|k| k == key)
    }

    /// Registered verb names.
    pub fn verbs(&self) -> impl Iterator<Item = &str> {
        self.verbs.iter().map(String::as_str)
    }

    /// Registered field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Registered global names.
    pub fn globals(&self) -> impl Iterator<Item = &str> {
        self.globals.iter().map(String::as_str)
    }

    /// Registered service names.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    fn with_lowercase_nodes(mut self) -> Self {
        self.date_nodes = self.date_nodes.iter().map(|k| k.to_lowercase()).collect();
        self.numeric_nodes = self
            .numeric_nodes
            .iter()
            .map(|k| k.to_lowercase())
            .collect();
        self
    }

    fn standard_tables() -> Self {
        let set = |names: &[&str]| -> BTreeSet<String> {
            names.iter().map(|n| (*n).to_string()).collect()
        };

        let mut endpoints: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (service, environment, url) in ENDPOINTS {
            endpoints
                .entry((*service).to_string())
                .or_default()
                .insert(environment.as_str().to_string(), (*url).to_string());
        }

        Self {
            verbs: set(VERBS),
            fields: set(FIELDS),
            globals: set(GLOBALS),
            endpoints,
            date_nodes: set(DATE_NODES),
            numeric_nodes: set(NUMERIC_NODES),
            extraneous: EXTRANEOUS.iter().map(|k| (*k).to_string()).collect(),
        }
        .with_lowercase_nodes()
    }
}

const VERBS: &[&str] = &[
    "AddFixedPriceItem",
    "AddItem",
    "AddItems",
    "AddOrder",
    "CompleteSale",
    "EndFixedPriceItem",
    "EndItem",
    "GetAccount",
    "GetApiAccessRules",
    "GetBidderList",
    "GetCategories",
    "GetCategoryFeatures",
    "GetFeedback",
    "GetItem",
    "GetItemTransactions",
    "GetMemberMessages",
    "GetMyeBayBuying",
    "GetMyeBaySelling",
    "GetNotificationPreferences",
    "GetOrders",
    "GetSellerEvents",
    "GetSellerList",
    "GetSellerTransactions",
    "GetStore",
    "GetSuggestedCategories",
    "GetTokenStatus",
    "GetUser",
    "GeteBayDetails",
    "GeteBayOfficialTime",
    "RelistItem",
    "ReviseFixedPriceItem",
    "ReviseInventoryStatus",
    "ReviseItem",
    "SetNotificationPreferences",
    "VerifyAddItem",
];

const FIELDS: &[&str] = &[
    "ActiveList",
    "BestOfferList",
    "BidList",
    "CategoryID",
    "CategorySiteID",
    "CreateTimeFrom",
    "CreateTimeTo",
    "DeletedFromSoldList",
    "DeletedFromUnsoldList",
    "DetailLevel",
    "EndTimeFrom",
    "EndTimeTo",
    "EndingReason",
    "ErrorLanguage",
    "FavoriteSearches",
    "FavoriteSellers",
    "FeedbackType",
    "GranularityLevel",
    "IncludeFinalValueFee",
    "IncludeWatchCount",
    "Item",
    "ItemID",
    "ItemSpecifics",
    "LevelLimit",
    "ListingType",
    "LostList",
    "ModTimeFrom",
    "ModTimeTo",
    "NumberOfDays",
    "OrderIDArray",
    "OrderLineItemID",
    "OrderRole",
    "OrderStatus",
    "OutputSelector",
    "Pagination",
    "Query",
    "SKU",
    "ScheduledList",
    "SellingSummary",
    "ShippingDetails",
    "SoldList",
    "StartTimeFrom",
    "StartTimeTo",
    "TransactionID",
    "UnsoldList",
    "UserID",
    "ViewAllNodes",
    "WarningLevel",
    "WatchList",
    "WonList",
];

const GLOBALS: &[&str] = &[
    "app",
    "authToken",
    "cert",
    "devName",
    "perPage",
    "raw",
    "sandbox",
    "serviceName",
    "site",
];

const ENDPOINTS: &[(&str, Environment, &str)] = &[
    (
        "FindingService",
        Environment::Production,
        "https://svcs.ebay.com/services/search/FindingService/v1?",
    ),
    (
        "Shopping",
        Environment::Production,
        "http://open.api.ebay.com/shopping?",
    ),
    (
        "Trading",
        Environment::Production,
        "https://api.ebay.com/ws/api.dll",
    ),
    (
        "Trading",
        Environment::Sandbox,
        "https://api.sandbox.ebay.com/ws/api.dll",
    ),
];

const DATE_NODES: &[&str] = &[
    "CreatedDate",
    "CreatedTime",
    "CreationTime",
    "EndTime",
    "HardExpirationWarning",
    "LastModifiedTime",
    "PaidTime",
    "RegistrationDate",
    "ShippedTime",
    "StartTime",
    "Timestamp",
    "UpdateTime",
];

const NUMERIC_NODES: &[&str] = &[
    "BidCount",
    "CategoryCount",
    "CategoryLevel",
    "EntriesPerPage",
    "FeedbackScore",
    "HitCount",
    "ItemsPerPage",
    "OrdersPerPage",
    "PageNumber",
    "PositiveFeedbackPercent",
    "Quantity",
    "QuantityAvailable",
    "QuantitySold",
    "ReturnedItemCountActual",
    "ReturnedOrderCountActual",
    "ReturnedTransactionCountActual",
    "TotalNumberOfEntries",
    "TotalNumberOfPages",
    "WatchCount",
];

const EXTRANEOUS: &[&str] = &["xmlns", "Timestamp", "Version", "Build", "CorrelationID"];

// Verify Definitions is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Definitions>();
};
