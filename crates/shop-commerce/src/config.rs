//! Shop configuration.
//!
//! Loaded from `shop.toml` (or JSON by extension). Every section has
//! defaults, so an empty file is a valid configuration.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::PricingPolicy;
use crate::money::{Currency, ExchangeRates};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Remote service endpoints.
    #[serde(default)]
    pub api: ApiConfig,

    /// Catalog paging and search.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Display currency and exchange rates.
    #[serde(default)]
    pub currency: CurrencyConfig,

    /// Tax and shipping.
    #[serde(default)]
    pub checkout: PricingPolicy,

    /// Where client state is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShopConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validated exchange-rate table.
    pub fn exchange_rates(&self) -> Result<ExchangeRates> {
        let rates: HashMap<String, Decimal> = self
            .currency
            .rates
            .iter()
            .map(|(code, rate)| (code.clone(), *rate))
            .collect();
        ExchangeRates::from_codes(&rates).context("Invalid [currency.rates]")
    }

    /// Currency selected when nothing is stored yet.
    pub fn default_currency(&self) -> Result<Currency> {
        self.currency
            .active
            .parse()
            .with_context(|| format!("Invalid [currency] active = {:?}", self.currency.active))
    }
}

/// Remote endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// GraphQL endpoint for catalog, content and orders.
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// Base of the authentication REST API.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_graphql_url() -> String {
    "https://erma.shop/graphql".to_string()
}

fn default_auth_url() -> String {
    "https://erma.shop/wp-json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            graphql_url: default_graphql_url(),
            auth_url: default_auth_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Catalog paging and search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_post_page_size")]
    pub post_page_size: u32,

    /// Maximum quick-search results.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// Shorter terms are not sent.
    #[serde(default = "default_min_search_chars")]
    pub min_search_chars: usize,
}

fn default_page_size() -> u32 {
    20
}

fn default_post_page_size() -> u32 {
    10
}

fn default_search_limit() -> u32 {
    10
}

fn default_min_search_chars() -> usize {
    2
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            post_page_size: default_post_page_size(),
            search_limit: default_search_limit(),
            min_search_chars: default_min_search_chars(),
        }
    }
}

/// Currency settings. Rates are units of each currency per one AZN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "default_active_currency")]
    pub active: String,

    #[serde(default = "default_rates")]
    pub rates: BTreeMap<String, Decimal>,
}

fn default_active_currency() -> String {
    Currency::BASE.code().to_string()
}

fn default_rates() -> BTreeMap<String, Decimal> {
    ExchangeRates::default()
        .iter()
        .map(|(currency, rate)| (currency.code().to_string(), rate))
        .collect()
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            active: default_active_currency(),
            rates: default_rates(),
        }
    }
}

/// Client storage location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file. Defaults to `.shop/storage.json` next to the config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `human` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}

/// Generate a default shop.toml.
pub fn generate_default_config() -> String {
    r#"# Shop client configuration

[api]
graphql_url = "https://erma.shop/graphql"
auth_url = "https://erma.shop/wp-json"
timeout_secs = 30

[catalog]
page_size = 20
post_page_size = 10
search_limit = 10
min_search_chars = 2

[currency]
active = "AZN"

# Units of each currency per 1 AZN
[currency.rates]
USD = 0.59
EUR = 0.51
RUB = 44.1

[checkout]
tax_rate = 0.08
free_shipping_threshold = 50
flat_shipping = 5

[storage]
# path = ".shop/storage.json"

[logging]
format = "human"
level = "warn"
"#
    .to_string()
}
