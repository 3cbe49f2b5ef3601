//! Active-currency store.
//!
//! Holds the rate table and the selected display currency, persists the
//! selection under the `currency` key and announces changes on a broadcast
//! channel.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_cache::Cache;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::money::{format_amount, Currency, ExchangeRates};

/// Storage key for the active currency.
pub const CURRENCY_KEY: &str = "currency";

const EVENT_CAPACITY: usize = 64;

/// Supplier of fresh exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<ExchangeRates, SourceError>;
}

/// Change notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrencyEvent {
    Changed(Currency),
    RatesReplaced,
}

/// Persisted form. Older profiles stored the whole currency record.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCurrency {
    Code(String),
    Record { code: String },
}

impl StoredCurrency {
    fn code(&self) -> &str {
        match self {
            StoredCurrency::Code(code) | StoredCurrency::Record { code } => code,
        }
    }
}

/// Snapshot of the currency state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencySnapshot {
    pub active: Currency,
    pub rates: ExchangeRates,
}

#[derive(Debug)]
struct CurrencyState {
    active: Currency,
    rates: ExchangeRates,
}

/// Currency module: conversion and formatting against the active currency.
pub struct CurrencyStore {
    state: Mutex<CurrencyState>,
    cache: Cache,
    events: broadcast::Sender<CurrencyEvent>,
}

impl CurrencyStore {
    /// Open the store, restoring the persisted selection.
    ///
    /// A missing, malformed or unknown stored value falls back to `default`.
    pub fn open(cache: Cache, rates: ExchangeRates, default: Currency) -> Self {
        let active = match cache.load::<StoredCurrency>(CURRENCY_KEY) {
            Some(stored) => match Currency::from_code(stored.code()) {
                Some(currency) => currency,
                None => {
                    warn!(code = stored.code(), "Unknown stored currency, using default");
                    cache.forget(CURRENCY_KEY);
                    default
                }
            },
            None => default,
        };
        debug!(currency = %active, "Currency store opened");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(CurrencyState { active, rates }),
            cache,
            events,
        }
    }

    /// In-memory store with default rates, for tests and previews.
    pub fn in_memory() -> Self {
        Self::open(Cache::memory(), ExchangeRates::default(), Currency::BASE)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CurrencyEvent> {
        self.events.subscribe()
    }

    /// Currently selected display currency.
    pub fn active(&self) -> Currency {
        self.lock().active
    }

    pub fn rates(&self) -> ExchangeRates {
        self.lock().rates.clone()
    }

    pub fn snapshot(&self) -> CurrencySnapshot {
        let state = self.lock();
        CurrencySnapshot {
            active: state.active,
            rates: state.rates.clone(),
        }
    }

    /// Select a new display currency and persist it.
    pub fn change_currency(&self, currency: Currency) {
        {
            let mut state = self.lock();
            if state.active == currency {
                return;
            }
            state.active = currency;
        }
        info!(currency = %currency, "Display currency changed");
        self.cache.persist(CURRENCY_KEY, currency.code());
        let _ = self.events.send(CurrencyEvent::Changed(currency));
    }

    /// Express `amount` (in `from`) in the active currency.
    pub fn convert_price(&self, amount: Decimal, from: Currency) -> Decimal {
        let state = self.lock();
        state.rates.convert(amount, from, state.active)
    }

    /// Convert between two explicit currencies using the current table.
    pub fn convert_between(&self, amount: Decimal, from: Currency, to: Currency) -> Decimal {
        self.lock().rates.convert(amount, from, to)
    }

    /// Render a base-currency amount in the active currency.
    pub fn format_price(&self, amount: Decimal) -> String {
        let state = self.lock();
        let converted = state.rates.convert(amount, Currency::BASE, state.active);
        format_amount(converted, state.active)
    }

    /// Swap the whole rate table.
    pub fn replace_rates(&self, rates: ExchangeRates) {
        self.lock().rates = rates;
        info!("Exchange rates replaced");
        let _ = self.events.send(CurrencyEvent::RatesReplaced);
    }

    /// Pull a fresh table from `source`. The previous table stays on failure.
    pub async fn refresh_rates(&self, source: &dyn RateSource) -> Result<(), SourceError> {
        match source.fetch_rates().await {
            Ok(rates) => {
                self.replace_rates(rates);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Rate refresh failed, keeping previous rates");
                Err(e)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CurrencyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CurrencyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrencyStore")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}
