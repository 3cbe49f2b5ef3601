//! Type-ahead product search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::catalog::{CatalogSource, ProductSummary};
use crate::error::CatalogError;

/// Result of a quick search call.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(Vec<ProductSummary>),
    /// Term below the minimum length; no request was made.
    TooShort,
    /// A newer search started while this one was running.
    Stale,
}

/// Search-as-you-type against the remote service.
///
/// Each call bumps a generation; a response that comes back after a newer
/// call started is discarded so results never jump backwards.
pub struct QuickSearch {
    source: Arc<dyn CatalogSource>,
    limit: u32,
    min_chars: usize,
    generation: AtomicU64,
    latest: Mutex<Vec<ProductSummary>>,
}

impl QuickSearch {
    pub fn new(source: Arc<dyn CatalogSource>, limit: u32, min_chars: usize) -> Self {
        Self {
            source,
            limit,
            min_chars,
            generation: AtomicU64::new(0),
            latest: Mutex::new(Vec::new()),
        }
    }

    pub async fn search(&self, term: &str) -> Result<SearchOutcome, CatalogError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let term = term.trim();

        if term.chars().count() < self.min_chars {
            self.store(Vec::new());
            return Ok(SearchOutcome::TooShort);
        }

        let result = self.source.search_products(term, self.limit).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(term, generation, "Dropping stale search response");
            return Ok(SearchOutcome::Stale);
        }

        match result {
            Ok(products) => {
                debug!(term, count = products.len(), "Search results");
                self.store(products.clone());
                Ok(SearchOutcome::Results(products))
            }
            Err(e) => {
                warn!(term, error = %e, "Search failed");
                Err(e.into())
            }
        }
    }

    /// Results of the most recent applied search.
    pub fn latest(&self) -> Vec<ProductSummary> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn store(&self, products: Vec<ProductSummary>) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = products;
    }
}
