//! Locally tracked wishlist.

use std::sync::{Mutex, MutexGuard, PoisonError};

use shop_cache::Cache;
use tokio::sync::broadcast;
use tracing::debug;

use crate::catalog::ProductSummary;
use crate::ids::ProductId;

pub const WISHLIST_KEY: &str = "wishlist";

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum WishlistEvent {
    Added(ProductId),
    Removed(ProductId),
}

/// Ordered set of product ids, oldest first.
pub struct WishlistStore {
    ids: Mutex<Vec<ProductId>>,
    cache: Cache,
    events: broadcast::Sender<WishlistEvent>,
}

impl WishlistStore {
    pub fn open(cache: Cache) -> Self {
        let mut ids: Vec<ProductId> = cache.load(WISHLIST_KEY).unwrap_or_default();
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            ids: Mutex::new(ids),
            cache,
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Cache::memory())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WishlistEvent> {
        self.events.subscribe()
    }

    /// Returns false if the product was already there.
    pub fn add(&self, id: ProductId) -> bool {
        {
            let mut ids = self.lock();
            if ids.contains(&id) {
                return false;
            }
            ids.push(id.clone());
            self.cache.persist(WISHLIST_KEY, &*ids);
        }
        debug!(product = %id, "Added to wishlist");
        let _ = self.events.send(WishlistEvent::Added(id));
        true
    }

    pub fn remove(&self, id: &ProductId) -> bool {
        {
            let mut ids = self.lock();
            let before = ids.len();
            ids.retain(|i| i != id);
            if ids.len() == before {
                return false;
            }
            self.cache.persist(WISHLIST_KEY, &*ids);
        }
        let _ = self.events.send(WishlistEvent::Removed(id.clone()));
        true
    }

    /// Add if absent, remove if present. Returns whether it is now wished.
    pub fn toggle(&self, id: ProductId) -> bool {
        if self.contains(&id) {
            !self.remove(&id)
        } else {
            self.add(id)
        }
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.lock().contains(id)
    }

    pub fn ids(&self) -> Vec<ProductId> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Wishlist products found in `products`, in wishlist order.
    pub fn resolve(&self, products: &[ProductSummary]) -> Vec<ProductSummary> {
        self.lock()
            .iter()
            .filter_map(|id| products.iter().find(|p| &p.id == id).cloned())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProductId>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
