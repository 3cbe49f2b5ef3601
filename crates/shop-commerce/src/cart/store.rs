//! Persisted cart store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Deserialize;
use shop_cache::Cache;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::cart::{Cart, CartProduct, CartState, LineItem};
use crate::ids::ProductId;

/// Storage key for the cart.
pub const CART_KEY: &str = "cart";

const EVENT_CAPACITY: usize = 64;

/// Change notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// Confirmation shown to the customer after an add.
    ItemAdded { id: ProductId, name: String, quantity: u32 },
    QuantityUpdated { id: ProductId, quantity: u32 },
    ItemRemoved { id: ProductId },
    Cleared,
}

/// Persisted form; stored totals are ignored and recomputed.
#[derive(Deserialize)]
struct StoredCart {
    #[serde(default)]
    items: Vec<LineItem>,
}

/// The cart aggregate: state, persistence and change events.
///
/// No operation fails. Each mutation is persisted best-effort afterwards.
pub struct CartStore {
    cart: Mutex<Cart>,
    cache: Cache,
    events: broadcast::Sender<CartEvent>,
}

impl CartStore {
    /// Open the store, rehydrating any persisted cart.
    pub fn open(cache: Cache) -> Self {
        let cart = cache
            .load::<StoredCart>(CART_KEY)
            .map(|stored| Cart::from_items(stored.items))
            .unwrap_or_default();
        debug!(items = cart.items().len(), "Cart store opened");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            cart: Mutex::new(cart),
            cache,
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Cache::memory())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Add `quantity` of a product, merging with an existing line item.
    pub fn add_item(&self, product: CartProduct, quantity: u32) -> CartState {
        let (id, name) = (product.id.clone(), product.name.clone());
        let state = self.mutate(|cart| cart.add_item(product, quantity));
        if quantity > 0 {
            info!(product = %id, quantity, "Added to cart");
            let _ = self.events.send(CartEvent::ItemAdded { id, name, quantity });
        }
        state
    }

    /// Set an absolute quantity; zero or less removes the line item.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) -> CartState {
        let mut changed = false;
        let state = self.mutate(|cart| changed = cart.update_quantity(id, quantity));
        if changed {
            let event = match state.items.iter().find(|i| &i.id == id) {
                Some(item) => CartEvent::QuantityUpdated {
                    id: id.clone(),
                    quantity: item.quantity,
                },
                None => CartEvent::ItemRemoved { id: id.clone() },
            };
            let _ = self.events.send(event);
        } else {
            debug!(product = %id, "Quantity update for product not in cart");
        }
        state
    }

    pub fn remove_item(&self, id: &ProductId) -> CartState {
        let mut removed = false;
        let state = self.mutate(|cart| removed = cart.remove_item(id));
        if removed {
            let _ = self.events.send(CartEvent::ItemRemoved { id: id.clone() });
        }
        state
    }

    /// Empty the cart, after an order or on logout.
    pub fn clear(&self) -> CartState {
        let state = self.mutate(Cart::clear);
        info!("Cart cleared");
        let _ = self.events.send(CartEvent::Cleared);
        state
    }

    pub fn state(&self) -> CartState {
        self.lock().state()
    }

    pub fn item_count(&self) -> u64 {
        self.lock().item_count()
    }

    pub fn subtotal(&self) -> rust_decimal::Decimal {
        self.lock().subtotal()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn mutate<F>(&self, f: F) -> CartState
    where
        F: FnOnce(&mut Cart),
    {
        let state = {
            let mut cart = self.lock();
            f(&mut cart);
            cart.state()
        };
        self.cache.persist(CART_KEY, &state);
        state
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &*self.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::MAX_LINE_QUANTITY;
    use rust_decimal::{dec, Decimal};

    fn tea() -> CartProduct {
        CartProduct::new("tea", "Green Tea", dec!(4.50), "green-tea")
    }

    #[test]
    fn test_mutations_persist() {
        let cache = Cache::memory();
        let store = CartStore::open(cache.clone());
        store.add_item(tea(), 2);

        let reopened = CartStore::open(cache);
        let state = reopened.state();
        assert_eq!(state.item_count, 2);
        assert_eq!(state.subtotal, dec!(9.00));
    }

    #[test]
    fn test_malformed_cart_is_discarded() {
        let cache = Cache::memory();
        cache.set_raw(CART_KEY, "[oops").unwrap();
        let store = CartStore::open(cache.clone());
        assert!(store.is_empty());
        assert!(!cache.exists(CART_KEY).unwrap());
    }

    #[test]
    fn test_stored_totals_are_recomputed() {
        let cache = Cache::memory();
        cache
            .set_raw(
                CART_KEY,
                r#"{"items":[{"id":"tea","name":"Tea","unit_price":"2.5","quantity":2,"slug":"tea"}],"item_count":99,"subtotal":"1000"}"#,
            )
            .unwrap();
        let store = CartStore::open(cache);
        assert_eq!(store.item_count(), 2);
        assert_eq!(store.subtotal(), dec!(5.0));
    }

    #[test]
    fn test_events() {
        let store = CartStore::in_memory();
        let mut rx = store.subscribe();

        store.add_item(tea(), 1);
        store.update_quantity(&"tea".into(), 3);
        store.update_quantity(&"missing".into(), 3);
        store.update_quantity(&"tea".into(), 0);
        store.clear();

        assert!(matches!(rx.try_recv().unwrap(), CartEvent::ItemAdded { quantity: 1, .. }));
        assert!(matches!(rx.try_recv().unwrap(), CartEvent::QuantityUpdated { quantity: 3, .. }));
        assert!(matches!(rx.try_recv().unwrap(), CartEvent::ItemRemoved { .. }));
        assert_eq!(rx.try_recv().unwrap(), CartEvent::Cleared);
    }

    #[test]
    fn test_absent_update_is_still_persisted() {
        let cache = Cache::memory();
        let store = CartStore::open(cache.clone());
        store.update_quantity(&"ghost".into(), 5);
        assert!(cache.exists(CART_KEY).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_oversized_update_keeps_store_usable() {
        let store = CartStore::in_memory();
        let pricey = CartProduct::new("p", "Heirloom", dec!(100000000000000000000), "heirloom");
        store.add_item(pricey, 1);

        let state = store.update_quantity(&"p".into(), i64::MAX);
        assert_eq!(state.item_count, u64::from(MAX_LINE_QUANTITY));
        assert_eq!(store.state(), state);
        assert_eq!(store.subtotal(), dec!(100000000000000000000) * Decimal::from(MAX_LINE_QUANTITY));

        store.add_item(tea(), 1);
        assert_eq!(store.item_count(), u64::from(MAX_LINE_QUANTITY) + 1);
    }
}
