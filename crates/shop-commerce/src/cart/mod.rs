//! Shopping cart module.
//!
//! Contains the cart aggregate, its persisted store, and order pricing.

mod cart;
mod pricing;
mod store;

pub use cart::{Cart, CartProduct, CartState, LineItem, MAX_LINE_QUANTITY};
pub use pricing::{OrderSummary, PricingPolicy};
pub use store::{CartEvent, CartStore, CART_KEY};
