//! Checkout module.
//!
//! Contains billing details, order types, and the order placement flow.

mod address;
mod flow;
mod order;

pub use address::BillingDetails;
pub use flow::CheckoutFlow;
pub use order::{
    OrderConfirmation, OrderGateway, OrderLine, OrderRequest, PlacedOrder, DEFAULT_PAYMENT_METHOD,
};
