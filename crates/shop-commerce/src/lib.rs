//! Client-side commerce state engine.
//!
//! This crate owns the state a storefront client keeps between page views:
//!
//! - **Cart**: line items, derived count and subtotal, persisted store
//! - **Currency**: AZN-based rate table, active currency, price formatting
//! - **Catalog**: cursor-paged products and posts, merge and dedupe
//! - **Search**: client-side filter and sort, the catalog pipeline, quick search
//! - **Checkout**: order summary and order placement
//! - **Session**: sign-in state, wishlist, language preference
//!
//! Stores are explicit objects that persist through a [`shop_cache::Cache`]
//! and announce changes on broadcast channels. Remote collaborators sit
//! behind the [`CatalogSource`](catalog::CatalogSource),
//! [`ContentSource`](catalog::ContentSource),
//! [`OrderGateway`](checkout::OrderGateway) and
//! [`AuthProvider`](auth::AuthProvider) traits.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_commerce::prelude::*;
//! use shop_cache::Cache;
//!
//! let cache = Cache::memory();
//! let cart = CartStore::open(cache.clone());
//! let currency = CurrencyStore::open(cache, ExchangeRates::default(), Currency::AZN);
//!
//! cart.add_item(CartProduct::new("cHJvZHVjdDox", "Green Tea", dec!(100), "green-tea"), 1);
//! currency.change_currency(Currency::USD);
//!
//! assert_eq!(currency.format_price(cart.subtotal()), "$59.00");
//! ```

pub mod auth;
pub mod config;
pub mod currency;
pub mod error;
pub mod ids;
pub mod language;
pub mod money;
pub mod wishlist;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use error::{AuthError, CatalogError, CheckoutError, CommerceError, SourceError};
pub use ids::*;
pub use money::{Currency, ExchangeRates};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{AuthError, CatalogError, CheckoutError, CommerceError, SourceError};
    pub use crate::ids::*;
    pub use crate::money::{format_amount, parse_price, Currency, ExchangeRates};

    // Stores
    pub use crate::auth::{AuthProvider, AuthSession, SessionEvent, SessionStore, TokenScheme, User};
    pub use crate::currency::{CurrencyEvent, CurrencyStore, RateSource};
    pub use crate::language::{Language, LanguageStore};
    pub use crate::wishlist::{WishlistEvent, WishlistStore};

    // Cart
    pub use crate::cart::{
        Cart, CartEvent, CartProduct, CartState, CartStore, LineItem, OrderSummary, PricingPolicy,
    };

    // Catalog
    pub use crate::catalog::{
        find_category, CatalogSource, Category, CategoryRef, ContentSource, FetchOutcome, ImageRef,
        Page, PageInfo, PageRequest, PipelineStatus, PostDetail, PostFeed, PostSummary,
        ProductSummary, StockStatus,
    };

    // Checkout
    pub use crate::checkout::{
        BillingDetails, CheckoutFlow, OrderConfirmation, OrderGateway, OrderLine, OrderRequest,
        PlacedOrder,
    };

    // Search
    pub use crate::search::{
        CatalogEvent, CatalogFilter, CatalogParams, CatalogPipeline, CatalogView, PriceWindow,
        QuickSearch, SearchOutcome, SortKey,
    };

    pub use crate::config::ShopConfig;
}
