//! Remote services for the shop engine.
//!
//! Implements the `shop-commerce` service traits over HTTP: the catalog,
//! content and order services through the store's GraphQL endpoint, and
//! sign-in through the WordPress REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use shop_commerce::search::{CatalogParams, CatalogPipeline};
//! use shop_data::GraphqlCatalog;
//!
//! let catalog = GraphqlCatalog::connect("https://example.com/graphql", Duration::from_secs(30))?;
//! let pipeline = CatalogPipeline::new(Arc::new(catalog), 20);
//!
//! pipeline.set_params(CatalogParams::new()).await?;
//! for product in pipeline.view().products {
//!     println!("{} {}", product.name, product.price.unwrap_or_default());
//! }
//! ```

mod auth;
mod catalog;
mod client;
mod error;
pub mod queries;
mod wire;

pub use auth::{basic_credentials, failure_message, WordPressAuth};
pub use catalog::GraphqlCatalog;
pub use client::{decode_response, GraphqlClient};
pub use error::{FetchError, GraphqlError};
pub use wire::{CategoriesData, CheckoutData, PostData, PostsData, ProductData, ProductsData};
