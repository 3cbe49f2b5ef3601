//! Boundaries to the remote catalog and content service.

use async_trait::async_trait;

use crate::catalog::category::Category;
use crate::catalog::page::{Page, PageRequest};
use crate::catalog::post::{PostDetail, PostSummary};
use crate::catalog::product::ProductSummary;
use crate::error::SourceError;

/// Paginated product listing, search and lookups.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of the product list.
    async fn fetch_products(&self, request: &PageRequest) -> Result<Page<ProductSummary>, SourceError>;

    /// Free-text product search, at most `limit` results.
    async fn search_products(&self, term: &str, limit: u32) -> Result<Vec<ProductSummary>, SourceError>;

    /// One product by slug; `None` when the service knows no such product.
    async fn fetch_product_by_slug(&self, slug: &str) -> Result<Option<ProductSummary>, SourceError>;

    /// The category tree.
    async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError>;
}

/// Paginated post listing and single post lookup.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_posts(&self, request: &PageRequest) -> Result<Page<PostSummary>, SourceError>;

    async fn fetch_post_by_slug(&self, slug: &str) -> Result<Option<PostDetail>, SourceError>;
}
