//! Catalog, content and order services backed by the store's GraphQL API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use shop_commerce::auth::AuthSession;
use shop_commerce::catalog::{
    CatalogSource, Category, ContentSource, Page, PageRequest, PostDetail, PostSummary,
    ProductSummary,
};
use shop_commerce::checkout::{OrderConfirmation, OrderGateway, OrderRequest};
use shop_commerce::SourceError;
use tracing::{debug, info, instrument};

use crate::client::GraphqlClient;
use crate::error::FetchError;
use crate::queries;
use crate::wire::{CategoriesData, CheckoutData, PostData, PostsData, ProductData, ProductsData};

/// The remote catalog.
#[derive(Debug, Clone)]
pub struct GraphqlCatalog {
    client: GraphqlClient,
}

impl GraphqlCatalog {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }

    /// Connect to `endpoint` with the given request timeout.
    pub fn connect(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self::new(GraphqlClient::new(endpoint, timeout)?))
    }

    pub fn client(&self) -> &GraphqlClient {
        &self.client
    }
}

#[async_trait]
impl CatalogSource for GraphqlCatalog {
    #[instrument(skip(self), fields(first = request.first, after = ?request.after))]
    async fn fetch_products(
        &self,
        request: &PageRequest,
    ) -> Result<Page<ProductSummary>, SourceError> {
        let data: ProductsData = self
            .client
            .execute(
                "GetProducts",
                queries::GET_PRODUCTS,
                json!({ "first": request.first, "after": request.after }),
                None,
            )
            .await?;

        let page = data.into_page();
        debug!(
            count = page.nodes.len(),
            has_next_page = page.page_info.has_next_page,
            "Fetched product page"
        );
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn search_products(
        &self,
        term: &str,
        limit: u32,
    ) -> Result<Vec<ProductSummary>, SourceError> {
        let data: ProductsData = self
            .client
            .execute(
                "SearchProducts",
                queries::SEARCH_PRODUCTS,
                json!({ "search": term, "first": limit }),
                None,
            )
            .await?;

        Ok(data.into_page().nodes)
    }

    #[instrument(skip(self))]
    async fn fetch_product_by_slug(&self, slug: &str) -> Result<Option<ProductSummary>, SourceError> {
        let data: ProductData = self
            .client
            .execute(
                "GetProductBySlug",
                queries::GET_PRODUCT_BY_SLUG,
                json!({ "slug": slug }),
                None,
            )
            .await?;

        let product = data.into_product();
        debug!(found = product.is_some(), "Looked up product");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn fetch_categories(&self) -> Result<Vec<Category>, SourceError> {
        let data: CategoriesData = self
            .client
            .execute(
                "GetProductCategories",
                queries::GET_PRODUCT_CATEGORIES,
                json!({}),
                None,
            )
            .await?;

        let categories = data.into_categories();
        debug!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }
}

#[async_trait]
impl ContentSource for GraphqlCatalog {
    #[instrument(skip(self), fields(first = request.first, after = ?request.after))]
    async fn fetch_posts(&self, request: &PageRequest) -> Result<Page<PostSummary>, SourceError> {
        let data: PostsData = self
            .client
            .execute(
                "GetPosts",
                queries::GET_POSTS,
                json!({ "first": request.first, "after": request.after }),
                None,
            )
            .await?;

        Ok(data.into_page())
    }

    #[instrument(skip(self))]
    async fn fetch_post_by_slug(&self, slug: &str) -> Result<Option<PostDetail>, SourceError> {
        let data: PostData = self
            .client
            .execute(
                "GetPostBySlug",
                queries::GET_POST_BY_SLUG,
                json!({ "slug": slug }),
                None,
            )
            .await?;

        Ok(data.into_post())
    }
}

#[async_trait]
impl OrderGateway for GraphqlCatalog {
    #[instrument(skip_all, fields(lines = request.line_items.len()))]
    async fn create_order(
        &self,
        session: &AuthSession,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, SourceError> {
        let authorization = session.authorization();
        let data: CheckoutData = self
            .client
            .execute(
                "CreateOrder",
                queries::CREATE_ORDER,
                json!({ "input": request }),
                Some(&authorization),
            )
            .await?;

        let confirmation = data
            .into_confirmation()
            .ok_or_else(|| SourceError::Service("order was not created".into()))?;
        info!(order = %confirmation.id, "Order created");
        Ok(confirmation)
    }
}
