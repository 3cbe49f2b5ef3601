//! Response shapes of the GraphQL service and their mapping to domain types.
//!
//! Every field the service may null out is optional here; a node missing its
//! identity (`id`) is dropped rather than failing the whole page.

use serde::Deserialize;
use shop_commerce::catalog::{
    Category, CategoryRef, ImageRef, Page, PageInfo, PostDetail, PostSummary, ProductSummary,
    StockStatus, TermRef,
};
use shop_commerce::checkout::OrderConfirmation;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePageInfo {
    #[serde(default)]
    pub has_next_page: Option<bool>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

impl From<WirePageInfo> for PageInfo {
    fn from(info: WirePageInfo) -> Self {
        PageInfo {
            has_next_page: info.has_next_page.unwrap_or(false),
            end_cursor: info.end_cursor,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default)]
    pub page_info: Option<WirePageInfo>,
    #[serde(default)]
    pub nodes: Option<Vec<Option<T>>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Nodes<T> {
    #[serde(default)]
    pub nodes: Option<Vec<Option<T>>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireImage {
    pub source_url: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

impl WireImage {
    fn into_image(self) -> Option<ImageRef> {
        let source_url = self.source_url.filter(|url| !url.is_empty())?;
        Some(ImageRef {
            source_url,
            alt_text: self.alt_text.filter(|alt| !alt.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireCategory {
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl WireCategory {
    fn into_ref(self) -> Option<CategoryRef> {
        Some(CategoryRef::new(
            self.id.filter(|id| !id.is_empty())?,
            self.name.unwrap_or_default(),
            self.slug.unwrap_or_default(),
        ))
    }
}

/// A category node of the category tree query.
#[derive(Debug, Deserialize)]
pub struct WireCategoryNode {
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<WireImage>,
    #[serde(default)]
    pub children: Option<Nodes<WireCategory>>,
}

impl WireCategoryNode {
    pub fn into_category(self) -> Option<Category> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(Category {
            id: id.into(),
            name: self.name.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
            description: self.description.filter(|d| !d.is_empty()),
            image: self.image.and_then(WireImage::into_image),
            children: flatten_nodes(self.children, WireCategory::into_ref),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: Option<String>,
    #[serde(default)]
    pub database_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub image: Option<WireImage>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub regular_price: Option<String>,
    #[serde(default)]
    pub sale_price: Option<String>,
    #[serde(default)]
    pub stock_status: Option<String>,
    #[serde(default)]
    pub product_categories: Option<Nodes<WireCategory>>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub on_sale: Option<bool>,
}

impl WireProduct {
    pub fn into_summary(self) -> Option<ProductSummary> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let categories = flatten_nodes(self.product_categories, WireCategory::into_ref);

        Some(ProductSummary {
            id: id.into(),
            database_id: self.database_id,
            name: self.name.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
            short_description: self.short_description,
            description: self.description,
            price: self.price,
            regular_price: self.regular_price,
            sale_price: self.sale_price,
            stock_status: self
                .stock_status
                .as_deref()
                .map(StockStatus::from_str)
                .unwrap_or_default(),
            on_sale: self.on_sale,
            average_rating: self.average_rating,
            review_count: self.review_count.unwrap_or(0),
            categories,
            image: self.image.and_then(WireImage::into_image),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct WireAuthor {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireTerm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePost {
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub featured_image: Option<Edge<WireImage>>,
    #[serde(default)]
    pub author: Option<Edge<WireAuthor>>,
    #[serde(default)]
    pub categories: Option<Nodes<WireTerm>>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Nodes<WireTerm>>,
}

impl WireTerm {
    fn into_term(self) -> Option<TermRef> {
        Some(TermRef {
            name: self.name.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
        })
    }
}

impl WirePost {
    pub fn into_detail(mut self) -> Option<PostDetail> {
        let content = self.content.take();
        let tags = flatten_nodes(self.tags.take(), WireTerm::into_term);
        Some(PostDetail {
            post: self.into_summary()?,
            content,
            tags,
        })
    }

    pub fn into_summary(self) -> Option<PostSummary> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(PostSummary {
            id: id.into(),
            title: self.title.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
            excerpt: self.excerpt,
            date: self.date,
            featured_image: self
                .featured_image
                .and_then(|edge| edge.node)
                .and_then(WireImage::into_image),
            author: self.author.and_then(|edge| edge.node).and_then(|a| a.name),
            categories: flatten_nodes(self.categories, WireTerm::into_term),
        })
    }
}

/// `data` of the product list and search queries.
#[derive(Debug, Deserialize)]
pub struct ProductsData {
    #[serde(default)]
    pub products: Option<Connection<WireProduct>>,
}

impl ProductsData {
    pub fn into_page(self) -> Page<ProductSummary> {
        into_page(self.products, WireProduct::into_summary)
    }
}

/// `data` of the single product query.
#[derive(Debug, Deserialize)]
pub struct ProductData {
    #[serde(default)]
    pub product: Option<WireProduct>,
}

impl ProductData {
    pub fn into_product(self) -> Option<ProductSummary> {
        self.product.and_then(WireProduct::into_summary)
    }
}

/// `data` of the category tree query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesData {
    #[serde(default)]
    pub product_categories: Option<Nodes<WireCategoryNode>>,
}

impl CategoriesData {
    pub fn into_categories(self) -> Vec<Category> {
        flatten_nodes(self.product_categories, WireCategoryNode::into_category)
    }
}

/// `data` of the single post query.
#[derive(Debug, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub post: Option<WirePost>,
}

impl PostData {
    pub fn into_post(self) -> Option<PostDetail> {
        self.post.and_then(WirePost::into_detail)
    }
}

/// `data` of the post list query.
#[derive(Debug, Deserialize)]
pub struct PostsData {
    #[serde(default)]
    pub posts: Option<Connection<WirePost>>,
}

impl PostsData {
    pub fn into_page(self) -> Page<PostSummary> {
        into_page(self.posts, WirePost::into_summary)
    }
}

/// Convert a nullable node list, skipping null and unconvertible nodes.
fn flatten_nodes<W, T>(nodes: Option<Nodes<W>>, convert: impl Fn(W) -> Option<T>) -> Vec<T> {
    nodes
        .and_then(|n| n.nodes)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter_map(convert)
        .collect()
}

/// Map a connection into a page, dropping nodes without an id.
///
/// A nulled-out connection reads as an empty last page.
pub fn into_page<W, T>(
    connection: Option<Connection<W>>,
    convert: impl Fn(W) -> Option<T>,
) -> Page<T> {
    let Some(connection) = connection else {
        return Page::last(Vec::new());
    };

    let raw = connection.nodes.unwrap_or_default();
    let total = raw.len();
    let nodes: Vec<T> = raw
        .into_iter()
        .flatten()
        .filter_map(&convert)
        .collect();
    if nodes.len() < total {
        warn!(dropped = total - nodes.len(), "Skipped malformed nodes");
    }

    Page::new(nodes, connection.page_info.unwrap_or_default().into())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    pub id: Option<String>,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    #[serde(default)]
    pub order: Option<WireOrder>,
    #[serde(default)]
    pub payment_url: Option<String>,
}

/// `data` of the order mutation.
#[derive(Debug, Deserialize)]
pub struct CheckoutData {
    #[serde(default)]
    pub checkout: Option<CheckoutPayload>,
}

impl CheckoutData {
    /// The confirmation, if the service actually created an order.
    pub fn into_confirmation(self) -> Option<OrderConfirmation> {
        let checkout = self.checkout?;
        let order = checkout.order?;
        Some(OrderConfirmation {
            id: order.id.filter(|id| !id.is_empty())?.into(),
            order_number: order.order_number,
            total: order.total,
            status: order.status,
            payment_url: checkout.payment_url.filter(|url| !url.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_without_optional_fields() {
        let wire: WireProduct = serde_json::from_value(json!({
            "id": "cHJvZHVjdDox",
            "name": "Tea",
            "slug": "tea",
            "image": null,
            "productCategories": null
        }))
        .unwrap();
        let product = wire.into_summary().unwrap();
        assert_eq!(product.id.as_str(), "cHJvZHVjdDox");
        assert_eq!(product.stock_status, StockStatus::Unknown);
        assert!(product.categories.is_empty());
        assert!(product.image.is_none());
    }

    #[test]
    fn test_product_without_id_is_dropped() {
        let wire: WireProduct = serde_json::from_value(json!({ "name": "Ghost" })).unwrap();
        assert!(wire.into_summary().is_none());
    }

    #[test]
    fn test_null_connection_is_empty_last_page() {
        let page = into_page::<WireProduct, _>(None, WireProduct::into_summary);
        assert!(page.nodes.is_empty());
        assert!(!page.page_info.has_next_page);
    }

    #[test]
    fn test_category_children_without_id_are_skipped() {
        let wire: WireCategoryNode = serde_json::from_value(json!({
            "id": "dGVybToxNQ==",
            "name": "Tea",
            "slug": "tea",
            "description": "",
            "children": { "nodes": [ { "id": "dGVybToxNg==", "name": "Green", "slug": "green" }, { "name": "Orphan" }, null ] }
        }))
        .unwrap();
        let category = wire.into_category().unwrap();
        assert!(category.description.is_none());
        assert_eq!(category.children.len(), 1);
        assert_eq!(category.children[0].slug, "green");
    }

    #[test]
    fn test_unknown_product_slug() {
        let data: ProductData = serde_json::from_value(json!({ "product": null })).unwrap();
        assert!(data.into_product().is_none());
    }

    #[test]
    fn test_checkout_without_order() {
        let data: CheckoutData =
            serde_json::from_value(json!({ "checkout": { "order": null } })).unwrap();
        assert!(data.into_confirmation().is_none());
    }
}
