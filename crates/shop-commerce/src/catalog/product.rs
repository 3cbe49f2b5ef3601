//! Product summaries as delivered by the catalog service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, ProductId};
use crate::money::parse_price;

/// Stock status reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    OnBackorder,
    /// Not reported, or a status this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "IN_STOCK",
            StockStatus::OutOfStock => "OUT_OF_STOCK",
            StockStatus::OnBackorder => "ON_BACKORDER",
            StockStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "IN_STOCK" | "INSTOCK" => StockStatus::InStock,
            "OUT_OF_STOCK" | "OUTOFSTOCK" => StockStatus::OutOfStock,
            "ON_BACKORDER" | "ONBACKORDER" => StockStatus::OnBackorder,
            _ => StockStatus::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In stock",
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::OnBackorder => "On backorder",
            StockStatus::Unknown => "Unknown",
        }
    }
}

/// Reference to a product category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

impl CategoryRef {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
        }
    }
}

/// Reference to a remote image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl ImageRef {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            alt_text: None,
        }
    }
}

/// A product as listed in catalog pages and search results.
///
/// Prices stay in the text form the service delivers; use
/// [`ProductSummary::effective_price`] for arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<i64>,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<String>,
    #[serde(default)]
    pub stock_status: StockStatus,
    /// Sale flag as reported by the service, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_sale: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

impl ProductSummary {
    /// Create a bare product with no prices or categories.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            database_id: None,
            name: name.into(),
            slug: slug.into(),
            short_description: None,
            description: None,
            price: None,
            regular_price: None,
            sale_price: None,
            stock_status: StockStatus::Unknown,
            on_sale: None,
            average_rating: None,
            review_count: 0,
            categories: Vec::new(),
            image: None,
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_regular_price(mut self, price: impl Into<String>) -> Self {
        self.regular_price = Some(price.into());
        self
    }

    pub fn with_sale_price(mut self, price: impl Into<String>) -> Self {
        self.sale_price = Some(price.into());
        self
    }

    pub fn with_stock_status(mut self, status: StockStatus) -> Self {
        self.stock_status = status;
        self
    }

    pub fn with_on_sale(mut self, on_sale: bool) -> Self {
        self.on_sale = Some(on_sale);
        self
    }

    pub fn with_category(mut self, category: CategoryRef) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// Price text the customer actually pays: a readable sale price,
    /// else the price.
    pub fn effective_price_text(&self) -> Option<&str> {
        let sale = non_blank(self.sale_price.as_deref());
        sale.filter(|text| parse_price(text).is_some())
            .or_else(|| non_blank(self.price.as_deref()))
            .or(sale)
    }

    /// Numeric price used for filtering, sorting and the cart.
    ///
    /// Sale price when it parses, else price. Unparseable or missing is zero.
    pub fn effective_price(&self) -> Decimal {
        non_blank(self.sale_price.as_deref())
            .and_then(parse_price)
            .or_else(|| non_blank(self.price.as_deref()).and_then(parse_price))
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether the product is discounted.
    ///
    /// Uses the service flag when delivered; otherwise a sale price that
    /// differs from the regular price.
    pub fn is_on_sale(&self) -> bool {
        if let Some(flag) = self.on_sale {
            return flag;
        }
        match (
            non_blank(self.sale_price.as_deref()),
            non_blank(self.regular_price.as_deref()),
        ) {
            (Some(sale), Some(regular)) => sale != regular,
            _ => false,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_status == StockStatus::InStock
    }

    pub fn in_category(&self, id: &CategoryId) -> bool {
        self.categories.iter().any(|c| &c.id == id)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_effective_price_prefers_sale() {
        let p = ProductSummary::new("p1", "Tea", "tea")
            .with_price("12.00")
            .with_regular_price("12.00")
            .with_sale_price("9.50");
        assert_eq!(p.effective_price(), dec!(9.50));
        assert_eq!(p.effective_price_text(), Some("9.50"));
    }

    #[test]
    fn test_effective_price_falls_back() {
        let p = ProductSummary::new("p1", "Tea", "tea").with_price("12.00").with_sale_price("  ");
        assert_eq!(p.effective_price(), dec!(12.00));

        let unpriced = ProductSummary::new("p2", "Gift", "gift");
        assert_eq!(unpriced.effective_price(), Decimal::ZERO);

        let garbage = ProductSummary::new("p3", "Odd", "odd").with_price("call us");
        assert_eq!(garbage.effective_price(), Decimal::ZERO);
    }

    #[test]
    fn test_unreadable_sale_price_falls_back_to_price() {
        let p = ProductSummary::new("p1", "Tea", "tea")
            .with_price("12.00")
            .with_sale_price("\u{2014}");
        assert_eq!(p.effective_price(), dec!(12.00));
        assert_eq!(p.effective_price_text(), Some("12.00"));

        let only_sale = ProductSummary::new("p2", "Mug", "mug").with_sale_price("n/a");
        assert_eq!(only_sale.effective_price(), Decimal::ZERO);
        assert_eq!(only_sale.effective_price_text(), Some("n/a"));
    }

    #[test]
    fn test_on_sale_detection() {
        let flagged = ProductSummary::new("p1", "A", "a").with_on_sale(false).with_sale_price("5");
        assert!(!flagged.is_on_sale());

        let derived = ProductSummary::new("p2", "B", "b")
            .with_regular_price("10")
            .with_sale_price("8");
        assert!(derived.is_on_sale());

        let same = ProductSummary::new("p3", "C", "c")
            .with_regular_price("10")
            .with_sale_price("10");
        assert!(!same.is_on_sale());
    }

    #[test]
    fn test_stock_status_parsing() {
        assert_eq!(StockStatus::from_str("IN_STOCK"), StockStatus::InStock);
        assert_eq!(StockStatus::from_str("instock"), StockStatus::InStock);
        assert_eq!(StockStatus::from_str("whatever"), StockStatus::Unknown);

        let status: StockStatus = serde_json::from_str("\"OUT_OF_STOCK\"").unwrap();
        assert_eq!(status, StockStatus::OutOfStock);
        let status: StockStatus = serde_json::from_str("\"DISCONTINUED\"").unwrap();
        assert_eq!(status, StockStatus::Unknown);
    }

    #[test]
    fn test_summary_tolerates_missing_optionals() {
        let p: ProductSummary =
            serde_json::from_str(r#"{"id":"p1","name":"Tea","slug":"tea"}"#).unwrap();
        assert_eq!(p.stock_status, StockStatus::Unknown);
        assert!(p.categories.is_empty());
        assert!(p.image.is_none());
    }
}
