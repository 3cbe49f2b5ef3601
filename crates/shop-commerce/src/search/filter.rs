//! Client-side catalog filters.
//!
//! Predicates run in a fixed order (text, category, price window, toggles)
//! and a product must pass all of them.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::ProductSummary;
use crate::ids::CategoryId;

/// Inclusive price bounds on the effective price. Either side may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl PriceWindow {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn between(min: Decimal, max: Decimal) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

/// Filter parameters for the product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive substring of the product name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Selected categories. A product matches if it is in any of them.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub categories: BTreeSet<CategoryId>,
    #[serde(default)]
    pub price: PriceWindow,
    /// Only products reported `IN_STOCK`.
    #[serde(default)]
    pub in_stock: bool,
    /// Only discounted products.
    #[serde(default)]
    pub on_sale: bool,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name filter, stored trimmed and lowercased. Blank clears it.
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        self.text = normalize_text(text.as_ref());
        self
    }

    pub fn with_category(mut self, id: impl Into<CategoryId>) -> Self {
        self.categories.insert(id.into());
        self
    }

    pub fn with_price(mut self, price: PriceWindow) -> Self {
        self.price = price;
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock = true;
        self
    }

    pub fn on_sale_only(mut self) -> Self {
        self.on_sale = true;
        self
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.categories.is_empty()
            && self.price.is_open()
            && !self.in_stock
            && !self.on_sale
    }

    /// Evaluate every predicate against one product.
    pub fn matches(&self, product: &ProductSummary) -> bool {
        self.matches_with(self.needle().as_deref(), product)
    }

    /// Keep the matching products, in their original order.
    pub fn apply<'a>(&self, products: &'a [ProductSummary]) -> Vec<&'a ProductSummary> {
        let needle = self.needle();
        products
            .iter()
            .filter(|p| self.matches_with(needle.as_deref(), p))
            .collect()
    }

    /// `text` is a public field and may arrive un-normalized.
    fn needle(&self) -> Option<String> {
        self.text.as_deref().and_then(normalize_text)
    }

    fn matches_with(&self, needle: Option<&str>, product: &ProductSummary) -> bool {
        needle.map_or(true, |n| product.name.to_lowercase().contains(n))
            && self.matches_category(product)
            && self.price.contains(product.effective_price())
            && (!self.in_stock || product.is_in_stock())
            && (!self.on_sale || product.is_on_sale())
    }

    fn matches_category(&self, product: &ProductSummary) -> bool {
        self.categories.is_empty() || self.categories.iter().any(|id| product.in_category(id))
    }
}

fn normalize_text(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_lowercase())
}
