//! Catalog parameters: filters plus sort order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::ProductSummary;
use crate::search::CatalogFilter;

/// Sort options for the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Newest first, as ordered by the service.
    #[default]
    Date,
    /// Most popular first, as ordered by the service.
    Popularity,
    /// Effective price, low to high.
    PriceLow,
    /// Effective price, high to low.
    PriceHigh,
    /// Name A-Z, ignoring case.
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Date,
        SortKey::Popularity,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Popularity => "popularity",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Name => "name",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "date" | "newest" => Some(SortKey::Date),
            "popularity" | "popular" => Some(SortKey::Popularity),
            "price-low" | "price_low" => Some(SortKey::PriceLow),
            "price-high" | "price_high" => Some(SortKey::PriceHigh),
            "name" => Some(SortKey::Name),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Date => "Newest",
            SortKey::Popularity => "Most Popular",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
            SortKey::Name => "Name: A-Z",
        }
    }

    /// Compare two products. `Equal` for keys that keep server order.
    pub fn compare(&self, a: &ProductSummary, b: &ProductSummary) -> Ordering {
        match self {
            SortKey::Date | SortKey::Popularity => Ordering::Equal,
            SortKey::PriceLow => a.effective_price().cmp(&b.effective_price()),
            SortKey::PriceHigh => b.effective_price().cmp(&a.effective_price()),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }

    /// Stable sort; ties keep their relative order.
    pub fn sort(&self, products: &mut [&ProductSummary]) {
        if matches!(self, SortKey::Date | SortKey::Popularity) {
            return;
        }
        products.sort_by(|a, b| self.compare(a, b));
    }
}

/// Everything that shapes the product list. Changing it refetches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogParams {
    #[serde(default)]
    pub filter: CatalogFilter,
    #[serde(default)]
    pub sort: SortKey,
}

impl CatalogParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: CatalogFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: &str, name: &str, price: &str) -> ProductSummary {
        ProductSummary::new(id, name, id).with_price(price)
    }

    fn sorted_ids(key: SortKey, products: &[ProductSummary]) -> Vec<String> {
        let mut refs: Vec<&ProductSummary> = products.iter().collect();
        key.sort(&mut refs);
        refs.into_iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_price_low() {
        let products = vec![priced("a", "A", "30"), priced("b", "B", "10"), priced("c", "C", "20")];
        assert_eq!(sorted_ids(SortKey::PriceLow, &products), ["b", "c", "a"]);
    }

    #[test]
    fn test_price_high_keeps_ties_in_order() {
        let products = vec![
            priced("a", "A", "10"),
            priced("b", "B", "20"),
            priced("c", "C", "10"),
            priced("d", "D", "20"),
        ];
        assert_eq!(sorted_ids(SortKey::PriceHigh, &products), ["b", "d", "a", "c"]);
        assert_eq!(sorted_ids(SortKey::PriceLow, &products), ["a", "c", "b", "d"]);
    }

    #[test]
    fn test_name_ignores_case() {
        let products = vec![
            priced("1", "banana", "1"),
            priced("2", "Apple", "1"),
            priced("3", "cherry", "1"),
        ];
        assert_eq!(sorted_ids(SortKey::Name, &products), ["2", "1", "3"]);
    }

    #[test]
    fn test_server_order_keys() {
        let products = vec![priced("z", "Z", "99"), priced("a", "A", "1")];
        assert_eq!(sorted_ids(SortKey::Date, &products), ["z", "a"]);
        assert_eq!(sorted_ids(SortKey::Popularity, &products), ["z", "a"]);
    }

    #[test]
    fn test_sort_key_parsing() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_str(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::from_str("rating"), None);

        let key: SortKey = serde_json::from_str("\"price-high\"").unwrap();
        assert_eq!(key, SortKey::PriceHigh);
    }
}
