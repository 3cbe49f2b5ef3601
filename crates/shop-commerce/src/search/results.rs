//! Materialized catalog view.

use serde::Serialize;

use crate::catalog::{PipelineStatus, ProductSummary};
use crate::search::CatalogParams;

/// Filtered and sorted products, scoped to what has been fetched so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub products: Vec<ProductSummary>,
    /// Products fetched before filtering.
    pub fetched: usize,
    pub has_next_page: bool,
    pub status: PipelineStatus,
}

impl CatalogView {
    /// Filter then sort `nodes` according to `params`.
    pub fn build(
        nodes: &[ProductSummary],
        params: &CatalogParams,
        status: PipelineStatus,
        has_next_page: bool,
    ) -> Self {
        let mut matched = params.filter.apply(nodes);
        params.sort.sort(&mut matched);
        Self {
            products: matched.into_iter().cloned().collect(),
            fetched: nodes.len(),
            has_next_page,
            status,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether a filter hides products that were fetched.
    pub fn is_filtered(&self) -> bool {
        self.products.len() < self.fetched
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_fetching()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{CatalogFilter, PriceWindow, SortKey};
    use rust_decimal::dec;

    #[test]
    fn test_build_filters_then_sorts() {
        let nodes = vec![
            ProductSummary::new("a", "A", "a").with_price("30"),
            ProductSummary::new("b", "B", "b").with_price("60"),
            ProductSummary::new("c", "C", "c").with_price("10"),
        ];
        let params = CatalogParams::new()
            .with_filter(CatalogFilter::new().with_price(PriceWindow::between(dec!(0), dec!(50))))
            .with_sort(SortKey::PriceLow);

        let view = CatalogView::build(&nodes, &params, PipelineStatus::Ready, true);
        let ids: Vec<_> = view.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["c", "a"]);
        assert_eq!(view.fetched, 3);
        assert!(view.is_filtered());
        assert!(!view.is_loading());
    }
}
