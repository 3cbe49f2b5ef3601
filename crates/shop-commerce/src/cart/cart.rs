//! Cart and line item types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::ProductSummary;
use crate::ids::ProductId;

/// Most units of one product a line item holds.
pub const MAX_LINE_QUANTITY: u32 = 9_999;

/// What the cart needs to know about a product when it is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the base currency.
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub slug: String,
}

impl CartProduct {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Decimal,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            image: None,
            slug: slug.into(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Snapshot a catalog product at its effective price.
    pub fn from_summary(product: &ProductSummary) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.effective_price(),
            image: product.image.as_ref().map(|i| i.source_url.clone()),
            slug: product.slug.clone(),
        }
    }
}

/// A line item in the cart. Quantity is always at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub slug: String,
}

impl LineItem {
    fn new(product: CartProduct, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name,
            unit_price: product.unit_price,
            quantity,
            image: product.image,
            slug: product.slug,
        }
    }

    /// `unit_price × quantity`, saturating at the `Decimal` bounds.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Cart contents plus derived totals, as handed to readers and persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<LineItem>,
    pub item_count: u64,
    pub subtotal: Decimal,
}

impl CartState {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A shopping cart: ordered line items, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored line items.
    ///
    /// Zero quantities and negative prices are dropped; repeated ids are
    /// merged into the first occurrence.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 || item.unit_price.is_sign_negative() {
                continue;
            }
            let quantity = item.quantity;
            cart.add_item(
                CartProduct {
                    id: item.id,
                    name: item.name,
                    unit_price: item.unit_price,
                    image: item.image,
                    slug: item.slug,
                },
                quantity,
            );
        }
        cart
    }

    /// Add `quantity` of a product. An existing line item is incremented;
    /// otherwise a new one is appended. Zero quantity does nothing, and a
    /// line never exceeds [`MAX_LINE_QUANTITY`].
    pub fn add_item(&mut self, product: CartProduct, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let quantity = quantity.min(MAX_LINE_QUANTITY);
        match self.items.iter_mut().find(|i| i.id == product.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY)
            }
            None => self.items.push(LineItem::new(product, quantity)),
        }
    }

    /// Set an absolute quantity. Zero or less removes the item; larger
    /// values are capped at [`MAX_LINE_QUANTITY`].
    ///
    /// Returns whether a line item was affected. An unknown id is a no-op.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }
        let quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(MAX_LINE_QUANTITY);
        match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove an item from the cart.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Sum of line totals, in the base currency.
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(LineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self) -> CartState {
        CartState {
            items: self.items.clone(),
            item_count: self.item_count(),
            subtotal: self.subtotal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::dec;

    fn product(id: &str, price: Decimal) -> CartProduct {
        CartProduct::new(id, format!("Product {id}"), price, id)
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add_item(product("x", dec!(10)), 2);
        cart.add_item(product("x", dec!(10)), 3);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.subtotal(), dec!(50));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(product("b", dec!(1)), 1);
        cart.add_item(product("a", dec!(1)), 1);
        cart.add_item(product("b", dec!(1)), 1);

        let ids: Vec<_> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(product("x", dec!(10)), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(product("x", dec!(2.50)), 1);

        assert!(cart.update_quantity(&"x".into(), 4));
        assert_eq!(cart.subtotal(), dec!(10.00));

        assert!(cart.update_quantity(&"x".into(), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_negative_removes() {
        let mut cart = Cart::new();
        cart.add_item(product("x", dec!(1)), 3);
        assert!(cart.update_quantity(&"x".into(), -2));
        assert!(cart.get(&"x".into()).is_none());
    }

    #[test]
    fn test_update_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(product("x", dec!(1)), 1);
        assert!(!cart.update_quantity(&"y".into(), 5));
        assert_eq!(cart.items().len(), 1);
        assert!(cart.get(&"y".into()).is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(product("x", dec!(1)), 1);
        cart.add_item(product("y", dec!(1)), 1);

        assert!(cart.remove_item(&"x".into()));
        assert!(!cart.remove_item(&"x".into()));
        assert_eq!(cart.item_count(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_huge_quantities_are_capped() {
        let mut cart = Cart::new();
        cart.add_item(product("x", dec!(1)), u32::MAX);
        cart.add_item(product("x", dec!(1)), u32::MAX);
        assert_eq!(cart.items()[0].quantity, MAX_LINE_QUANTITY);

        assert!(cart.update_quantity(&"x".into(), i64::MAX));
        assert_eq!(cart.item_count(), u64::from(MAX_LINE_QUANTITY));
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let huge = Decimal::MAX / dec!(2);
        let mut cart = Cart::new();
        cart.add_item(product("p", huge), 1);
        cart.add_item(product("q", huge), 1);
        assert!(cart.update_quantity(&"p".into(), i64::MAX));

        assert_eq!(cart.get(&"p".into()).unwrap().line_total(), Decimal::MAX);
        assert_eq!(cart.subtotal(), Decimal::MAX);
        assert_eq!(cart.state().subtotal, Decimal::MAX);
    }

    #[test]
    fn test_from_items_sanitizes() {
        let item = |id: &str, qty: u32, price: Decimal| LineItem {
            id: id.into(),
            name: id.into(),
            unit_price: price,
            quantity: qty,
            image: None,
            slug: id.into(),
        };
        let cart = Cart::from_items(vec![
            item("a", 2, dec!(3)),
            item("b", 0, dec!(3)),
            item("c", 1, dec!(-1)),
            item("a", 1, dec!(3)),
        ]);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_from_summary_uses_effective_price() {
        let summary = ProductSummary::new("p1", "Tea", "tea")
            .with_price("12.00")
            .with_sale_price("9.00")
            .with_image(crate::catalog::ImageRef::new("https://cdn.test/tea.jpg"));
        let product = CartProduct::from_summary(&summary);
        assert_eq!(product.unit_price, dec!(9.00));
        assert_eq!(product.image.as_deref(), Some("https://cdn.test/tea.jpg"));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, u32),
        Update(u8, i64),
        Remove(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..5, 0u32..10).prop_map(|(id, q)| Op::Add(id, q)),
            (0u8..5, -3i64..10).prop_map(|(id, q)| Op::Update(id, q)),
            (0u8..5).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_derived_fields_match_items(ops in proptest::collection::vec(op(), 0..40)) {
            let mut cart = Cart::new();
            for op in ops {
                match op {
                    Op::Add(id, q) => cart.add_item(product(&id.to_string(), Decimal::from(id) + dec!(0.99)), q),
                    Op::Update(id, q) => { cart.update_quantity(&id.to_string().into(), q); }
                    Op::Remove(id) => { cart.remove_item(&id.to_string().into()); }
                }
            }

            let count: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
            let subtotal: Decimal = cart.items().iter().map(|i| i.unit_price * Decimal::from(i.quantity)).sum();
            prop_assert_eq!(cart.item_count(), count);
            prop_assert_eq!(cart.subtotal(), subtotal);
            prop_assert!(cart.items().iter().all(|i| i.quantity >= 1));
            prop_assert!(cart.subtotal() >= Decimal::ZERO);

            let mut ids: Vec<_> = cart.items().iter().map(|i| i.id.clone()).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.items().len());
        }
    }
}
