//! Order summary pricing: tax and shipping on top of the cart subtotal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax and shipping rules applied at checkout. Amounts are in base currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax.
    pub tax_rate: Decimal,
    /// Shipping is free when the subtotal is strictly above this.
    pub free_shipping_threshold: Decimal,
    /// Shipping charged otherwise.
    pub flat_shipping: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(8, 2),
            free_shipping_threshold: Decimal::new(50, 0),
            flat_shipping: Decimal::new(5, 0),
        }
    }
}

impl PricingPolicy {
    pub fn summarize(&self, subtotal: Decimal) -> OrderSummary {
        let tax = subtotal.saturating_mul(self.tax_rate);
        let shipping = if subtotal > self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping
        };
        OrderSummary {
            subtotal,
            tax,
            shipping,
            total: subtotal.saturating_add(tax).saturating_add(shipping),
        }
    }
}

/// Complete pricing breakdown for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    /// `subtotal + tax + shipping`.
    pub total: Decimal,
}

impl OrderSummary {
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}
