//! Order placement types.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::AuthSession;
use crate::cart::LineItem;
use crate::checkout::BillingDetails;
use crate::error::SourceError;
use crate::ids::{OrderId, ProductId};

/// Payment method used when none is chosen.
pub const DEFAULT_PAYMENT_METHOD: &str = "card";

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.id.clone(),
            quantity: item.quantity,
        }
    }
}

/// What is sent to the order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub billing: BillingDetails,
    pub payment_method: String,
    pub line_items: Vec<OrderLine>,
}

/// Order as acknowledged by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    /// Total as reported by the service, in its own text form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Where to send the customer to pay, when payment happens off-site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedOrder {
    pub confirmation: OrderConfirmation,
    /// Locally computed total shown on the confirmation page.
    pub total: Decimal,
}

/// The remote order service.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(
        &self,
        session: &AuthSession,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = OrderRequest {
            billing: BillingDetails::new("Aysel", "Mammadova", "aysel@example.com"),
            payment_method: DEFAULT_PAYMENT_METHOD.into(),
            line_items: vec![OrderLine {
                product_id: "p1".into(),
                quantity: 2,
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["paymentMethod"], "card");
        assert_eq!(json["lineItems"][0]["productId"], "p1");
        assert_eq!(json["billing"]["firstName"], "Aysel");
    }
}
