//! Checkout flow: validate, submit, and clear the cart on success.

use tracing::{info, warn};

use crate::auth::SessionStore;
use crate::cart::{CartState, CartStore, OrderSummary, PricingPolicy};
use crate::checkout::{
    BillingDetails, OrderGateway, OrderLine, OrderRequest, PlacedOrder, DEFAULT_PAYMENT_METHOD,
};
use crate::error::CheckoutError;

/// Order placement against a gateway.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    policy: PricingPolicy,
}

impl CheckoutFlow {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Tax, shipping and total for the cart as it stands.
    pub fn summary(&self, cart: &CartState) -> OrderSummary {
        self.policy.summarize(cart.subtotal)
    }

    /// Build the order request for a cart.
    pub fn build_request(
        &self,
        cart: &CartState,
        billing: BillingDetails,
        payment_method: Option<&str>,
    ) -> Result<OrderRequest, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        billing.validate()?;
        Ok(OrderRequest {
            billing,
            payment_method: payment_method
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(DEFAULT_PAYMENT_METHOD)
                .to_string(),
            line_items: cart.items.iter().map(OrderLine::from).collect(),
        })
    }

    /// Submit the cart as an order.
    ///
    /// Requires a signed-in customer and a non-empty cart. The cart is
    /// cleared only once the gateway confirms; any failure leaves it intact.
    pub async fn place_order(
        &self,
        cart: &CartStore,
        session: &SessionStore,
        billing: BillingDetails,
        payment_method: Option<&str>,
        gateway: &dyn OrderGateway,
    ) -> Result<PlacedOrder, CheckoutError> {
        let auth = session.session().ok_or(CheckoutError::LoginRequired)?;
        let state = cart.state();
        let request = self.build_request(&state, billing, payment_method)?;
        let summary = self.summary(&state);

        let confirmation = match gateway.create_order(&auth, &request).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                warn!(error = %e, items = state.items.len(), "Order placement failed");
                return Err(e.into());
            }
        };

        info!(
            order = %confirmation.id,
            number = confirmation.order_number.as_deref().unwrap_or("-"),
            "Order placed"
        );
        cart.clear();

        Ok(PlacedOrder {
            confirmation,
            total: summary.total,
        })
    }
}
