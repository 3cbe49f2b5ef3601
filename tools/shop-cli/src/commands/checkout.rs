//! Order placement.

use anyhow::{bail, Result};
use serde_json::json;
use shop_commerce::checkout::{BillingDetails, CheckoutFlow};
use shop_commerce::error::CheckoutError;

use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let stores = ctx.stores()?;
    let Some(user) = stores.session.user() else {
        bail!(CheckoutError::LoginRequired);
    };

    let mut billing = BillingDetails::for_user(&user)
        .with_phone(args.phone)
        .with_address(args.address, args.city, args.postcode, args.country);
    if let Some(email) = args.email {
        billing.email = email;
    }

    let flow = CheckoutFlow::new(ctx.config.checkout.clone());
    let state = stores.cart.state();
    let summary = flow.summary(&state);
    let currency = &stores.currency;

    if !ctx.output.is_json() {
        ctx.output.header("Checkout");
        ctx.output.kv("customer", &billing.full_name());
        ctx.output.kv("items", &state.item_count.to_string());
        ctx.output.kv("subtotal", &currency.format_price(summary.subtotal));
        ctx.output.kv("tax", &currency.format_price(summary.tax));
        ctx.output.kv("shipping", &currency.format_price(summary.shipping));
        ctx.output.kv("total", &currency.format_price(summary.total));
    }

    if !args.yes && !ctx.output.is_json() && !state.is_empty() {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;
        if !confirm {
            ctx.output.info("Order not placed.");
            return Ok(());
        }
    }

    let gateway = ctx.catalog()?;
    let spinner = ctx.output.spinner("Placing order...");
    let result = flow
        .place_order(
            &stores.cart,
            &stores.session,
            billing,
            args.payment_method.as_deref(),
            &*gateway,
        )
        .await;
    spinner.finish_and_clear();
    let placed = result?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "order": placed.confirmation,
            "total": placed.total,
            "currency": currency.active().code(),
        }));
        return Ok(());
    }

    let number = placed
        .confirmation
        .order_number
        .as_deref()
        .unwrap_or(placed.confirmation.id.as_str());
    ctx.output.success(&format!(
        "Order #{} placed, total {}",
        number,
        currency.format_price(placed.total)
    ));
    if let Some(url) = &placed.confirmation.payment_url {
        ctx.output.info(&format!("Complete payment at {}", url));
    }

    Ok(())
}
