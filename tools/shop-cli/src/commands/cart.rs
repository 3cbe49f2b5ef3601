//! Cart commands.

use anyhow::{bail, Result};
use serde::Serialize;
use shop_commerce::cart::{CartProduct, CartState, OrderSummary};
use shop_commerce::catalog::{CatalogSource, ProductSummary};
use shop_commerce::checkout::CheckoutFlow;
use shop_commerce::ProductId;
use tracing::debug;

use super::catalog::scan_catalog;
use super::{CartArgs, CartCommand};
use crate::context::{Context, Stores};

const LINE_COLUMNS: [usize; 4] = [34, 6, 14, 14];

#[derive(Serialize)]
struct CartReport<'a> {
    currency: &'a str,
    #[serde(flatten)]
    state: &'a CartState,
    summary: OrderSummary,
}

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let stores = ctx.stores()?;
    match args.command {
        Some(CartCommand::Show) | None => show(ctx, &stores),
        Some(CartCommand::Add {
            product,
            quantity,
            max_pages,
        }) => add(ctx, &stores, &product, quantity, max_pages).await,
        Some(CartCommand::Update { product, quantity }) => {
            let id = ProductId::from(product);
            if stores.cart.state().items.iter().all(|item| item.id != id) {
                ctx.output.warn(&format!("'{}' is not in the cart", id));
            }
            stores.cart.update_quantity(&id, quantity);
            if quantity <= 0 {
                ctx.output.success(&format!("Removed {}", id));
            } else {
                ctx.output.success(&format!("Set {} to {}", id, quantity));
            }
            show(ctx, &stores)
        }
        Some(CartCommand::Remove { product }) => {
            let id = ProductId::from(product);
            stores.cart.remove_item(&id);
            ctx.output.success(&format!("Removed {}", id));
            show(ctx, &stores)
        }
        Some(CartCommand::Clear { yes }) => {
            if stores.cart.is_empty() {
                ctx.output.info("Cart is already empty.");
                return Ok(());
            }
            if !yes && !ctx.output.is_json() {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Remove all {} item(s)?", stores.cart.item_count()))
                    .default(false)
                    .interact()?;
                if !confirm {
                    ctx.output.info("Cart left as is.");
                    return Ok(());
                }
            }
            stores.cart.clear();
            ctx.output.success("Cart cleared");
            show(ctx, &stores)
        }
    }
}

async fn add(
    ctx: &Context,
    stores: &Stores,
    product: &str,
    quantity: u32,
    max_pages: u32,
) -> Result<()> {
    if quantity == 0 {
        bail!("Quantity must be at least 1");
    }

    let found = match find_product(ctx, product, max_pages).await? {
        Some(found) => found,
        None => bail!(
            "Product '{}' not found in the first {} catalog page(s)",
            product,
            max_pages
        ),
    };

    if !found.is_in_stock() {
        ctx.output
            .warn(&format!("{} is {}", found.name, found.stock_status.display_name().to_lowercase()));
    }

    stores.cart.add_item(CartProduct::from_summary(&found), quantity);
    ctx.output
        .success(&format!("Added {} × {}", quantity, found.name));
    show(ctx, stores)
}

/// Look a product up by slug, then scan the catalog for an id or slug match.
async fn find_product(ctx: &Context, key: &str, max_pages: u32) -> Result<Option<ProductSummary>> {
    let spinner = ctx.output.spinner("Looking up product...");
    let by_slug = ctx.catalog()?.fetch_product_by_slug(key).await;
    spinner.finish_and_clear();
    if let Some(found) = by_slug? {
        debug!(slug = key, "Found product by slug");
        return Ok(Some(found));
    }

    debug!(key, max_pages, "Scanning catalog for product");
    let matches = |p: &ProductSummary| p.id.as_str() == key || p.slug == key;
    let fetched = scan_catalog(ctx, max_pages, |nodes| nodes.iter().any(matches)).await?;
    Ok(fetched.into_iter().find(|p| matches(p)))
}

fn show(ctx: &Context, stores: &Stores) -> Result<()> {
    let state = stores.cart.state();
    let summary = CheckoutFlow::new(ctx.config.checkout.clone()).summary(&state);
    let currency = &stores.currency;

    if ctx.output.is_json() {
        ctx.output.json(&CartReport {
            currency: currency.active().code(),
            state: &state,
            summary,
        });
        return Ok(());
    }

    ctx.output.header("Cart");
    if state.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    ctx.output
        .table_row(&["PRODUCT", "QTY", "PRICE", "TOTAL"], &LINE_COLUMNS);
    ctx.output.rule(74);
    for item in &state.items {
        ctx.output.table_row(
            &[
                &item.name,
                &item.quantity.to_string(),
                &currency.format_price(item.unit_price),
                &currency.format_price(item.line_total()),
            ],
            &LINE_COLUMNS,
        );
    }

    ctx.output.info("");
    ctx.output.kv("items", &state.item_count.to_string());
    ctx.output.kv("subtotal", &currency.format_price(summary.subtotal));
    ctx.output.kv("tax", &currency.format_price(summary.tax));
    let shipping = if summary.has_free_shipping() {
        "free".to_string()
    } else {
        currency.format_price(summary.shipping)
    };
    ctx.output.kv("shipping", &shipping);
    ctx.output.kv("total", &currency.format_price(summary.total));

    Ok(())
}
