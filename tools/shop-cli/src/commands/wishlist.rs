//! Wishlist commands.

use anyhow::Result;
use shop_commerce::ProductId;

use super::catalog::scan_catalog;
use super::{WishlistArgs, WishlistCommand};
use crate::context::{Context, Stores};
use crate::output::price_text;

/// Run the wishlist command.
pub async fn run(args: WishlistArgs, ctx: &Context) -> Result<()> {
    let stores = ctx.stores()?;
    let wishlist = &stores.wishlist;

    match args.command {
        Some(WishlistCommand::Add { product }) => {
            let id = ProductId::from(product);
            if wishlist.add(id.clone()) {
                ctx.output.success(&format!("Saved {}", id));
            } else {
                ctx.output.info(&format!("{} is already saved", id));
            }
            Ok(())
        }
        Some(WishlistCommand::Remove { product }) => {
            let id = ProductId::from(product);
            if wishlist.remove(&id) {
                ctx.output.success(&format!("Removed {}", id));
            } else {
                ctx.output.info(&format!("{} was not saved", id));
            }
            Ok(())
        }
        Some(WishlistCommand::Show { max_pages }) => show(ctx, &stores, max_pages).await,
        None => show(ctx, &stores, 5).await,
    }
}

async fn show(ctx: &Context, stores: &Stores, max_pages: u32) -> Result<()> {
    let wishlist = &stores.wishlist;
    if wishlist.is_empty() {
        if ctx.output.is_json() {
            ctx.output.json(&Vec::<ProductId>::new());
        } else {
            ctx.output.info("Your wishlist is empty.");
        }
        return Ok(());
    }

    let wanted = wishlist.ids();
    let fetched = scan_catalog(ctx, max_pages, |nodes| {
        wanted.iter().all(|id| nodes.iter().any(|p| &p.id == id))
    })
    .await?;
    let saved = wishlist.resolve(&fetched);

    if ctx.output.is_json() {
        ctx.output.json(&saved);
        return Ok(());
    }

    ctx.output.header(&format!("Wishlist ({})", wishlist.len()));
    for product in &saved {
        ctx.output.list_item(&format!(
            "{}  {}  {}",
            product.name,
            price_text(product, &stores.currency),
            product.id
        ));
    }

    let missing = wanted.len().saturating_sub(saved.len());
    if missing > 0 {
        ctx.output.warn(&format!(
            "{} saved product(s) not found in the first {} catalog page(s)",
            missing, max_pages
        ));
    }

    Ok(())
}
