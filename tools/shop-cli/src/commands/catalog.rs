//! Catalog browsing commands: products, categories, search and posts.

use anyhow::{anyhow, bail, Result};
use shop_commerce::catalog::{
    find_category, CatalogSource, Category, ContentSource, FetchOutcome, PostFeed, ProductSummary,
};
use shop_commerce::currency::CurrencyStore;
use shop_commerce::error::CatalogError;
use shop_commerce::search::{
    CatalogFilter, CatalogParams, CatalogPipeline, PriceWindow, SearchOutcome, QuickSearch,
    SortKey,
};
use shop_commerce::wishlist::WishlistStore;
use shop_commerce::CategoryId;
use tracing::debug;

use super::{PostArgs, PostsArgs, ProductsArgs, SearchArgs};
use crate::context::Context;
use crate::output::{format_post_date, price_text, status_badge, stock_badge};

const PRODUCT_COLUMNS: [usize; 4] = [36, 14, 14, 22];

/// Run the products command.
pub async fn products(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let sort = parse_sort(&args.sort)?;
    let catalog = ctx.catalog()?;

    let category_ids = if args.categories.is_empty() {
        Vec::new()
    } else {
        let spinner = ctx.output.spinner("Loading categories...");
        let categories = catalog.fetch_categories().await;
        spinner.finish_and_clear();
        resolve_categories(&categories?, &args.categories)?
    };
    let params = CatalogParams::new()
        .with_filter(build_filter(&args, &category_ids))
        .with_sort(sort);

    let stores = ctx.stores()?;
    let pipeline = CatalogPipeline::new(catalog, ctx.config.catalog.page_size);

    let spinner = ctx.output.spinner("Loading products...");
    let loaded = load_pages(&pipeline, params, args.pages).await;
    spinner.finish_and_clear();
    loaded?;

    let view = pipeline.view();
    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", sort.display_name()));
    if view.is_empty() {
        ctx.output.info("No products match.");
    } else {
        print_products(ctx, &view.products, &stores.currency, Some(&stores.wishlist));
    }

    ctx.output.info("");
    ctx.output.info(&format!(
        "Showing {} of {} fetched product(s) [{}]",
        view.len(),
        view.fetched,
        status_badge(view.status)
    ));
    if view.has_next_page {
        ctx.output.info(&format!(
            "More available: rerun with --pages {}",
            args.pages.max(1) + 1
        ));
    }

    Ok(())
}

/// Run the categories command.
pub async fn categories(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading categories...");
    let categories = ctx.catalog()?.fetch_categories().await;
    spinner.finish_and_clear();
    let categories = categories?;

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    ctx.output.header("Categories");
    if categories.is_empty() {
        ctx.output.info("No categories.");
    }
    for category in &categories {
        ctx.output.list_item(&format!(
            "{}  {}",
            console::style(&category.name).bold(),
            console::style(&category.slug).dim()
        ));
        for child in &category.children {
            ctx.output.kv(&child.name, &child.slug);
        }
    }

    Ok(())
}

/// Run the search command.
pub async fn search(args: SearchArgs, ctx: &Context) -> Result<()> {
    let stores = ctx.stores()?;
    let limit = args.limit.unwrap_or(ctx.config.catalog.search_limit);
    let search = QuickSearch::new(ctx.catalog()?, limit, ctx.config.catalog.min_search_chars);

    let spinner = ctx.output.spinner(&format!("Searching for '{}'...", args.term));
    let outcome = search.search(&args.term).await;
    spinner.finish_and_clear();

    let results = match outcome? {
        SearchOutcome::Results(results) => results,
        SearchOutcome::TooShort => {
            ctx.output.info(&format!(
                "Type at least {} characters to search.",
                ctx.config.catalog.min_search_chars
            ));
            Vec::new()
        }
        SearchOutcome::Stale => search.latest(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&results);
        return Ok(());
    }

    ctx.output.header(&format!("Results for '{}'", args.term.trim()));
    if results.is_empty() {
        ctx.output.info("No products found.");
    } else {
        print_products(ctx, &results, &stores.currency, None);
    }

    Ok(())
}

/// Run the posts command.
pub async fn posts(args: PostsArgs, ctx: &Context) -> Result<()> {
    let feed = PostFeed::new(ctx.catalog()?, ctx.config.catalog.post_page_size);

    let spinner = ctx.output.spinner("Loading posts...");
    let loaded = async {
        feed.refresh().await?;
        for _ in 1..args.pages {
            if feed.load_more().await? == FetchOutcome::Exhausted {
                break;
            }
        }
        Ok::<_, CatalogError>(())
    }
    .await;
    spinner.finish_and_clear();
    loaded?;

    let posts = feed.posts();
    if ctx.output.is_json() {
        ctx.output.json(&posts);
        return Ok(());
    }

    ctx.output.header("Blog");
    if posts.is_empty() {
        ctx.output.info("No posts yet.");
    }
    for post in &posts {
        let date = post.date.as_deref().map(format_post_date).unwrap_or_default();
        let byline = match post.author.as_deref() {
            Some(author) => format!("{date} · {author}"),
            None => date,
        };
        ctx.output.list_item(&format!(
            "{}  {}",
            console::style(&post.title).bold(),
            console::style(byline).dim()
        ));
        let excerpt = post.plain_excerpt();
        if !excerpt.is_empty() {
            ctx.output.kv("excerpt", &console::truncate_str(&excerpt, 100, "…"));
        }
    }
    if feed.has_next_page() {
        ctx.output.info(&format!(
            "More available: rerun with --pages {}",
            args.pages.max(1) + 1
        ));
    }

    Ok(())
}

/// Run the post command.
pub async fn post(args: PostArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading post...");
    let found = ctx.catalog()?.fetch_post_by_slug(args.slug.trim()).await;
    spinner.finish_and_clear();
    let Some(detail) = found? else {
        bail!("Post '{}' not found", args.slug.trim());
    };

    if ctx.output.is_json() {
        ctx.output.json(&detail);
        return Ok(());
    }

    let post = &detail.post;
    ctx.output.header(&post.title);
    if let Some(date) = post.date.as_deref() {
        ctx.output.kv("date", &format_post_date(date));
    }
    if let Some(author) = post.author.as_deref() {
        ctx.output.kv("author", author);
    }
    if !detail.tags.is_empty() {
        let tags: Vec<_> = detail.tags.iter().map(|t| t.name.as_str()).collect();
        ctx.output.kv("tags", &tags.join(", "));
    }
    ctx.output.info("");
    ctx.output.info(&detail.plain_content());

    Ok(())
}

/// Load catalog pages until `found` is satisfied, the catalog ends or
/// `max_pages` have been fetched. Returns everything fetched.
pub(crate) async fn scan_catalog(
    ctx: &Context,
    max_pages: u32,
    found: impl Fn(&[ProductSummary]) -> bool,
) -> Result<Vec<ProductSummary>> {
    let pipeline = CatalogPipeline::new(ctx.catalog()?, ctx.config.catalog.page_size);

    let spinner = ctx.output.spinner("Looking up products...");
    let scanned = async {
        pipeline.refresh().await?;
        let mut pages = 1;
        while pages < max_pages && !found(&pipeline.fetched()) {
            if pipeline.load_more().await? == FetchOutcome::Exhausted {
                break;
            }
            pages += 1;
        }
        Ok::<_, CatalogError>(())
    }
    .await;
    spinner.finish_and_clear();
    scanned?;

    Ok(pipeline.fetched())
}

async fn load_pages(
    pipeline: &CatalogPipeline,
    params: CatalogParams,
    pages: u32,
) -> Result<(), CatalogError> {
    pipeline.set_params(params).await?;
    for _ in 1..pages {
        if pipeline.load_more().await? == FetchOutcome::Exhausted {
            break;
        }
    }
    Ok(())
}

fn parse_sort(raw: &str) -> Result<SortKey> {
    SortKey::from_str(raw).ok_or_else(|| {
        let known: Vec<_> = SortKey::ALL.iter().map(SortKey::as_str).collect();
        anyhow!("Unknown sort '{}'. Use one of: {}", raw, known.join(", "))
    })
}

/// Map category ids, slugs or names to category ids.
fn resolve_categories(categories: &[Category], keys: &[String]) -> Result<Vec<CategoryId>> {
    keys.iter()
        .map(|key| match find_category(categories, key) {
            Some(found) => {
                debug!(key = %key, id = %found.id, "Resolved category");
                Ok(found.id)
            }
            None => {
                let known: Vec<_> = categories.iter().map(|c| c.slug.as_str()).collect();
                bail!("Unknown category '{}'. Known: {}", key, known.join(", "))
            }
        })
        .collect()
}

fn build_filter(args: &ProductsArgs, category_ids: &[CategoryId]) -> CatalogFilter {
    let mut filter = CatalogFilter::new();
    if let Some(text) = &args.text {
        filter = filter.with_text(text.as_str());
    }
    for id in category_ids {
        filter = filter.with_category(id.clone());
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        filter = filter.with_price(PriceWindow::new(args.min_price, args.max_price));
    }
    if args.in_stock {
        filter = filter.in_stock_only();
    }
    if args.on_sale {
        filter = filter.on_sale_only();
    }
    filter
}

fn print_products(
    ctx: &Context,
    products: &[ProductSummary],
    currency: &CurrencyStore,
    wishlist: Option<&WishlistStore>,
) {
    ctx.output
        .table_row(&["NAME", "PRICE", "STOCK", "ID"], &PRODUCT_COLUMNS);
    ctx.output.rule(92);

    for product in products {
        let price = price_text(product, currency);
        let price = if product.is_on_sale() {
            format!("{} %", price)
        } else {
            price
        };
        let saved = wishlist.is_some_and(|w| w.contains(&product.id));
        let name = if saved {
            format!("♥ {}", product.name)
        } else {
            product.name.clone()
        };

        ctx.output.table_row(
            &[
                &name,
                &price,
                &stock_badge(product.stock_status),
                product.id.as_str(),
            ],
            &PRODUCT_COLUMNS,
        );
    }
}
