//! Shop CLI - Command line client for the shop engine.
//!
//! Commands:
//! - `shop products` - Browse the catalog with filters and sorting
//! - `shop categories` - List product categories
//! - `shop search` - Quick product search
//! - `shop posts` - Read the blog feed
//! - `shop post` - Read one blog post
//! - `shop cart` - Show and edit the cart
//! - `shop currency` - Show or change the display currency
//! - `shop wishlist` - Manage saved products
//! - `shop language` - Show or change the interface language
//! - `shop login` / `shop logout` - Manage the session
//! - `shop checkout` - Place an order for the cart
//! - `shop config` - Manage configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shop_commerce::config::LoggingConfig;
use shop_observability::{LogFormat, LogLevel};

use commands::{
    CartArgs, CheckoutArgs, ConfigArgs, CurrencyArgs, LanguageArgs, LoginArgs, PostArgs,
    PostsArgs, ProductsArgs, SearchArgs, WishlistArgs,
};

/// Shop CLI - Browse the catalog, manage the cart and place orders
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products(ProductsArgs),

    /// List product categories
    Categories,

    /// Quick product search
    Search(SearchArgs),

    /// List blog posts
    Posts(PostsArgs),

    /// Read one blog post
    Post(PostArgs),

    /// Show and edit the cart
    Cart(CartArgs),

    /// Show or change the display currency
    Currency(CurrencyArgs),

    /// Manage the wishlist
    Wishlist(WishlistArgs),

    /// Show or change the interface language
    Language(LanguageArgs),

    /// Sign in
    Login(LoginArgs),

    /// Sign out and clear the cart
    Logout,

    /// Place an order for the cart
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    init_logging(&ctx.config.logging, cli.verbose, &ctx.output);

    // Execute command
    let result = match cli.command {
        Commands::Products(args) => commands::catalog::products(args, &ctx).await,
        Commands::Categories => commands::catalog::categories(&ctx).await,
        Commands::Search(args) => commands::catalog::search(args, &ctx).await,
        Commands::Posts(args) => commands::catalog::posts(args, &ctx).await,
        Commands::Post(args) => commands::catalog::post(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Currency(args) => commands::currency::run(args, &ctx),
        Commands::Wishlist(args) => commands::wishlist::run(args, &ctx).await,
        Commands::Language(args) => commands::language::run(args, &ctx),
        Commands::Login(args) => commands::account::login(args, &ctx).await,
        Commands::Logout => commands::account::logout(&ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig, verbose: bool, output: &output::Output) {
    let format = config.format.parse().unwrap_or_else(|e| {
        output.warn(&format!("{e}, using human"));
        LogFormat::Human
    });
    let mut level = config.level.parse().unwrap_or_else(|e| {
        output.warn(&format!("{e}, using warn"));
        LogLevel::Warn
    });
    if verbose {
        level = level.louder().louder();
    }

    if let Err(e) = shop_observability::init(format, level) {
        output.warn(&e.to_string());
    }
}
