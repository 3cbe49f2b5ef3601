//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod currency;
pub mod language;
pub mod wishlist;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Only products whose name contains this text.
    #[arg(short, long)]
    pub text: Option<String>,

    /// Only products in this category, by id, slug or name (repeatable).
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Minimum price in AZN.
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Maximum price in AZN.
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Only products in stock.
    #[arg(long)]
    pub in_stock: bool,

    /// Only discounted products.
    #[arg(long)]
    pub on_sale: bool,

    /// Sort order: date, popularity, price-low, price-high, name.
    #[arg(short, long, default_value = "date")]
    pub sort: String,

    /// Number of pages to load.
    #[arg(short, long, default_value = "1")]
    pub pages: u32,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search term.
    pub term: String,

    /// Maximum results (default from config).
    #[arg(short, long)]
    pub limit: Option<u32>,
}

/// Arguments for the posts command.
#[derive(Args)]
pub struct PostsArgs {
    /// Number of pages to load.
    #[arg(short, long, default_value = "1")]
    pub pages: u32,
}

/// Arguments for the post command.
#[derive(Args)]
pub struct PostArgs {
    /// Post slug.
    pub slug: String,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with totals.
    Show,
    /// Add a product by id or slug.
    Add {
        /// Product id or slug.
        product: String,

        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,

        /// Catalog pages to scan for the product.
        #[arg(long, default_value = "5")]
        max_pages: u32,
    },
    /// Set the quantity of a line; zero or less removes it.
    Update {
        /// Product id.
        product: String,

        /// New quantity.
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Product id.
        product: String,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the currency command.
#[derive(Args)]
pub struct CurrencyArgs {
    #[command(subcommand)]
    pub command: Option<CurrencyCommand>,
}

#[derive(Subcommand)]
pub enum CurrencyCommand {
    /// Show the active currency and rates.
    Show,
    /// Change the display currency.
    Set {
        /// Currency code: AZN, USD, EUR or RUB.
        code: String,
    },
}

/// Arguments for the wishlist command.
#[derive(Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: Option<WishlistCommand>,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Show saved products.
    Show {
        /// Catalog pages to scan for product details.
        #[arg(long, default_value = "5")]
        max_pages: u32,
    },
    /// Save a product id.
    Add {
        /// Product id.
        product: String,
    },
    /// Forget a product id.
    Remove {
        /// Product id.
        product: String,
    },
}

/// Arguments for the language command.
#[derive(Args)]
pub struct LanguageArgs {
    #[command(subcommand)]
    pub command: Option<LanguageCommand>,
}

#[derive(Subcommand)]
pub enum LanguageCommand {
    /// Show the current language.
    Show,
    /// Change the language.
    Set {
        /// Language code: az, en or ru.
        code: String,
    },
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Username or email.
    pub username: String,

    /// Password (prompted when omitted).
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Billing phone number.
    #[arg(long)]
    pub phone: String,

    /// Street address.
    #[arg(long)]
    pub address: String,

    /// City.
    #[arg(long)]
    pub city: String,

    /// Postcode.
    #[arg(long, default_value = "")]
    pub postcode: String,

    /// Country code.
    #[arg(long, default_value = "AZ")]
    pub country: String,

    /// Billing email (defaults to the account email).
    #[arg(long)]
    pub email: Option<String>,

    /// Payment method.
    #[arg(long)]
    pub payment_method: Option<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Write a default shop.toml.
    Init {
        /// Where to write it.
        #[arg(short, long, default_value = "shop.toml")]
        path: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
