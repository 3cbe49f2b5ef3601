//! Output formatting for the CLI.

use chrono::NaiveDateTime;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use shop_commerce::catalog::{PipelineStatus, ProductSummary, StockStatus};
use shop_commerce::currency::CurrencyStore;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stderr(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row, truncating cells to the column width.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| {
                let cell = console::truncate_str(col, *width, "…");
                console::pad_str(&cell, *width, console::Alignment::Left, None).into_owned()
            })
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print a separator as wide as the terminal allows.
    pub fn rule(&self, width: usize) {
        if self.json {
            return;
        }
        let width = width.min(self.term_width().saturating_sub(2).max(20));
        println!("  {}", style("-".repeat(width)).dim());
    }

    /// Create a spinner for a network round trip.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json || !self.term.is_term() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        let template = ProgressStyle::default_spinner().template("{spinner:.green} {msg}");
        if let Ok(spinner_style) = template {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Get terminal width.
    pub fn term_width(&self) -> usize {
        self.term.size().1 as usize
    }
}

/// Colored stock badge.
pub fn stock_badge(status: StockStatus) -> String {
    let name = status.display_name();
    match status {
        StockStatus::InStock => style(name).green().to_string(),
        StockStatus::OnBackorder => style(name).yellow().to_string(),
        StockStatus::OutOfStock => style(name).red().to_string(),
        StockStatus::Unknown => style(name).dim().to_string(),
    }
}

/// Colored pipeline status.
pub fn status_badge(status: PipelineStatus) -> String {
    match status {
        PipelineStatus::Ready => style(status.as_str()).green().to_string(),
        PipelineStatus::FetchingFirstPage | PipelineStatus::FetchingNextPage => {
            style(status.as_str()).yellow().to_string()
        }
        PipelineStatus::Error => style(status.as_str()).red().to_string(),
        PipelineStatus::Idle => style(status.as_str()).dim().to_string(),
    }
}

/// Product price in the active currency, or `-` when the product has none.
pub fn price_text(product: &ProductSummary, currency: &CurrencyStore) -> String {
    match product.effective_price_text() {
        Some(_) => currency.format_price(product.effective_price()),
        None => "-".to_string(),
    }
}

/// Post dates arrive as local `YYYY-MM-DDTHH:MM:SS`; show the day only.
pub fn format_post_date(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
