//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use shop_commerce::config::{generate_default_config, ShopConfig};
use shop_observability::{LogFormat, LogLevel};

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Largest page the GraphQL service will return.
const MAX_PAGE_SIZE: u32 = 100;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { path, force } => init_config(&path, force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("source", &path.display().to_string()),
        None => ctx.output.kv("source", "built-in defaults"),
    }
    ctx.output
        .kv("storage", &ctx.storage_path().display().to_string());
    ctx.output.info("");
    println!("{}", toml::to_string_pretty(&ctx.config)?);

    Ok(())
}

fn init_config(path: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.resolve_path(path);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check(&ctx.config);

    // Print results
    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Errors and warnings for a configuration.
fn check(config: &ShopConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for (key, url) in [
        ("api.graphql_url", &config.api.graphql_url),
        ("api.auth_url", &config.api.auth_url),
    ] {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            errors.push(format!("{} must be an http(s) URL", key));
        } else if url.starts_with("http://") {
            warnings.push(format!("{} is not using https", key));
        }
    }
    if config.api.timeout_secs == 0 {
        errors.push("api.timeout_secs must be positive".to_string());
    }

    if config.catalog.page_size == 0 {
        errors.push("catalog.page_size must be positive".to_string());
    } else if config.catalog.page_size > MAX_PAGE_SIZE {
        warnings.push(format!(
            "catalog.page_size above {} is capped by the service",
            MAX_PAGE_SIZE
        ));
    }
    if config.catalog.min_search_chars == 0 {
        warnings.push("catalog.min_search_chars = 0 searches on every keystroke".to_string());
    }

    if let Err(e) = config.exchange_rates() {
        errors.push(format!("{:#}", e));
    }
    if let Err(e) = config.default_currency() {
        errors.push(format!("{:#}", e));
    }

    let pricing = &config.checkout;
    if pricing.tax_rate.is_sign_negative() {
        errors.push("checkout.tax_rate must not be negative".to_string());
    }
    if pricing.flat_shipping.is_sign_negative() {
        errors.push("checkout.flat_shipping must not be negative".to_string());
    }

    if let Err(e) = config.logging.format.parse::<LogFormat>() {
        errors.push(format!("logging.format: {}", e));
    }
    if let Err(e) = config.logging.level.parse::<LogLevel>() {
        errors.push(format!("logging.level: {}", e));
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_clean() {
        let config: ShopConfig = toml::from_str(&generate_default_config()).unwrap();
        let (errors, warnings) = check(&config);
        assert!(errors.is_empty(), "{errors:?}");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn test_problems_are_reported() {
        let config: ShopConfig = toml::from_str(
            r#"
[api]
graphql_url = "ftp://shop.test/graphql"
auth_url = "http://shop.test/wp-json"

[catalog]
page_size = 500

[currency]
active = "GBP"

[logging]
format = "xml"
"#,
        )
        .unwrap();

        let (errors, warnings) = check(&config);
        assert!(errors.iter().any(|e| e.starts_with("api.graphql_url")));
        assert!(errors.iter().any(|e| e.contains("GBP")));
        assert!(errors.iter().any(|e| e.starts_with("logging.format")));
        assert!(warnings.iter().any(|w| w.starts_with("api.auth_url")));
        assert!(warnings.iter().any(|w| w.starts_with("catalog.page_size")));
    }
}
