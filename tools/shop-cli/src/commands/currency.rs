//! Display currency commands.

use anyhow::Result;
use rust_decimal::Decimal;
use shop_commerce::money::Currency;

use super::{CurrencyArgs, CurrencyCommand};
use crate::context::Context;

/// Run the currency command.
pub fn run(args: CurrencyArgs, ctx: &Context) -> Result<()> {
    let stores = ctx.stores()?;
    let currency = &stores.currency;

    match args.command {
        Some(CurrencyCommand::Show) | None => {}
        Some(CurrencyCommand::Set { code }) => {
            let next: Currency = code.parse()?;
            currency.change_currency(next);
            ctx.output
                .success(&format!("Prices now shown in {} {}", next.flag(), next.code()));
        }
    }

    let snapshot = currency.snapshot();
    if ctx.output.is_json() {
        ctx.output.json(&snapshot);
        return Ok(());
    }

    ctx.output.header("Currency");
    for (code, rate) in snapshot.rates.iter() {
        let marker = if code == snapshot.active { "*" } else { " " };
        ctx.output.list_item(&format!(
            "{} {} {} {:<22} 1 {} = {} {}",
            marker,
            code.flag(),
            code.code(),
            code.name(),
            Currency::BASE.code(),
            rate.normalize(),
            code.code()
        ));
    }
    ctx.output.info("");
    ctx.output.kv(
        "example",
        &format!(
            "100 {} = {}",
            Currency::BASE.code(),
            currency.format_price(Decimal::ONE_HUNDRED)
        ),
    );

    Ok(())
}
