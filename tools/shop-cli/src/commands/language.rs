//! Interface language commands.

use anyhow::Result;
use serde_json::json;
use shop_commerce::language::Language;

use super::{LanguageArgs, LanguageCommand};
use crate::context::Context;

/// Run the language command.
pub fn run(args: LanguageArgs, ctx: &Context) -> Result<()> {
    let stores = ctx.stores()?;

    if let Some(LanguageCommand::Set { code }) = args.command {
        let language: Language = code.parse()?;
        stores.language.set(language);
        ctx.output
            .success(&format!("Language set to {} {}", language.flag(), language.name()));
    }

    let current = stores.language.current();
    if ctx.output.is_json() {
        ctx.output.json(&json!({ "language": current }));
        return Ok(());
    }

    ctx.output.header("Language");
    for language in Language::ALL {
        let marker = if language == current { "*" } else { " " };
        ctx.output.list_item(&format!(
            "{} {} {}  {}",
            marker,
            language.flag(),
            language.code(),
            language.name()
        ));
    }

    Ok(())
}
