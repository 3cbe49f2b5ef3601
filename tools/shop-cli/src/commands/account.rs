//! Session commands.

use anyhow::Result;
use dialoguer::Password;
use serde_json::json;

use super::LoginArgs;
use crate::context::Context;

/// Run the login command.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let stores = ctx.stores()?;
    let password = match args.password {
        Some(password) => password,
        None => Password::new()
            .with_prompt(format!("Password for {}", args.username))
            .interact()?,
    };

    let auth = ctx.auth()?;
    let spinner = ctx.output.spinner("Signing in...");
    let result = stores
        .session
        .login(&auth, &args.username, &password)
        .await;
    spinner.finish_and_clear();
    let user = result?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "user": user }));
        return Ok(());
    }

    ctx.output
        .success(&format!("Login successful. Welcome back, {}!", user.name));
    if !user.email.is_empty() {
        ctx.output.kv("email", &user.email);
    }
    Ok(())
}

/// Run the logout command.
pub fn logout(ctx: &Context) -> Result<()> {
    let stores = ctx.stores()?;
    let was_signed_in = stores.session.is_authenticated();
    stores.session.logout(&stores.cart);

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "logged_out": was_signed_in }));
    } else if was_signed_in {
        ctx.output.success("Logged out. See you next time!");
    } else {
        ctx.output.info("Not signed in.");
    }
    Ok(())
}
