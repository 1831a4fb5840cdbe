//! Account commands: login, signup, logout, whoami.

use anyhow::{bail, Context as _, Result};
use dialoguer::{Input, Password};
use fruitpack_auth::{SignupRequest, TokenStore, UserRegistration};

use super::{LoginArgs, SignupArgs};
use crate::context::Context;

pub fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };
    if email.trim().is_empty() || password.is_empty() {
        bail!("Please enter both email and password");
    }

    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Logging in...");
    let result = api.login(&email, &password);
    spinner.finish_and_clear();
    let token = result.context("Login failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "logged_in": true,
            "user_id": token.subject().ok(),
        }));
    } else {
        ctx.output.success(&format!("Logged in as {}", email.trim()));
    }
    Ok(())
}

pub fn signup(args: SignupArgs, ctx: &Context) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let full_name = match args.name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Full name")
            .interact_text()?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Creating account...");
    let request = SignupRequest::new(&email, &password);
    let result = api.signup(&request).and_then(|token| {
        let profile = api.register_user(&UserRegistration::new(&email, &password, &full_name))?;
        Ok((token, profile))
    });
    spinner.finish_and_clear();
    let (_, profile) = result.context("Signup failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&profile);
    } else {
        ctx.output.success(&format!("Account created for {}", profile.email));
    }
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    let removed = ctx.api()?.logout()?;
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "logged_out": removed }));
    } else if removed {
        ctx.output.success("Logged out");
    } else {
        ctx.output.info("Not logged in");
    }
    Ok(())
}

pub fn whoami(ctx: &Context) -> Result<()> {
    let store = ctx.token_store()?;
    let Some(token) = store.load()? else {
        bail!("Not logged in. Run `fruitpack login` first.");
    };
    let claims = token.claims().context("Stored token is not readable")?;
    let expires = token
        .expires_at()
        .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string());

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "user_id": claims.sub,
            "role": claims.role,
            "expires_at": token.expires_at(),
            "expired": token.is_expired(),
            "token_path": store.path(),
        }));
        return Ok(());
    }

    ctx.output.header("Current user");
    ctx.output.kv(
        "user id",
        claims.sub.as_ref().map(|s| s.as_str()).unwrap_or("-"),
    );
    if let Some(role) = &claims.role {
        ctx.output.kv("role", role);
    }
    ctx.output.kv("expires", expires.as_deref().unwrap_or("never"));
    ctx.output
        .kv("token", &store.path().display().to_string());
    if token.is_expired() {
        ctx.output.warn("Token has expired; run `fruitpack login`.");
    }
    Ok(())
}
