//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Path => config_path(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    if ctx.output.is_json() {
        ctx.output.json(config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv("timeout_ms", &config.api.timeout_ms.to_string());
    ctx.output.kv("max_retries", &config.api.max_retries.to_string());

    ctx.output.info("[auth]");
    let token_path = ctx
        .token_store()
        .map(|s| s.path().display().to_string())
        .unwrap_or_else(|e| e.to_string());
    ctx.output.kv("token_path", &token_path);

    ctx.output.info("[checkout]");
    ctx.output.kv("currency", config.checkout.currency.code());
    ctx.output.kv("return_url", &config.checkout.return_url);

    ctx.output.info("[driver]");
    ctx.output
        .kv("id", config.driver.id.as_deref().unwrap_or("(not set)"));

    ctx.output.info("[logging]");
    ctx.output.kv("level", config.logging.level.as_filter());
    ctx.output
        .kv("format", &format!("{:?}", config.logging.format).to_lowercase());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created {}", config_path.display()));
    Ok(())
}

fn config_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) if ctx.output.is_json() => {
            ctx.output.json(&serde_json::json!({ "path": path }));
        }
        Some(path) => println!("{}", path.display()),
        None => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "path": null }));
            } else {
                ctx.output.info(&format!(
                    "No config file found; looked for {} here and in parent directories",
                    CONFIG_NAMES.join(", ")
                ));
            }
        }
    }
    Ok(())
}
