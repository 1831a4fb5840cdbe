//! Fruit-Pack CLI - storefront and driver console for the Fruit-Pack backend.
//!
//! Commands:
//! - `fruitpack login | signup | logout | whoami` - Account and token
//! - `fruitpack products | product | categories` - Browse the catalog
//! - `fruitpack shop` - Interactive cart and checkout
//! - `fruitpack checkout` - One-shot checkout from product ids
//! - `fruitpack orders` - Your orders and their tracking
//! - `fruitpack driver` - Driver availability, location, and deliveries
//! - `fruitpack config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fruitpack_observability::LogLevel;

use commands::{
    CheckoutArgs, ConfigArgs, DriverArgs, LoginArgs, OrdersArgs, ProductArgs, ProductsArgs,
    SignupArgs,
};

/// Fruit-Pack CLI - shop, check out, and deliver fresh produce
#[derive(Parser)]
#[command(name = "fruitpack")]
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
    /// Log in and store the access token
    Login(LoginArgs),

    /// Create an account
    Signup(SignupArgs),

    /// Forget the stored access token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List products
    Products(ProductsArgs),

    /// Show one product
    Product(ProductArgs),

    /// List categories
    Categories,

    /// Interactive shopping session
    Shop,

    /// Check out a list of products in one go
    Checkout(CheckoutArgs),

    /// List and track your orders
    Orders(OrdersArgs),

    /// Driver commands
    Driver(DriverArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let mut logging = ctx.config.logging.clone();
    if ctx.output.is_verbose() {
        logging = logging.at_least(LogLevel::Debug);
    }
    if let Err(e) = fruitpack_observability::init(&logging) {
        ctx.output.warn(&format!("Logging disabled: {e}"));
    }

    // Execute command
    let result = match cli.command {
        Commands::Login(args) => commands::auth::login(args, &ctx),
        Commands::Signup(args) => commands::auth::signup(args, &ctx),
        Commands::Logout => commands::auth::logout(&ctx),
        Commands::Whoami => commands::auth::whoami(&ctx),
        Commands::Products(args) => commands::catalog::products(args, &ctx),
        Commands::Product(args) => commands::catalog::product(args, &ctx),
        Commands::Categories => commands::catalog::categories(&ctx),
        Commands::Shop => commands::shop::run(&ctx),
        Commands::Checkout(args) => commands::checkout::run(args, &ctx),
        Commands::Orders(args) => commands::orders::run(args, &ctx),
        Commands::Driver(args) => commands::driver::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
