//! CLI command implementations.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod driver;
pub mod orders;
pub mod shop;

use clap::{Args, Subcommand};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    #[arg(short, long)]
    pub email: Option<String>,

    /// Password (prompted when omitted).
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for the signup command.
#[derive(Args)]
pub struct SignupArgs {
    /// Account email.
    #[arg(short, long)]
    pub email: Option<String>,

    /// Full name for the profile.
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Only products whose name contains this text.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only products in this category id.
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product id.
    pub id: String,
}

/// Arguments for the one-shot checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Cart line as `<product id>[:<quantity>]`; repeatable.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    /// Recipient name.
    #[arg(long)]
    pub name: Option<String>,

    /// Delivery address.
    #[arg(long)]
    pub address: Option<String>,

    /// Contact phone number.
    #[arg(long)]
    pub phone: Option<String>,

    /// Payment method: card or cash.
    #[arg(long)]
    pub payment: Option<String>,

    /// Delivery latitude.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Delivery longitude.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List your orders.
    List,
    /// Show an order with its tracking timeline.
    Show {
        /// Order id.
        id: String,
    },
    /// Confirm you received a delivered order.
    Confirm {
        /// Order id.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the driver command.
#[derive(Args)]
pub struct DriverArgs {
    #[command(subcommand)]
    pub command: DriverCommand,
}

#[derive(Subcommand)]
pub enum DriverCommand {
    /// Show or change availability: available, busy, offline, or toggle.
    Status {
        /// New status; shows the last known one when omitted.
        status: Option<String>,
    },
    /// Share the current location.
    Location {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Orders waiting for a driver.
    Available,
    /// Orders assigned to you.
    Assigned,
    /// Orders you have delivered.
    Deliveries,
    /// Your claims.
    Claims,
    /// Claim a pending order.
    Claim {
        /// Order id.
        order: String,
    },
    /// Mark a shipped order delivered.
    Deliver {
        /// Order id.
        order: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
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
    /// Write a fruitpack.toml in the working directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the path of the config file in use.
    Path,
}
