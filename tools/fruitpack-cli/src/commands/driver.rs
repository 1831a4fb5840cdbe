//! Driver console: availability, location, and order work.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use fruitpack_commerce::checkout::Coordinates;
use fruitpack_commerce::orders::{DriverStatus, Order};
use fruitpack_commerce::OrderId;
use serde::{Deserialize, Serialize};

use super::orders::print_order_table;
use super::{DriverArgs, DriverCommand};
use crate::context::Context;
use crate::output::{format_timestamp, status_badge};

/// Last status this machine set, kept beside the token.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DriverState {
    #[serde(default)]
    status: DriverStatus,
}

impl DriverState {
    fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Resolve the requested status against the last known one.
fn next_status(requested: &str, current: DriverStatus) -> Result<DriverStatus> {
    if requested.trim().eq_ignore_ascii_case("toggle") {
        return Ok(current.toggled());
    }
    Ok(requested.parse()?)
}

/// Run the driver command.
pub fn run(args: DriverArgs, ctx: &Context) -> Result<()> {
    match args.command {
        DriverCommand::Status { status } => status_command(status, ctx),
        DriverCommand::Location { lat, lon } => share_location(lat, lon, ctx),
        DriverCommand::Available => {
            let orders = ctx.api()?.available_orders();
            show_orders("Available orders", orders.context("Failed to load orders")?, ctx)
        }
        DriverCommand::Assigned => {
            let driver = ctx.driver_id()?;
            let orders = ctx.api()?.driver_orders(&driver);
            show_orders("Assigned to you", orders.context("Failed to load orders")?, ctx)
        }
        DriverCommand::Deliveries => {
            let driver = ctx.driver_id()?;
            let orders = ctx.api()?.delivered_orders(&driver);
            show_orders("Delivered", orders.context("Failed to load orders")?, ctx)
        }
        DriverCommand::Claims => claims(ctx),
        DriverCommand::Claim { order } => claim(&order, ctx),
        DriverCommand::Deliver { order, yes } => deliver(&order, yes, ctx),
    }
}

fn status_command(requested: Option<String>, ctx: &Context) -> Result<()> {
    let state_path = ctx.driver_state_path()?;
    let mut state = DriverState::load(&state_path)?;

    let Some(requested) = requested else {
        if ctx.output.is_json() {
            ctx.output.json(&state);
        } else {
            ctx.output.kv("status", &status_badge(state.status.as_str()));
        }
        return Ok(());
    };

    let driver = ctx.driver_id()?;
    let status = next_status(&requested, state.status)?;
    ctx.api()?
        .set_driver_status(&driver, status)
        .context("Failed to update status")?;
    state.status = status;
    state.save(&state_path)?;

    if ctx.output.is_json() {
        ctx.output.json(&state);
    } else {
        ctx.output
            .success(&format!("You are now {}", status.display_name().to_lowercase()));
    }
    Ok(())
}

fn share_location(lat: f64, lon: f64, ctx: &Context) -> Result<()> {
    let driver = ctx.driver_id()?;
    let location = Coordinates::new(lat, lon)?;
    ctx.api()?
        .share_location(&driver, location)
        .context("Failed to share location")?;

    if ctx.output.is_json() {
        ctx.output.json(&location);
    } else {
        ctx.output.success(&format!("Location shared: {location}"));
    }
    Ok(())
}

fn show_orders(title: &str, orders: Vec<Order>, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }
    if orders.is_empty() {
        ctx.output.info("No orders.");
        return Ok(());
    }

    ctx.output.header(title);
    print_order_table(&orders, ctx);
    for order in &orders {
        if let Some(address) = &order.destination_address {
            ctx.output.kv(&format!("#{}", order.id), address);
        }
    }
    Ok(())
}

fn claims(ctx: &Context) -> Result<()> {
    let driver = ctx.driver_id()?;
    let claims = ctx
        .api()?
        .driver_claims(&driver)
        .context("Failed to load claims")?;

    if ctx.output.is_json() {
        ctx.output.json(&claims);
        return Ok(());
    }
    if claims.is_empty() {
        ctx.output.info("No claims yet.");
        return Ok(());
    }

    let widths = [8, 8, 12, 18];
    ctx.output
        .table_row(&["CLAIM", "ORDER", "STATUS", "CREATED"], &widths);
    for claim in &claims {
        let status = claim.status.as_deref().unwrap_or("-");
        let created = claim
            .created
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                claim.id.as_str(),
                claim.order_id.as_str(),
                &status_badge(status),
                &created,
            ],
            &widths,
        );
    }
    Ok(())
}

fn claim(order: &str, ctx: &Context) -> Result<()> {
    let driver = ctx.driver_id()?;
    let order_id = OrderId::from(order.trim());
    ctx.api()?
        .claim_order(&order_id, &driver)
        .with_context(|| format!("Could not claim order {order_id}"))?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "order_id": order_id, "claimed": true }));
    } else {
        ctx.output.success(&format!("Order #{order_id} claimed"));
    }
    Ok(())
}

fn deliver(order: &str, yes: bool, ctx: &Context) -> Result<()> {
    let order_id = OrderId::from(order.trim());

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Mark order #{order_id} as delivered?"))
            .default(false)
            .interact()?;
        if !confirmed {
            bail!("Cancelled");
        }
    }

    ctx.api()?
        .mark_delivered(&order_id)
        .with_context(|| format!("Could not mark order {order_id} delivered"))?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "order_id": order_id, "delivered": true }));
    } else {
        ctx.output
            .success(&format!("Order #{order_id} marked delivered"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_status() {
        assert_eq!(
            next_status("toggle", DriverStatus::Offline).unwrap(),
            DriverStatus::Available
        );
        assert_eq!(
            next_status("TOGGLE", DriverStatus::Busy).unwrap(),
            DriverStatus::Offline
        );
        assert_eq!(
            next_status("busy", DriverStatus::Offline).unwrap(),
            DriverStatus::Busy
        );
        assert!(next_status("asleep", DriverStatus::Offline).is_err());
    }

    #[test]
    fn test_state_roundtrip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("driver.json");
        assert_eq!(DriverState::load(&path).unwrap().status, DriverStatus::Offline);

        DriverState {
            status: DriverStatus::Available,
        }
        .save(&path)
        .unwrap();
        assert_eq!(DriverState::load(&path).unwrap().status, DriverStatus::Available);
    }
}
