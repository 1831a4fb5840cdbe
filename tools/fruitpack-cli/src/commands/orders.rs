//! Shopper order commands.

use anyhow::{bail, Context as _, Result};
use console::style;
use dialoguer::Confirm;
use fruitpack_commerce::orders::{tracking_timeline, Order, StageState};
use fruitpack_commerce::OrderId;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{format_timestamp, status_badge};

/// Run the orders command.
pub fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(OrdersCommand::List) | None => list_orders(ctx),
        Some(OrdersCommand::Show { id }) => show_order(&id, ctx),
        Some(OrdersCommand::Confirm { id, yes }) => confirm_delivery(&id, yes, ctx),
    }
}

fn list_orders(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Loading orders...");
    let result = api.my_orders();
    spinner.finish_and_clear();
    let mut orders = result.context("Failed to load orders")?;

    // Newest first; ISO timestamps sort lexically.
    orders.sort_by(|a, b| b.created.cmp(&a.created));

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }
    if orders.is_empty() {
        ctx.output.info("You have no orders yet.");
        return Ok(());
    }

    ctx.output.header("Your orders");
    print_order_table(&orders, ctx);
    ctx.output.info(&format!("Total: {} order(s)", orders.len()));
    Ok(())
}

/// Order table shared with the driver views.
pub fn print_order_table(orders: &[Order], ctx: &Context) {
    let widths = [8, 18, 12, 12, 10, 6];
    ctx.output.table_row(
        &["ORDER", "CREATED", "DELIVERY", "PAYMENT", "TOTAL", "ITEMS"],
        &widths,
    );
    for order in orders {
        let created = order
            .created
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                order.id.as_str(),
                &created,
                &status_badge(order.delivery_status.as_str()),
                &status_badge(order.payment_status.as_str()),
                &order.total_money(ctx.currency()).display(),
                &order.item_count().to_string(),
            ],
            &widths,
        );
    }
}

fn show_order(id: &str, ctx: &Context) -> Result<()> {
    let id = OrderId::from(id.trim());
    let order = ctx
        .api()?
        .order(&id)
        .with_context(|| format!("Failed to load order {id}"))?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "order": order,
            "timeline": tracking_timeline(&order.delivery_status),
        }));
        return Ok(());
    }

    print_order(&order, ctx);

    ctx.output.header("Tracking");
    for step in tracking_timeline(&order.delivery_status) {
        let (marker, label) = match step.state {
            StageState::Done => (style("●").green(), style(step.stage.label()).green()),
            StageState::Current => (style("◉").cyan(), style(step.stage.label()).cyan().bold()),
            StageState::Upcoming => (style("○").dim(), style(step.stage.label()).dim()),
        };
        ctx.output
            .line(&format!("  {marker} {label}  {}", style(step.stage.description()).dim()));
    }

    if order.can_confirm_delivery() {
        ctx.output.info("");
        ctx.output.info(&format!(
            "Received it? Run `fruitpack orders confirm {}`",
            order.id
        ));
    }
    Ok(())
}

/// Order header, customer details, and line items.
pub fn print_order(order: &Order, ctx: &Context) {
    let currency = ctx.currency();
    ctx.output.header(&format!("Order #{}", order.id));
    if let Some(created) = &order.created {
        ctx.output.kv("placed", &format_timestamp(created));
    }
    ctx.output
        .kv("delivery", &status_badge(order.delivery_status.display_name()));
    ctx.output
        .kv("payment", &status_badge(order.payment_status.as_str()));
    if let Some(method) = order.method() {
        ctx.output.kv("method", method.display_name());
    }
    if let Some(name) = &order.customer_name {
        ctx.output.kv("customer", name);
    }
    if let Some(phone) = &order.customer_phone {
        ctx.output.kv("phone", phone);
    }
    if let Some(address) = &order.destination_address {
        ctx.output.kv("address", address);
    }

    if !order.items.is_empty() {
        ctx.output.header("Items");
        let widths = [28, 5, 12];
        for item in &order.items {
            ctx.output.table_row(
                &[
                    &item.name,
                    &format!("\u{00d7}{}", item.quantity),
                    &item.line_total(currency).display(),
                ],
                &widths,
            );
        }
    }
    ctx.output.kv("total", &order.total_money(currency).display());
}

fn confirm_delivery(id: &str, yes: bool, ctx: &Context) -> Result<()> {
    let id = OrderId::from(id.trim());

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Confirm you received order #{id}?"))
            .default(true)
            .interact()?;
        if !confirmed {
            bail!("Confirmation cancelled");
        }
    }

    ctx.api()?
        .confirm_delivery(&id)
        .with_context(|| format!("Could not confirm delivery of order {id}"))?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "order_id": id, "confirmed": true }));
    } else {
        ctx.output.success(&format!("Delivery of order #{id} confirmed"));
    }
    Ok(())
}
