//! Checkout: one-shot command, the shared placement step, and the
//! terminal payment sheet.

use anyhow::{anyhow, bail, Context as _, Result};
use dialoguer::{Confirm, Input, Select};
use fruitpack_commerce::cart::{CartStore, MAX_QUANTITY_PER_LINE};
use fruitpack_commerce::catalog::Product;
use fruitpack_commerce::checkout::{
    place_order, CheckoutForm, Coordinates, PaymentMethod, PaymentOutcome, PaymentSheet,
    PlacedOrder,
};
use fruitpack_commerce::{CommerceError, ProductId};

use super::CheckoutArgs;
use crate::context::{Api, Context};
use crate::output::Output;

/// Shows the payment-confirmation handle and asks the operator whether the
/// card payment went through.
pub struct TerminalPaymentSheet<'a> {
    output: &'a Output,
    client_secret: Option<String>,
    return_url: String,
}

impl<'a> TerminalPaymentSheet<'a> {
    pub fn new(output: &'a Output) -> Self {
        Self {
            output,
            client_secret: None,
            return_url: String::new(),
        }
    }
}

impl PaymentSheet for TerminalPaymentSheet<'_> {
    fn initialize(&mut self, client_secret: &str, return_url: &str) -> Result<(), CommerceError> {
        if client_secret.trim().is_empty() {
            return Err(CommerceError::PaymentFailed(
                "empty payment handle".to_string(),
            ));
        }
        self.client_secret = Some(client_secret.to_string());
        self.return_url = return_url.to_string();
        Ok(())
    }

    fn present(&mut self) -> PaymentOutcome {
        let Some(secret) = &self.client_secret else {
            return PaymentOutcome::Failed("payment sheet not initialized".to_string());
        };

        self.output.header("Card payment");
        self.output.kv("payment handle", secret);
        self.output.kv("return url", &self.return_url);

        match Confirm::new()
            .with_prompt("Has the card payment been completed?")
            .default(false)
            .interact()
        {
            Ok(true) => PaymentOutcome::Completed,
            Ok(false) => PaymentOutcome::Canceled,
            Err(e) => PaymentOutcome::Failed(e.to_string()),
        }
    }
}

/// Parse `<product id>[:<quantity>]`.
pub fn parse_item(raw: &str) -> Result<(ProductId, u32)> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, qty)) => {
            let qty: u32 = qty
                .trim()
                .parse()
                .with_context(|| format!("Invalid quantity in '{raw}'"))?;
            (id, qty)
        }
        None => (raw, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        bail!("Missing product id in '{raw}'");
    }
    if quantity == 0 {
        bail!("Quantity must be at least 1 in '{raw}'");
    }
    check_quantity(id, quantity)?;
    Ok((ProductId::from(id), quantity))
}

/// Reject quantities the cart would silently cap.
fn check_quantity(id: &str, quantity: u32) -> Result<()> {
    if quantity > MAX_QUANTITY_PER_LINE {
        bail!("Quantity {quantity} for product {id} exceeds the maximum of {MAX_QUANTITY_PER_LINE} per line");
    }
    Ok(())
}

/// Merge repeated ids, keeping first-seen order.
fn merge_items(items: Vec<(ProductId, u32)>) -> Vec<(ProductId, u32)> {
    let mut merged: Vec<(ProductId, u32)> = Vec::new();
    for (id, qty) in items {
        match merged.iter_mut().find(|(seen, _)| *seen == id) {
            Some((_, total)) => *total = total.saturating_add(qty),
            None => merged.push((id, qty)),
        }
    }
    merged
}

pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let items = args
        .items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<Result<Vec<_>>>()?;

    let api = ctx.api()?;
    api.token().context("Log in before checking out")?;

    let products = api.products().context("Failed to load products")?;
    let store = CartStore::new(ctx.currency());
    for (id, quantity) in merge_items(items) {
        check_quantity(id.as_str(), quantity)?;
        let product = find_product(&products, &id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        store.add_item(product.snapshot(ctx.currency()));
        store.update_quantity(&id, i64::from(quantity));
    }

    let mut form = CheckoutForm::new();
    if let Some(name) = args.name {
        form = form.full_name(name);
    }
    if let Some(address) = args.address {
        form = form.address(address);
    }
    if let Some(phone) = args.phone {
        form = form.phone(phone);
    }
    if let Some(payment) = args.payment {
        form = form.payment_method(payment.parse()?);
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        form = form.location(Coordinates::new(lat, lon)?);
    }
    let form = complete_form(form, ctx)?;

    let placed = place(&store, &form, &api, ctx, args.yes)?;
    report(&placed, ctx);
    Ok(())
}

/// Prompt for whatever the form is still missing.
pub fn complete_form(mut form: CheckoutForm, ctx: &Context) -> Result<CheckoutForm> {
    if form.is_complete() {
        return Ok(form);
    }
    if ctx.output.is_json() {
        form.validate()?;
    }

    if form.full_name.trim().is_empty() {
        form.full_name = Input::new().with_prompt("Full name").interact_text()?;
    }
    if form.address.trim().is_empty() {
        form.address = Input::new().with_prompt("Delivery address").interact_text()?;
    }
    if form.phone.trim().is_empty() {
        form.phone = Input::new().with_prompt("Phone").interact_text()?;
    }
    if form.payment_method.is_none() {
        let labels: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.display_name()).collect();
        let choice = Select::new()
            .with_prompt("Payment method")
            .items(&labels)
            .default(0)
            .interact()?;
        form.payment_method = PaymentMethod::ALL.get(choice).copied();
    }
    if form.location.is_none() {
        let latitude: f64 = Input::new().with_prompt("Latitude").interact_text()?;
        let longitude: f64 = Input::new().with_prompt("Longitude").interact_text()?;
        form.location = Some(Coordinates::new(latitude, longitude)?);
    }

    form.validate()?;
    Ok(form)
}

/// Show the summary, confirm, and place the order for the store's cart.
pub fn place(
    store: &CartStore,
    form: &CheckoutForm,
    api: &Api,
    ctx: &Context,
    assume_yes: bool,
) -> Result<PlacedOrder> {
    let pricing = store.pricing();
    if pricing.is_empty() {
        return Err(CommerceError::EmptyCart.into());
    }
    let method = form
        .payment_method
        .ok_or_else(|| anyhow!("No payment method selected"))?;

    ctx.output.header("Order summary");
    for line in &pricing.lines {
        ctx.output
            .table_row(&[&line.label(), &line.subtotal.display()], &[32, 12]);
    }
    ctx.output
        .table_row(&["Total", &pricing.total.display()], &[32, 12]);
    ctx.output.kv("deliver to", &form.address);
    ctx.output.kv("payment", method.display_name());

    if !assume_yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;
        if !confirmed {
            bail!("Checkout cancelled");
        }
    }

    let mut sheet = TerminalPaymentSheet::new(&ctx.output);
    let placed = place_order(
        store,
        form,
        api,
        &mut sheet,
        &ctx.config.checkout.return_url,
    )
    .context("Checkout failed")?;
    Ok(placed)
}

pub fn report(placed: &PlacedOrder, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(placed);
        return;
    }
    ctx.output.success(&format!(
        "Order #{} placed ({}, {})",
        placed.order_id,
        placed.total.display(),
        placed.payment_method.display_name()
    ));
    if placed.payment_method == PaymentMethod::Cash {
        ctx.output.info("Pay the driver on delivery.");
    }
    ctx.output.info(&format!(
        "Track it with `fruitpack orders show {}`",
        placed.order_id
    ));
}

/// Look up a product by id in an already loaded list.
pub fn find_product<'a>(products: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    products.iter().find(|p| &p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        let (id, qty) = parse_item("12:3").unwrap();
        assert_eq!(id.as_str(), "12");
        assert_eq!(qty, 3);

        let (id, qty) = parse_item(" mango ").unwrap();
        assert_eq!(id.as_str(), "mango");
        assert_eq!(qty, 1);

        assert!(parse_item("12:0").is_err());
        assert!(parse_item("12:x").is_err());
        assert!(parse_item(":2").is_err());
    }

    #[test]
    fn test_quantity_above_line_maximum_is_rejected() {
        let at_max = format!("7:{MAX_QUANTITY_PER_LINE}");
        assert_eq!(parse_item(&at_max).unwrap().1, MAX_QUANTITY_PER_LINE);
        assert!(parse_item("7:20000").is_err());

        let merged = merge_items(vec![
            (ProductId::from("7"), MAX_QUANTITY_PER_LINE),
            (ProductId::from("7"), 1),
        ]);
        assert!(check_quantity(merged[0].0.as_str(), merged[0].1).is_err());
    }

    #[test]
    fn test_merge_items() {
        let merged = merge_items(vec![
            (ProductId::from("1"), 2),
            (ProductId::from("2"), 1),
            (ProductId::from("1"), 3),
        ]);
        assert_eq!(
            merged,
            vec![(ProductId::from("1"), 5), (ProductId::from("2"), 1)]
        );
    }

    #[test]
    fn test_sheet_requires_initialize() {
        let output = Output::new(false, true);
        let mut sheet = TerminalPaymentSheet::new(&output);
        assert!(matches!(sheet.present(), PaymentOutcome::Failed(_)));
        assert!(sheet.initialize("  ", "fruitpack://orders").is_err());
    }
}
