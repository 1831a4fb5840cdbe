//! Interactive shopping session around an in-memory cart.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{bail, Context as _, Result};
use dialoguer::{Input, Select};
use fruitpack_commerce::cart::{CartChange, CartLine, CartStore};
use fruitpack_commerce::catalog::{Product, ProductFilter};
use fruitpack_commerce::checkout::CheckoutForm;

use super::catalog::print_products;
use super::checkout;
use crate::context::{Api, Context};

const MENU: [&str; 6] = [
    "Add a product",
    "Change a quantity",
    "Remove an item",
    "View cart",
    "Checkout",
    "Quit",
];

pub fn run(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("`fruitpack shop` is interactive; use `fruitpack checkout` for scripted orders");
    }

    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Loading products...");
    let result = api.products();
    spinner.finish_and_clear();
    let products = result.context("Failed to load products")?;
    if products.is_empty() {
        ctx.output.info("The shop has no products yet.");
        return Ok(());
    }

    let store = CartStore::new(ctx.currency());
    let badge = Rc::new(Cell::new(0u64));
    let subscription = {
        let badge = Rc::clone(&badge);
        store.subscribe(move |event, cart| {
            badge.set(cart.item_count());
            if let CartChange::Cleared { removed } = &event.change {
                tracing::debug!(removed, "cart cleared");
            }
        })
    };

    let outcome = session(&store, &products, &badge, &api, ctx);
    store.unsubscribe(subscription);
    outcome
}

fn session(
    store: &CartStore,
    products: &[Product],
    badge: &Cell<u64>,
    api: &Api,
    ctx: &Context,
) -> Result<()> {
    loop {
        let prompt = format!("Cart: {} item(s), {}", badge.get(), store.total().display());
        let choice = Select::new()
            .with_prompt(prompt)
            .items(&MENU[..])
            .default(0)
            .interact()?;

        match choice {
            0 => add_product(store, products, ctx)?,
            1 => change_quantity(store)?,
            2 => remove_item(store, ctx)?,
            3 => view_cart(store, ctx),
            4 => {
                if store.is_empty() {
                    ctx.output.warn("Your cart is empty.");
                    continue;
                }
                let form = checkout::complete_form(CheckoutForm::new(), ctx)?;
                match checkout::place(store, &form, api, ctx, false) {
                    Ok(placed) => {
                        checkout::report(&placed, ctx);
                        return Ok(());
                    }
                    Err(e) => ctx.output.error(&format!("{e:#}")),
                }
            }
            _ => return Ok(()),
        }
    }
}

fn add_product(store: &CartStore, products: &[Product], ctx: &Context) -> Result<()> {
    let search: String = Input::new()
        .with_prompt("Search (empty for all)")
        .allow_empty(true)
        .interact_text()?;
    let filter = ProductFilter::new().text(search);
    let matching: Vec<&Product> = filter.apply(products).collect();
    if matching.is_empty() {
        ctx.output.info("No products match.");
        return Ok(());
    }

    print_products(&matching, ctx);
    let labels: Vec<String> = matching
        .iter()
        .map(|p| format!("{} ({})", p.name, p.unit_price(ctx.currency()).display()))
        .collect();
    let picked = Select::new()
        .with_prompt("Add to cart")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    if let Some(product) = picked.and_then(|i| matching.get(i)) {
        let quantity = store.add_item(product.snapshot(ctx.currency()));
        ctx.output
            .success(&format!("{} in cart: {}", product.name, quantity));
    }
    Ok(())
}

fn pick_line(store: &CartStore, prompt: &str) -> Result<Option<CartLine>> {
    let lines = store.lines();
    if lines.is_empty() {
        return Ok(None);
    }
    let labels: Vec<String> = lines
        .iter()
        .map(|l| format!("{} \u{00d7} {}", l.name, l.quantity))
        .collect();
    let picked = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(picked.and_then(|i| lines.into_iter().nth(i)))
}

fn change_quantity(store: &CartStore) -> Result<()> {
    let Some(line) = pick_line(store, "Which item?")? else {
        return Ok(());
    };
    let action = Select::new()
        .with_prompt(format!("{} \u{00d7} {}", line.name, line.quantity))
        .items(&["+1", "-1", "Set quantity"][..])
        .default(0)
        .interact()?;

    match action {
        0 => {
            store.increment(&line.product_id);
        }
        1 => {
            // Stops at one; removal is explicit.
            store.decrement(&line.product_id);
        }
        _ => {
            let quantity: i64 = Input::new()
                .with_prompt("Quantity")
                .default(i64::from(line.quantity))
                .interact_text()?;
            store.update_quantity(&line.product_id, quantity);
        }
    }
    Ok(())
}

fn remove_item(store: &CartStore, ctx: &Context) -> Result<()> {
    if let Some(line) = pick_line(store, "Remove which item?")? {
        if store.remove_item(&line.product_id).is_some() {
            ctx.output.success(&format!("Removed {}", line.name));
        }
    }
    Ok(())
}

fn view_cart(store: &CartStore, ctx: &Context) {
    let pricing = store.pricing();
    if pricing.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    ctx.output.header("Cart");
    let widths = [28, 10, 5, 12];
    ctx.output
        .table_row(&["ITEM", "PRICE", "QTY", "SUBTOTAL"], &widths);
    for line in &pricing.lines {
        ctx.output.table_row(
            &[
                &line.name,
                &line.unit_price.display(),
                &line.quantity.to_string(),
                &line.subtotal.display(),
            ],
            &widths,
        );
    }
    ctx.output.table_row(
        &["Total", "", &pricing.item_count.to_string(), &pricing.total.display()],
        &widths,
    );
}
