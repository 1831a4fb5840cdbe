//! Catalog commands: products, product, categories.

use anyhow::{Context as _, Result};
use fruitpack_commerce::catalog::{Product, ProductFilter};
use fruitpack_commerce::ProductId;

use super::{ProductArgs, ProductsArgs};
use crate::context::Context;

pub fn products(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let spinner = ctx.output.spinner("Loading products...");
    let result = api.products();
    spinner.finish_and_clear();
    let products = result.context("Failed to load products")?;

    let mut filter = ProductFilter::new();
    if let Some(text) = args.search {
        filter = filter.text(text);
    }
    if let Some(category) = args.category {
        filter = filter.category(category);
    }
    let matching: Vec<&Product> = filter.apply(&products).collect();

    if ctx.output.is_json() {
        ctx.output.json(&matching);
        return Ok(());
    }
    if matching.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    print_products(&matching, ctx);
    ctx.output.info(&format!("{} product(s)", matching.len()));
    Ok(())
}

/// Product table shared with the shop session.
pub fn print_products(products: &[&Product], ctx: &Context) {
    let currency = ctx.currency();
    let widths = [8, 28, 10, 8];
    ctx.output.table_row(&["ID", "NAME", "PRICE", "OFF"], &widths);
    for product in products {
        let off = product
            .discount_percent()
            .map(|p| format!("{p:.0}%"))
            .unwrap_or_default();
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.unit_price(currency).display(),
                &off,
            ],
            &widths,
        );
    }
}

pub fn product(args: ProductArgs, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let id = ProductId::from(args.id.trim());
    let product = api
        .product(&id)
        .with_context(|| format!("Failed to load product {id}"))?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output
        .kv("price", &product.unit_price(ctx.currency()).display());
    if let Some(percent) = product.discount_percent() {
        ctx.output.kv("discount", &format!("{percent:.0}% off"));
    }
    if let Some(category) = &product.category_id {
        ctx.output.kv("category", category.as_str());
    }
    if let Some(supplier) = &product.supplier {
        ctx.output.kv("supplier", supplier);
    }
    if let Some(image) = product.image_ref() {
        ctx.output.kv("image", &api.image_url(image));
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        ctx.output.line("");
        ctx.output.line(description);
    }
    Ok(())
}

pub fn categories(ctx: &Context) -> Result<()> {
    let categories = ctx
        .api()?
        .categories()
        .context("Failed to load categories")?;

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }
    if categories.is_empty() {
        ctx.output.info("No categories found.");
        return Ok(());
    }

    let widths = [8, 24, 40];
    ctx.output.table_row(&["ID", "NAME", "DESCRIPTION"], &widths);
    for category in &categories {
        ctx.output.table_row(
            &[
                category.id.as_str(),
                &category.name,
                category.description.as_deref().unwrap_or(""),
            ],
            &widths,
        );
    }
    Ok(())
}
