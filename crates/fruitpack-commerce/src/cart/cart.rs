//! Cart and cart line types.

use crate::cart::{CartPricing, LinePricing};
use crate::catalog::ProductSnapshot;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: u32 = 9999;

/// Smallest quantity a cart line can hold.
pub const MIN_QUANTITY: u32 = 1;

/// One product entry in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Product identifier.
    pub product_id: ProductId,
    /// Display name captured at add time.
    pub name: String,
    /// Unit price captured at add time.
    pub unit_price: Money,
    /// Image reference.
    pub image_ref: Option<String>,
    /// Quantity, always at least one.
    pub quantity: u32,
}

impl CartLine {
    fn from_snapshot(snapshot: ProductSnapshot) -> Self {
        Self {
            product_id: snapshot.product_id,
            name: snapshot.name,
            unit_price: snapshot.price,
            image_ref: snapshot.image_ref,
            quantity: MIN_QUANTITY,
        }
    }

    /// Line total (`unit_price * quantity`).
    pub fn line_total(&self) -> Money {
        self.unit_price.saturating_multiply(i64::from(self.quantity))
    }
}

/// The shopper's pending order.
///
/// Every operation is total: unknown product ids are ignored and quantities
/// are clamped into `MIN_QUANTITY..=MAX_QUANTITY_PER_LINE`. Removal is the
/// only way a line leaves the cart short of [`Cart::clear`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Lines in insertion order.
    lines: Vec<CartLine>,
    /// Cart currency.
    currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    /// Cart currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Add one unit of a product.
    ///
    /// Appends a new line with quantity 1 when the product is absent,
    /// otherwise increments the existing line. Returns the line's quantity
    /// afterwards.
    ///
    /// A snapshot priced in another currency is restated in the cart currency
    /// when its line is created, so line totals and the cart total agree.
    /// Repeated adds stop at [`MAX_QUANTITY_PER_LINE`].
    pub fn add_item(&mut self, mut snapshot: ProductSnapshot) -> u32 {
        if snapshot.price.currency != self.currency {
            tracing::warn!(
                product_id = %snapshot.product_id,
                expected = %self.currency,
                got = %snapshot.price.currency,
                "restating cart line in cart currency"
            );
            snapshot.price = snapshot.price.in_currency(self.currency);
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == snapshot.product_id)
        {
            existing.quantity = existing
                .quantity
                .saturating_add(1)
                .min(MAX_QUANTITY_PER_LINE);
            return existing.quantity;
        }

        let line = CartLine::from_snapshot(snapshot);
        let quantity = line.quantity;
        self.lines.push(line);
        quantity
    }

    /// Set a line's quantity.
    ///
    /// Values below one clamp to one, values above the per-line maximum clamp
    /// to the maximum. Returns the stored quantity, or `None` if the product
    /// is not in the cart.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Option<u32> {
        let line = self.lines.iter_mut().find(|l| &l.product_id == product_id)?;
        line.quantity = clamp_quantity(quantity);
        Some(line.quantity)
    }

    /// Increase a line's quantity by one.
    pub fn increment(&mut self, product_id: &ProductId) -> Option<u32> {
        let current = self.get(product_id)?.quantity;
        self.update_quantity(product_id, i64::from(current) + 1)
    }

    /// Decrease a line's quantity by one, never below one.
    pub fn decrement(&mut self, product_id: &ProductId) -> Option<u32> {
        let current = self.get(product_id)?.quantity;
        self.update_quantity(product_id, i64::from(current) - 1)
    }

    /// Remove a line. Returns the removed line, if it was present.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| &l.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Remove every line. Returns how many lines were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.lines.len();
        self.lines.clear();
        removed
    }

    /// Sum of `price * quantity` over all lines.
    ///
    /// Recomputed on every call.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(self.currency), |acc, line| {
                acc.saturating_add(&line.line_total())
            })
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Get a line by product ID.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Get number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Per-line pricing breakdown with the cart total.
    pub fn pricing(&self) -> CartPricing {
        let lines = self
            .lines
            .iter()
            .map(|line| LinePricing {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                unit_price: line.unit_price,
                quantity: line.quantity,
                subtotal: line.line_total(),
            })
            .collect();

        CartPricing {
            lines,
            item_count: self.item_count(),
            total: self.total(),
        }
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    quantity.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY_PER_LINE)) as u32
}
