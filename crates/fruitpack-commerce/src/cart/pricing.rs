//! Cart pricing summaries.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart, as shown on the checkout summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Per-line breakdown in cart order.
    pub lines: Vec<LinePricing>,
    /// Sum of quantities.
    pub item_count: u64,
    /// Grand total.
    pub total: Money,
}

impl CartPricing {
    /// Check if there is nothing to pay for.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Pricing for a single cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: u32,
    /// Subtotal (unit_price * quantity).
    pub subtotal: Money,
}

impl LinePricing {
    /// Summary label such as `Apple × 2`.
    pub fn label(&self) -> String {
        format!("{} \u{00d7} {}", self.name, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_line_label() {
        let line = LinePricing {
            product_id: ProductId::new("p1"),
            name: "Apple".to_string(),
            unit_price: Money::new(120, Currency::ZAR),
            quantity: 2,
            subtotal: Money::new(240, Currency::ZAR),
        };
        assert_eq!(line.label(), "Apple \u{00d7} 2");
    }
}
