//! Storefront domain types and logic for Fruit-Pack.
//!
//! - **Catalog**: products, categories, client-side filtering
//! - **Cart**: the shared cart store and its pricing
//! - **Checkout**: checkout form, payloads, order placement
//! - **Orders**: placed orders, tracking, driver workflows
//!
//! # Example
//!
//! ```rust
//! use fruitpack_commerce::prelude::*;
//!
//! let store = CartStore::new(Currency::ZAR);
//! let apple = Product::new("p1", "Apple", 1.20);
//!
//! store.add_item(apple.snapshot(Currency::ZAR));
//! store.add_item(apple.snapshot(Currency::ZAR));
//!
//! assert_eq!(store.total().display(), "R2.40");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Category, Product, ProductFilter, ProductSnapshot};

    // Cart
    pub use crate::cart::{
        Cart, CartChange, CartEvent, CartLine, CartPricing, CartStore, LinePricing, Subscription,
    };

    // Checkout
    pub use crate::checkout::{
        place_order, CheckoutForm, CheckoutItem, CheckoutReceipt, CheckoutRequest, Coordinates,
        OrderGateway, PaymentMethod, PaymentOutcome, PaymentSheet, PlacedOrder,
    };

    // Orders
    pub use crate::orders::{
        tracking_timeline, Claim, DeliveryStatus, DriverStatus, Order, OrderItem, PaymentStatus,
        StageState, TrackingStage,
    };
}
