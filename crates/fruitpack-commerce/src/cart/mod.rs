//! Shopping cart module.
//!
//! [`Cart`] is the plain value with the cart operations; [`CartStore`] is
//! the shared handle screens hold, which adds change notification.

mod cart;
mod pricing;
mod store;

pub use cart::{Cart, CartLine, MAX_QUANTITY_PER_LINE, MIN_QUANTITY};
pub use pricing::{CartPricing, LinePricing};
pub use store::{CartChange, CartEvent, CartStore, Subscription};
