//! Checkout module.
//!
//! Contains the checkout form, payment methods, the request/response
//! payloads exchanged with the backend, and order placement.

mod flow;
mod form;
mod payload;
mod payment;

pub use flow::{place_order, OrderGateway, PlacedOrder, DEFAULT_RETURN_URL};
pub use form::{CheckoutForm, Coordinates};
pub use payload::{CheckoutItem, CheckoutReceipt, CheckoutRequest};
pub use payment::{PaymentMethod, PaymentOutcome, PaymentSheet};
