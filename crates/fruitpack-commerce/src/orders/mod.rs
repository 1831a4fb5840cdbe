//! Orders module.
//!
//! Placed orders, the shopper-facing tracking timeline, and driver-side
//! availability and claims.

mod driver;
mod order;
mod tracking;

pub use driver::{Claim, DriverStatus, DriverStatusUpdate, LocationUpdate};
pub use order::{DeliveryStatus, Order, OrderItem, OrderStatusUpdate, PaymentStatus};
pub use tracking::{tracking_timeline, StageState, TrackingStage, TrackingStep};
