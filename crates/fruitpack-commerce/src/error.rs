//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// The cart store itself never fails; these errors come from the checkout
/// boundary and from parsing backend data.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Checkout form is missing required fields.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Coordinates outside the valid latitude/longitude range.
    #[error("Invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Unknown payment method name.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Card payment requested but the backend returned no confirmation handle.
    #[error("Order {0} requires card payment but no client secret was returned")]
    MissingClientSecret(String),

    /// The payment sheet failed or was cancelled.
    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    /// The order-placement collaborator rejected or failed the submission.
    #[error("Order submission failed: {0}")]
    Gateway(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CommerceError {
    /// Wrap any collaborator error as a gateway failure.
    pub fn gateway<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CommerceError::Gateway(Box::new(err))
    }

    /// Check if the user needs to correct input before retrying.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CommerceError::EmptyCart
                | CommerceError::CheckoutIncomplete(_)
                | CommerceError::InvalidCoordinates { .. }
                | CommerceError::UnknownPaymentMethod(_)
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
