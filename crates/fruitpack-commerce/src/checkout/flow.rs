//! Order placement.
//!
//! Placing an order validates the form, submits the cart through an
//! [`OrderGateway`], confirms card payments through a [`PaymentSheet`], and
//! only then clears the cart. Any failure leaves the cart untouched so the
//! shopper can retry.

use serde::{Deserialize, Serialize};

use crate::cart::CartStore;
use crate::checkout::{
    CheckoutForm, CheckoutReceipt, CheckoutRequest, PaymentMethod, PaymentOutcome, PaymentSheet,
};
use crate::ids::OrderId;
use crate::money::Money;
use crate::CommerceError;

/// Where the payment provider sends the shopper after confirming.
pub const DEFAULT_RETURN_URL: &str = "fruitpack://orders";

/// Order-placement collaborator.
pub trait OrderGateway {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit a checkout request and return the backend's receipt.
    fn submit_order(&self, request: &CheckoutRequest) -> Result<CheckoutReceipt, Self::Error>;
}

impl<G: OrderGateway + ?Sized> OrderGateway for &G {
    type Error = G::Error;

    fn submit_order(&self, request: &CheckoutRequest) -> Result<CheckoutReceipt, Self::Error> {
        (**self).submit_order(request)
    }
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub payment_method: PaymentMethod,
    /// Cart total at submission time.
    pub total: Money,
    /// Number of cart lines submitted.
    pub lines: usize,
    /// Amount reported by the payment provider, for card payments.
    pub charged: Option<f64>,
}

/// Place an order for the current cart contents.
///
/// On success the cart is cleared exactly once. On any error, including a
/// declined or cancelled card payment after the order was created, the cart
/// is left as it was.
pub fn place_order<G, S>(
    store: &CartStore,
    form: &CheckoutForm,
    gateway: &G,
    sheet: &mut S,
    return_url: &str,
) -> Result<PlacedOrder, CommerceError>
where
    G: OrderGateway + ?Sized,
    S: PaymentSheet + ?Sized,
{
    let request = store.with(|cart| CheckoutRequest::from_cart(form, cart))?;
    let total = store.total();

    tracing::info!(
        lines = request.items.len(),
        total = %total,
        method = %request.payment_method,
        "submitting order"
    );

    let receipt = gateway
        .submit_order(&request)
        .map_err(CommerceError::gateway)?;

    if request.payment_method.requires_payment_sheet() {
        confirm_payment(&receipt, sheet, return_url)?;
    }

    store.clear();
    tracing::info!(order_id = %receipt.order_id, "order placed");

    Ok(PlacedOrder {
        order_id: receipt.order_id,
        payment_method: request.payment_method,
        total,
        lines: request.items.len(),
        charged: receipt.amount,
    })
}

fn confirm_payment<S>(
    receipt: &CheckoutReceipt,
    sheet: &mut S,
    return_url: &str,
) -> Result<(), CommerceError>
where
    S: PaymentSheet + ?Sized,
{
    let secret = receipt
        .client_secret()
        .ok_or_else(|| CommerceError::MissingClientSecret(receipt.order_id.to_string()))?;

    sheet.initialize(secret, return_url)?;

    match sheet.present() {
        PaymentOutcome::Completed => Ok(()),
        PaymentOutcome::Canceled => {
            tracing::warn!(order_id = %receipt.order_id, "payment canceled");
            Err(CommerceError::PaymentFailed("payment was canceled".to_string()))
        }
        PaymentOutcome::Failed(message) => {
            tracing::warn!(order_id = %receipt.order_id, %message, "payment failed");
            Err(CommerceError::PaymentFailed(message))
        }
    }
}
