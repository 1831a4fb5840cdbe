//! Order placement against scripted collaborators.

use std::cell::RefCell;

use fruitpack_commerce::checkout::DEFAULT_RETURN_URL;
use fruitpack_commerce::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("backend unavailable")]
struct Unavailable;

/// Gateway that records requests and replays a fixed receipt.
struct ScriptedGateway {
    receipt: Option<CheckoutReceipt>,
    submitted: RefCell<Vec<CheckoutRequest>>,
}

impl ScriptedGateway {
    fn accepting(order_id: u64, client_secret: Option<&str>) -> Self {
        Self {
            receipt: Some(CheckoutReceipt {
                order_id: OrderId::numeric(order_id),
                client_secret: client_secret.map(str::to_string),
                amount: Some(480.0),
            }),
            submitted: RefCell::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            receipt: None,
            submitted: RefCell::new(Vec::new()),
        }
    }
}

impl OrderGateway for ScriptedGateway {
    type Error = Unavailable;

    fn submit_order(&self, request: &CheckoutRequest) -> Result<CheckoutReceipt, Unavailable> {
        self.submitted.borrow_mut().push(request.clone());
        self.receipt.clone().ok_or(Unavailable)
    }
}

/// Payment sheet with a preset outcome.
struct ScriptedSheet {
    outcome: PaymentOutcome,
    initialized: Option<(String, String)>,
    presented: bool,
}

impl ScriptedSheet {
    fn new(outcome: PaymentOutcome) -> Self {
        Self {
            outcome,
            initialized: None,
            presented: false,
        }
    }
}

impl PaymentSheet for ScriptedSheet {
    fn initialize(&mut self, client_secret: &str, return_url: &str) -> Result<(), CommerceError> {
        self.initialized = Some((client_secret.to_string(), return_url.to_string()));
        Ok(())
    }

    fn present(&mut self) -> PaymentOutcome {
        self.presented = true;
        self.outcome.clone()
    }
}

fn stocked_store() -> CartStore {
    let store = CartStore::new(Currency::ZAR);
    let apple = ProductSnapshot::new("p1", "Apple", Money::new(120, Currency::ZAR));
    let banana = ProductSnapshot::new("p2", "Banana", Money::new(80, Currency::ZAR));
    store.add_item(apple.clone());
    store.add_item(apple);
    store.add_item(banana);
    store.update_quantity(&ProductId::new("p2"), 3);
    store
}

fn form(method: PaymentMethod) -> CheckoutForm {
    CheckoutForm::new()
        .full_name("Thandi Nkosi")
        .address("12 Long St, Cape Town")
        .phone("0821234567")
        .payment_method(method)
        .location(Coordinates::new(-33.9249, 18.4241).unwrap())
}

#[test]
fn card_checkout_confirms_payment_then_clears() {
    let store = stocked_store();
    let gateway = ScriptedGateway::accepting(42, Some("pi_42_secret"));
    let mut sheet = ScriptedSheet::new(PaymentOutcome::Completed);

    let placed = place_order(
        &store,
        &form(PaymentMethod::Card),
        &gateway,
        &mut sheet,
        DEFAULT_RETURN_URL,
    )
    .unwrap();

    assert_eq!(placed.order_id.as_str(), "42");
    assert_eq!(placed.total.display(), "R4.80");
    assert_eq!(placed.lines, 2);
    assert_eq!(
        sheet.initialized,
        Some(("pi_42_secret".to_string(), "fruitpack://orders".to_string()))
    );
    assert!(store.is_empty());

    let submitted = gateway.submitted.borrow();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].items[0].quantity, 2);
    assert_eq!(submitted[0].items[1].quantity, 3);
}

#[test]
fn cash_checkout_skips_payment_sheet() {
    let store = stocked_store();
    let gateway = ScriptedGateway::accepting(43, None);
    let mut sheet = ScriptedSheet::new(PaymentOutcome::Failed("should not run".into()));

    let placed = place_order(
        &store,
        &form(PaymentMethod::Cash),
        &gateway,
        &mut sheet,
        DEFAULT_RETURN_URL,
    )
    .unwrap();

    assert_eq!(placed.payment_method, PaymentMethod::Cash);
    assert!(!sheet.presented);
    assert!(store.is_empty());
}

#[test]
fn gateway_failure_keeps_cart() {
    let store = stocked_store();
    let before = store.snapshot();
    let mut sheet = ScriptedSheet::new(PaymentOutcome::Completed);

    let err = place_order(
        &store,
        &form(PaymentMethod::Card),
        &ScriptedGateway::failing(),
        &mut sheet,
        DEFAULT_RETURN_URL,
    )
    .unwrap_err();

    assert!(matches!(err, CommerceError::Gateway(_)));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn declined_or_canceled_payment_keeps_cart() {
    for outcome in [
        PaymentOutcome::Canceled,
        PaymentOutcome::Failed("card declined".into()),
    ] {
        let store = stocked_store();
        let gateway = ScriptedGateway::accepting(44, Some("pi_44_secret"));
        let mut sheet = ScriptedSheet::new(outcome);

        let err = place_order(
            &store,
            &form(PaymentMethod::Card),
            &gateway,
            &mut sheet,
            DEFAULT_RETURN_URL,
        )
        .unwrap_err();

        assert!(matches!(err, CommerceError::PaymentFailed(_)));
        assert_eq!(store.len(), 2);
        assert_eq!(store.total().display(), "R4.80");
    }
}

#[test]
fn card_receipt_without_secret_is_an_error() {
    let store = stocked_store();
    let gateway = ScriptedGateway::accepting(45, Some(""));
    let mut sheet = ScriptedSheet::new(PaymentOutcome::Completed);

    let err = place_order(
        &store,
        &form(PaymentMethod::Card),
        &gateway,
        &mut sheet,
        DEFAULT_RETURN_URL,
    )
    .unwrap_err();

    assert!(matches!(err, CommerceError::MissingClientSecret(id) if id == "45"));
    assert!(!sheet.presented);
    assert!(!store.is_empty());
}

#[test]
fn invalid_checkout_never_reaches_gateway() {
    let gateway = ScriptedGateway::accepting(46, None);
    let mut sheet = ScriptedSheet::new(PaymentOutcome::Completed);

    let empty = CartStore::new(Currency::ZAR);
    let err = place_order(
        &empty,
        &form(PaymentMethod::Cash),
        &gateway,
        &mut sheet,
        DEFAULT_RETURN_URL,
    )
    .unwrap_err();
    assert!(matches!(err, CommerceError::EmptyCart));

    let store = stocked_store();
    let err = place_order(
        &store,
        &CheckoutForm::new().full_name("Thandi"),
        &gateway,
        &mut sheet,
        DEFAULT_RETURN_URL,
    )
    .unwrap_err();
    assert!(err.is_user_error());

    assert!(gateway.submitted.borrow().is_empty());
    assert_eq!(store.len(), 2);
}
