//! FruitPackApi against a scripted in-memory transport.

use fruitpack_auth::{AccessToken, MemoryTokenStore, SignupRequest, TokenStore};
use fruitpack_commerce::prelude::*;
use fruitpack_data::{
    ApiError, BackoffStrategy, FetchClient, FetchError, FruitPackApi, Method, Request, Response,
    RetryPolicy, Transport,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Token for user 7 that expires in 2100.
const USER_7_TOKEN: &str =
    "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiI3IiwiZXhwIjo0MTAyNDQ0ODAwfQ.sig";

/// Answers by `"METHOD /path"`; unknown routes get a 404.
#[derive(Clone, Default)]
struct Backend {
    routes: Rc<RefCell<HashMap<String, Response>>>,
    seen: Rc<RefCell<Vec<Request>>>,
}

impl Backend {
    fn route(self, key: &str, status: u16, body: &str) -> Self {
        self.routes
            .borrow_mut()
            .insert(key.to_string(), Response::json_body(status, body));
        self
    }

    fn requests(&self) -> Vec<Request> {
        self.seen.borrow().clone()
    }

    fn last(&self) -> Request {
        self.seen.borrow().last().cloned().unwrap()
    }
}

impl Transport for Backend {
    fn execute(&self, request: &Request) -> Result<Response, FetchError> {
        self.seen.borrow_mut().push(request.clone());
        let path = request.url.trim_start_matches("http://api.test");
        let key = format!("{} {}", request.method, path);
        Ok(self
            .routes
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Response::json_body(404, r#"{"detail":"Not Found"}"#)))
    }
}

fn api(backend: &Backend, tokens: MemoryTokenStore) -> FruitPackApi<MemoryTokenStore> {
    let client = FetchClient::with_transport(backend.clone())
        .with_base_url("http://api.test")
        .with_retry(RetryPolicy::new(1).with_backoff(BackoffStrategy::None));
    FruitPackApi::new(client, tokens)
}

fn logged_in(backend: &Backend) -> FruitPackApi<MemoryTokenStore> {
    api(backend, MemoryTokenStore::with_token(AccessToken::new(USER_7_TOKEN)))
}

fn order_json(id: u64, status: &str) -> String {
    format!(
        r#"{{"id": {id}, "total": "37.50", "delivery_status": "{status}",
            "payment_status": "paid", "payment_method": "cash",
            "items": [{{"product_id": 3, "name": "Mango", "quantity": 3, "price": 12.5}}]}}"#
    )
}

#[test]
fn login_posts_form_and_stores_token() {
    let backend = Backend::default().route(
        "POST /auth/token",
        200,
        &format!(r#"{{"access_token": "{USER_7_TOKEN}", "token_type": "bearer"}}"#),
    );
    let api = api(&backend, MemoryTokenStore::new());

    let token = api.login("Thandi@Example.com", "s3cret").unwrap();
    assert_eq!(token.as_str(), USER_7_TOKEN);
    assert_eq!(api.tokens().load().unwrap(), Some(token));
    assert_eq!(api.current_user_id().unwrap().as_str(), "7");

    let req = backend.last();
    assert_eq!(req.method, Method::Post);
    assert_eq!(
        req.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    let body = req.body_text().unwrap();
    assert!(body.contains("grant_type=password"));
    assert!(body.contains("password=s3cret"));
}

#[test]
fn login_without_token_in_response_fails() {
    let backend = Backend::default().route("POST /auth/token", 200, r#"{"token_type": "bearer"}"#);
    let api = api(&backend, MemoryTokenStore::new());

    let err = api.login("a@b.co", "pw").unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(api.tokens().load().unwrap(), None);
}

#[test]
fn bad_credentials_surface_detail() {
    let backend = Backend::default().route(
        "POST /auth/token",
        401,
        r#"{"detail": "Incorrect username or password"}"#,
    );
    let api = api(&backend, MemoryTokenStore::new());

    let err = api.login("a@b.co", "nope").unwrap_err();
    assert_eq!(err.to_string(), "Incorrect username or password");
    assert!(err.is_auth_failure());
}

#[test]
fn signup_sends_json() {
    let backend = Backend::default().route(
        "POST /auth/signup",
        200,
        &format!(r#"{{"access_token": "{USER_7_TOKEN}"}}"#),
    );
    let api = api(&backend, MemoryTokenStore::new());

    api.signup(&SignupRequest::new("new@fruit.pk", "pw")).unwrap();
    let body: serde_json::Value = serde_json::from_str(backend.last().body_text().unwrap()).unwrap();
    assert_eq!(body["email"], "new@fruit.pk");
    assert!(api.tokens().load().unwrap().is_some());
}

#[test]
fn authenticated_call_without_token_sends_nothing() {
    let backend = Backend::default();
    let api = api(&backend, MemoryTokenStore::new());

    assert!(matches!(api.my_orders(), Err(ApiError::NotAuthenticated)));
    assert!(matches!(
        api.driver_claims(&DriverId::from(4u64)),
        Err(ApiError::NotAuthenticated)
    ));
    assert!(backend.requests().is_empty());
}

#[test]
fn catalog_reads_without_login() {
    let backend = Backend::default()
        .route(
            "GET /products/",
            200,
            r#"[{"id": 1, "name": "Apple", "price": 1.2, "image": "apple.png"},
                {"id": "2", "name": "Pear", "price": "2.00", "discount": 0.1}]"#,
        )
        .route("GET /categories/", 200, r#"[{"id": 1, "name": "Citrus"}]"#);
    let api = api(&backend, MemoryTokenStore::new());

    let products = api.products().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].discount_percent(), Some(10.0));
    assert_eq!(backend.last().header("Authorization"), None);

    let image = products[0].image_ref().unwrap();
    assert_eq!(api.image_url(image), "http://api.test/products/images/apple.png");
    assert_eq!(api.image_url("https://cdn.test/a.png"), "https://cdn.test/a.png");

    assert_eq!(api.categories().unwrap()[0].name, "Citrus");
}

#[test]
fn my_orders_uses_token_subject() {
    let backend = Backend::default().route(
        "GET /orders/user/7/orders",
        200,
        &format!("[{}]", order_json(17, "shipped")),
    );
    let api = logged_in(&backend);

    let orders = api.my_orders().unwrap();
    assert_eq!(orders[0].id.as_str(), "17");
    assert_eq!(orders[0].delivery_status, DeliveryStatus::Shipped);
    assert_eq!(
        backend.last().header("authorization"),
        Some(format!("Bearer {USER_7_TOKEN}").as_str())
    );
}

#[test]
fn confirm_delivery_only_when_delivered() {
    let backend = Backend::default()
        .route("GET /orders/17", 200, &order_json(17, "shipped"))
        .route("GET /orders/18", 200, &order_json(18, "delivered"))
        .route("POST /orders/18/confirm-delivery", 200, "{}");
    let api = logged_in(&backend);

    let err = api.confirm_delivery(&OrderId::from(17u64)).unwrap_err();
    assert!(matches!(err, ApiError::NotAllowed { .. }));
    assert_eq!(backend.requests().len(), 1);

    api.confirm_delivery(&OrderId::from(18u64)).unwrap();
    assert_eq!(backend.last().url, "http://api.test/orders/18/confirm-delivery");
}

#[test]
fn driver_claim_and_deliver_are_gated() {
    let backend = Backend::default()
        .route("GET /orders/5", 200, &order_json(5, "pending"))
        .route("POST /claims/claim/order/5/driver/4", 200, r#"{"id": 1, "order_id": 5}"#)
        .route("GET /orders/6", 200, &order_json(6, "shipped"))
        .route("PUT /orders/6/status", 200, "{}");
    let api = logged_in(&backend);
    let driver = DriverId::from(4u64);

    api.claim_order(&OrderId::from(5u64), &driver).unwrap();
    assert!(matches!(
        api.claim_order(&OrderId::from(6u64), &driver),
        Err(ApiError::NotAllowed { .. })
    ));

    api.mark_delivered(&OrderId::from(6u64)).unwrap();
    assert_eq!(backend.last().body_text(), Some(r#"{"status":"delivered"}"#));
    assert!(matches!(
        api.mark_delivered(&OrderId::from(5u64)),
        Err(ApiError::NotAllowed { .. })
    ));
}

#[test]
fn driver_status_and_location() {
    let backend = Backend::default()
        .route("PATCH /drivers/4/status", 200, r#"{"id": 4, "status": "available"}"#)
        .route("POST /drivers/driver/4/location", 200, "{}");
    let api = logged_in(&backend);
    let driver = DriverId::from(4u64);

    api.set_driver_status(&driver, DriverStatus::Available).unwrap();
    assert_eq!(backend.last().body_text(), Some(r#"{"status":"available"}"#));

    api.share_location(&driver, Coordinates::new(-33.9249, 18.4241).unwrap())
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(backend.last().body_text().unwrap()).unwrap();
    assert_eq!(body["latitude"], -33.9249);
}

#[test]
fn checkout_is_not_retried() {
    let backend = Backend::default().route("POST /cart/checkout/", 503, r#"{"detail": "busy"}"#);
    let api = logged_in(&backend);

    let store = CartStore::new(Currency::ZAR);
    store.add_item(Product::new(3u64, "Mango", 12.5).snapshot(Currency::ZAR));
    let form = CheckoutForm::new()
        .full_name("Thandi M")
        .address("12 Long St")
        .phone("0821234567")
        .payment_method(PaymentMethod::Cash)
        .location(Coordinates::new(-33.9, 18.4).unwrap());
    let request = store
        .with(|cart| CheckoutRequest::from_cart(&form, cart))
        .unwrap();

    let err = api.checkout(&request).unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(backend.requests().len(), 1);
}

struct NoSheet;

impl PaymentSheet for NoSheet {
    fn initialize(&mut self, _: &str, _: &str) -> Result<(), CommerceError> {
        panic!("cash orders never open the payment sheet")
    }

    fn present(&mut self) -> PaymentOutcome {
        PaymentOutcome::Failed("unreachable".into())
    }
}

#[test]
fn place_cash_order_through_api() {
    let backend = Backend::default().route(
        "POST /cart/checkout/",
        200,
        r#"{"order_id": 91, "client_secret": null}"#,
    );
    let api = logged_in(&backend);

    let store = CartStore::new(Currency::ZAR);
    let mango = Product::new(3u64, "Mango", 12.5);
    store.add_item(mango.snapshot(Currency::ZAR));
    store.add_item(mango.snapshot(Currency::ZAR));
    let form = CheckoutForm::new()
        .full_name("Thandi M")
        .address("12 Long St")
        .phone("0821234567")
        .payment_method(PaymentMethod::Cash)
        .location(Coordinates::new(-33.9, 18.4).unwrap());

    let placed = place_order(&store, &form, &api, &mut NoSheet, "fruitpack://orders").unwrap();
    assert_eq!(placed.order_id.as_str(), "91");
    assert_eq!(placed.total.display(), "R25.00");
    assert!(store.is_empty());

    let body: serde_json::Value = serde_json::from_str(backend.last().body_text().unwrap()).unwrap();
    assert_eq!(body["payment_method"], "cash");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"][0]["product_id"], 3);
}

#[test]
fn failed_order_keeps_cart() {
    let backend = Backend::default().route(
        "POST /cart/checkout/",
        400,
        r#"{"detail": "Product 3 is out of stock"}"#,
    );
    let api = logged_in(&backend);

    let store = CartStore::new(Currency::ZAR);
    store.add_item(Product::new(3u64, "Mango", 12.5).snapshot(Currency::ZAR));
    let form = CheckoutForm::new()
        .full_name("Thandi M")
        .address("12 Long St")
        .phone("0821234567")
        .payment_method(PaymentMethod::Cash)
        .location(Coordinates::new(-33.9, 18.4).unwrap());

    let err = place_order(&store, &form, &api, &mut NoSheet, "fruitpack://orders").unwrap_err();
    assert!(err.to_string().contains("out of stock"));
    assert_eq!(store.item_count(), 1);
}
