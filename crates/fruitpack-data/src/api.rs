//! Typed client for the Fruit-Pack backend.

use crate::{ClientRequestBuilder, FetchClient, FetchError, Response};
use fruitpack_auth::{
    AccessToken, AuthError, LoginForm, SignupRequest, TokenResponse, TokenStore, UserRegistration,
};
use fruitpack_commerce::catalog::{Category, Product};
use fruitpack_commerce::checkout::{CheckoutReceipt, CheckoutRequest, Coordinates, OrderGateway};
use fruitpack_commerce::orders::{
    Claim, DeliveryStatus, DriverStatus, DriverStatusUpdate, Order, OrderStatusUpdate,
};
use fruitpack_commerce::{CommerceError, DriverId, OrderId, ProductId, UserId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by [`FruitPackApi`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// No token is stored; the user has to log in.
    #[error("not logged in")]
    NotAuthenticated,

    /// The backend rejected the credentials or token (401/403).
    #[error("{detail}")]
    Unauthorized { status: u16, detail: String },

    /// Any other non-2xx response.
    #[error("{detail}")]
    Status { status: u16, detail: String },

    /// The order is not in a state that allows the action.
    #[error("cannot {action} order {order_id} while it is {status}")]
    NotAllowed {
        action: &'static str,
        order_id: OrderId,
        status: DeliveryStatus,
    },

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Commerce(#[from] CommerceError),
}

impl ApiError {
    /// Build an error from a non-2xx response, using the backend's `detail`.
    pub fn from_response(response: &Response) -> Self {
        let detail = error_detail(response)
            .unwrap_or_else(|| format!("request failed with HTTP {}", response.status));
        match response.status {
            401 | 403 => ApiError::Unauthorized {
                status: response.status,
                detail,
            },
            status => ApiError::Status { status, detail },
        }
    }

    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            ApiError::Fetch(e) => e.status(),
            _ => None,
        }
    }

    /// Check if the user should log in (again).
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ApiError::NotAuthenticated | ApiError::Unauthorized { .. } => true,
            ApiError::Auth(e) => e.is_auth_failure(),
            _ => false,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Detail,
}

/// `detail` is a string, or a list of validation errors.
#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Validation(Vec<ValidationIssue>),
}

#[derive(Deserialize)]
struct ValidationIssue {
    msg: String,
}

fn error_detail(response: &Response) -> Option<String> {
    if let Ok(body) = response.json::<ErrorBody>() {
        let detail = match body.detail {
            Detail::Message(message) => message,
            Detail::Validation(issues) => issues
                .into_iter()
                .map(|i| i.msg)
                .collect::<Vec<_>>()
                .join("; "),
        };
        return Some(detail).filter(|d| !d.trim().is_empty());
    }
    response
        .text()
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty() && t.len() <= 200)
}

/// Profile returned by `POST /users/users/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<UserId>,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// The Fruit-Pack backend API.
///
/// Authenticated calls read the token from `S` on every request, so a login
/// in one place is seen everywhere the store is shared.
#[derive(Debug)]
pub struct FruitPackApi<S> {
    client: FetchClient,
    tokens: S,
}

impl<S: TokenStore> FruitPackApi<S> {
    pub fn new(client: FetchClient, tokens: S) -> Self {
        Self { client, tokens }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    // Auth

    /// Log in with email and password; stores the token on success.
    pub fn login(&self, email: &str, password: &str) -> Result<AccessToken, ApiError> {
        let form = LoginForm::new(email, password);
        let response = self.client.post("/auth/token").form(&form)?.send()?;
        let token = decode::<TokenResponse>(response)?.into_token()?;
        self.tokens.save(&token)?;
        tracing::info!(user = %form.username, "logged in");
        Ok(token)
    }

    /// Create an account; stores the returned token.
    pub fn signup(&self, request: &SignupRequest) -> Result<AccessToken, ApiError> {
        let response = self.client.post("/auth/signup").json(request)?.send()?;
        let token = decode::<TokenResponse>(response)?.into_token()?;
        self.tokens.save(&token)?;
        tracing::info!(user = %request.email, "signed up");
        Ok(token)
    }

    /// Create the user profile that accompanies a new account.
    pub fn register_user(&self, registration: &UserRegistration) -> Result<UserProfile, ApiError> {
        let response = self
            .client
            .post("/users/users/")
            .json(registration)?
            .send()?;
        decode(response)
    }

    /// Forget the stored token. Returns whether one was stored.
    pub fn logout(&self) -> Result<bool, ApiError> {
        Ok(self.tokens.clear()?)
    }

    /// The stored token, refusing missing or expired ones.
    pub fn token(&self) -> Result<AccessToken, ApiError> {
        let token = self.tokens.load()?.ok_or(ApiError::NotAuthenticated)?;
        if token.is_expired() {
            return Err(AuthError::TokenExpired.into());
        }
        Ok(token)
    }

    /// Id of the logged-in user, from the token subject.
    pub fn current_user_id(&self) -> Result<UserId, ApiError> {
        Ok(self.token()?.subject()?)
    }

    fn authed<'a>(
        &self,
        builder: ClientRequestBuilder<'a>,
    ) -> Result<ClientRequestBuilder<'a>, ApiError> {
        let token = self.token()?;
        Ok(builder.bearer_auth(token.as_str()))
    }

    /// Attach the token when one is stored; catalog reads work without it.
    fn maybe_authed<'a>(
        &self,
        builder: ClientRequestBuilder<'a>,
    ) -> Result<ClientRequestBuilder<'a>, ApiError> {
        Ok(match self.tokens.load()? {
            Some(token) if !token.is_expired() => builder.bearer_auth(token.as_str()),
            _ => builder,
        })
    }

    // Catalog

    pub fn products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.maybe_authed(self.client.get("/products/"))?.send()?;
        decode(response)
    }

    pub fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let response = self
            .maybe_authed(self.client.get(format!("/products/{id}")))?
            .send()?;
        decode(response)
    }

    pub fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self.maybe_authed(self.client.get("/categories/"))?.send()?;
        decode(response)
    }

    /// Resolve an image reference to a URL. Absolute URLs pass through.
    pub fn image_url(&self, image_ref: &str) -> String {
        if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
            return image_ref.to_string();
        }
        self.client.url(&format!(
            "/products/images/{}",
            image_ref.trim_start_matches('/')
        ))
    }

    // Checkout & orders

    /// Submit the checkout payload built from the cart.
    pub fn checkout(&self, request: &CheckoutRequest) -> Result<CheckoutReceipt, ApiError> {
        let response = self
            .authed(self.client.post("/cart/checkout/"))?
            .json(request)?
            .send()?;
        let receipt: CheckoutReceipt = decode(response)?;
        tracing::info!(order_id = %receipt.order_id, "order created");
        Ok(receipt)
    }

    /// Orders placed by the logged-in user.
    pub fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let user = self.current_user_id()?;
        let response = self
            .authed(self.client.get(format!("/orders/user/{user}/orders")))?
            .send()?;
        decode(response)
    }

    pub fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let response = self
            .authed(self.client.get(format!("/orders/{id}")))?
            .send()?;
        decode(response)
    }

    /// Confirm receipt of an order the driver marked delivered.
    pub fn confirm_delivery(&self, id: &OrderId) -> Result<(), ApiError> {
        let order = self.order(id)?;
        if !order.can_confirm_delivery() {
            return Err(not_allowed("confirm delivery of", order));
        }
        let response = self
            .authed(self.client.post(format!("/orders/{id}/confirm-delivery")))?
            .send()?;
        check(response)?;
        tracing::info!(order_id = %id, "delivery confirmed");
        Ok(())
    }

    // Drivers

    pub fn set_driver_status(
        &self,
        driver: &DriverId,
        status: DriverStatus,
    ) -> Result<(), ApiError> {
        let response = self
            .authed(self.client.patch(format!("/drivers/{driver}/status")))?
            .json(&DriverStatusUpdate { status })?
            .send()?;
        check(response)?;
        tracing::info!(driver = %driver, status = %status, "driver status updated");
        Ok(())
    }

    pub fn share_location(
        &self,
        driver: &DriverId,
        location: Coordinates,
    ) -> Result<(), ApiError> {
        location.validate()?;
        let response = self
            .authed(self.client.post(format!("/drivers/driver/{driver}/location")))?
            .json(&location)?
            .send()?;
        check(response)?;
        Ok(())
    }

    /// Orders waiting for a driver.
    pub fn available_orders(&self) -> Result<Vec<Order>, ApiError> {
        let response = self
            .authed(self.client.get("/orders/available/orders"))?
            .send()?;
        decode(response)
    }

    /// Orders assigned to the driver.
    pub fn driver_orders(&self, driver: &DriverId) -> Result<Vec<Order>, ApiError> {
        let response = self
            .authed(self.client.get(format!("/orders/driver/{driver}/orders")))?
            .send()?;
        decode(response)
    }

    /// Orders the driver has delivered.
    pub fn delivered_orders(&self, driver: &DriverId) -> Result<Vec<Order>, ApiError> {
        let response = self
            .authed(self.client.get(format!("/orders/driver/{driver}/delivered-orders")))?
            .send()?;
        decode(response)
    }

    pub fn driver_claims(&self, driver: &DriverId) -> Result<Vec<Claim>, ApiError> {
        let response = self
            .authed(self.client.get(format!("/claims/driver/{driver}/claims")))?
            .send()?;
        decode(response)
    }

    /// Claim a pending order for the driver.
    pub fn claim_order(&self, order_id: &OrderId, driver: &DriverId) -> Result<(), ApiError> {
        let order = self.order(order_id)?;
        if !order.can_claim() {
            return Err(not_allowed("claim", order));
        }
        let response = self
            .authed(
                self.client
                    .post(format!("/claims/claim/order/{order_id}/driver/{driver}")),
            )?
            .send()?;
        check(response)?;
        tracing::info!(order_id = %order_id, driver = %driver, "order claimed");
        Ok(())
    }

    /// Mark a shipped order delivered.
    pub fn mark_delivered(&self, order_id: &OrderId) -> Result<(), ApiError> {
        let order = self.order(order_id)?;
        if !order.can_mark_delivered() {
            return Err(not_allowed("mark delivered", order));
        }
        let response = self
            .authed(self.client.put(format!("/orders/{order_id}/status")))?
            .json(&OrderStatusUpdate::delivered())?
            .send()?;
        check(response)?;
        tracing::info!(order_id = %order_id, "order marked delivered");
        Ok(())
    }
}

impl<S: TokenStore> OrderGateway for FruitPackApi<S> {
    type Error = ApiError;

    fn submit_order(&self, request: &CheckoutRequest) -> Result<CheckoutReceipt, ApiError> {
        self.checkout(request)
    }
}

fn not_allowed(action: &'static str, order: Order) -> ApiError {
    ApiError::NotAllowed {
        action,
        order_id: order.id,
        status: order.delivery_status,
    }
}

fn check(response: Response) -> Result<Response, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(&response))
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check(response)?;
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}
