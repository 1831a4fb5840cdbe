//! HTTP client and typed backend API for Fruit-Pack.
//!
//! Provides a small blocking request/response model over a pluggable
//! [`Transport`], retries for idempotent requests, and [`FruitPackApi`], the
//! typed client for the Fruit-Pack backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use fruitpack_auth::MemoryTokenStore;
//! use fruitpack_data::{FetchClient, FruitPackApi, TimeoutConfig};
//!
//! let client = FetchClient::new(TimeoutConfig::default())?
//!     .with_base_url("http://localhost:8000");
//! let api = FruitPackApi::new(client, MemoryTokenStore::new());
//!
//! api.login("thandi@example.com", "s3cret")?;
//! for order in api.my_orders()? {
//!     println!("#{} {}", order.id, order.delivery_status);
//! }
//! # Ok::<(), fruitpack_data::ApiError>(())
//! ```

mod api;
mod client;
mod error;
mod request;
mod response;
mod retry;
mod timeout;
mod transport;

pub use api::{ApiError, FruitPackApi, UserProfile};
pub use client::{ClientRequestBuilder, FetchClient};
pub use error::FetchError;
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
pub use timeout::TimeoutConfig;
pub use transport::{HttpTransport, Transport};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ApiError, FetchClient, FetchError, FruitPackApi, Method, Response};
}
