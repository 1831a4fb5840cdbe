//! Authentication module for Fruit-Pack.
//!
//! The backend owns the authentication protocol. This crate holds what a
//! client needs around it: the credential payloads, the bearer token and
//! the claims it carries, and where the token is kept between runs.

mod credentials;
mod error;
mod store;
mod token;

pub use credentials::{LoginForm, SignupRequest, UserRegistration};
pub use error::AuthError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{AccessToken, TokenClaims, TokenResponse};
