//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend answered a login without an access token.
    #[error("no access token returned from API")]
    NoAccessToken,

    /// Token is not a decodable JWT.
    #[error("token invalid: {0}")]
    InvalidToken(String),

    /// Token carries no subject claim.
    #[error("token has no subject")]
    MissingSubject,

    /// Token expired.
    #[error("token expired")]
    TokenExpired,

    /// Token file could not be read or written.
    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    /// Check if the user has to log in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::NoAccessToken
                | AuthError::InvalidToken(_)
                | AuthError::MissingSubject
                | AuthError::TokenExpired
        )
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Serialization(e.to_string())
    }
}
