//! Bearer access tokens.
//!
//! Tokens are JWTs issued by the backend. The client never verifies the
//! signature; it only reads the payload claims it needs (`sub` to address
//! per-user endpoints, `exp` to notice a stale login).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use fruitpack_commerce::ids::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AuthError;

/// An access token as returned by `/auth/token` and `/auth/signup`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Decode the payload claims.
    pub fn claims(&self) -> Result<TokenClaims, AuthError> {
        let payload = self
            .0
            .split('.')
            .nth(1)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("not a JWT".to_string()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// The user the token was issued to (`sub`).
    pub fn subject(&self) -> Result<UserId, AuthError> {
        self.claims()?.sub.ok_or(AuthError::MissingSubject)
    }

    /// Expiry as a Unix timestamp, if the token carries one.
    pub fn expires_at(&self) -> Option<i64> {
        self.claims().ok()?.exp
    }

    /// Check expiry against the current time.
    ///
    /// Tokens without an `exp` claim never expire client-side.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp())
    }

    /// Check expiry against a given Unix timestamp.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.0.chars().take(8).collect();
        write!(f, "AccessToken({shown}…)")
    }
}

/// Claims read from the token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<UserId>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of a login or signup response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Extract the token; a missing or blank token is an error.
    pub fn into_token(self) -> Result<AccessToken, AuthError> {
        self.access_token
            .filter(|t| !t.trim().is_empty())
            .map(AccessToken::new)
            .ok_or(AuthError::NoAccessToken)
    }
}

fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an unsigned token with the given payload.
    fn token_with(payload: &str) -> AccessToken {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        AccessToken::new(format!("{header}.{body}.signature"))
    }

    #[test]
    fn test_subject_from_string_sub() {
        let token = token_with(r#"{"sub":"12","exp":1700000000}"#);
        assert_eq!(token.subject().unwrap().as_str(), "12");
        assert_eq!(token.expires_at(), Some(1_700_000_000));
    }

    #[test]
    fn test_subject_from_integer_sub() {
        let token = token_with(r#"{"sub":12}"#);
        assert_eq!(token.subject().unwrap(), UserId::new("12"));
        assert_eq!(token.expires_at(), None);
        assert!(!token.is_expired());
    }

    #[test]
    fn test_missing_subject() {
        let token = token_with(r#"{"exp":1}"#);
        assert!(matches!(token.subject(), Err(AuthError::MissingSubject)));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            AccessToken::new("not-a-jwt").subject(),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            AccessToken::new("a.!!!.c").claims(),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expiry() {
        let token = token_with(r#"{"sub":"1","exp":1000}"#);
        assert!(token.is_expired_at(1000));
        assert!(!token.is_expired_at(999));
        assert!(token.is_expired());
    }

    #[test]
    fn test_debug_redacts() {
        let token = AccessToken::new("abcdefghijklmnop");
        assert_eq!(format!("{token:?}"), "AccessToken(abcdefgh…)");
        assert_eq!(token.bearer(), "Bearer abcdefghijklmnop");
    }

    #[test]
    fn test_token_response() {
        let ok: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc","token_type":"bearer"}"#).unwrap();
        assert_eq!(ok.into_token().unwrap().as_str(), "abc");

        let missing: TokenResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(missing.into_token(), Err(AuthError::NoAccessToken)));

        let blank = TokenResponse {
            access_token: Some("  ".to_string()),
            token_type: None,
        };
        assert!(blank.into_token().is_err());
    }
}
