pub mod cookie;
pub mod gate;
pub mod identity;
pub mod provider;
pub mod session;

pub use gate::{AuthGate, CallbackParams, LoginOutcome};
pub use identity::{Identity, Provider};
pub use provider::{IdentityProvider, OAuthProvider};
pub use session::SessionStore;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Claims carried by the signed `session` cookie.
///
/// The cookie only points at a server-side session; the identity itself
/// stays in the [`SessionStore`] so logout can revoke it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: Uuid,
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(sid: Uuid, subject: impl Into<String>, max_age: Duration) -> Self {
        let now = Utc::now();
        Self {
            sid,
            sub: subject.into(),
            exp: (now + max_age).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No session cookie")]
    MissingSession,

    #[error("Invalid session token: {0}")]
    InvalidSession(String),

    #[error("Session unknown, expired or revoked")]
    UnknownSession,

    #[error("Session secret not configured")]
    InvalidSecret,

    #[error("Session token generation error: {0}")]
    TokenGeneration(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(Provider),

    #[error("OAuth state missing, expired or issued for another provider")]
    StateMismatch,

    #[error("Provider denied the login: {0}")]
    ProviderDenied(String),

    #[error("Callback carried no authorization code")]
    MissingCode,

    #[error("Code exchange failed: {0}")]
    Exchange(String),

    #[error("Unexpected provider profile: {0}")]
    Profile(String),
}

pub fn generate_session_token(claims: &SessionClaims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Validate signature and expiry of a session token and return its claims.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<SessionClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidSession(e.to_string()))?;

    Ok(token_data.claims)
}
