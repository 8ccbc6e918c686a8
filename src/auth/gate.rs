use std::collections::HashMap;
use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Duration;
use serde::Deserialize;
use uuid::Uuid;

use super::cookie::{cookie_value, CookiePolicy, SESSION_COOKIE};
use super::identity::{Identity, Provider};
use super::provider::{IdentityProvider, OAuthProvider};
use super::session::SessionStore;
use super::{generate_session_token, validate_session_token, AuthError, SessionClaims};
use crate::config::AppConfig;

/// Query parameters an OAuth provider sends back to the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// A completed login: who signed in and the cookie that carries the session.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub session_id: Uuid,
    pub set_cookie: String,
}

/// Establishes, resolves and ends session identities.
#[derive(Clone)]
pub struct AuthGate {
    sessions: SessionStore,
    providers: HashMap<Provider, Arc<dyn IdentityProvider>>,
    secret: Arc<str>,
    max_age: Duration,
    cookies: CookiePolicy,
}

impl AuthGate {
    /// Gate with no providers registered.
    pub fn new(config: &AppConfig) -> Self {
        let max_age = config.security.session_max_age();
        Self {
            sessions: SessionStore::new(),
            providers: HashMap::new(),
            secret: Arc::from(config.security.session_secret.as_str()),
            max_age,
            cookies: CookiePolicy {
                max_age_secs: max_age.num_seconds(),
                secure: config.security.secure_cookies,
            },
        }
    }

    /// Gate with an [`OAuthProvider`] for every provider that has a client id.
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let mut gate = Self::new(config);
        for provider in Provider::ALL {
            let provider_config = match provider {
                Provider::Google => &config.oauth.google,
                Provider::Facebook => &config.oauth.facebook,
            };

            if provider_config.is_configured() {
                let client = OAuthProvider::new(provider, provider_config.clone())?;
                gate = gate.with_provider(provider, Arc::new(client));
            } else {
                tracing::warn!("OAuth provider {} is not configured; logins will fail", provider);
            }
        }
        Ok(gate)
    }

    pub fn with_provider(mut self, provider: Provider, client: Arc<dyn IdentityProvider>) -> Self {
        self.providers.insert(provider, client);
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn provider(&self, provider: Provider) -> Result<&Arc<dyn IdentityProvider>, AuthError> {
        self.providers
            .get(&provider)
            .ok_or(AuthError::ProviderNotConfigured(provider))
    }

    /// Resolve the session carried by a request's cookies.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<(Uuid, Identity), AuthError> {
        let token = cookie_value(headers, SESSION_COOKIE).ok_or(AuthError::MissingSession)?;
        let claims = validate_session_token(token, &self.secret)?;

        let identity = self
            .sessions
            .lookup(&claims.sid)
            .await
            .ok_or(AuthError::UnknownSession)?;
        Ok((claims.sid, identity))
    }

    /// Identity of the caller, or `None` when the request is unauthenticated.
    pub async fn current_identity(&self, headers: &HeaderMap) -> Option<Identity> {
        self.resolve(headers).await.ok().map(|(_, identity)| identity)
    }

    /// Start a login: remember a fresh `state` and return the provider URL to redirect to.
    pub async fn begin_login(&self, provider: Provider) -> Result<String, AuthError> {
        let client = self.provider(provider)?;
        let state = self.sessions.issue_state(provider).await;
        client.authorization_url(&state)
    }

    /// Finish a login from the provider's callback parameters.
    pub async fn complete_login(
        &self,
        provider: Provider,
        params: CallbackParams,
    ) -> Result<LoginOutcome, AuthError> {
        let client = self.provider(provider)?;

        if let Some(error) = params.error {
            return Err(AuthError::ProviderDenied(error));
        }

        let state = params.state.ok_or(AuthError::StateMismatch)?;
        if !self.sessions.redeem_state(&state, provider).await {
            return Err(AuthError::StateMismatch);
        }

        let code = params
            .code
            .filter(|c| !c.is_empty())
            .ok_or(AuthError::MissingCode)?;
        let identity = client.exchange(&code).await?;

        let session_id = self.sessions.open(identity.clone(), self.max_age).await;
        let claims = SessionClaims::new(session_id, identity.subject(), self.max_age);
        let token = generate_session_token(&claims, &self.secret)?;

        tracing::info!("{} login for {} ({})", provider, identity.display_name, identity.subject());

        Ok(LoginOutcome {
            identity,
            session_id,
            set_cookie: self.cookies.session(&token),
        })
    }

    /// End the caller's session, if any, and return the cookie that clears it.
    pub async fn logout(&self, session_id: Option<Uuid>) -> String {
        if let Some(sid) = session_id {
            if self.sessions.revoke(&sid).await {
                tracing::info!("Session {} logged out", sid);
            }
        }
        self.cookies.cleared()
    }
}
