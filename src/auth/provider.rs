use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::identity::{Identity, Provider};
use super::AuthError;
use crate::config::ProviderConfig;

/// External identity provider: builds the authorization redirect and turns
/// the callback's authorization code into an [`Identity`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorization_url(&self, state: &str) -> Result<String, AuthError>;

    async fn exchange(&self, code: &str) -> Result<Identity, AuthError>;
}

/// Provider endpoints for the authorization-code flow.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub authorize: &'static str,
    pub token: &'static str,
    pub profile: &'static str,
    pub scope: Option<&'static str>,
}

impl Endpoints {
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::Google => Endpoints {
                authorize: "https://accounts.google.com/o/oauth2/v2/auth",
                token: "https://oauth2.googleapis.com/token",
                profile: "https://openidconnect.googleapis.com/v1/userinfo",
                scope: Some("openid profile email"),
            },
            Provider::Facebook => Endpoints {
                authorize: "https://www.facebook.com/v18.0/dialog/oauth",
                token: "https://graph.facebook.com/v18.0/oauth/access_token",
                profile: "https://graph.facebook.com/v18.0/me?fields=id,name,email,picture",
                scope: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authorization-code client for Google and Facebook.
#[derive(Debug, Clone)]
pub struct OAuthProvider {
    provider: Provider,
    config: ProviderConfig,
    endpoints: Endpoints,
    http: reqwest::Client,
}

impl OAuthProvider {
    pub fn new(provider: Provider, config: ProviderConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::Exchange(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            provider,
            config,
            endpoints: Endpoints::for_provider(provider),
            http,
        })
    }

    async fn access_token(&self, code: &str) -> Result<String, AuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.callback_url.as_str()),
        ];

        let response = self
            .http
            .post(self.endpoints.token)
            .form(&params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::Exchange(format!("{} token request: {}", self.provider, e)))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Exchange(format!("{} token response: {}", self.provider, e)))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl IdentityProvider for OAuthProvider {
    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let mut url = Url::parse(self.endpoints.authorize)
            .map_err(|e| AuthError::Exchange(format!("bad authorize endpoint: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.callback_url)
                .append_pair("state", state);
            if let Some(scope) = self.endpoints.scope {
                query.append_pair("scope", scope);
            }
        }

        Ok(url.into())
    }

    async fn exchange(&self, code: &str) -> Result<Identity, AuthError> {
        let access_token = self.access_token(code).await?;

        let profile: Value = self
            .http
            .get(self.endpoints.profile)
            .bearer_auth(&access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::Exchange(format!("{} profile request: {}", self.provider, e)))?
            .json()
            .await
            .map_err(|e| AuthError::Exchange(format!("{} profile response: {}", self.provider, e)))?;

        parse_profile(self.provider, &profile)
    }
}

/// Map a provider's profile document onto an [`Identity`].
pub fn parse_profile(provider: Provider, profile: &Value) -> Result<Identity, AuthError> {
    let text = |pointer: &str| {
        profile
            .pointer(pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let (id, photo) = match provider {
        Provider::Google => (text("/sub"), text("/picture")),
        Provider::Facebook => (text("/id"), text("/picture/data/url")),
    };
    let id = id.ok_or_else(|| AuthError::Profile(format!("{} profile has no id", provider)))?;

    Ok(Identity {
        display_name: text("/name").unwrap_or_default(),
        email: text("/email"),
        photo,
        provider,
        id,
    })
}
