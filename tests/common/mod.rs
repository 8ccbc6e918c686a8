#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, redirect, StatusCode};
use session_crud_api::auth::{AuthError, AuthGate, Identity, IdentityProvider, Provider};
use session_crud_api::config::AppConfig;
use session_crud_api::{app, AppState};

pub const FRONTEND: &str = "http://localhost:3001";
pub const GOOD_CODE: &str = "good-code";

/// Google stand-in: redirects to a fake consent page and accepts only [`GOOD_CODE`].
pub struct StubProvider;

#[async_trait]
impl IdentityProvider for StubProvider {
    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        Ok(format!("https://accounts.example.test/authorize?client_id=test&state={}", state))
    }

    async fn exchange(&self, code: &str) -> Result<Identity, AuthError> {
        if code != GOOD_CODE {
            return Err(AuthError::Exchange(format!("rejected code {}", code)));
        }
        Ok(Identity {
            id: "1099".to_string(),
            display_name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            photo: None,
            provider: Provider::Google,
        })
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.session_secret = "test-secret".to_string();
    config.security.frontend_url = FRONTEND.to_string();
    config
}

/// A server on its own port with its own, empty state.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Fresh state with the stub Google provider; Facebook stays unconfigured.
    pub async fn spawn() -> Result<Self> {
        let config = test_config();
        let gate = AuthGate::new(&config).with_provider(Provider::Google, Arc::new(StubProvider));
        Self::spawn_with(AppState::with_gate(config, gate)).await
    }

    pub async fn spawn_with(state: AppState) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;

        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        // Redirects are asserted on, never followed
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self { port, base_url, state, client })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run the Google login round trip and return the `session=...` cookie pair.
    pub async fn login(&self) -> Result<String> {
        let res = self.client.get(self.url("/auth/google")).send().await?;
        anyhow::ensure!(res.status() == StatusCode::FOUND, "login start returned {}", res.status());
        let state = state_param(&location(&res)?)?;

        let res = self
            .client
            .get(self.url("/auth/google/callback"))
            .query(&[("code", GOOD_CODE), ("state", state.as_str())])
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::FOUND, "callback returned {}", res.status());
        anyhow::ensure!(
            location(&res)? == format!("{}/dashboard", FRONTEND),
            "callback redirected to {}",
            location(&res)?
        );

        session_cookie(&res).context("callback set no session cookie")
    }
}

pub fn location(res: &reqwest::Response) -> Result<String> {
    let value = res
        .headers()
        .get(header::LOCATION)
        .context("missing Location header")?;
    Ok(value.to_str()?.to_string())
}

pub fn state_param(location: &str) -> Result<String> {
    let url = url::Url::parse(location)?;
    url.query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .context("no state parameter in authorization URL")
}

/// The `session=<token>` pair from a response's Set-Cookie header.
pub fn session_cookie(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
