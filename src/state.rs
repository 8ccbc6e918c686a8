use std::sync::Arc;

use crate::analysis::{BasicAnalyzer, TextAnalyzer};
use crate::auth::{AuthError, AuthGate};
use crate::config::AppConfig;
use crate::store::ResourceStore;

/// Everything a request handler can reach. Built once by the process
/// bootstrap (or once per test) and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub items: ResourceStore,
    pub analyses: ResourceStore,
    pub auth: AuthGate,
    pub analyzer: Arc<dyn TextAnalyzer>,
}

impl AppState {
    /// State with real OAuth clients for every configured provider.
    pub fn from_config(config: AppConfig) -> Result<Self, AuthError> {
        let auth = AuthGate::from_config(&config)?;
        Ok(Self::with_gate(config, auth))
    }

    /// State around an explicitly built gate (tests plug stub providers in here).
    pub fn with_gate(config: AppConfig, auth: AuthGate) -> Self {
        Self {
            config: Arc::new(config),
            items: ResourceStore::new("items"),
            analyses: ResourceStore::new("analyses"),
            auth,
            analyzer: Arc::new(BasicAnalyzer),
        }
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn TextAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }
}
