use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub oauth: OAuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Only origin allowed by CORS; also where successful logins land.
    pub frontend_url: String,
    #[serde(skip_serializing)]
    pub session_secret: String,
    pub session_max_age_hours: u64,
    /// `Secure` + `SameSite=None` cookies, for cross-site frontends over HTTPS.
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub google: ProviderConfig,
    pub facebook: ProviderConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub callback_url: String,
}

impl SecurityConfig {
    /// Session lifetime, capped at [`MAX_SESSION_MAX_AGE_HOURS`].
    pub fn session_max_age(&self) -> chrono::Duration {
        let hours = self.session_max_age_hours.min(MAX_SESSION_MAX_AGE_HOURS);
        chrono::Duration::hours(i64::try_from(hours).unwrap_or(MAX_SESSION_MAX_AGE_HOURS as i64))
    }
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty()
    }
}

pub const DEFAULT_SESSION_SECRET: &str = "change-me";

/// One year.
pub const MAX_SESSION_MAX_AGE_HOURS: u64 = 24 * 365;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = Self::environment_from_env();

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn environment_from_env() -> Environment {
        if env::var("VERCEL").as_deref() == Ok("1") {
            return Environment::Production;
        }

        let name = env::var("APP_ENV").or_else(|_| env::var("NODE_ENV"));
        match name.as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Security overrides
        if let Ok(v) = env::var("FRONTEND_URL") {
            self.security.frontend_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            if !v.is_empty() {
                self.security.session_secret = v;
            }
        }
        if let Ok(v) = env::var("SESSION_MAX_AGE_HOURS") {
            self.security.session_max_age_hours = v.parse().unwrap_or(self.security.session_max_age_hours);
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }

        // OAuth overrides
        Self::provider_overrides(&mut self.oauth.google, "GOOGLE");
        Self::provider_overrides(&mut self.oauth.facebook, "FACEBOOK");

        self
    }

    fn provider_overrides(provider: &mut ProviderConfig, prefix: &str) {
        if let Ok(v) = env::var(format!("{}_CLIENT_ID", prefix)) {
            provider.client_id = v;
        }
        if let Ok(v) = env::var(format!("{}_CLIENT_SECRET", prefix)) {
            provider.client_secret = v;
        }
        if let Ok(v) = env::var(format!("{}_CALLBACK_URL", prefix)) {
            provider.callback_url = v;
        }
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            security: SecurityConfig {
                frontend_url: "http://localhost:3001".to_string(),
                session_secret: DEFAULT_SESSION_SECRET.to_string(),
                session_max_age_hours: 24,
                secure_cookies: false,
            },
            oauth: OAuthConfig {
                google: ProviderConfig {
                    callback_url: "http://localhost:3000/auth/google/callback".to_string(),
                    ..ProviderConfig::default()
                },
                facebook: ProviderConfig {
                    callback_url: "http://localhost:3000/auth/facebook/callback".to_string(),
                    ..ProviderConfig::default()
                },
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.security.secure_cookies = true;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.security.secure_cookies = true;
        config
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }

    /// True when a non-development deployment still signs sessions with the default secret.
    pub fn uses_default_secret(&self) -> bool {
        self.security.session_secret == DEFAULT_SESSION_SECRET
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
