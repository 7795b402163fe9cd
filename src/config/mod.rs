use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted storage document. `None` resolves
    /// to `$HOME/.config/admin-console` at use time.
    pub storage_dir: Option<PathBuf>,
    pub token_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub register_redirect_delay_ms: u64,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Profile defaults first, then field-level overrides
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("ADMIN_API_BASE_URL") {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                self.api.base_url = trimmed.to_string();
            }
        }
        if let Ok(v) = env::var("ADMIN_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        if let Ok(v) = env::var("ADMIN_CONSOLE_STORAGE_DIR") {
            if !v.trim().is_empty() {
                self.session.storage_dir = Some(PathBuf::from(v));
            }
        }
        if let Ok(v) = env::var("ADMIN_CONSOLE_TOKEN_KEY") {
            if !v.trim().is_empty() {
                self.session.token_key = v;
            }
        }

        if let Ok(v) = env::var("ADMIN_REGISTER_REDIRECT_MS") {
            self.ui.register_redirect_delay_ms =
                v.parse().unwrap_or(self.ui.register_redirect_delay_ms);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://127.0.0.1:3000".to_string(),
                request_timeout_secs: 30,
            },
            session: SessionConfig::default(),
            ui: UiConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.example.com".to_string(),
                request_timeout_secs: 15,
            },
            session: SessionConfig::default(),
            ui: UiConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://app.example.com".to_string(),
                request_timeout_secs: 10,
            },
            session: SessionConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl UiConfig {
    pub fn register_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.register_redirect_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            token_key: "token".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            register_redirect_delay_ms: 3000,
        }
    }
}

// Global singleton config - initialized once on first access
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

pub fn config() -> &'static ClientConfig {
    &CONFIG
}
