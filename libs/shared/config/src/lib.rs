use std::env;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_SESSION_STORE_PATH: &str = ".portal_session.json";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the REST backend that owns users, doctors, appointments and records.
    pub api_base_url: String,
    /// File backing the durable key-value store that holds the session.
    pub session_store_path: String,
    pub port: u16,
    /// Collapse "email not found" and "invalid password" into one login message.
    pub generic_credential_errors: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base_url = env::var("API_BASE_URL").unwrap_or_else(|_| {
            warn!("API_BASE_URL not set, using default {}", DEFAULT_API_BASE_URL);
            String::new()
        });

        let config = Self {
            api_base_url,
            session_store_path: env::var("SESSION_STORE_PATH")
                .unwrap_or_else(|_| DEFAULT_SESSION_STORE_PATH.to_string()),
            port: env::var("PORTAL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            generic_credential_errors: env::var("AUTH_GENERIC_CREDENTIALS")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        if !config.is_configured() {
            warn!("Backend URL not configured - falling back to local default");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    /// Base URL with the default applied and any trailing slash removed.
    pub fn backend_url(&self) -> String {
        let base = if self.api_base_url.is_empty() {
            DEFAULT_API_BASE_URL
        } else {
            self.api_base_url.as_str()
        };
        base.trim_end_matches('/').to_string()
    }
}
