use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::constants::{API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECONDS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            environment: option_env!("ENVIRONMENT").unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true")
                .parse()
                .unwrap_or(true),
            request_timeout_seconds: option_env!("REQUEST_TIMEOUT_SECONDS")
                .unwrap_or("30")
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
        .with_runtime_overrides()
    }

    /// En nativo las variables de entorno del proceso pisan a las de compilación
    #[cfg(not(target_arch = "wasm32"))]
    fn with_runtime_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("API_BASE_URL") {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Some(seconds) = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            self.request_timeout_seconds = seconds;
        }
        self
    }

    #[cfg(target_arch = "wasm32")]
    fn with_runtime_overrides(self) -> Self {
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// URL base sin barra final (los paths del API empiezan por '/')
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_drops_trailing_slash() {
        let config = AppConfig::default().with_base_url("https://hr.example.com/");
        assert_eq!(config.base_url(), "https://hr.example.com");
    }

    #[test]
    fn test_timeout_is_never_zero() {
        let config = AppConfig { request_timeout_seconds: 0, ..AppConfig::default() };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
