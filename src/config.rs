use std::env;

use thiserror::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_BIBLE_API_URL: &str = "https://bible-api.com";
pub const DEFAULT_BIBLE_TRANSLATION: &str = "kjv";
pub const DEFAULT_TRANSLATE_API_URL: &str = "https://api.mymemory.translated.net";
pub const DEFAULT_QR_API_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub server_address: String,
    pub production: bool,
    pub app_base_url: String,
    pub bible_api_url: String,
    pub bible_translation: String,
    pub translate_api_url: String,
    pub qr_api_url: String,
    pub db_max_connections: u32,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            server_address: DEFAULT_SERVER_ADDRESS.into(),
            production: false,
            app_base_url: DEFAULT_APP_BASE_URL.into(),
            bible_api_url: DEFAULT_BIBLE_API_URL.into(),
            bible_translation: DEFAULT_BIBLE_TRANSLATION.into(),
            translate_api_url: DEFAULT_TRANSLATE_API_URL.into(),
            qr_api_url: DEFAULT_QR_API_URL.into(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let number = |name: &'static str, default: u32| -> Result<u32, ConfigError> {
            match get(name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { name, value }),
                None => Ok(default),
            }
        };
        let db_max_connections = number("DB_MAX_CONNECTIONS", defaults.db_max_connections)?;
        let bcrypt_cost = number("BCRYPT_COST", defaults.bcrypt_cost)?;

        Ok(Self {
            database_url: get("DATABASE_URL"),
            server_address: get("SERVER_ADDRESS").unwrap_or(defaults.server_address),
            production: get("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            app_base_url: get("APP_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.app_base_url),
            bible_api_url: get("BIBLE_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.bible_api_url),
            bible_translation: get("BIBLE_TRANSLATION").unwrap_or(defaults.bible_translation),
            translate_api_url: get("TRANSLATE_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.translate_api_url),
            qr_api_url: get("QR_API_URL").unwrap_or(defaults.qr_api_url),
            db_max_connections,
            bcrypt_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert!(!config.production);
        assert_eq!(config.app_base_url, DEFAULT_APP_BASE_URL);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.bcrypt_cost, 12);
    }

    #[test]
    fn production_flag_and_trailing_slashes() {
        let config = config_from(&[
            ("APP_ENV", "Production"),
            ("APP_BASE_URL", "https://pulpit.example.org/"),
            ("BIBLE_API_URL", "http://127.0.0.1:9000/"),
        ])
        .unwrap();
        assert!(config.production);
        assert_eq!(config.app_base_url, "https://pulpit.example.org");
        assert_eq!(config.bible_api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn blank_database_url_is_unset() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn bad_pool_size_is_rejected() {
        let err = config_from(&[("DB_MAX_CONNECTIONS", "many")]).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }
}
