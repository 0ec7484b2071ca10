//! API configuration read from the environment

use crate::constants::API_KEY_ENV;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key not found. Set {API_KEY_ENV} in the environment or a .env file.")]
    MissingApiKey,
    #[error("{API_KEY_ENV} is set but empty.")]
    EmptyApiKey,
}

#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: String,
}

impl ApiConfig {
    /// Load the API key from the environment. A `.env` file in the working
    /// directory is applied first, without overriding existing variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_ENV).ok_or(ConfigError::MissingApiKey)?;
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        debug!("API key loaded from environment");
        Ok(Self { api_key })
    }
}

impl std::fmt::Debug for ApiConfig {
    // Keep the key out of logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig").field("api_key", &"***").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_an_error() {
        let result = ApiConfig::from_lookup(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn blank_key_is_an_error() {
        let result = ApiConfig::from_lookup(|_| Some("   ".to_string()));
        assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn key_is_trimmed() {
        let config = ApiConfig::from_lookup(|_| Some(" gsk_test \n".to_string())).unwrap();
        assert_eq!(config.api_key, "gsk_test");
    }

    #[test]
    fn error_message_names_the_variable() {
        let msg = ConfigError::MissingApiKey.to_string();
        assert!(msg.contains(API_KEY_ENV));
    }
}
