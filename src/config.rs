//! Application configuration loaded from environment variables.

use std::env;

const DEFAULT_PORT: u16 = 3000;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address for the HTTP listener
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development. A missing `PORT`
    /// falls back to the default; a malformed one is an error rather than
    /// a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Err(_) => DEFAULT_PORT,
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0}")]
    InvalidPort(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "8081");
        env::set_var("HOST", "127.0.0.1");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "127.0.0.1");

        env::remove_var("PORT");
        env::remove_var("HOST");
    }
}
