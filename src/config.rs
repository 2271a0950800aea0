use reqwest::Url;
use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

/// Default location of the GIF search API.
pub const DEFAULT_GIPHY_BASE_URL: &str = "https://api.giphy.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
    #[error(transparent)]
    DotEnvError(#[from] dotenvy::Error),
}

#[derive(Clone)] // Cloned into the Giphy client and app state
pub struct Config {
    pub bind_address: SocketAddr,
    pub giphy_api_key: String,
    // Overridable so a local mock can stand in for the real API
    pub giphy_base_url: Url,
}

// The API key stays out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("giphy_api_key", &"<redacted>")
            .field("giphy_base_url", &self.giphy_base_url.as_str())
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let giphy_api_key = lookup("GIPHY_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("GIPHY_API_KEY".into()))?;

        let base_url_str = lookup("GIPHY_BASE_URL").unwrap_or_else(|| DEFAULT_GIPHY_BASE_URL.to_string());
        let giphy_base_url = Url::parse(&base_url_str)
            .map_err(|e| ConfigError::InvalidVar("GIPHY_BASE_URL".into(), e.to_string()))?;

        Ok(Config {
            bind_address,
            giphy_api_key,
            giphy_base_url,
        })
    }
}
