//! Client configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Every value has a
//! default, so an empty environment yields a working development setup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// API base URL used when running against a local backend.
pub const DEVELOPMENT_API_URL: &str = "http://localhost:5000/api";
/// API base URL of the hosted backend.
pub const PRODUCTION_API_URL: &str = "https://getsetride-backend.onrender.com/api";
/// Renter-facing service fee applied on top of the rental subtotal.
pub const DEFAULT_SERVICE_FEE_RATE: f64 = 0.05;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Deployment environment, selecting the default API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn default_api_url(self) -> &'static str {
        match self {
            Environment::Development => DEVELOPMENT_API_URL,
            Environment::Production => PRODUCTION_API_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// Base URL of the marketplace API, without a trailing slash
    pub api_base_url: String,
    /// Timeout for every HTTP request and for booking submission
    pub request_timeout: Duration,
    /// Fraction of the subtotal charged as service fee
    pub service_fee_rate: f64,
    /// Where the session (token + user) is persisted
    pub session_file: PathBuf,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            api_base_url: DEVELOPMENT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            service_fee_rate: DEFAULT_SERVICE_FEE_RATE,
            session_file: env::temp_dir().join("getsetride-test-session.json"),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("GETSETRIDE_ENV") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "GETSETRIDE_ENV",
                value,
            })?,
            None => Environment::Development,
        };

        let api_base_url = lookup("API_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| environment.default_api_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REQUEST_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let service_fee_rate = match lookup("SERVICE_FEE_RATE") {
            Some(value) => match value.trim().parse::<f64>() {
                Ok(rate) if (0.0..=1.0).contains(&rate) => rate,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SERVICE_FEE_RATE",
                        value,
                    })
                }
            },
            None => DEFAULT_SERVICE_FEE_RATE,
        };

        let session_file = match lookup("SESSION_FILE").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("getsetride")
                .join("session.json"),
        };

        Ok(Self {
            environment,
            api_base_url,
            request_timeout,
            service_fee_rate,
            session_file,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Could not determine a data directory; set SESSION_FILE")]
    NoDataDir,
}
