//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LAREK_API_ORIGIN` - Origin of the Larek service (e.g., `https://larek-api.nomoreparties.co`)
//!
//! ## Optional
//! - `LAREK_API_URL` - API base (default: `<origin>/api/weblarek`)
//! - `LAREK_CDN_URL` - Image base (default: `<origin>/content/weblarek`)
//! - `LAREK_CACHE_TTL_SECS` - Item lookup cache lifetime in seconds (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::time::Duration;

use thiserror::Error;
use url::Url;

const API_PATH: &str = "/api/weblarek";
const CDN_PATH: &str = "/content/weblarek";
const DEFAULT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Base URL of the Larek REST API, without trailing slash
    pub api_url: String,
    /// Base URL prefixed to relative image paths, without trailing slash
    pub cdn_url: String,
    /// How long single-item lookups stay cached
    pub cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let origin = get_required(&lookup, "LAREK_API_ORIGIN")?;
        let origin = validate_url("LAREK_API_ORIGIN", &origin)?;

        let api_url = match get_optional(&lookup, "LAREK_API_URL") {
            Some(url) => validate_url("LAREK_API_URL", &url)?,
            None => format!("{origin}{API_PATH}"),
        };
        let cdn_url = match get_optional(&lookup, "LAREK_CDN_URL") {
            Some(url) => validate_url("LAREK_CDN_URL", &url)?,
            None => format!("{origin}{CDN_PATH}"),
        };

        let cache_ttl = get_or_default(&lookup, "LAREK_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LAREK_CACHE_TTL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_url,
            cdn_url,
            cache_ttl,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Default configuration for a service origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `origin` is not a URL.
    pub fn for_origin(origin: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| (key == "LAREK_API_ORIGIN").then(|| origin.to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable.
fn get_required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    get_optional(lookup, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional variable. Empty values count as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Check that `value` is an absolute http(s) URL and strip the trailing slash.
fn validate_url(key: &str, value: &str) -> Result<String, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
