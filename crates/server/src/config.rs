//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRESSROOM_DATABASE_URL` - `PostgreSQL` connection string
//! - `PRINTFUL_API_TOKEN` - Printful private API token (Bearer)
//! - `SNIPCART_SECRET_KEY` - Snipcart secret API key (webhook validation)
//!
//! ## Optional
//! - `PRESSROOM_HOST` - Bind address (default: 127.0.0.1)
//! - `PRESSROOM_PORT` - Listen port (default: 3000)
//! - `PRINTFUL_API_BASE` - Printful API base URL (default: `https://api.printful.com`)
//! - `PRINTFUL_CONFIRM_ORDERS` - Submit orders for fulfillment immediately
//!   instead of creating drafts (default: false)
//! - `SNIPCART_VALIDATION_BASE` - Snipcart request-validation base URL
//!   (default: `https://app.snipcart.com`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Printful API configuration
    pub printful: PrintfulConfig,
    /// Snipcart webhook configuration
    pub snipcart: SnipcartConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Printful API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct PrintfulConfig {
    /// Printful API base URL
    pub api_base: String,
    /// Private API token, sent as a Bearer header
    pub api_token: SecretString,
    /// Submit orders for fulfillment immediately (otherwise drafts)
    pub confirm_orders: bool,
}

impl std::fmt::Debug for PrintfulConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintfulConfig")
            .field("api_base", &self.api_base)
            .field("api_token", &"[REDACTED]")
            .field("confirm_orders", &self.confirm_orders)
            .finish()
    }
}

/// Snipcart webhook configuration.
#[derive(Clone)]
pub struct SnipcartConfig {
    /// Snipcart base URL for request-token validation
    pub validation_base: String,
    /// Secret API key used to authenticate the validation call
    pub secret_key: SecretString,
}

impl std::fmt::Debug for SnipcartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnipcartConfig")
            .field("validation_base", &self.validation_base)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PRESSROOM_DATABASE_URL")?;
        let host = get_env_or_default("PRESSROOM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRESSROOM_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PRESSROOM_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRESSROOM_PORT".to_string(), e.to_string()))?;

        let printful = PrintfulConfig::from_env()?;
        let snipcart = SnipcartConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            printful,
            snipcart,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PrintfulConfig {
    /// Load Printful settings from the environment.
    ///
    /// Exposed separately so the CLI can sync without requiring the
    /// Snipcart secrets the HTTP server needs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `PRINTFUL_API_TOKEN` is missing or insecure.
    pub fn from_env() -> Result<Self, ConfigError> {
        let confirm_orders = get_env_or_default("PRINTFUL_CONFIRM_ORDERS", "false")
            .parse::<bool>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRINTFUL_CONFIRM_ORDERS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_base: get_env_or_default("PRINTFUL_API_BASE", "https://api.printful.com"),
            api_token: get_validated_secret("PRINTFUL_API_TOKEN")?,
            confirm_orders,
        })
    }
}

impl SnipcartConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            validation_base: get_env_or_default("SNIPCART_VALIDATION_BASE", "https://app.snipcart.com"),
            secret_key: get_validated_secret("SNIPCART_SECRET_KEY")?,
        })
    }
}

/// Load just the database URL from the environment.
///
/// Calls `dotenvy::dotenv()` first, like [`ServerConfig::from_env`].
///
/// # Errors
///
/// Returns `ConfigError` if neither `PRESSROOM_DATABASE_URL` nor
/// `DATABASE_URL` is set.
pub fn database_url_from_env() -> Result<SecretString, ConfigError> {
    let _ = dotenvy::dotenv();
    get_database_url("PRESSROOM_DATABASE_URL")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., PRESSROOM_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL (set by Fly.io postgres attach)
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a real API key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
