//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `EMAIL_SERVER_USER` - SMTP account, also the From address
//! - `EMAIL_SERVER_PASSWORD` - SMTP password
//! - `EMAIL_ADMIN` - Recipient of back-office order copies
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - `PostgreSQL` session store
//!   (in-memory sessions when unset)
//! - `CATALOG_PATH` - Product catalog JSON (default: crates/storefront/content/catalog.json)
//! - `SEARCH_DEBOUNCE_MS` - Typeahead quiet interval (default: 150, 0 disables)
//! - `RATE_LIMIT_REPLENISH_MS` - Checkout/SEO token refill period (default: 6000)
//! - `RATE_LIMIT_BURST` - Checkout/SEO burst size per IP (default: 5)
//! - `SMTP_HOST` - SMTP server (default: smtp.gmail.com)
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `CLAUDE_API_KEY` - Anthropic API key; the SEO tool is disabled without it
//! - `CLAUDE_MODEL` - Claude model ID (default: claude-sonnet-4-20250514)
//! - `CLAUDE_API_URL` - Messages endpoint (default: Anthropic production)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Catalog location when `CATALOG_PATH` is unset, relative to the workspace root.
pub const DEFAULT_CATALOG_PATH: &str = "crates/storefront/content/catalog.json";
const DEFAULT_SEARCH_DEBOUNCE_MS: &str = "150";
const DEFAULT_RATE_LIMIT_REPLENISH_MS: &str = "6000";
const DEFAULT_RATE_LIMIT_BURST: &str = "5";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: &str = "587";
const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// `PostgreSQL` URL for the session store (contains password)
    pub database_url: Option<SecretString>,
    /// Product catalog JSON file
    pub catalog_path: PathBuf,
    /// Quiet interval before a typeahead request is scored
    pub search_debounce: Duration,
    /// Per-IP limits for checkout and the SEO tool
    pub rate_limit: RateLimitConfig,
    /// Order confirmation mail settings
    pub email: EmailConfig,
    /// Claude API settings; `None` disables the SEO tool
    pub claude: Option<ClaudeConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Token bucket settings for rate-limited endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Time to refill one request token
    pub replenish_interval: Duration,
    /// Requests allowed back to back
    pub burst: u32,
}

/// SMTP configuration for order emails.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP account; also used as the From address
    pub username: String,
    /// SMTP password
    pub password: SecretString,
    /// Address that receives the back-office copy of every order
    pub admin_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("admin_address", &self.admin_address)
            .finish()
    }
}

/// Claude API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClaudeConfig {
    /// Anthropic API key
    pub api_key: SecretString,
    /// Model ID (e.g., claude-sonnet-4-20250514)
    pub model: String,
    /// Messages API endpoint
    pub api_url: String,
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Source of configuration values, keyed by variable name.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl StorefrontConfig {
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
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        let host = parse_env(env, "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env(env, "STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env(env, "STOREFRONT_BASE_URL")?;
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let database_url = env("STOREFRONT_DATABASE_URL")
            .or_else(|| env("DATABASE_URL"))
            .map(SecretString::from);
        let catalog_path = PathBuf::from(get_env_or_default(env, "CATALOG_PATH", DEFAULT_CATALOG_PATH));
        let search_debounce =
            Duration::from_millis(parse_env(env, "SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)?);

        let rate_limit = RateLimitConfig::from_lookup(env)?;
        let email = EmailConfig::from_lookup(env)?;
        let claude = ClaudeConfig::from_lookup(env)?;

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            catalog_path,
            search_debounce,
            rate_limit,
            email,
            claude,
            sentry_dsn: env("SENTRY_DSN"),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env(env, "SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env(env, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl RateLimitConfig {
    fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        let replenish_ms: u64 =
            parse_env(env, "RATE_LIMIT_REPLENISH_MS", DEFAULT_RATE_LIMIT_REPLENISH_MS)?;
        let burst: u32 = parse_env(env, "RATE_LIMIT_BURST", DEFAULT_RATE_LIMIT_BURST)?;
        if replenish_ms == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "RATE_LIMIT_REPLENISH_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        if burst == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "RATE_LIMIT_BURST".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            replenish_interval: Duration::from_millis(replenish_ms),
            burst,
        })
    }
}

impl EmailConfig {
    fn from_lookup(env: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            smtp_host: get_env_or_default(env, "SMTP_HOST", DEFAULT_SMTP_HOST),
            smtp_port: parse_env(env, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            username: get_required_env(env, "EMAIL_SERVER_USER")?,
            password: SecretString::from(get_required_env(env, "EMAIL_SERVER_PASSWORD")?),
            admin_address: get_required_env(env, "EMAIL_ADMIN")?,
        })
    }
}

impl ClaudeConfig {
    /// Load just the Claude settings, for tools that need nothing else.
    ///
    /// Returns `Ok(None)` when `CLAUDE_API_KEY` is unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the key fails secret validation.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    fn from_lookup(env: Lookup<'_>) -> Result<Option<Self>, ConfigError> {
        if env("CLAUDE_API_KEY").is_none() {
            return Ok(None);
        }
        Ok(Some(Self {
            api_key: get_validated_secret(env, "CLAUDE_API_KEY")?,
            model: get_env_or_default(env, "CLAUDE_MODEL", DEFAULT_CLAUDE_MODEL),
            api_url: get_env_or_default(env, "CLAUDE_API_URL", DEFAULT_CLAUDE_API_URL),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(env: Lookup<'_>, key: &str) -> Result<String, ConfigError> {
    env(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: Lookup<'_>, key: &str, default: &str) -> String {
    env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(env: Lookup<'_>, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(env, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
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

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret.
fn get_validated_secret(env: Lookup<'_>, key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(env, key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
