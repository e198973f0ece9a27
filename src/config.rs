//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Database credentials may additionally
//! be supplied as a JSON secrets file referenced by `DB_SECRETS_FILE`.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Top-level service configuration.
///
/// Loaded once at startup via [`ServiceConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Upstream API client settings.
    pub upstream: UpstreamConfig,
    /// Per-endpoint rate limit.
    pub rate_limit: RateLimitConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

/// Credentials as stored in the secrets file.
#[derive(Clone, Deserialize)]
pub struct DbCredentials {
    /// Database role.
    pub user: String,
    /// Role password.
    pub password: String,
    /// Server hostname.
    pub host: String,
    /// Server port.
    #[serde(default = "default_db_port")]
    pub port: u16,
    /// Application database name.
    pub dbname: String,
}

impl std::fmt::Debug for DbCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .finish()
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Explicit connection string; takes precedence over `credentials`.
    pub url: Option<String>,
    /// Credentials used when no URL is given.
    pub credentials: DbCredentials,
    /// Maximum number of database connections in the pool.
    pub max_connections: u32,
    /// Minimum idle connections in the pool.
    pub min_connections: u32,
    /// Timeout in seconds for acquiring a database connection.
    pub connect_timeout_secs: u64,
    /// Create the application database at startup if it does not exist.
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    /// Connection options for the application database.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is set but is not a valid Postgres URL.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match &self.url {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid postgres connection string"),
            None => Ok(PgConnectOptions::new()
                .host(&self.credentials.host)
                .port(self.credentials.port)
                .username(&self.credentials.user)
                .password(&self.credentials.password)
                .database(&self.credentials.dbname)),
        }
    }

    /// Acquire timeout as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Upstream API client settings.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Scheme prepended to bare `source_url` hosts.
    pub scheme: String,
    /// Honor an `http://` or `https://` prefix supplied by the caller.
    /// When off, any such prefix is replaced by `scheme`.
    pub allow_explicit_scheme: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Upper bound on pages followed in a single sync.
    pub max_pages: usize,
}

/// Token-bucket parameters applied to each rate-limited endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub burst: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            burst: 2,
            window_secs: 5,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable text.
    Text,
}

impl LogFormat {
    /// `text` (any case) selects [`LogFormat::Text`]; anything else,
    /// including an unset variable, selects [`LogFormat::Json`].
    #[must_use]
    pub fn from_setting(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.eq_ignore_ascii_case("text") => Self::Text,
            _ => Self::Json,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` cannot be parsed as a
    /// [`SocketAddr`], or if `DB_SECRETS_FILE` is set but cannot be read
    /// or parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .context("LISTEN_ADDR is not a valid socket address")?;

        let credentials = match std::env::var("DB_SECRETS_FILE") {
            Ok(path) => load_credentials(Path::new(&path))?,
            Err(_) => credentials_from_env(),
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|u| !u.is_empty()),
            credentials,
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
            min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 1),
            connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5),
            create_if_missing: parse_env_bool("DATABASE_CREATE_IF_MISSING", true),
        };

        let upstream = UpstreamConfig {
            scheme: std::env::var("UPSTREAM_SCHEME")
                .unwrap_or_else(|_| "https".to_string()),
            allow_explicit_scheme: parse_env_bool("UPSTREAM_ALLOW_EXPLICIT_SCHEME", false),
            timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", 10),
            max_pages: parse_env("UPSTREAM_MAX_PAGES", 1000),
        };

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            burst: parse_env("RATE_LIMIT_BURST", defaults.burst),
            window_secs: parse_env("RATE_LIMIT_WINDOW_SECS", defaults.window_secs),
        };

        let log_format = LogFormat::from_setting(std::env::var("LOG_FORMAT").ok().as_deref());

        Ok(Self {
            listen_addr,
            database,
            upstream,
            rate_limit,
            log_format,
        })
    }
}

/// Reads database credentials from a JSON secrets file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON with
/// the expected keys.
pub fn load_credentials(path: &Path) -> anyhow::Result<DbCredentials> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read secrets file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse secrets file {}", path.display()))
}

fn credentials_from_env() -> DbCredentials {
    DbCredentials {
        user: env_or("DB_USER", "postgres"),
        password: env_or("DB_PASSWORD", "postgres"),
        host: env_or("DB_HOST", "localhost"),
        port: parse_env("DB_PORT", default_db_port()),
        dbname: env_or("DB_NAME", "postgres"),
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

const fn default_db_port() -> u16 {
    5432
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Returns `default` when the
/// variable is unset or not recognized by [`parse_bool`].
fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

/// Accepts `true`/`1` and `false`/`0`, ignoring ASCII case.
fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
