//! Service Configuration Settings
//!
//! Configuration types for the candlestick service, loaded from environment
//! variables. Parsing goes through a key lookup function so tests can feed
//! explicit values instead of mutating the process environment.

use std::time::Duration;

/// Default Yahoo Finance chart API host.
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Default `User-Agent` sent upstream. The chart API rejects empty agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Either "anything" or an explicit list of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList {
    /// Any value is allowed (`*`).
    Any,
    /// Only the listed values are allowed.
    List(Vec<String>),
}

impl AllowList {
    /// Parse a comma-separated list; `*` or an empty string means [`AllowList::Any`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let items: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToString::to_string)
            .collect();

        if items.is_empty() || items.iter().any(|item| item == "*") {
            Self::Any
        } else {
            Self::List(items)
        }
    }

    /// Whether this list allows anything.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: String,
    /// HTTP port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Upstream market data provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    /// Base URL of the chart API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempts per fetch (1 = no retry).
    pub max_attempts: u32,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_attempts: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Cross-origin resource sharing policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsSettings {
    /// Origins allowed to call the API.
    pub allowed_origins: AllowList,
    /// HTTP methods allowed cross-origin.
    pub allowed_methods: AllowList,
    /// Request headers allowed cross-origin.
    pub allowed_headers: AllowList,
    /// Whether browsers may send credentials.
    pub allow_credentials: bool,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: AllowList::Any,
            allowed_methods: AllowList::Any,
            allowed_headers: AllowList::Any,
            allow_credentials: true,
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Upstream provider settings.
    pub upstream: UpstreamSettings,
    /// CORS policy.
    pub cors: CorsSettings,
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is set to a value that cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerSettings::default();
        let server = ServerSettings {
            host: lookup("HTTP_HOST").unwrap_or(server_defaults.host),
            port: parse_or(&lookup, "HTTP_PORT", server_defaults.port)?,
        };

        let upstream_defaults = UpstreamSettings::default();
        let max_attempts = parse_or(&lookup, "UPSTREAM_MAX_ATTEMPTS", upstream_defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "UPSTREAM_MAX_ATTEMPTS".to_string(),
                value: "0".to_string(),
            });
        }

        let upstream = UpstreamSettings {
            base_url: lookup("YAHOO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(upstream_defaults.base_url),
            timeout: parse_or(
                &lookup,
                "UPSTREAM_TIMEOUT_SECS",
                upstream_defaults.timeout.as_secs(),
            )
            .map(Duration::from_secs)?,
            max_attempts,
            user_agent: lookup("UPSTREAM_USER_AGENT").unwrap_or(upstream_defaults.user_agent),
        };

        let cors_defaults = CorsSettings::default();
        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map_or(cors_defaults.allowed_origins, |v| AllowList::parse(&v));
        if let AllowList::List(origins) = &allowed_origins
            && let Some(bad) = origins.iter().find(|origin| !is_valid_origin(origin))
        {
            return Err(ConfigError::InvalidValue {
                key: "CORS_ALLOWED_ORIGINS".to_string(),
                value: bad.clone(),
            });
        }

        let cors = CorsSettings {
            allowed_origins,
            allowed_methods: lookup("CORS_ALLOWED_METHODS")
                .map_or(cors_defaults.allowed_methods, |v| AllowList::parse(&v)),
            allowed_headers: lookup("CORS_ALLOWED_HEADERS")
                .map_or(cors_defaults.allowed_headers, |v| AllowList::parse(&v)),
            allow_credentials: parse_bool_or(
                &lookup,
                "CORS_ALLOW_CREDENTIALS",
                cors_defaults.allow_credentials,
            )?,
        };

        Ok(Self {
            server,
            upstream,
            cors,
        })
    }

    /// Socket address string for the HTTP listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

/// `scheme://host[:port]` with an http(s) scheme and no path.
fn is_valid_origin(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
    else {
        return false;
    };

    !rest.is_empty()
        && !rest.contains('/')
        && rest.chars().all(|c| c.is_ascii_graphic())
}

fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}
