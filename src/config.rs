//! Configuration management for ACRFD.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present) covering:
//! - The public REST API the records are fetched from
//! - The public site URL that shareable links are built against
//! - The quiet period used to coalesce URL updates

use std::env;
use std::sync::OnceLock;
use std::time::Duration;

use tracing::warn;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub url: UrlConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, without the `/api/public` prefix.
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UrlConfig {
    /// Page URL that query parameters and fragments are applied to.
    pub public_url: String,
    /// Quiet period before a batch of parameter writes is navigated.
    pub debounce_ms: u64,
}

impl UrlConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    pub filter: String,
}

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "acrfd/0.1";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:4200/applications";
const DEFAULT_DEBOUNCE_MS: u64 = 100;
const DEFAULT_LOG_FILTER: &str = "acrfd=info";

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            api: ApiConfig {
                base_url: get_or("ACRFD_API_URL", DEFAULT_API_URL)
                    .trim_end_matches('/')
                    .to_string(),
                timeout_secs: parse_or(
                    "ACRFD_API_TIMEOUT_SECS",
                    lookup("ACRFD_API_TIMEOUT_SECS"),
                    DEFAULT_TIMEOUT_SECS,
                ),
                user_agent: get_or("ACRFD_USER_AGENT", DEFAULT_USER_AGENT),
            },
            url: UrlConfig {
                public_url: get_or("ACRFD_PUBLIC_URL", DEFAULT_PUBLIC_URL),
                debounce_ms: parse_or(
                    "ACRFD_URL_DEBOUNCE_MS",
                    lookup("ACRFD_URL_DEBOUNCE_MS"),
                    DEFAULT_DEBOUNCE_MS,
                ),
            },
            logging: LoggingConfig {
                filter: get_or("RUST_LOG", DEFAULT_LOG_FILTER),
            },
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid numeric setting, using default");
            default
        }),
        None => default,
    }
}
