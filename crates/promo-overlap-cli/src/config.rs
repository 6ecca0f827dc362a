//! Command-line and environment configuration.

use clap::{Args, ValueEnum};

/// Default backend base URL for a local development server.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/lila_shop";

/// Where to reach the shop backend.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Backend base URL (e.g. http://localhost:8080/lila_shop)
    #[arg(long, env = "PROMO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token for staff endpoints
    #[arg(long, env = "PROMO_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Single-line human-readable output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Diagnostic output settings. Logs go to stderr; `RUST_LOG` overrides the level.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level or filter directive (e.g. "info", "promo_overlap=debug")
    #[arg(long, global = true, env = "PROMO_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log line format
    #[arg(long, global = true, env = "PROMO_LOG_FORMAT", value_enum, default_value_t)]
    pub log_format: LogFormat,
}
