pub mod loader;
pub mod validator;

use serde::{Deserialize, Serialize};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Redis configuration (loaded from environment variables only)
    pub redis: RedisConfig,

    /// Quota parameters (loaded from file, with built-in defaults)
    pub limits: LimitConfig,
}

/// Redis connection configuration (loaded from environment variables)
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., "redis://localhost:6379")
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: usize,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Command timeout in seconds; the remote call is the only operation
    /// that may block, and this is its only bound
    pub command_timeout_secs: u64,
}

impl RedisConfig {
    /// Load Redis configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),

            max_connections: std::env::var("REDIS_MAX_CONN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),

            connection_timeout_secs: std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            command_timeout_secs: std::env::var("REDIS_COMMAND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            max_connections: 50,
            connection_timeout_secs: 5,
            command_timeout_secs: 2,
        }
    }
}

/// Quota parameters applied to every key.
///
/// Process-wide constants in the simplest deployment; callers layering
/// per-endpoint policy on top may pass their own values per check instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    /// Maximum tokens a bucket can hold (burst size)
    #[serde(default = "default_capacity")]
    pub capacity: u64,

    /// Tokens added per elapsed second
    #[serde(default = "default_refill_rate")]
    pub refill_rate_per_second: f64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            refill_rate_per_second: default_refill_rate(),
        }
    }
}

fn default_capacity() -> u64 {
    100
}

fn default_refill_rate() -> f64 {
    10.0
}
