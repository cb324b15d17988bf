use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateLimitError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Invalid rate configuration: {0}")]
    InvalidRate(String),

    #[error("Redis connection error: {0}")]
    RedisConnectionError(#[from] redis::RedisError),

    #[error("Redis pool error: {0}")]
    PoolError(String),

    #[error("Script execution error: {0}")]
    ScriptExecutionError(String),

    #[error("Malformed script response: {0}")]
    MalformedResponse(String),

    #[error("Redis command timed out after {0:?}")]
    CommandTimeout(Duration),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for rate limiter operations
pub type Result<T> = std::result::Result<T, RateLimitError>;
