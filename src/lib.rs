pub mod config;
pub mod errors;
pub mod limiter;
pub mod redis;

// Re-export commonly used types
pub use config::{AppConfig, LimitConfig, RedisConfig};
pub use errors::{RateLimitError, Result};
pub use limiter::{Decision, DecisionSource, DistributedRateLimiter, RateLimiter, TokenBucket};
pub use redis::StoreClient;
