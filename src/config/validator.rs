use crate::config::{AppConfig, LimitConfig, RedisConfig};
use crate::errors::{RateLimitError, Result};
use tracing::{debug, warn};

/// Validate the entire application configuration.
///
/// The bucket algorithms assume positive capacity and refill rate and do
/// not re-check them; anything non-positive is rejected here, before a
/// limiter is ever constructed.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    debug!("Validating configuration...");

    validate_redis_config(&config.redis)?;
    validate_limit_config(&config.limits)?;

    debug!("Configuration validation successful");
    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(RateLimitError::ConfigurationError(
            "Redis URL cannot be empty".to_string(),
        ));
    }

    if !config.url.starts_with("redis://") && !config.url.starts_with("rediss://") {
        return Err(RateLimitError::ConfigurationError(format!(
            "Invalid Redis URL format: {}. Must start with redis:// or rediss://",
            config.url
        )));
    }

    if config.max_connections == 0 {
        return Err(RateLimitError::ConfigurationError(
            "max_connections must be greater than 0".to_string(),
        ));
    }

    if config.max_connections > 1000 {
        warn!(
            "max_connections is very high ({}). This may consume excessive resources.",
            config.max_connections
        );
    }

    if config.connection_timeout_secs == 0 {
        return Err(RateLimitError::ConfigurationError(
            "connection_timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.command_timeout_secs == 0 {
        return Err(RateLimitError::ConfigurationError(
            "command_timeout_secs must be greater than 0".to_string(),
        ));
    }

    debug!("Redis configuration valid");
    Ok(())
}

/// Validate quota parameters
pub fn validate_limit_config(config: &LimitConfig) -> Result<()> {
    if config.capacity == 0 {
        return Err(RateLimitError::InvalidRate(
            "capacity must be greater than 0".to_string(),
        ));
    }

    if config.refill_rate_per_second <= 0.0 || !config.refill_rate_per_second.is_finite() {
        return Err(RateLimitError::InvalidRate(format!(
            "refill_rate_per_second must be positive (got {})",
            config.refill_rate_per_second
        )));
    }

    if config.refill_rate_per_second > 1_000_000.0 {
        warn!(
            "Very high refill_rate_per_second ({})",
            config.refill_rate_per_second
        );
    }

    let seconds_to_fill = config.capacity as f64 / config.refill_rate_per_second;
    if seconds_to_fill < 1.0 {
        warn!(
            "Capacity is very small relative to refill rate (bucket fills in {:.2}s)",
            seconds_to_fill
        );
    }

    if seconds_to_fill > 86400.0 {
        warn!(
            "Capacity is very large relative to refill rate (bucket takes {:.2} hours to fill)",
            seconds_to_fill / 3600.0
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = AppConfig {
            redis: RedisConfig::default(),
            limits: LimitConfig::default(),
        };

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_redis_url() {
        let mut config = AppConfig {
            redis: RedisConfig::default(),
            limits: LimitConfig::default(),
        };

        config.redis.url = "invalid_url".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_max_connections() {
        let mut config = AppConfig {
            redis: RedisConfig::default(),
            limits: LimitConfig::default(),
        };

        config.redis.max_connections = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_capacity() {
        let limits = LimitConfig {
            capacity: 0,
            refill_rate_per_second: 10.0,
        };

        assert!(validate_limit_config(&limits).is_err());
    }

    #[test]
    fn test_validate_non_positive_refill_rate() {
        let limits = LimitConfig {
            capacity: 100,
            refill_rate_per_second: 0.0,
        };
        assert!(validate_limit_config(&limits).is_err());

        let limits = LimitConfig {
            capacity: 100,
            refill_rate_per_second: -5.0,
        };
        assert!(validate_limit_config(&limits).is_err());
    }
}
