use crate::errors::{RateLimitError, Result};
use crate::redis::script::{get_script, load_script};
use crate::redis::StoreClient;
use async_trait::async_trait;
use deadpool_redis::Pool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Redis-backed store client.
///
/// Loads the token bucket script once at construction and executes it via
/// EVALSHA afterwards. Every command is bounded by `command_timeout`; an
/// elapsed timeout is reported as an error like any other store failure.
pub struct RedisStoreClient {
    pool: Arc<Pool>,
    command_timeout: Duration,
}

impl RedisStoreClient {
    /// Create a new store client over an existing pool
    pub async fn new(pool: Pool, command_timeout: Duration) -> Result<Self> {
        let pool = Arc::new(pool);

        let mut conn = pool.get().await.map_err(|e| {
            RateLimitError::PoolError(format!("Failed to get connection for script loading: {}", e))
        })?;
        let _sha = load_script(&mut *conn).await?;

        Ok(Self {
            pool,
            command_timeout,
        })
    }
}

#[async_trait]
impl StoreClient for RedisStoreClient {
    async fn execute_token_bucket_script(
        &self,
        key: &str,
        capacity: u64,
        refill_rate_per_second: f64,
        now_ms: u64,
    ) -> Result<bool> {
        let mut conn = self.pool.get().await.map_err(|e| {
            error!("Failed to get Redis connection: {}", e);
            RateLimitError::PoolError(format!("Pool exhausted: {}", e))
        })?;

        // Argument order matches the script: capacity, refill rate, caller clock
        let args: Vec<String> = vec![
            capacity.to_string(),
            refill_rate_per_second.to_string(),
            now_ms.to_string(),
        ];

        debug!(
            "Executing token bucket script: key={}, capacity={}, refill_rate={}",
            key, capacity, refill_rate_per_second
        );

        let script = get_script();
        let invocation = async {
            let value: redis::Value = script
                .key(key)
                .arg(&args)
                .invoke_async(&mut *conn)
                .await
                .map_err(|e| {
                    error!("Script execution failed: {}", e);
                    RateLimitError::ScriptExecutionError(format!("Script execution failed: {}", e))
                })?;
            parse_script_response(value)
        };

        let allowed = tokio::time::timeout(self.command_timeout, invocation)
            .await
            .map_err(|_| RateLimitError::CommandTimeout(self.command_timeout))??;

        debug!("Script result: key={}, allowed={}", key, allowed);

        Ok(allowed)
    }

    async fn health_check(&self) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| RateLimitError::PoolError(format!("Pool exhausted: {}", e)))?;

        let response: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(RateLimitError::RedisConnectionError)?;

        if response != "PONG" {
            return Err(RateLimitError::MalformedResponse(format!(
                "Unexpected PING response: {}",
                response
            )));
        }

        Ok(())
    }
}

/// Parse the script reply. The script returns integer 1 (allow) or 0 (deny);
/// any other shape is malformed.
fn parse_script_response(value: redis::Value) -> Result<bool> {
    match value {
        redis::Value::Int(1) => Ok(true),
        redis::Value::Int(0) => Ok(false),
        redis::Value::Int(other) => Err(RateLimitError::MalformedResponse(format!(
            "Unexpected script result: {}",
            other
        ))),
        other => Err(RateLimitError::MalformedResponse(format!(
            "Unexpected script result type: {:?}",
            other
        ))),
    }
}
