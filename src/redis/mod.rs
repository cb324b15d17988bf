pub mod client;
pub mod pool;
pub mod script;

pub use client::RedisStoreClient;
pub use pool::create_redis_pool;

use crate::errors::Result;
use async_trait::async_trait;

/// Narrow seam over the shared store: run one atomic operation against one
/// key and return its result.
///
/// The only consistency guarantee the system relies on lives behind this
/// trait: the store must execute the bucket update as a single indivisible
/// unit per key, so no concurrent invocation observes a half-applied state.
/// Redis gives this for free by running a Lua script without interleaving
/// other commands. Tests substitute in-process fakes.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Execute the token bucket script for `key`.
    ///
    /// `now_ms` is the caller's clock reading (milliseconds since epoch);
    /// the store's own clock is never consulted, which keeps decisions
    /// deterministic from the caller's perspective. Returns whether the
    /// request was admitted.
    async fn execute_token_bucket_script(
        &self,
        key: &str,
        capacity: u64,
        refill_rate_per_second: f64,
        now_ms: u64,
    ) -> Result<bool>;

    /// Check if the store is healthy
    async fn health_check(&self) -> Result<()>;
}
