use crate::limiter::{Decision, RateLimiter, TokenBucket};
use crate::redis::StoreClient;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Namespace prefix the interception layer puts on rate-limit keys.
/// Stripped before indexing the local fallback map, so `rate-limit:alice`
/// and a bare `alice` land on the same bucket.
const KEY_NAMESPACE: &str = "rate-limit:";

/// Rate limiter that prefers the shared store and degrades to per-process
/// token buckets when the store cannot answer.
///
/// Each `check` makes exactly one store round-trip. Any failure of that
/// round-trip (connection, timeout, malformed response) routes the decision
/// to a local bucket for the key, created lazily with the parameters of
/// this call. There is no retry and no sticky degraded mode; the next call
/// tries the store again.
///
/// While degraded, every process enforces its own quota independently, so
/// the effective aggregate limit becomes N times the configured one for N
/// processes. Availability is traded for strictness here on purpose.
///
/// The fallback map never evicts: one bucket per distinct identity seen
/// during an outage, for the lifetime of this limiter instance. Whether to
/// bound that is the embedder's call.
pub struct DistributedRateLimiter<S: StoreClient> {
    store: Arc<S>,
    fallback_buckets: DashMap<String, Arc<TokenBucket>>,
}

impl<S: StoreClient> DistributedRateLimiter<S> {
    /// Create a new limiter over the given store client
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            fallback_buckets: DashMap::new(),
        }
    }

    fn fallback_decision(&self, key: &str, capacity: u64, refill_rate_per_second: f64) -> Decision {
        let identity = extract_identity(key);

        let bucket = self
            .fallback_buckets
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(TokenBucket::new(capacity, refill_rate_per_second)))
            .clone();
        // Entry guard dropped here; consuming outside it keeps unrelated
        // keys in the same shard from contending on this bucket's refill.

        Decision::fallback(bucket.try_consume())
    }
}

#[async_trait]
impl<S: StoreClient + 'static> RateLimiter for DistributedRateLimiter<S> {
    async fn check(&self, key: &str, capacity: u64, refill_rate_per_second: f64) -> Decision {
        let now_ms = epoch_millis();

        match self
            .store
            .execute_token_bucket_script(key, capacity, refill_rate_per_second, now_ms)
            .await
        {
            Ok(allowed) => {
                debug!("Remote decision: key={}, allowed={}", key, allowed);
                Decision::remote(allowed)
            }
            Err(e) => {
                warn!(
                    "Store unavailable for key '{}', falling back to local bucket: {}",
                    key, e
                );
                self.fallback_decision(key, capacity, refill_rate_per_second)
            }
        }
    }
}

/// Reduce a rate-limit key to the caller identity scoping one fallback bucket
fn extract_identity(key: &str) -> &str {
    key.strip_prefix(KEY_NAMESPACE).unwrap_or(key)
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
