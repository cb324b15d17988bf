pub mod distributed;
pub mod token_bucket;

pub use distributed::DistributedRateLimiter;
pub use token_bucket::TokenBucket;

use async_trait::async_trait;

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request is allowed
    pub allowed: bool,

    /// Which path produced the decision
    pub source: DecisionSource,
}

/// Where an admission decision was made.
///
/// The caller-facing contract is a single boolean; the source exists so the
/// degraded path is observable instead of being a silent catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    /// The shared store ran the atomic bucket update and answered.
    Remote,

    /// The store call failed; a process-local bucket decided instead.
    Fallback,
}

impl Decision {
    pub fn remote(allowed: bool) -> Self {
        Self {
            allowed,
            source: DecisionSource::Remote,
        }
    }

    pub fn fallback(allowed: bool) -> Self {
        Self {
            allowed,
            source: DecisionSource::Fallback,
        }
    }
}

/// Trait for admission-deciding rate limiters
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Decide admission for one unit of work under `key`'s quota.
    ///
    /// Operational failures never surface here; a limiter always answers.
    async fn check(&self, key: &str, capacity: u64, refill_rate_per_second: f64) -> Decision;

    /// Boundary form of [`check`](Self::check): just the admitted flag.
    async fn allow(&self, key: &str, capacity: u64, refill_rate_per_second: f64) -> bool {
        self.check(key, capacity, refill_rate_per_second).await.allowed
    }
}
