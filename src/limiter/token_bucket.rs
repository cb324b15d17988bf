use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// In-process token bucket for a single key.
///
/// The bucket starts full and refills lazily: every consume attempt first
/// credits the tokens accrued since the last attempt, capped at capacity,
/// then tries to take one. Refill and consume happen under one lock, so
/// concurrent callers never admit against the same pre-consume count.
///
/// This is the degraded-mode twin of the Redis-side bucket. Note the
/// first-touch difference: this bucket starts full, the persisted one
/// starts empty.
pub struct TokenBucket {
    capacity: u64,
    refill_rate_per_second: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket. `capacity` and `refill_rate_per_second` must be
    /// positive; the configuration layer is responsible for rejecting
    /// anything else before a bucket is built.
    pub fn new(capacity: u64, refill_rate_per_second: f64) -> Self {
        Self {
            capacity,
            refill_rate_per_second,
            state: Mutex::new(BucketState {
                tokens: capacity as f64,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Try to take one token. Returns `true` when the request is admitted.
    ///
    /// Never blocks on I/O and cannot fail; the critical section is a few
    /// arithmetic operations.
    pub fn try_consume(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.refill(&mut state);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Current token count, after crediting any pending refill.
    pub fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.refill(&mut state);
        state.tokens
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill);

        if !elapsed.is_zero() {
            let refilled = state.tokens + elapsed.as_secs_f64() * self.refill_rate_per_second;
            state.tokens = refilled.min(self.capacity as f64);
            // The timestamp moves even when the bucket is already full, so a
            // capped bucket never banks more than capacity.
            state.last_refill = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    const CAPACITY: u64 = 10;
    const REFILL_RATE: f64 = 5.0;

    #[test]
    fn test_allows_requests_up_to_capacity() {
        let bucket = TokenBucket::new(CAPACITY, REFILL_RATE);

        for i in 0..CAPACITY {
            assert!(bucket.try_consume(), "request {} should be allowed", i);
        }
    }

    #[test]
    fn test_rejects_when_tokens_exhausted() {
        let bucket = TokenBucket::new(CAPACITY, REFILL_RATE);

        for _ in 0..CAPACITY {
            bucket.try_consume();
        }

        assert!(
            !bucket.try_consume(),
            "request should be rejected when tokens exhausted"
        );
    }

    #[test]
    fn test_refills_tokens_over_time() {
        let bucket = TokenBucket::new(CAPACITY, REFILL_RATE);

        for _ in 0..CAPACITY {
            bucket.try_consume();
        }
        assert!(!bucket.try_consume());

        // 250ms at 5 tokens/sec refills ~1.25 tokens
        thread::sleep(Duration::from_millis(250));

        assert!(
            bucket.try_consume(),
            "should allow request after token refill"
        );
    }

    #[test]
    fn test_tokens_never_exceed_capacity() {
        let bucket = TokenBucket::new(CAPACITY, REFILL_RATE);

        for _ in 0..CAPACITY {
            bucket.try_consume();
        }

        // Long enough to refill well past capacity if the cap were missing
        thread::sleep(Duration::from_secs(3));

        assert!(bucket.available_tokens() <= CAPACITY as f64);

        let mut allowed = 0;
        for _ in 0..CAPACITY * 2 {
            if bucket.try_consume() {
                allowed += 1;
            }
        }

        assert!(
            allowed <= CAPACITY,
            "should not allow more than capacity even after long wait"
        );
    }

    #[test]
    fn test_concurrent_consume_admits_exactly_capacity() {
        const THREADS: usize = 100;
        let bucket = Arc::new(TokenBucket::new(50, 10.0));
        let allowed = Arc::new(AtomicUsize::new(0));
        let denied = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let bucket = Arc::clone(&bucket);
                let allowed = Arc::clone(&allowed);
                let denied = Arc::clone(&denied);
                thread::spawn(move || {
                    if bucket.try_consume() {
                        allowed.fetch_add(1, Ordering::SeqCst);
                    } else {
                        denied.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(allowed.load(Ordering::SeqCst) + denied.load(Ordering::SeqCst), THREADS);
        assert_eq!(
            allowed.load(Ordering::SeqCst),
            50,
            "only capacity number of requests should be allowed"
        );
        assert_eq!(denied.load(Ordering::SeqCst), THREADS - 50);
    }

    #[test]
    fn test_concurrent_refill_admits_approximately_rate() {
        let bucket = Arc::new(TokenBucket::new(50, 10.0));

        for _ in 0..50 {
            bucket.try_consume();
        }

        thread::sleep(Duration::from_millis(1100));

        let allowed = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let bucket = Arc::clone(&bucket);
                let allowed = Arc::clone(&allowed);
                thread::spawn(move || {
                    if bucket.try_consume() {
                        allowed.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // ~11 tokens accrue in 1.1s at 10/sec; allow timing slack either way
        let count = allowed.load(Ordering::SeqCst);
        assert!(count >= 8, "expected roughly 11 admissions, got {}", count);
        assert!(count <= 13, "expected roughly 11 admissions, got {}", count);
    }
}
