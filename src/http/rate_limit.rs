//! Request pacing
//!
//! Uses the governor crate. A limiter with a burst of one enforces a
//! minimum interval between consecutive calls.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for request pacing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Time to replenish one permit
    pub period: Duration,
    /// Burst size (max permits available at once)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::per_second(10)
    }
}

impl RateLimiterConfig {
    /// Allow `requests` per second with an equal burst
    pub fn per_second(requests: u32) -> Self {
        let requests = requests.max(1);
        Self {
            period: Duration::from_secs(1) / requests,
            burst_size: requests,
        }
    }

    /// At most one call per `interval`
    pub fn fixed_interval(interval: Duration) -> Self {
        Self {
            period: interval,
            burst_size: 1,
        }
    }
}

/// Token bucket limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX))
            .allow_burst(burst);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
