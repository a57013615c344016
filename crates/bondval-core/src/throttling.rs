use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Request pacer shared by every worker of a dispatch.
///
/// Without a quota the pacer never waits.
#[derive(Clone, Default)]
pub struct RequestPacer {
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl RequestPacer {
    pub fn unlimited() -> Self {
        Self { limiter: None }
    }

    /// Allow at most `per_second` attempts per second with an equal burst.
    pub fn per_second(per_second: NonZeroU32) -> Self {
        Self {
            limiter: Some(Arc::new(RateLimiter::direct(Quota::per_second(per_second)))),
        }
    }

    pub fn from_quota(quota: Option<NonZeroU32>) -> Self {
        quota.map(Self::per_second).unwrap_or_default()
    }

    /// Waits until the quota admits one more attempt.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for RequestPacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPacer")
            .field("limited", &self.limiter.is_some())
            .finish()
    }
}
