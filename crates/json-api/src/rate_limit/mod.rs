//! Sliding-window rate limiting for public endpoints.

mod memory;
pub(crate) mod middleware;

use std::time::{Duration, Instant};

use async_trait::async_trait;

pub(crate) use memory::InMemoryRateLimitStore;

/// How many requests one key may make within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RateLimit {
    pub(crate) max_requests: usize,
    pub(crate) window: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RateLimitDecision {
    Allowed { remaining: usize },

    /// The key is over its limit until `retry_after` has elapsed.
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub(crate) const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Counter storage shared by every request the server handles.
#[async_trait]
pub(crate) trait RateLimitStore: Send + Sync {
    /// Record a request for `key` at `now` unless it is over the limit.
    async fn hit(&self, key: &str, now: Instant) -> RateLimitDecision;

    /// Forget keys with no requests inside the window ending at `now`.
    async fn purge(&self, now: Instant);
}
