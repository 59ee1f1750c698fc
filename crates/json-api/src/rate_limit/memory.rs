//! In-process rate limit store.

use std::{
    collections::{HashMap, VecDeque},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RateLimit, RateLimitDecision, RateLimitStore};

/// Keeps the request instants of each key inside the current window.
#[derive(Debug)]
pub(crate) struct InMemoryRateLimitStore {
    limit: RateLimit,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl InMemoryRateLimitStore {
    pub(crate) fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            hits: Mutex::new(HashMap::new()),
        }
    }

    fn evict_expired(&self, hits: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = hits.front() {
            if now.saturating_duration_since(*oldest) < self.limit.window {
                break;
            }

            hits.pop_front();
        }
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut map = self.hits.lock().await;
        let hits = map.entry(key.to_owned()).or_default();

        self.evict_expired(hits, now);

        if hits.len() >= self.limit.max_requests {
            let retry_after = hits.front().map_or(self.limit.window, |oldest| {
                self.limit
                    .window
                    .saturating_sub(now.saturating_duration_since(*oldest))
            });

            return RateLimitDecision::Limited {
                retry_after: retry_after.max(Duration::from_secs(1)),
            };
        }

        hits.push_back(now);

        RateLimitDecision::Allowed {
            remaining: self.limit.max_requests.saturating_sub(hits.len()),
        }
    }

    async fn purge(&self, now: Instant) {
        let mut map = self.hits.lock().await;

        for hits in map.values_mut() {
            self.evict_expired(hits, now);
        }

        map.retain(|_, hits| !hits.is_empty());
    }
}
