//! State

use std::sync::Arc;

use beacon_app::context::AppContext;

use crate::rate_limit::{InMemoryRateLimitStore, RateLimit, RateLimitStore};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Counters for the rate-limited public routes.
    pub(crate) rate_limits: Arc<dyn RateLimitStore>,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, rate_limits: Arc<dyn RateLimitStore>) -> Self {
        Self { app, rate_limits }
    }

    /// State backed by an in-process rate limit store.
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext, rate_limit: RateLimit) -> Arc<Self> {
        Arc::new(Self::new(
            app,
            Arc::new(InMemoryRateLimitStore::new(rate_limit)),
        ))
    }
}
