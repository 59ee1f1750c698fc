//! Rate Limit Config

use std::time::Duration;

use clap::Args;

/// Sliding-window limits for public endpoints.
#[derive(Debug, Args)]
pub struct RateLimitConfig {
    /// Requests allowed per client and route within one window
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = 10_usize)]
    pub rate_limit_max_requests: usize,

    /// Window length in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECONDS", default_value_t = 60_u64)]
    pub rate_limit_window_seconds: u64,
}

impl RateLimitConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_seconds)
    }
}
