//! Rate limit middleware.

use std::{sync::Arc, time::Instant};

use salvo::{http::header::RETRY_AFTER, prelude::*};
use tracing::warn;

use crate::{observability::record_rate_limited, rate_limit::RateLimitDecision, state::State};

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(_error) => {
            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    let client = client_address(req);
    let route = req.uri().path().to_owned();
    let key = format!("{client}:{route}");

    match state.rate_limits.hit(&key, Instant::now()).await {
        RateLimitDecision::Allowed { .. } => {
            ctrl.call_next(req, depot, res).await;
        }
        RateLimitDecision::Limited { retry_after } => {
            warn!(client = %client, route = %route, "rate limit exceeded");
            record_rate_limited(&route);

            let seconds = retry_after.as_secs().max(1).to_string();

            if let Err(source) = res.add_header(RETRY_AFTER, seconds, true) {
                warn!("failed to set retry-after header: {source}");
            }

            res.render(
                StatusError::too_many_requests().brief("Too many requests, try again later"),
            );
            ctrl.skip_rest();
        }
    }
}

/// First `X-Forwarded-For` entry, falling back to the peer IP.
fn client_address(req: &Request) -> String {
    if let Some(forwarded) = req.header::<String>(FORWARDED_FOR_HEADER)
        && let Some(first) = forwarded.split(',').next()
    {
        let first = first.trim();

        if !first.is_empty() {
            return first.to_owned();
        }
    }

    let remote = req.remote_addr();

    remote
        .as_ipv4()
        .map(|addr| addr.ip().to_string())
        .or_else(|| remote.as_ipv6().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_owned())
}
