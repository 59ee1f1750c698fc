//! Beacon JSON API Server

use std::{
    process,
    sync::Arc,
    time::{Duration, Instant},
};

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use beacon_app::context::AppContext;

use crate::{
    config::ServerConfig,
    rate_limit::{RateLimit, RateLimitStore},
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod config;
mod extensions;
mod healthcheck;
mod money;
mod observability;
mod packages;
mod payments;
mod promotions;
mod providers;
mod rate_limit;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Beacon JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "subscriber failed to install, nothing else can report it"
        )]
        {
            eprintln!("Logging error: {init_error}");
        }

        process::exit(1);
    }

    observability::apply_runtime_config(&config.observability);

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let app = match AppContext::connect(&config.database.options(), config.ozow.into_ozow_config())
        .await
    {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let rate_limit = RateLimit {
        max_requests: config.rate_limit.rate_limit_max_requests,
        window: config.rate_limit.window(),
    };

    let state = State::from_app_context(app, rate_limit);

    spawn_rate_limit_purge(Arc::clone(&state.rate_limits), rate_limit);

    let mut router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(observability::request_logging)
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler));

    if config.observability.metrics_enabled {
        router = router.push(Router::with_path("metrics").get(observability::metrics_handler));
    }

    let router = router
        .push(public_routes())
        .push(
            Router::with_path("admin")
                .hoop(auth::middleware::handler)
                .push(admin_routes()),
        );

    let doc = OpenApi::new("Beacon API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();
    let grace = config.server.shutdown_grace();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;
}

fn public_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("promotions/validate")
                .hoop(rate_limit::middleware::handler)
                .post(promotions::validate::handler),
        )
        .push(
            Router::with_path("packages")
                .get(packages::index::handler)
                .push(Router::with_path("{uuid}").get(packages::get::handler)),
        )
        .push(
            Router::with_path("payments")
                .push(
                    Router::new()
                        .hoop(rate_limit::middleware::handler)
                        .post(payments::create::handler),
                )
                .push(Router::with_path("notify").post(payments::notify::handler))
                .push(Router::with_path("{outcome}").get(payments::outcome::handler)),
        )
}

fn admin_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("providers")
                .get(providers::index::handler)
                .post(providers::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(providers::get::handler)
                        .put(providers::update::handler)
                        .delete(providers::delete::handler),
                ),
        )
        .push(
            Router::with_path("packages")
                .get(packages::index::admin_handler)
                .post(packages::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(packages::get::admin_handler)
                        .put(packages::update::handler)
                        .delete(packages::delete::handler),
                ),
        )
        .push(
            Router::with_path("promotions")
                .get(promotions::index::handler)
                .post(promotions::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(promotions::get::handler)
                        .put(promotions::update::handler)
                        .delete(promotions::delete::handler),
                ),
        )
}

/// Drop expired rate limit entries once per window.
fn spawn_rate_limit_purge(store: Arc<dyn RateLimitStore>, rate_limit: RateLimit) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(rate_limit.window.max(Duration::from_secs(1)));

        loop {
            ticker.tick().await;
            store.purge(Instant::now()).await;
        }
    });
}
