//! Token Gate JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use tokengate_app::{
    context::AppContext,
    domain::scoring::{HttpRiskScorer, RiskScorer},
};

use crate::{
    config::ServerConfig,
    observability::{Observability, metrics_handler, request_logging},
    state::{State, VerificationWindow},
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod audit;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod tokens;
mod transactions;

/// Token Gate JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
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

    let observability = Observability::init(&config).unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Observability error: {e}");
        }

        process::exit(1);
    });

    let scorer = match config.scoring.scorer_config().map(HttpRiskScorer::new) {
        None => None,
        Some(Ok(scorer)) => Some(Arc::new(scorer) as Arc<dyn RiskScorer>),
        Some(Err(init_error)) => {
            error!("failed to build risk scorer client: {init_error}");

            process::exit(1);
        }
    };

    let app = AppContext::in_memory(scorer);
    let window = VerificationWindow::from(&config.lifecycle);

    info!(
        timeout_seconds = window.timeout.as_secs(),
        poll_interval_ms = window.poll_interval.as_millis(),
        scorer = app.scorer.is_some(),
        "lifecycle configured"
    );

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(request_logging)
        .hoop(inject(State::from_app_context(app, window)))
        .push(router::app_router());

    let doc = OpenApi::new("Token Gate API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();
    let grace = config.server.shutdown_grace();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;

    observability.shutdown();
}
