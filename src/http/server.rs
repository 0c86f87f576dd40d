//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with every routing API handler
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Serve on a listener until shutdown is triggered

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::dispatch::{Dispatcher, ModeRegistry};
use crate::health::HealthAggregator;
use crate::http::handlers;
use crate::http::request::{RequestSpan, UuidRequestId};
use crate::lifecycle::shutdown::{wait as wait_for_shutdown, Shutdown};

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub health: HealthAggregator,
}

impl AppState {
    pub fn new(config: &RouterConfig, registry: Arc<ModeRegistry>) -> Self {
        Self {
            dispatcher: Dispatcher::new(
                registry.clone(),
                Duration::from_secs(config.timeouts.provider_secs),
            ),
            health: HealthAggregator::new(
                registry,
                Duration::from_secs(config.health.check_timeout_secs),
            ),
        }
    }
}

/// HTTP server for the routing API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &RouterConfig, registry: Arc<ModeRegistry>) -> Self {
        let state = AppState::new(config, registry);
        Self {
            router: build_router(config, state),
        }
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown.subscribe()))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Routes of one mode scope; mounted once per scope.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/backend/{name}",
            get(handlers::get_backend)
                .post(handlers::add_backend)
                .put(handlers::update_backend)
                .delete(handlers::remove_backend),
        )
        .route(
            "/backend/{name}/routes",
            get(handlers::get_routes).post(handlers::add_routes),
        )
        .route("/backend/{name}/routes/remove", post(handlers::remove_routes))
        .route("/backend/{name}/swap", post(handlers::swap))
        .route("/info", get(handlers::info))
        .route(
            "/backend/{name}/certificate/{certname}",
            get(handlers::get_certificate)
                .put(handlers::add_certificate)
                .delete(handlers::remove_certificate),
        )
        .route("/backend/{name}/cname", get(handlers::get_cnames))
        .route(
            "/backend/{name}/cname/{cname}",
            post(handlers::set_cname).delete(handlers::unset_cname),
        )
        .route("/support/tls", get(handlers::support_tls))
        .route("/support/cname", get(handlers::support_cname))
        .route("/support/info", get(handlers::support_static))
        .route("/support/prefix", get(handlers::support_static))
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &RouterConfig, state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .nest("/api/{mode}", api_routes())
        .route("/healthcheck", get(handlers::healthcheck))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                ))),
        )
}
