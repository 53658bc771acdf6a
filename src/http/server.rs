//! Preview server wiring.
//!
//! # Responsibilities
//! - Mount the `/_assets` routes and the page-shell catch-all
//! - Wrap them in request-id, trace and timeout layers
//! - Serve until the shutdown broadcast fires

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderName, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::pipeline::AssetPipeline;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AssetPipeline>,
    pub scan_timeout: Duration,
}

/// HTTP server exposing the asset pipeline to page callers.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server for `pipeline` with the given configuration.
    pub fn new(config: &ServerConfig, pipeline: Arc<AssetPipeline>) -> Self {
        let state = AppState {
            pipeline,
            scan_timeout: Duration::from_secs(config.scan_timeout_secs),
        };

        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Outermost layer first: request id, trace, propagate id, timeout.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/_assets/status", get(handlers::get_status))
            .route("/_assets/masks", get(handlers::get_masks))
            .route("/_assets/resources", get(handlers::get_resources))
            .route("/_assets/templates", get(handlers::get_templates))
            .route("/", get(handlers::get_page))
            .route("/{*path}", get(handlers::get_page))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` receives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
