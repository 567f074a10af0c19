//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Compose the Basic Auth stage in front of the static assets only
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener and shut down on signal

use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::assets::spa_service;
use crate::auth::{basic_auth_middleware, BasicAuthGate};
use crate::config::EdgeConfig;
use crate::health::health;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::proxy::{dashboard_handler, UpstreamClient};

pub const HEALTH_PATH: &str = "/health";
pub const DASHBOARD_PATH: &str = "/api/escritoir/dashboard";
/// Trailing-slash form of [`DASHBOARD_PATH`], proxied the same way.
pub const DASHBOARD_SLASH_PATH: &str = "/api/escritoir/dashboard/";

/// Error type for server setup and serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<EdgeConfig>,
    pub upstream: UpstreamClient,
}

/// HTTP server for the edge.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    config: Arc<EdgeConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let upstream = UpstreamClient::new(&config.upstream)?;

        let state = AppState {
            config: config.clone(),
            upstream,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// `/health` and the dashboard proxy are public; everything else is the
    /// asset bundle, behind the gate when credentials are configured.
    fn build_router(state: AppState) -> Router {
        let assets = spa_service(&state.config.assets);

        let router = Router::new()
            .route(HEALTH_PATH, get(health).head(health))
            .route(DASHBOARD_PATH, get(dashboard_handler))
            .route(DASHBOARD_SLASH_PATH, get(dashboard_handler));

        let router = match &state.config.basic_auth {
            Some(credentials) => {
                let gate = Arc::new(BasicAuthGate::new(credentials.clone()));
                let protected = ServiceBuilder::new()
                    .layer(middleware::from_fn_with_state(gate, basic_auth_middleware))
                    .service(assets);
                router.fallback_service(protected)
            }
            None => router.fallback_service(assets),
        };

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers())
                    )
                }))
                .layer(propagate_request_id_layer()),
        )
    }

    /// A clone of the router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            gated = self.config.basic_auth.is_some(),
            "HTTP server starting"
        );

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
