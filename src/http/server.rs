//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with page and mutation handlers
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener and drain on shutdown
//!
//! No timeout layer: a slow upstream is visible to the caller as latency.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::aggregator::ViewAggregator;
use crate::config::GatewayConfig;
use crate::http::{mutations, pages};
use crate::proxy::MutationProxy;
use crate::upstream::{UpstreamClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: ViewAggregator,
    pub proxy: MutationProxy,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(&config.upstream.base_url)?;
        Ok(Self {
            aggregator: ViewAggregator::new(upstream.clone()),
            proxy: MutationProxy::new(upstream, config.teams.clone()),
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> UpstreamResult<Self> {
        let state = AppState::new(&config)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(pages::home))
            .route("/health", get(pages::health))
            .route("/teams", get(pages::teams))
            .route("/teams/create", post(mutations::create_team))
            .route("/team/{id}", get(pages::team_detail))
            .route("/team/{id}/lineup", get(pages::team_lineup))
            .route("/players", get(pages::players))
            .route("/player/{id}", get(pages::player_detail))
            .route(
                "/api/teams/{team_id}/add-player/{player_id}",
                post(mutations::add_player),
            )
            .route(
                "/api/teams/{team_id}/remove-player/{player_id}",
                delete(mutations::remove_player),
            )
            .route(
                "/api/teams/{team_id}/players/{player_id}/starter-status",
                put(mutations::set_starter_status),
            )
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
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
