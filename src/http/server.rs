//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with one GET handler per configured route
//! - Wire up middleware (request ID, tracing)
//! - Fall back to static asset serving for unmatched paths
//! - Bind server to listener and shut down gracefully

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::assemble::{Assembler, VersionToken};
use crate::config::{ProjectConfig, SattoConfig};
use crate::fetch::{DataFetcher, FetchError};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::{assets, page};
use crate::routing::{RouteError, RouteTable};

/// Failure to construct the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteError),

    #[error("failed to build data fetcher: {0}")]
    Fetcher(#[from] FetchError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub project: Arc<ProjectConfig>,
    pub fetcher: DataFetcher,
    pub assembler: Arc<Assembler>,
}

/// HTTP server rendering the configured pages.
pub struct HttpServer {
    router: Router,
    routes: RouteTable,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// `version` is the process-wide asset token; it is fixed here for the
    /// lifetime of the server.
    pub fn new(config: SattoConfig, version: VersionToken) -> Result<Self, ServerError> {
        let routes = RouteTable::from_config(config.routes.clone())?;
        let fetcher = DataFetcher::new(&config.fetch)?;
        let assembler = Arc::new(Assembler::new(config.assets.clone(), version));

        let state = AppState {
            project: Arc::new(config.project.clone()),
            fetcher,
            assembler,
        };

        let router = Self::build_router(&routes, state);
        Ok(Self { router, routes })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(routes: &RouteTable, state: AppState) -> Router {
        let mut router = Router::new();

        for route in routes.routes() {
            let page_id = route.page.clone();
            router = router.route(
                &route.pattern,
                get(
                    move |State(state): State<AppState>,
                          Path(params): Path<HashMap<String, String>>,
                          headers: HeaderMap| {
                        let page_id = page_id.clone();
                        async move { page::serve_page(state, page_id, params, headers).await }
                    },
                ),
            );
        }

        router
            .fallback(assets::serve_asset)
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.len(),
            "HTTP server starting"
        );

        for route in self.routes.routes() {
            tracing::debug!(path = %route.path, page = %route.page, "Route registered");
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get the compiled route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Consume the server, returning the router (for in-process testing).
    pub fn into_router(self) -> Router {
        self.router
    }
}
