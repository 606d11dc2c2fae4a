//! `HrmsServer`: router assembly and listener.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::{get, post};
use hrms_core::{BootContextBuilder, ConfigStore};
use hrms_store::SessionStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::handlers;
use crate::shutdown::{DRAIN_TIMEOUT, ServerHandle};

/// Path of the developer-mode boot context method.
pub const DEV_CONTEXT_PATH: &str = "/api/method/hrms.www.hrms.get_context_for_dev";

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Boot context builder over the site's capabilities.
    pub boot: BootContextBuilder,
    /// Session lookup for the `sid` cookie.
    pub sessions: SessionStore,
    /// When the server started.
    pub start_time: Instant,
    /// Renders `/metrics`.
    pub metrics: PrometheusHandle,
}

/// The boot context HTTP server.
pub struct HrmsServer {
    config: ServerConfig,
    state: AppState,
}

impl HrmsServer {
    /// Create a server for one site.
    ///
    /// `sessions` serves both as the CSRF token issuer and the transaction
    /// manager, since token writes live on its connection.
    pub fn new(
        config: ServerConfig,
        site: Arc<dyn ConfigStore>,
        sessions: SessionStore,
        metrics: PrometheusHandle,
    ) -> Self {
        let shared = Arc::new(sessions.clone());
        let boot = BootContextBuilder::new(site, shared.clone(), shared);
        Self {
            config,
            state: AppState {
                boot,
                sessions,
                start_time: Instant::now(),
                metrics,
            },
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/hrms", get(handlers::page))
            .route("/hrms/{*app_path}", get(handlers::page))
            .route(DEV_CONTEXT_PATH, post(handlers::dev_context))
            .route("/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.permissive_cors {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Bind and serve in a background task until the handle is stopped.
    pub async fn listen(&self) -> std::io::Result<ServerHandle> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        let stop = CancellationToken::new();
        let stopped = stop.clone();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { stopped.cancelled().await })
                .await;
            if let Err(e) = result {
                error!(error = %e, "server exited with error");
            }
        });

        info!(%addr, site = self.state.boot.config().site_name(), "boot server listening");
        Ok(ServerHandle::new(addr, task, stop))
    }

    /// Serve until `signal` resolves, then drain for up to [`DRAIN_TIMEOUT`].
    pub async fn serve_until(&self, signal: impl Future<Output = ()>) -> std::io::Result<()> {
        let handle = self.listen().await?;
        signal.await;
        info!("shutting down");
        let _ = handle.stop(DRAIN_TIMEOUT).await;
        Ok(())
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
