//! Trigger server implementation

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::error::{Error, Result};

use super::api::create_router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<Config>,

    /// Credential source, read once per triggered run
    pub credentials: Arc<dyn CredentialProvider>,

    /// Server start time
    pub start_time: Instant,
}

/// HTTP server that starts one booking run per request
pub struct TriggerServer {
    config: Arc<Config>,
    state: AppState,
}

impl TriggerServer {
    /// Create a new trigger server
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid
    pub fn new(config: Config, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::config(format!("{e:#}")))?;

        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            credentials,
            start_time: Instant::now(),
        };

        Ok(Self { config, state })
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = create_router(self.state.clone());

        if self.config.server.enable_request_logging {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }

    /// Start the server and serve until shutdown
    pub async fn start(&self) -> Result<()> {
        let router = self.build_router();
        let addr = self.config.server.bind_address;

        tracing::info!("Starting trigger server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Trigger server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
