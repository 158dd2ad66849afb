//! Server startup
//!
//! Router assembly and the HTTP listener. Plain HTTP on loopback -
//! certificate-free operation is the point of this bridge.

use crate::core::{Config, ServerState};
use crate::utils::AppError;
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

/// HTTP access-log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
///
/// Browser pages on any origin must be able to reach the bridge, so
/// CORS is permissive. The timeout layer is the only bound on in-flight
/// transport I/O (there is no cancellation below the HTTP boundary).
pub fn build_app(config: &Config) -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::printer::router())
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_millis(
            config.request_timeout_ms,
        )))
}

/// HTTP server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server with existing state (shared with tests/tools)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::new(self.config.clone()),
        };

        let app = build_app(&self.config).with_state(state.clone());

        let addr = SocketAddr::from((self.config.bind_addr, self.config.http_port));
        tracing::info!("Print bridge listening on http://{}", addr);

        let handle = axum_server::Handle::new();

        // Graceful shutdown on ctrl_c; disconnect everything so held
        // handles are released before exit
        let handle_clone = handle.clone();
        let shutdown_state = state.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            let removed = shutdown_state.registry.disconnect_all().await;
            if removed > 0 {
                tracing::info!(printers = removed, "Disconnected printers on shutdown");
            }
            handle_clone.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
