//! Health check route
//!
//! Browser clients poll this before sending any print traffic to find
//! out whether the bridge is running and what it is connected to.
//!
//! ```json
//! {
//!   "status": "running",
//!   "printerLibraryAvailable": true,
//!   "printersConnected": 1,
//!   "printerIds": ["receipt"]
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    printer_library_available: bool,
    printers_connected: usize,
    printer_ids: Vec<String>,
}

/// GET /health
async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        printer_library_available: state.printer_library_available(),
        printers_connected: state.registry.count(),
        printer_ids: state.registry.ids(),
    })
}
