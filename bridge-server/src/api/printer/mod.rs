//! Printer routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /printer/connect | POST | open a transport, register a session |
//! | /printer/disconnect | POST | close one session, or all of them |
//! | /printer/print | POST | run a print job against a session |
//! | /printer/list | GET | rescan and list system printers |
//! | /printer/connect-by-name | POST | connect via a discovery entry |
//! | /printer/list-connected | GET | list registered sessions |

mod handler;
mod types;

pub use types::{
    ConnectByNameRequest, ConnectRequest, ConnectResponse, DisconnectRequest,
    ListConnectedResponse, ListResponse,
};

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/printer/connect", post(handler::connect))
        .route("/printer/disconnect", post(handler::disconnect))
        .route("/printer/print", post(handler::print))
        .route("/printer/list", get(handler::list))
        .route("/printer/connect-by-name", post(handler::connect_by_name))
        .route("/printer/list-connected", get(handler::list_connected))
}
