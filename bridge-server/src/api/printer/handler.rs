//! Printer API handlers

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use bridge_printer::{ConnectionConfig, TransportKind};
use serde_json::json;

use crate::core::ServerState;
use crate::printing::{PrintRequest, derive_connection, execute_job};
use crate::utils::{ApiResponse, ApiResult, AppError};

use super::types::{
    ConnectByNameRequest, ConnectRequest, ConnectResponse, DisconnectRequest,
    ListConnectedResponse, ListResponse,
};

/// POST /printer/connect - open a transport and register it
pub async fn connect(
    State(state): State<ServerState>,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> ApiResult<Json<ConnectResponse>> {
    let Json(req) = payload?;

    let kind: TransportKind = req
        .kind
        .as_deref()
        .ok_or_else(|| AppError::validation("Connection type is required"))?
        .parse()?;

    let printer_id = req
        .printer_id
        .or_else(|| req.name.clone())
        .unwrap_or_else(|| format!("printer_{}", state.registry.count()));
    let printer_name = req.name.unwrap_or_else(|| printer_id.clone());

    let config = ConnectionConfig::from_value(kind, req.config.unwrap_or_else(|| json!({})))?;
    state
        .registry
        .connect(&printer_id, &printer_name, kind, &config)
        .await?;

    Ok(Json(ConnectResponse {
        success: true,
        message: format!("Connected to printer: {}", printer_name),
        printer_id,
        printer_name,
    }))
}

/// POST /printer/disconnect - one printer by id, or all of them
pub async fn disconnect(
    State(state): State<ServerState>,
    payload: Result<Json<DisconnectRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let Json(req) = payload?;

    match req.printer_id {
        Some(id) => {
            state
                .registry
                .disconnect(&id)
                .await
                .ok_or_else(|| AppError::not_found(format!("Printer '{}' not connected", id)))?;
            Ok(Json(ApiResponse::ok(format!(
                "Printer '{}' disconnected",
                id
            ))))
        }
        None => {
            let count = state.registry.disconnect_all().await;
            Ok(Json(ApiResponse::ok(format!(
                "Disconnected {} printer(s)",
                count
            ))))
        }
    }
}

/// POST /printer/print - run one job against a connected printer
pub async fn print(
    State(state): State<ServerState>,
    payload: Result<Json<PrintRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let Json(req) = payload?;

    let printer_id = req
        .printer_id
        .as_deref()
        .ok_or_else(|| AppError::validation("printerId is required"))?;

    let session = state.registry.resolve(printer_id).ok_or_else(|| {
        AppError::not_found(format!(
            "Printer '{}' not connected. Connect it first using /printer/connect or /printer/connect-by-name",
            printer_id
        ))
    })?;

    // One job at a time per printer; concurrent requests queue here
    let mut adapter = session.adapter.lock().await;
    execute_job(&req, &mut adapter).await?;

    Ok(Json(ApiResponse::ok("Print job completed")))
}

/// GET /printer/list - rescan and report system printers
pub async fn list(State(state): State<ServerState>) -> Json<ListResponse> {
    let printers = state.discovery.refresh().await;
    let count = printers.len();
    Json(ListResponse {
        printers,
        count,
        system: std::env::consts::OS,
        note: "System printers can be used via their port. USB printers can be connected directly.",
    })
}

/// POST /printer/connect-by-name - connect using a discovery entry
pub async fn connect_by_name(
    State(state): State<ServerState>,
    payload: Result<Json<ConnectByNameRequest>, JsonRejection>,
) -> ApiResult<Json<ConnectResponse>> {
    let Json(req) = payload?;

    if state.discovery.snapshot().await.is_empty() {
        state.discovery.refresh().await;
    }

    let selected = match (req.id, req.name.as_deref()) {
        (Some(id), _) => state.discovery.find_by_id(id).await,
        (None, Some(name)) => state.discovery.find_by_name(name).await,
        (None, None) => return Err(AppError::validation("Provide a printer name or id")),
    };
    let selected = selected.ok_or_else(|| {
        AppError::not_found(format!(
            "Printer not found: {}",
            req.name.unwrap_or_else(|| req.id.map(|i| i.to_string()).unwrap_or_default())
        ))
    })?;

    let (kind, config_value) = derive_connection(&selected);
    let printer_id = req.printer_id.unwrap_or_else(|| selected.name.clone());
    let config = ConnectionConfig::from_value(kind, config_value)?;

    state
        .registry
        .connect(&printer_id, &selected.name, kind, &config)
        .await?;

    Ok(Json(ConnectResponse {
        success: true,
        message: format!("Connected to printer: {}", selected.name),
        printer_id,
        printer_name: selected.name,
    }))
}

/// GET /printer/list-connected - registered sessions
pub async fn list_connected(State(state): State<ServerState>) -> Json<ListConnectedResponse> {
    let printers = state.registry.list();
    let count = printers.len();
    Json(ListConnectedResponse { printers, count })
}
