//! Printer API request/response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::printing::{ConnectedPrinter, DiscoveredPrinter};

/// POST /printer/connect body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    /// Registry id; falls back to `name`, then an auto-generated one
    pub printer_id: Option<String>,
    pub name: Option<String>,
    /// Transport kind: usb | serial | network | file | os-managed
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub config: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    pub success: bool,
    pub message: String,
    pub printer_id: String,
    pub printer_name: String,
}

/// POST /printer/disconnect body; omitting the id disconnects everything
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    pub printer_id: Option<String>,
}

/// POST /printer/connect-by-name body
///
/// Resolves against the discovery snapshot by ordinal `id` first, then
/// by `name`. `printerId` optionally overrides the registry id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectByNameRequest {
    pub name: Option<String>,
    pub id: Option<usize>,
    pub printer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub printers: Vec<DiscoveredPrinter>,
    pub count: usize,
    pub system: &'static str,
    pub note: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ListConnectedResponse {
    pub printers: Vec<ConnectedPrinter>,
    pub count: usize,
}
