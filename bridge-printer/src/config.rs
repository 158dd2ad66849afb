//! Connection kinds and per-kind configuration
//!
//! Each transport kind takes a small, kind-specific parameter set.
//! Configs arrive as loose JSON from the HTTP layer and are validated
//! structurally here before any handle is opened.

use crate::error::{PrintError, PrintResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Printer connection kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
    Usb,
    Serial,
    Network,
    File,
    OsManaged,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Usb => "usb",
            TransportKind::Serial => "serial",
            TransportKind::Network => "network",
            TransportKind::File => "file",
            TransportKind::OsManaged => "os-managed",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "usb" => Ok(TransportKind::Usb),
            "serial" => Ok(TransportKind::Serial),
            "network" => Ok(TransportKind::Network),
            "file" => Ok(TransportKind::File),
            // "windows" is the legacy wire name for the OS spooler path
            "os-managed" | "windows" => Ok(TransportKind::OsManaged),
            other => Err(PrintError::InvalidConfig(format!(
                "Unknown printer type: {}",
                other
            ))),
        }
    }
}

/// USB printer: vendor/product ids plus endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsbConfig {
    #[serde(alias = "vendorId")]
    pub vendor_id: u16,
    #[serde(alias = "productId")]
    pub product_id: u16,
    #[serde(default = "default_in_ep", alias = "inEp")]
    pub in_ep: u8,
    #[serde(default = "default_out_ep", alias = "outEp")]
    pub out_ep: u8,
}

fn default_in_ep() -> u8 {
    0x81
}

fn default_out_ep() -> u8 {
    0x03
}

/// Serial/COM port printer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    pub port: String,
    #[serde(default = "default_baud_rate", alias = "baudrate", alias = "baudRate")]
    pub baud_rate: u32,
}

fn default_baud_rate() -> u32 {
    9600
}

/// Network printer (raw TCP, usually port 9100)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub host: String,
    #[serde(default = "default_network_port")]
    pub port: u16,
}

fn default_network_port() -> u16 {
    9100
}

/// File output or raw parallel port (e.g. LPT1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub file: PathBuf,
}

/// OS-registered printer addressed by spooler name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsConfig {
    #[serde(alias = "printerName")]
    pub printer_name: String,
}

/// Kind-specific connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConnectionConfig {
    Usb(UsbConfig),
    Serial(SerialConfig),
    Network(NetworkConfig),
    File(FileConfig),
    Os(OsConfig),
}

impl ConnectionConfig {
    /// Parse and validate a loose JSON config against a kind
    ///
    /// Structural mismatch (missing/mistyped fields) is an
    /// `InvalidConfig` error; no I/O happens here.
    pub fn from_value(kind: TransportKind, value: serde_json::Value) -> PrintResult<Self> {
        let invalid =
            |e: serde_json::Error| PrintError::InvalidConfig(format!("{} config: {}", kind, e));

        match kind {
            TransportKind::Usb => serde_json::from_value(value)
                .map(ConnectionConfig::Usb)
                .map_err(invalid),
            TransportKind::Serial => serde_json::from_value(value)
                .map(ConnectionConfig::Serial)
                .map_err(invalid),
            TransportKind::Network => serde_json::from_value(value)
                .map(ConnectionConfig::Network)
                .map_err(invalid),
            TransportKind::File => serde_json::from_value(value)
                .map(ConnectionConfig::File)
                .map_err(invalid),
            TransportKind::OsManaged => serde_json::from_value(value)
                .map(ConnectionConfig::Os)
                .map_err(invalid),
        }
    }
}
