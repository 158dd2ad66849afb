//! System printer discovery
//!
//! Enumerates printers the operating system knows about and keeps the
//! most recent scan as a snapshot. Each refresh replaces the snapshot
//! wholesale and reassigns ordinal ids, so ids are only stable between
//! two refreshes.

use bridge_printer::TransportKind;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;

/// One printer found on the system
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredPrinter {
    /// Ordinal within the current snapshot
    pub id: usize,
    pub name: String,
    pub port: String,
    pub driver: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub system_printer: bool,
    /// Direct connection parameters, when the device exposes them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

/// Cached view of the last printer scan
#[derive(Debug, Default)]
pub struct DiscoveryService {
    snapshot: RwLock<Vec<DiscoveredPrinter>>,
}

impl DiscoveryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescan the system and replace the snapshot
    pub async fn refresh(&self) -> Vec<DiscoveredPrinter> {
        let mut printers = enumerate_system_printers().await;
        // Directly-addressable devices would be appended here; without a
        // USB enumeration backend this arm stays empty and only
        // OS-registered printers are reported.
        for (i, p) in printers.iter_mut().enumerate() {
            p.id = i;
        }

        tracing::info!(count = printers.len(), "printer discovery refreshed");
        *self.snapshot.write().await = printers.clone();
        printers
    }

    pub async fn snapshot(&self) -> Vec<DiscoveredPrinter> {
        self.snapshot.read().await.clone()
    }

    pub async fn find_by_id(&self, id: usize) -> Option<DiscoveredPrinter> {
        self.snapshot.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn find_by_name(&self, name: &str) -> Option<DiscoveredPrinter> {
        self.snapshot
            .read()
            .await
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned()
    }
}

/// Guess how to reach a discovered printer
///
/// Devices that carry explicit connection parameters use them directly.
/// Otherwise the port name decides: `COM*`/`LPT*` ports are serial,
/// `host:port` and `\\server\share` ports are network, and everything
/// else (including `USB*` virtual ports) goes through the OS spooler by
/// printer name.
pub fn derive_connection(printer: &DiscoveredPrinter) -> (TransportKind, Value) {
    if let Some(config) = &printer.config {
        return (TransportKind::Usb, config.clone());
    }

    let port = printer.port.as_str();
    if port.starts_with("COM") || port.starts_with("LPT") {
        return (
            TransportKind::Serial,
            json!({ "port": port, "baudRate": 9600 }),
        );
    }
    if port.starts_with("\\\\") {
        let host = port
            .trim_start_matches('\\')
            .split('\\')
            .next()
            .unwrap_or_default();
        return (
            TransportKind::Network,
            json!({ "host": host, "port": 9100 }),
        );
    }
    if let Some((host, port_str)) = port.split_once(':') {
        if let Ok(p) = port_str.parse::<u16>() {
            return (TransportKind::Network, json!({ "host": host, "port": p }));
        }
    }

    (
        TransportKind::OsManaged,
        json!({ "printerName": printer.name }),
    )
}

#[cfg(windows)]
async fn enumerate_system_printers() -> Vec<DiscoveredPrinter> {
    let result = tokio::task::spawn_blocking(enumerate_win32_printers).await;
    match result {
        Ok(printers) => printers,
        Err(e) => {
            tracing::error!("printer enumeration task failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(windows)]
fn enumerate_win32_printers() -> Vec<DiscoveredPrinter> {
    use windows::Win32::Graphics::Printing::{
        EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_2W,
    };
    use windows::core::PWSTR;

    unsafe {
        let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
        let mut needed: u32 = 0;
        let mut returned: u32 = 0;

        let _ = EnumPrintersW(flags, None, 2, None, &mut needed, &mut returned);
        if needed == 0 {
            return Vec::new();
        }

        let mut buf: Vec<u8> = vec![0; needed as usize];
        if EnumPrintersW(
            flags,
            None,
            2,
            Some(buf.as_mut_slice()),
            &mut needed,
            &mut returned,
        )
        .is_err()
        {
            tracing::error!("EnumPrintersW failed");
            return Vec::new();
        }

        let ptr = buf.as_ptr() as *const PRINTER_INFO_2W;
        let slice = std::slice::from_raw_parts(ptr, returned as usize);

        let wide = |p: PWSTR| {
            if p.is_null() {
                String::new()
            } else {
                p.to_string().unwrap_or_default()
            }
        };

        slice
            .iter()
            .map(|info| {
                let port = wide(PWSTR(info.pPortName.0));
                let kind = if port.starts_with("USB") {
                    "usb"
                } else if port.starts_with("COM") || port.starts_with("LPT") {
                    "serial"
                } else if port.contains(':') || port.starts_with("\\\\") {
                    "network"
                } else {
                    "unknown"
                };
                DiscoveredPrinter {
                    id: 0,
                    name: wide(PWSTR(info.pPrinterName.0)),
                    port,
                    driver: wide(PWSTR(info.pDriverName.0)),
                    kind: kind.to_string(),
                    status: if info.Status == 0 { "ready" } else { "error" }.to_string(),
                    system_printer: true,
                    config: None,
                }
            })
            .collect()
    }
}

#[cfg(not(windows))]
async fn enumerate_system_printers() -> Vec<DiscoveredPrinter> {
    let output = tokio::process::Command::new("lpstat")
        .arg("-p")
        .output()
        .await;

    let output = match output {
        Ok(o) if o.status.success() => o,
        Ok(o) => {
            tracing::debug!(code = ?o.status.code(), "lpstat reported no printers");
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!("lpstat unavailable: {}", e);
            return Vec::new();
        }
    };

    parse_lpstat(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `lpstat -p` output, one `printer NAME ...` line per queue
#[cfg(not(windows))]
fn parse_lpstat(stdout: &str) -> Vec<DiscoveredPrinter> {
    stdout
        .lines()
        .filter_map(|line| {
            let rest = line.strip_prefix("printer ")?;
            let name = rest.split_whitespace().next()?;
            Some(DiscoveredPrinter {
                id: 0,
                name: name.to_string(),
                port: "Unknown".to_string(),
                driver: "Unknown".to_string(),
                kind: "unknown".to_string(),
                status: "ready".to_string(),
                system_printer: true,
                config: None,
            })
        })
        .collect()
}
