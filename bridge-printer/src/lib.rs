//! # bridge-printer
//!
//! Transport adapter layer for the local print bridge - low-level
//! printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command bytes (cut, alignment, style)
//! - Connection configs for each transport kind
//! - Transports: network (TCP 9100), serial/file (raw device write),
//!   OS-managed printers (Win32 RAW jobs / `lp -o raw`), and a mock
//!   fallback that logs instead of touching hardware
//! - The buffered `PrinterAdapter` that collapses any number of append
//!   operations into exactly one physical job per flush
//!
//! Session management and job interpretation (WHAT to print) live in
//! the server crate.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_printer::{ConnectionConfig, PrinterAdapter, TransportKind};
//!
//! let config = ConnectionConfig::from_value(
//!     TransportKind::Network,
//!     serde_json::json!({ "host": "192.168.1.100", "port": 9100 }),
//! )?;
//! let mut adapter = PrinterAdapter::connect(TransportKind::Network, &config, false).await?;
//! adapter.append_text("Hello\n");
//! adapter.append_cut();
//! adapter.flush().await?;
//! adapter.close().await;
//! ```

mod adapter;
mod config;
mod encoding;
mod error;
mod escpos;
mod transport;

// Re-exports
pub use adapter::{Align, Format, PrinterAdapter, TextSize};
pub use config::{
    ConnectionConfig, FileConfig, NetworkConfig, OsConfig, SerialConfig, TransportKind, UsbConfig,
};
pub use encoding::{latin1_to_string, string_to_latin1};
pub use error::{PrintError, PrintResult};
pub use transport::{MockOp, MockOps, MockTransport, Transport};
