//! Print Bridge Server - certificate-free printing for browser apps
//!
//! A loopback HTTP bridge that lets web pages talk to thermal/receipt
//! and system printers without TLS certificates or a heavyweight print
//! client. Browser code POSTs JSON to localhost; the bridge holds the
//! printer connections and turns each request into exactly one physical
//! print job.
//!
//! # Module structure
//!
//! ```text
//! bridge-server/src/
//! ├── core/          # config, state, server startup
//! ├── api/           # HTTP routes and handlers
//! ├── printing/      # registry, job interpreter, discovery
//! └── utils/         # errors, logging
//! ```

pub mod api;
pub mod core;
pub mod printing;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use printing::{DiscoveryService, PrintRequest, PrinterRegistry};
pub use utils::{ApiResult, AppError};
pub use utils::logger::init_logger;

/// Process-level setup: .env, then logging
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();

    init_logger(&level, json, log_dir.as_deref())
}

pub fn print_banner() {
    println!("============================================================");
    println!("  Print Bridge - local thermal printer server");
    println!("  version {}", env!("CARGO_PKG_VERSION"));
    println!("============================================================");
}
