use std::sync::Arc;

use crate::core::Config;
use crate::printing::{DiscoveryService, PrinterRegistry};

/// Shared server state - one instance per process, cloned per request
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | registry | id → live printer session mapping |
/// | discovery | most recent printer enumeration snapshot |
///
/// The registry is the only mutable state shared across requests; it
/// serializes its own access. Nothing here persists - a process restart
/// empties the registry and callers reconnect.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub registry: Arc<PrinterRegistry>,
    pub discovery: Arc<DiscoveryService>,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(PrinterRegistry::new(config.mock_printers));
        let discovery = Arc::new(DiscoveryService::new());
        Self {
            config,
            registry,
            discovery,
        }
    }

    /// Whether physical transports are in play
    ///
    /// False when the bridge was started in mock mode; surfaced through
    /// /health so callers can tell a simulated setup from a real one.
    pub fn printer_library_available(&self) -> bool {
        !self.config.mock_printers
    }
}
