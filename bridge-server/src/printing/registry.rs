//! Printer connection registry
//!
//! The process-wide mapping from caller-chosen printer id to a live
//! adapter session. Connecting to an id that is already present tears
//! the old session down (errors ignored) and installs the new one -
//! replacement, never two live adapters under one id. Nothing persists:
//! a restart empties the registry and callers reconnect.

use bridge_printer::{ConnectionConfig, PrinterAdapter, PrintResult, TransportKind};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// One registry entry: identifier, metadata and the owned adapter
///
/// The adapter sits behind a `Mutex` that doubles as the per-session
/// job lock: a print job holds it for its whole append...flush
/// sequence, and teardown closes under the same lock, so two jobs (or a
/// job and a disconnect) never interleave writes on one handle.
#[derive(Debug)]
pub struct PrinterSession {
    pub id: String,
    pub display_name: String,
    pub kind: TransportKind,
    pub adapter: Mutex<PrinterAdapter>,
}

/// Snapshot row for list-connected
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPrinter {
    pub printer_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransportKind,
    pub status: &'static str,
}

/// Id → session mapping, shared across requests
#[derive(Debug, Default)]
pub struct PrinterRegistry {
    sessions: DashMap<String, Arc<PrinterSession>>,
    mock_mode: bool,
}

impl PrinterRegistry {
    pub fn new(mock_mode: bool) -> Self {
        Self {
            sessions: DashMap::new(),
            mock_mode,
        }
    }

    /// Connect (or reconnect) a printer under `id`
    ///
    /// The new adapter is opened first - on failure the registry is
    /// untouched. On success the session is swapped in atomically; any
    /// replaced session is closed afterwards, errors ignored.
    pub async fn connect(
        &self,
        id: &str,
        display_name: &str,
        kind: TransportKind,
        config: &ConnectionConfig,
    ) -> PrintResult<Arc<PrinterSession>> {
        let adapter = PrinterAdapter::connect(kind, config, self.mock_mode).await?;

        let session = Arc::new(PrinterSession {
            id: id.to_string(),
            display_name: display_name.to_string(),
            kind,
            adapter: Mutex::new(adapter),
        });

        let replaced = self.sessions.insert(id.to_string(), Arc::clone(&session));

        if let Some(old) = replaced {
            warn!(printer_id = %id, "Printer already connected, replacing session");
            Self::teardown(&old).await;
        }

        info!(printer_id = %id, name = %display_name, kind = %kind, "Printer connected");
        Ok(session)
    }

    /// Remove and close the session under `id`
    ///
    /// Returns the removed session, or `None` when the id is unknown.
    pub async fn disconnect(&self, id: &str) -> Option<Arc<PrinterSession>> {
        let (_, session) = self.sessions.remove(id)?;
        Self::teardown(&session).await;
        info!(printer_id = %id, "Printer disconnected");
        Some(session)
    }

    /// Remove and close every session; returns the number removed
    ///
    /// Always succeeds: individual close failures are swallowed.
    pub async fn disconnect_all(&self) -> usize {
        let ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        let mut removed = 0;
        for id in ids {
            if let Some((_, session)) = self.sessions.remove(&id) {
                Self::teardown(&session).await;
                removed += 1;
            }
        }
        if removed > 0 {
            info!(count = removed, "All printers disconnected");
        }
        removed
    }

    /// Read-only lookup used by the job path
    pub fn resolve(&self, id: &str) -> Option<Arc<PrinterSession>> {
        self.sessions.get(id).map(|e| Arc::clone(e.value()))
    }

    /// Snapshot of connected sessions (order is not a contract)
    pub fn list(&self) -> Vec<ConnectedPrinter> {
        self.sessions
            .iter()
            .map(|e| ConnectedPrinter {
                printer_id: e.id.clone(),
                name: e.display_name.clone(),
                kind: e.kind,
                status: "connected",
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn ids(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }

    /// Best-effort close; a stale handle must never block replacing or
    /// removing a session
    async fn teardown(session: &PrinterSession) {
        session.adapter.lock().await.close().await;
    }
}
