//! Printer session and job handling
//!
//! - [`registry`]: the id → live connection mapping and its lifecycle
//! - [`job`]: print payload interpretation (text / raw / escpos)
//! - [`discovery`]: OS printer enumeration snapshot and the
//!   connect-by-name derivation

pub mod discovery;
pub mod job;
pub mod registry;

pub use discovery::{DiscoveredPrinter, DiscoveryService, derive_connection};
pub use job::{EscPosCommand, JobKind, PrintRequest, execute_job};
pub use registry::{ConnectedPrinter, PrinterRegistry, PrinterSession};
