//! API route modules
//!
//! - [`health`] - liveness and bridge status
//! - [`printer`] - connection management, printing and discovery

pub mod health;
pub mod printer;
