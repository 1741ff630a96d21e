//! CGM scanner CLI library
//!
//! Builds a transmitter from configuration, prints its identifiers and
//! identity, then scans and reports candidate devices.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;

pub use app::{scan_session, ScanReport};
pub use cli::Cli;
pub use config::{AppConfig, TransmitterConfig};
pub use error::{CliError, Result};
