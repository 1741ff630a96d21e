//! Bluetooth Low Energy radio backend for CGM transmitters
//!
//! This crate implements the radio seam of `cgm-core` on top of `btleplug`, so
//! any transmitter family can scan with the local adapter.
//!
//! ## Architecture
//!
//! - `config` - Adapter selection and session settings
//! - `error` - Errors specific to the btleplug backend
//! - `provider` - Adapter discovery, one [`BtleplugRadio`] per transmitter
//! - `hub` - Scan and event state shared by every session of an adapter
//! - `radio` - Session handle and mapping of btleplug central events
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cgm_ble::{BleRadioConfig, BtleplugProvider};
//! use cgm_core::{DexcomG6Transmitter, RadioEvent, ScanExt, ScanOutcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = BtleplugProvider::new(BleRadioConfig::default()).await?;
//! let mut transmitter = DexcomG6Transmitter::new(&provider, "8G12EF", None)?;
//!
//! while transmitter.start_scanning() == ScanOutcome::RadioNotReady {
//!     // Wait for the adapter to power on instead of polling
//!     match transmitter.next_event().await {
//!         Some(received) if matches!(received.event, RadioEvent::StateChanged(_)) => continue,
//!         Some(_) => {}
//!         None => return Ok(()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Platform Support
//!
//! Scanning works wherever btleplug supports central mode (Linux via BlueZ,
//! macOS, Windows). Scanning for every device is only honoured while the
//! application is in the foreground on platforms that enforce it.

mod config;
mod error;
mod hub;
mod provider;
mod radio;

// Public API exports
pub use config::BleRadioConfig;
pub use error::BleRadioError;
pub use provider::BtleplugProvider;
pub use radio::BtleplugRadio;
