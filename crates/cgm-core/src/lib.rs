//! CGM transmitter abstraction
//!
//! This crate provides one uniform interface for discovering and identifying
//! continuous-glucose-monitor transmitters over Bluetooth Low Energy, whatever
//! the device family.
//!
//! ## Architecture
//!
//! - [`registry`] - Transmitter family tags and scan outcome codes
//! - [`transmitter`] - The capability contract every family implements
//! - [`connection`] - Shared connection state composed into every transmitter
//! - [`scan`] - The scanning decision procedure
//! - [`radio`] - The radio subsystem seam (traits and typed events)
//! - [`families`] - Concrete transmitter families
//! - `mock` - In-memory radio for tests and demos (`testing` feature)
//!
//! ## Usage
//!
//! ```rust
//! use cgm_core::{RadioProvider, ScanExt, ScanOutcome, TransmitterError, XDripG4Transmitter};
//!
//! async fn scan<P: RadioProvider>(provider: &P) -> Result<(), TransmitterError> {
//!     let mut transmitter = XDripG4Transmitter::new(provider, None)?;
//!     if transmitter.start_scanning() == ScanOutcome::Success {
//!         while let Some(received) = transmitter.next_event().await {
//!             if received.discovery.is_some() {
//!                 println!("candidate: {:?}", received.event);
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod error;
pub mod families;
#[cfg(any(test, feature = "testing"))]
pub mod mock;
pub mod radio;
pub mod registry;
pub mod scan;
pub mod transmitter;


// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use connection::{ConnectionState, DiscoveryMatch, KnownDevice, SessionEvent};
pub use error::{ParseFamilyError, RadioError, Result, TransmitterError};
pub use families::{
    BluconTransmitter, DexcomG5Transmitter, DexcomG6Transmitter, DynTransmitter,
    MiaoMiaoTransmitter, XDripG4Transmitter,
};
pub use radio::{
    DiscoveredPeripheral, EventReceiver, EventSink, Radio, RadioEvent, RadioProvider, RadioState,
    ScanFilter,
};
pub use registry::{ScanOutcome, TransmitterFamily};
pub use scan::ScanExt;
pub use transmitter::{ConnectionToken, Transmitter};
