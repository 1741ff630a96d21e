//! Error types for transmitter construction and the radio seam
//!
//! Scan attempts never fail with these errors; they report a
//! [`ScanOutcome`](crate::ScanOutcome) instead. Errors here surface when a
//! transmitter cannot be built or when the radio backend rejects a request.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Errors reported by a radio backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RadioError {
    #[error("Bluetooth adapter not available")]
    AdapterNotAvailable,

    #[error("Failed to open radio session: {0}")]
    SessionFailed(String),

    #[error("Failed to start scan: {0}")]
    ScanFailed(String),

    #[error("Radio backend error: {0}")]
    Backend(String),
}

/// Errors raised while constructing a transmitter
#[derive(Error, Debug)]
pub enum TransmitterError {
    #[error("Radio session could not be opened: {0}")]
    RadioSession(#[from] RadioError),

    #[error("Invalid transmitter id {id:?}: {reason}")]
    InvalidTransmitterId { id: String, reason: &'static str },
}

/// Unrecognised transmitter family name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown transmitter family: {0}")]
pub struct ParseFamilyError(pub String);

pub type Result<T> = core::result::Result<T, TransmitterError>;
