//! Error types for the btleplug backend

use cgm_core::RadioError;
use thiserror::Error;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Errors specific to the btleplug backend
#[derive(Error, Debug)]
pub enum BleRadioError {
    #[error("Failed to create BLE manager: {0}")]
    ManagerUnavailable(String),

    #[error("No BLE adapters available")]
    NoAdapters,

    #[error("Adapter index {index} out of range ({available} available)")]
    AdapterIndexOutOfRange { index: usize, available: usize },

    #[error("No tokio runtime to drive the radio session")]
    NoRuntime,

    #[error("BLE error: {0}")]
    Btleplug(#[from] btleplug::Error),
}

impl From<BleRadioError> for RadioError {
    fn from(err: BleRadioError) -> Self {
        match err {
            BleRadioError::NoAdapters | BleRadioError::AdapterIndexOutOfRange { .. } => {
                RadioError::AdapterNotAvailable
            }
            BleRadioError::NoRuntime => RadioError::SessionFailed(err.to_string()),
            other => RadioError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_radio_error() {
        assert_eq!(
            RadioError::from(BleRadioError::NoAdapters),
            RadioError::AdapterNotAvailable
        );
        assert_eq!(
            RadioError::from(BleRadioError::AdapterIndexOutOfRange {
                index: 2,
                available: 1
            }),
            RadioError::AdapterNotAvailable
        );
        assert!(matches!(
            RadioError::from(BleRadioError::NoRuntime),
            RadioError::SessionFailed(_)
        ));
        assert!(matches!(
            RadioError::from(BleRadioError::ManagerUnavailable("dbus".into())),
            RadioError::Backend(_)
        ));
    }
}
