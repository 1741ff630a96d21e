//! Error handling for the CGM scanner CLI

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Transmitter error: {0}")]
    Transmitter(#[from] cgm_core::TransmitterError),

    #[error("Bluetooth error: {0}")]
    Ble(#[from] cgm_ble::BleRadioError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
