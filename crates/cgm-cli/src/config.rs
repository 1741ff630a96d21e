//! Scanner configuration
//!
//! Loaded from a TOML file when one is given, then overridden by flags.
//!
//! ```toml
//! scan_duration_secs = 30
//!
//! [transmitter]
//! family = "dexcom-g6"
//! transmitter_id = "8G12EF"
//!
//! [radio]
//! adapter_index = 0
//! ```

use std::path::Path;

use cgm_ble::BleRadioConfig;
use cgm_core::{KnownDevice, TransmitterFamily};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Which transmitter to build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmitterConfig {
    pub family: TransmitterFamily,
    pub transmitter_id: Option<String>,
    /// Address of a transmitter connected to before
    pub address: Option<String>,
    /// Name of a transmitter connected to before
    pub name: Option<String>,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            family: TransmitterFamily::DexcomXDripG4,
            transmitter_id: None,
            address: None,
            name: None,
        }
    }
}

impl TransmitterConfig {
    /// Previously connected device, if both address and name are configured
    pub fn known_device(&self) -> Result<Option<KnownDevice>> {
        match (&self.address, &self.name) {
            (Some(address), Some(name)) => Ok(Some(KnownDevice::new(address, name))),
            (None, None) => Ok(None),
            _ => Err(CliError::Config(
                "address and name must be given together".to_string(),
            )),
        }
    }
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub transmitter: TransmitterConfig,
    pub radio: BleRadioConfig,
    pub scan_duration_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            transmitter: TransmitterConfig::default(),
            radio: BleRadioConfig::default(),
            scan_duration_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(family) = cli.family {
            self.transmitter.family = family;
        }
        if let Some(id) = &cli.transmitter_id {
            self.transmitter.transmitter_id = Some(id.clone());
        }
        if let (Some(address), Some(name)) = (&cli.address, &cli.name) {
            self.transmitter.address = Some(address.clone());
            self.transmitter.name = Some(name.clone());
        }
        if let Some(duration) = cli.duration {
            self.scan_duration_secs = duration;
        }
        if let Some(adapter) = cli.adapter {
            self.radio.adapter_index = adapter;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_toml() {
        let config = AppConfig::from_toml(
            r#"
            scan_duration_secs = 12

            [transmitter]
            family = "blucon"
            transmitter_id = "12345"
            "#,
        )
        .unwrap();

        assert_eq!(config.scan_duration_secs, 12);
        assert_eq!(config.transmitter.family, TransmitterFamily::Blucon);
        assert_eq!(config.transmitter.transmitter_id.as_deref(), Some("12345"));
        assert_eq!(config.radio, BleRadioConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[transmitter]\nfamily = \"miaomiao\"").unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.transmitter.family, TransmitterFamily::MiaoMiao);
        assert_eq!(config.scan_duration_secs, 30);
    }

    #[test]
    fn test_unknown_family_rejected() {
        let result = AppConfig::from_toml("[transmitter]\nfamily = \"libre2\"\n");
        assert!(matches!(result, Err(CliError::TomlParsing(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "cgm-scan",
            "--family",
            "dexcom-g6",
            "-i",
            "8G12EF",
            "--address",
            "AA:BB",
            "--name",
            "DexcomEF",
            "--duration",
            "5",
        ]);

        let mut config = AppConfig::default();
        config.apply_cli(&cli);

        assert_eq!(config.transmitter.family, TransmitterFamily::DexcomG6);
        assert_eq!(config.scan_duration_secs, 5);
        assert_eq!(
            config.transmitter.known_device().unwrap(),
            Some(KnownDevice::new("AA:BB", "DexcomEF"))
        );
    }

    #[test]
    fn test_partial_identity_rejected() {
        let config = TransmitterConfig {
            address: Some("AA:BB".to_string()),
            ..TransmitterConfig::default()
        };
        assert!(config.known_device().is_err());
    }
}
