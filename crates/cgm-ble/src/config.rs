//! btleplug backend configuration

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// Configuration for the btleplug radio backend
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BleRadioConfig {
    /// Index of the adapter to use, in the order btleplug reports them
    pub adapter_index: usize,
    /// Whether dropping a scanning session withdraws its scan. The adapter
    /// keeps scanning while other sessions still want it.
    pub stop_scan_on_drop: bool,
}

impl Default for BleRadioConfig {
    fn default() -> Self {
        Self {
            adapter_index: 0,
            stop_scan_on_drop: true,
        }
    }
}

impl BleRadioConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the adapter by index
    pub fn with_adapter_index(mut self, index: usize) -> Self {
        self.adapter_index = index;
        self
    }

    /// Enable or disable stopping the scan when a session is dropped
    pub fn with_stop_scan_on_drop(mut self, enabled: bool) -> Self {
        self.stop_scan_on_drop = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = BleRadioConfig::new()
            .with_adapter_index(1)
            .with_stop_scan_on_drop(false);
        assert_eq!(config.adapter_index, 1);
        assert!(!config.stop_scan_on_drop);
        assert_ne!(config, BleRadioConfig::default());
    }
}
