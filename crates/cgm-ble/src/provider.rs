//! Adapter discovery and session creation

use std::sync::Arc;

use btleplug::api::{Central, Manager as _};
use btleplug::platform::Manager;
use cgm_core::{EventSink, RadioError, RadioProvider, RadioState};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::config::BleRadioConfig;
use crate::error::BleRadioError;
use crate::hub::AdapterHub;
use crate::radio::{map_central_state, BtleplugRadio};

// ----------------------------------------------------------------------------
// Provider Implementation
// ----------------------------------------------------------------------------

/// Local adapter selected through btleplug
///
/// Each transmitter opens its own [`BtleplugRadio`] session from the provider.
/// The sessions share one view of the adapter's state and scan.
pub struct BtleplugProvider {
    config: BleRadioConfig,
    hub: Arc<AdapterHub>,
}

impl BtleplugProvider {
    /// Select the configured adapter and read its current state
    ///
    /// Must be called from within a tokio runtime; sessions are driven on it.
    pub async fn new(config: BleRadioConfig) -> Result<Self, BleRadioError> {
        let runtime = Handle::try_current().map_err(|_| BleRadioError::NoRuntime)?;

        let manager = Manager::new()
            .await
            .map_err(|e| BleRadioError::ManagerUnavailable(e.to_string()))?;

        let mut adapters = manager.adapters().await?;
        if adapters.is_empty() {
            return Err(BleRadioError::NoAdapters);
        }
        if config.adapter_index >= adapters.len() {
            return Err(BleRadioError::AdapterIndexOutOfRange {
                index: config.adapter_index,
                available: adapters.len(),
            });
        }
        let adapter = adapters.swap_remove(config.adapter_index);

        let initial_state = match adapter.adapter_state().await {
            Ok(state) => map_central_state(state),
            Err(e) => {
                warn!("Failed to read BLE adapter state: {}", e);
                RadioState::Unknown
            }
        };

        info!("BLE adapter initialized ({:?})", initial_state);
        let hub = AdapterHub::start(adapter, initial_state, &runtime);
        Ok(Self { config, hub })
    }
}

impl RadioProvider for BtleplugProvider {
    type Radio = BtleplugRadio;

    fn open_session(&self, sink: EventSink) -> Result<BtleplugRadio, RadioError> {
        Ok(BtleplugRadio::open(Arc::clone(&self.hub), sink, &self.config))
    }
}
