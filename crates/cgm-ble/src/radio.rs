//! btleplug radio session
//!
//! A [`BtleplugRadio`] answers readiness and activity queries from the
//! adapter hub, so the scanning decision never blocks. The hub's background
//! task maps the adapter's central events with the helpers here and forwards
//! each one, in order, to every session's sink.

use std::sync::Arc;

use btleplug::api::{Central, CentralEvent, CentralState, Peripheral as _};
use btleplug::platform::{Adapter, PeripheralId};
use cgm_core::{DiscoveredPeripheral, EventSink, Radio, RadioError, RadioEvent, RadioState, ScanFilter};
use tracing::debug;

use crate::config::BleRadioConfig;
use crate::hub::{AdapterHub, SessionId};

// ----------------------------------------------------------------------------
// State Mapping
// ----------------------------------------------------------------------------

pub(crate) fn map_central_state(state: CentralState) -> RadioState {
    #[allow(unreachable_patterns)]
    match state {
        CentralState::PoweredOn => RadioState::PoweredOn,
        CentralState::PoweredOff => RadioState::PoweredOff,
        _ => RadioState::Unknown,
    }
}

pub(crate) fn encode_state(state: RadioState) -> u8 {
    match state {
        RadioState::Unknown => 0,
        RadioState::Resetting => 1,
        RadioState::Unsupported => 2,
        RadioState::Unauthorized => 3,
        RadioState::PoweredOff => 4,
        RadioState::PoweredOn => 5,
    }
}

pub(crate) fn decode_state(value: u8) -> RadioState {
    match value {
        1 => RadioState::Resetting,
        2 => RadioState::Unsupported,
        3 => RadioState::Unauthorized,
        4 => RadioState::PoweredOff,
        5 => RadioState::PoweredOn,
        _ => RadioState::Unknown,
    }
}

// ----------------------------------------------------------------------------
// Radio Implementation
// ----------------------------------------------------------------------------

/// One transmitter's session with a btleplug adapter
///
/// Sessions of one provider share the adapter: a session stopping its scan
/// leaves the adapter scanning for the others.
pub struct BtleplugRadio {
    hub: Arc<AdapterHub>,
    session: SessionId,
    stop_scan_on_drop: bool,
}

impl BtleplugRadio {
    pub(crate) fn open(hub: Arc<AdapterHub>, sink: EventSink, config: &BleRadioConfig) -> Self {
        let session = hub.register(sink);
        Self {
            hub,
            session,
            stop_scan_on_drop: config.stop_scan_on_drop,
        }
    }
}

impl Radio for BtleplugRadio {
    fn state(&self) -> RadioState {
        self.hub.state()
    }

    fn is_scanning(&self) -> bool {
        self.hub.is_scanning(self.session)
    }

    fn start_scan(&self, filter: ScanFilter) -> Result<(), RadioError> {
        self.hub.start_scan(self.session, filter)
    }

    fn stop_scan(&self) -> Result<(), RadioError> {
        self.hub.stop_scan(self.session);
        Ok(())
    }
}

impl Drop for BtleplugRadio {
    fn drop(&mut self) {
        self.hub.unregister(self.session, self.stop_scan_on_drop);
    }
}

// ----------------------------------------------------------------------------
// Event Mapping
// ----------------------------------------------------------------------------

/// Translate one central event, looking up the peripheral it refers to
pub(crate) async fn map_central_event(adapter: &Adapter, event: CentralEvent) -> Option<RadioEvent> {
    match event {
        CentralEvent::StateUpdate(state) => Some(RadioEvent::StateChanged(map_central_state(state))),
        CentralEvent::DeviceDiscovered(id) => peripheral_details(adapter, &id)
            .await
            .map(RadioEvent::PeripheralDiscovered),
        CentralEvent::DeviceConnected(id) => peripheral_details(adapter, &id)
            .await
            .map(connected_event),
        CentralEvent::DeviceDisconnected(id) => peripheral_details(adapter, &id)
            .await
            .map(|peripheral| RadioEvent::PeripheralDisconnected {
                address: peripheral.address,
            }),
        _ => None,
    }
}

/// The local name may not be resolved yet when the link comes up
fn connected_event(peripheral: DiscoveredPeripheral) -> RadioEvent {
    RadioEvent::PeripheralConnected {
        address: peripheral.address,
        name: peripheral.name.filter(|name| !name.is_empty()),
    }
}

async fn peripheral_details(adapter: &Adapter, id: &PeripheralId) -> Option<DiscoveredPeripheral> {
    let peripheral = match adapter.peripheral(id).await {
        Ok(peripheral) => peripheral,
        Err(e) => {
            debug!("Peripheral {:?} vanished: {}", id, e);
            return None;
        }
    };

    let properties = peripheral.properties().await.ok().flatten();
    let (name, rssi) = properties
        .map(|properties| (properties.local_name, properties.rssi))
        .unwrap_or_default();

    Some(DiscoveredPeripheral {
        address: peripheral.address().to_string(),
        name,
        rssi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peripheral(name: Option<&str>) -> DiscoveredPeripheral {
        DiscoveredPeripheral {
            address: "11:22:33:44:55:66".to_string(),
            name: name.map(str::to_string),
            rssi: None,
        }
    }

    #[test]
    fn test_state_encoding_round_trips() {
        let states = [
            RadioState::Unknown,
            RadioState::Resetting,
            RadioState::Unsupported,
            RadioState::Unauthorized,
            RadioState::PoweredOff,
            RadioState::PoweredOn,
        ];
        for state in states {
            assert_eq!(decode_state(encode_state(state)), state);
        }
    }

    #[test]
    fn test_central_state_mapping() {
        assert_eq!(map_central_state(CentralState::PoweredOn), RadioState::PoweredOn);
        assert_eq!(map_central_state(CentralState::PoweredOff), RadioState::PoweredOff);
        assert_eq!(map_central_state(CentralState::Unknown), RadioState::Unknown);
    }

    #[test]
    fn test_unnamed_connection_keeps_name_unknown() {
        let event = connected_event(peripheral(None));
        assert_eq!(
            event,
            RadioEvent::PeripheralConnected {
                address: "11:22:33:44:55:66".to_string(),
                name: None,
            }
        );

        let RadioEvent::PeripheralConnected { name, .. } = connected_event(peripheral(Some("")))
        else {
            panic!("Expected a connection event");
        };
        assert_eq!(name, None);
    }

    #[test]
    fn test_named_connection_carries_name() {
        let RadioEvent::PeripheralConnected { name, .. } =
            connected_event(peripheral(Some("DexcomEF")))
        else {
            panic!("Expected a connection event");
        };
        assert_eq!(name.as_deref(), Some("DexcomEF"));
    }
}
