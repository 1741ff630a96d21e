//! Dexcom G4 through an xDrip bridge

use crate::connection::{ConnectionState, KnownDevice};
use crate::error::Result;
use crate::radio::{Radio, RadioProvider};
use crate::registry::TransmitterFamily;
use crate::transmitter::{ConnectionToken, Transmitter};

const ADVERTISEMENT_UUID: &str = "0000FFE0-0000-1000-8000-00805F9B34FB";
const SERVICE_UUID: &str = "0000FFE0-0000-1000-8000-00805F9B34FB";
const RECEIVE_CHARACTERISTIC_UUID: &str = "0000FFE1-0000-1000-8000-00805F9B34FB";
const WRITE_CHARACTERISTIC_UUID: &str = "0000FFE1-0000-1000-8000-00805F9B34FB";

/// xDrip bridge relaying a Dexcom G4
///
/// Bridges do not advertise a predictable name, so there is no expected
/// device name.
#[derive(Debug)]
pub struct XDripG4Transmitter<R> {
    connection: ConnectionState<R>,
}

impl<R: Radio> XDripG4Transmitter<R> {
    pub fn new<P>(provider: &P, known: Option<KnownDevice>) -> Result<Self>
    where
        P: RadioProvider<Radio = R>,
    {
        Ok(Self {
            connection: ConnectionState::open(provider, known, None)?,
        })
    }
}

impl<R: Radio> Transmitter for XDripG4Transmitter<R> {
    type Radio = R;

    fn transmitter_type(&self) -> TransmitterFamily {
        TransmitterFamily::DexcomXDripG4
    }

    fn advertisement_uuid(&self) -> &'static str {
        ADVERTISEMENT_UUID
    }

    fn service_uuid(&self) -> &'static str {
        SERVICE_UUID
    }

    fn read_characteristic_uuid(&self) -> &'static str {
        RECEIVE_CHARACTERISTIC_UUID
    }

    fn write_characteristic_uuid(&self) -> &'static str {
        WRITE_CHARACTERISTIC_UUID
    }

    fn is_type_limited(&self) -> bool {
        false
    }

    fn connection(&self) -> &ConnectionState<R> {
        &self.connection
    }

    fn connection_mut(&mut self, _: ConnectionToken) -> &mut ConnectionState<R> {
        &mut self.connection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRadioProvider;

    #[test]
    fn test_bridge_has_no_expected_name() {
        let provider = MockRadioProvider::new();
        let transmitter = XDripG4Transmitter::new(&provider, None).unwrap();
        assert!(transmitter.connection().expected_device_name().is_none());
        assert_eq!(transmitter.service_uuid(), transmitter.advertisement_uuid());
    }
}
