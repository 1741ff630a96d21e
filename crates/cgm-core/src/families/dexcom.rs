//! Dexcom G5 and G6 transmitters
//!
//! Both generations share the same GATT layout. They advertise as `Dexcom`
//! followed by the last two characters of the six character transmitter id.

use crate::connection::{ConnectionState, KnownDevice};
use crate::error::{Result, TransmitterError};
use crate::radio::{Radio, RadioProvider};
use crate::registry::TransmitterFamily;
use crate::transmitter::{ConnectionToken, Transmitter};

const ADVERTISEMENT_UUID: &str = "0000FEBC-0000-1000-8000-00805F9B34FB";
const SERVICE_UUID: &str = "F8083532-849E-531C-C594-30F1F86A4EA5";
const CONTROL_CHARACTERISTIC_UUID: &str = "F8083534-849E-531C-C594-30F1F86A4EA5";
const AUTHENTICATION_CHARACTERISTIC_UUID: &str = "F8083535-849E-531C-C594-30F1F86A4EA5";

const TRANSMITTER_ID_LEN: usize = 6;
const DEVICE_NAME_PREFIX: &str = "Dexcom";

/// Expected advertised name for a Dexcom transmitter id
fn expected_device_name(transmitter_id: &str) -> Result<String> {
    let invalid = |reason| TransmitterError::InvalidTransmitterId {
        id: transmitter_id.to_string(),
        reason,
    };

    if transmitter_id.len() != TRANSMITTER_ID_LEN {
        return Err(invalid("expected 6 characters"));
    }
    if !transmitter_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("expected only letters and digits"));
    }

    let suffix = &transmitter_id[TRANSMITTER_ID_LEN - 2..];
    Ok(format!("{}{}", DEVICE_NAME_PREFIX, suffix.to_ascii_uppercase()))
}

// ----------------------------------------------------------------------------
// Dexcom G5
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct DexcomG5Transmitter<R> {
    connection: ConnectionState<R>,
}

impl<R: Radio> DexcomG5Transmitter<R> {
    /// Create a transmitter for the id printed on the device, e.g. `4G1234`
    pub fn new<P>(provider: &P, transmitter_id: &str, known: Option<KnownDevice>) -> Result<Self>
    where
        P: RadioProvider<Radio = R>,
    {
        let expected = expected_device_name(transmitter_id)?;
        Ok(Self {
            connection: ConnectionState::open(provider, known, Some(expected))?,
        })
    }
}

impl<R: Radio> Transmitter for DexcomG5Transmitter<R> {
    type Radio = R;

    fn transmitter_type(&self) -> TransmitterFamily {
        TransmitterFamily::DexcomG5
    }

    fn advertisement_uuid(&self) -> &'static str {
        ADVERTISEMENT_UUID
    }

    fn service_uuid(&self) -> &'static str {
        SERVICE_UUID
    }

    fn read_characteristic_uuid(&self) -> &'static str {
        CONTROL_CHARACTERISTIC_UUID
    }

    fn write_characteristic_uuid(&self) -> &'static str {
        AUTHENTICATION_CHARACTERISTIC_UUID
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

// ----------------------------------------------------------------------------
// Dexcom G6
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct DexcomG6Transmitter<R> {
    connection: ConnectionState<R>,
}

impl<R: Radio> DexcomG6Transmitter<R> {
    /// Create a transmitter for the id printed on the device, e.g. `8G1234`
    pub fn new<P>(provider: &P, transmitter_id: &str, known: Option<KnownDevice>) -> Result<Self>
    where
        P: RadioProvider<Radio = R>,
    {
        let expected = expected_device_name(transmitter_id)?;
        Ok(Self {
            connection: ConnectionState::open(provider, known, Some(expected))?,
        })
    }
}

impl<R: Radio> Transmitter for DexcomG6Transmitter<R> {
    type Radio = R;

    fn transmitter_type(&self) -> TransmitterFamily {
        TransmitterFamily::DexcomG6
    }

    fn advertisement_uuid(&self) -> &'static str {
        ADVERTISEMENT_UUID
    }

    fn service_uuid(&self) -> &'static str {
        SERVICE_UUID
    }

    fn read_characteristic_uuid(&self) -> &'static str {
        CONTROL_CHARACTERISTIC_UUID
    }

    fn write_characteristic_uuid(&self) -> &'static str {
        AUTHENTICATION_CHARACTERISTIC_UUID
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
    fn test_expected_device_name() {
        assert_eq!(expected_device_name("ABCDEF").unwrap(), "DexcomEF");
        assert_eq!(expected_device_name("8g12ab").unwrap(), "DexcomAB");
    }

    #[test]
    fn test_invalid_transmitter_ids() {
        assert!(expected_device_name("ABCDE").is_err());
        assert!(expected_device_name("ABCDEFG").is_err());
        assert!(expected_device_name("AB-DEF").is_err());
        assert!(expected_device_name("ABCDé").is_err());
    }

    #[test]
    fn test_invalid_id_opens_no_session() {
        let provider = MockRadioProvider::new();
        let result = DexcomG6Transmitter::new(&provider, "bad", None);
        assert!(result.is_err());
        assert_eq!(provider.sessions_opened(), 0);
    }

    #[test]
    fn test_g5_and_g6_share_layout() {
        let provider = MockRadioProvider::new();
        let g5 = DexcomG5Transmitter::new(&provider, "4G1234", None).unwrap();
        let g6 = DexcomG6Transmitter::new(&provider, "8G1234", None).unwrap();

        assert_ne!(g5.transmitter_type(), g6.transmitter_type());
        assert_eq!(g5.advertisement_uuid(), g6.advertisement_uuid());
        assert_eq!(g5.service_uuid(), g6.service_uuid());
        assert_eq!(g6.connection().expected_device_name(), Some("Dexcom34"));
    }
}
