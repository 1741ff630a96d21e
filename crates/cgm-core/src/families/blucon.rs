//! Blucon Libre reader

use crate::connection::{ConnectionState, KnownDevice};
use crate::error::{Result, TransmitterError};
use crate::radio::{Radio, RadioProvider};
use crate::registry::TransmitterFamily;
use crate::transmitter::{ConnectionToken, Transmitter};

/// Blucon does not advertise a service, scans report every device
const ADVERTISEMENT_UUID: &str = "";
const SERVICE_UUID: &str = "436A62C0-082E-4CE8-A08B-01D81F195B24";
const RECEIVE_CHARACTERISTIC_UUID: &str = "436A0C82-082E-4CE8-A08B-01D81F195B24";
const WRITE_CHARACTERISTIC_UUID: &str = "436AA6E9-082E-4CE8-A08B-01D81F195B24";

const TRANSMITTER_ID_LEN: usize = 5;
const DEVICE_NAME_PREFIX: &str = "BLU";

/// Blucon clip-on reader for Libre sensors
///
/// Advertises as `BLU` followed by the five digit id on its label.
#[derive(Debug)]
pub struct BluconTransmitter<R> {
    connection: ConnectionState<R>,
}

impl<R: Radio> BluconTransmitter<R> {
    pub fn new<P>(provider: &P, transmitter_id: &str, known: Option<KnownDevice>) -> Result<Self>
    where
        P: RadioProvider<Radio = R>,
    {
        if transmitter_id.len() != TRANSMITTER_ID_LEN
            || !transmitter_id.chars().all(|c| c.is_ascii_digit())
        {
            return Err(TransmitterError::InvalidTransmitterId {
                id: transmitter_id.to_string(),
                reason: "expected 5 digits",
            });
        }

        let expected = format!("{}{}", DEVICE_NAME_PREFIX, transmitter_id);
        Ok(Self {
            connection: ConnectionState::open(provider, known, Some(expected))?,
        })
    }
}

impl<R: Radio> Transmitter for BluconTransmitter<R> {
    type Radio = R;

    fn transmitter_type(&self) -> TransmitterFamily {
        TransmitterFamily::Blucon
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
        true
    }

    fn connection(&self) -> &ConnectionState<R> {
        &self.connection
    }

    fn connection_mut(&mut self, _: ConnectionToken) -> &mut ConnectionState<R> {
        &mut self.connection
    }
}
