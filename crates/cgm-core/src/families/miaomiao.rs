//! MiaoMiao Libre reader

use crate::connection::{ConnectionState, KnownDevice};
use crate::error::Result;
use crate::radio::{Radio, RadioProvider};
use crate::registry::TransmitterFamily;
use crate::transmitter::{ConnectionToken, Transmitter};

/// MiaoMiao does not advertise a service, scans report every device
const ADVERTISEMENT_UUID: &str = "";
const SERVICE_UUID: &str = "6E400001-B5A3-F393-E0A9-E50E24DCCA9E";
const RECEIVE_CHARACTERISTIC_UUID: &str = "6E400003-B5A3-F393-E0A9-E50E24DCCA9E";
const WRITE_CHARACTERISTIC_UUID: &str = "6E400002-B5A3-F393-E0A9-E50E24DCCA9E";

const DEVICE_NAME: &str = "MiaoMiao";

/// MiaoMiao clip-on reader for Libre sensors
#[derive(Debug)]
pub struct MiaoMiaoTransmitter<R> {
    connection: ConnectionState<R>,
}

impl<R: Radio> MiaoMiaoTransmitter<R> {
    pub fn new<P>(provider: &P, known: Option<KnownDevice>) -> Result<Self>
    where
        P: RadioProvider<Radio = R>,
    {
        Ok(Self {
            connection: ConnectionState::open(provider, known, Some(DEVICE_NAME.to_string()))?,
        })
    }
}

impl<R: Radio> Transmitter for MiaoMiaoTransmitter<R> {
    type Radio = R;

    fn transmitter_type(&self) -> TransmitterFamily {
        TransmitterFamily::MiaoMiao
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
