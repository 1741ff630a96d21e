//! Connection state shared by every transmitter
//!
//! [`ConnectionState`] owns the radio session and the connection identity of
//! one transmitter instance. Concrete families compose it instead of
//! reimplementing it.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::radio::{DiscoveredPeripheral, EventReceiver, Radio, RadioEvent, RadioProvider};

// ----------------------------------------------------------------------------
// Identity
// ----------------------------------------------------------------------------

/// Address and name of a transmitter the application connected to before
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownDevice {
    pub address: String,
    pub name: String,
}

impl KnownDevice {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }
}

/// Why a discovered peripheral is a candidate for this transmitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMatch {
    /// Same address as the device connected to before
    KnownAddress,
    /// Advertised name starts with the expected device name
    ExpectedName,
    /// Nothing is known about the device, so every peripheral qualifies
    AnyDevice,
}

// ----------------------------------------------------------------------------
// Connection State
// ----------------------------------------------------------------------------

/// An event received on a transmitter's own session, after the transmitter
/// processed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub event: RadioEvent,
    /// Set when the event is a discovery of a peripheral that could be this
    /// transmitter
    pub discovery: Option<DiscoveryMatch>,
}

/// Radio session and connection identity of one transmitter instance
///
/// `address` is absent until the first successful connection and never goes
/// back to absent afterwards. `name` follows the address, or arrives with a
/// later connection to the same address when the platform had not resolved
/// it yet. Both are written only while draining the instance's own event
/// channel; there is no way to hand the state an event from elsewhere:
///
/// ```compile_fail
/// use cgm_core::{RadioEvent, RadioProvider, ScanExt, XDripG4Transmitter};
///
/// fn forge<P: RadioProvider>(provider: &P) {
///     let mut transmitter = XDripG4Transmitter::new(provider, None).unwrap();
///     transmitter.handle_event(&RadioEvent::PeripheralConnected {
///         address: "EVIL".to_string(),
///         name: Some("forged".to_string()),
///     });
/// }
/// ```
#[derive(Debug)]
pub struct ConnectionState<R> {
    radio: Option<R>,
    address: Option<String>,
    name: Option<String>,
    expected_device_name: Option<String>,
    events: EventReceiver,
}

impl<R: Radio> ConnectionState<R> {
    /// Store the identity, then open exactly one radio session bound to this
    /// instance's event sink
    ///
    /// Failing to open the session fails construction.
    pub fn open<P>(
        provider: &P,
        known: Option<KnownDevice>,
        expected_device_name: Option<String>,
    ) -> Result<Self>
    where
        P: RadioProvider<Radio = R>,
    {
        let (address, name) = match known {
            Some(device) => (Some(device.address), Some(device.name)),
            None => (None, None),
        };

        let (sink, events) = mpsc::unbounded_channel();
        let radio = provider.open_session(sink)?;

        debug!(
            "Opened radio session (address: {:?}, name: {:?}, expected name: {:?})",
            address, name, expected_device_name
        );

        Ok(Self {
            radio: Some(radio),
            address,
            name,
            expected_device_name,
            events,
        })
    }

    /// Radio session, absent once released
    pub fn radio(&self) -> Option<&R> {
        self.radio.as_ref()
    }

    /// Address of the transmitter, `None` if it never connected
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Name of the transmitter, `None` until it is known
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name hint used before the real name is known
    pub fn expected_device_name(&self) -> Option<&str> {
        self.expected_device_name.as_deref()
    }

    /// Wait for the next event from this instance's session and apply it
    ///
    /// Returns `None` once the session is gone and every event was drained.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let event = self.events.recv().await?;
        Some(self.process(event))
    }

    /// Apply the next queued event, if there is one, without waiting
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        let event = self.events.try_recv().ok()?;
        Some(self.process(event))
    }

    /// Drop the radio session
    ///
    /// Afterwards scanning reports [`ScanOutcome::Other`](crate::ScanOutcome::Other).
    pub fn release_radio(&mut self) -> Option<R> {
        let radio = self.radio.take();
        if radio.is_some() {
            debug!("Released radio session");
        }
        radio
    }

    fn process(&mut self, event: RadioEvent) -> SessionEvent {
        let discovery = self.handle_event(&event);
        SessionEvent { event, discovery }
    }

    fn handle_event(&mut self, event: &RadioEvent) -> Option<DiscoveryMatch> {
        match event {
            RadioEvent::StateChanged(state) => {
                debug!("Radio state changed to {:?}", state);
                None
            }
            RadioEvent::PeripheralDiscovered(peripheral) => self.match_peripheral(peripheral),
            RadioEvent::PeripheralConnected { address, name } => {
                self.record_connection(address, name.as_deref());
                None
            }
            RadioEvent::PeripheralDisconnected { address } => {
                debug!("Peripheral {} disconnected", address);
                None
            }
        }
    }

    fn match_peripheral(&self, peripheral: &DiscoveredPeripheral) -> Option<DiscoveryMatch> {
        if let Some(address) = &self.address {
            return peripheral
                .address
                .eq_ignore_ascii_case(address)
                .then_some(DiscoveryMatch::KnownAddress);
        }

        if let Some(expected) = &self.expected_device_name {
            return peripheral
                .name
                .as_deref()
                .filter(|name| name.starts_with(expected.as_str()))
                .map(|_| DiscoveryMatch::ExpectedName);
        }

        Some(DiscoveryMatch::AnyDevice)
    }

    fn record_connection(&mut self, address: &str, name: Option<&str>) {
        match &self.address {
            None => {
                info!("Connected to transmitter {:?} ({})", name, address);
                self.address = Some(address.to_string());
                self.name = name.map(str::to_string);
            }
            Some(known) if known.eq_ignore_ascii_case(address) => {
                if let (None, Some(name)) = (&self.name, name) {
                    info!("Transmitter {} is named {}", address, name);
                    self.name = Some(name.to_string());
                } else {
                    debug!("Reconnected to transmitter {:?} ({})", name, address);
                }
            }
            Some(known) => {
                warn!(
                    "Ignoring connection to {:?} ({}), transmitter is bound to {}",
                    name, address, known
                );
            }
        }
    }
}
