//! Radio subsystem seam
//!
//! The radio driver itself lives outside this crate. A transmitter talks to it
//! through two traits:
//!
//! - [`RadioProvider`] opens one session per transmitter and is handed the
//!   transmitter's [`EventSink`]
//! - [`Radio`] is the session handle: readiness and activity are observed
//!   synchronously, scan requests are fire-and-forget
//!
//! Asynchronous notifications arrive as typed [`RadioEvent`]s on the sink. The
//! sink is an unbounded channel, so events from one session keep their order.

use core::fmt;

use smallvec::{smallvec, SmallVec};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::RadioError;

// ----------------------------------------------------------------------------
// Radio State
// ----------------------------------------------------------------------------

/// Power and availability state of the local adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RadioState {
    #[default]
    Unknown,
    Resetting,
    Unsupported,
    Unauthorized,
    PoweredOff,
    PoweredOn,
}

impl RadioState {
    /// Only a powered on adapter accepts scan requests
    pub fn is_ready(self) -> bool {
        self == RadioState::PoweredOn
    }
}

// ----------------------------------------------------------------------------
// Scan Filter
// ----------------------------------------------------------------------------

/// Which advertisements a scan reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFilter {
    /// Report every advertising device. Platforms only honour this while the
    /// host application is in the foreground.
    MatchAll,
    /// Report devices advertising one of these services
    Services(SmallVec<[Uuid; 2]>),
}

impl ScanFilter {
    /// Build the filter for an advertisement identifier
    ///
    /// An empty identifier scans for everything.
    pub fn for_advertisement(advertisement: &str) -> Result<Self, uuid::Error> {
        if advertisement.is_empty() {
            return Ok(ScanFilter::MatchAll);
        }
        let uuid = Uuid::parse_str(advertisement)?;
        Ok(ScanFilter::Services(smallvec![uuid]))
    }

    /// Service UUIDs to filter on, empty for [`ScanFilter::MatchAll`]
    pub fn services(&self) -> &[Uuid] {
        match self {
            ScanFilter::MatchAll => &[],
            ScanFilter::Services(services) => services,
        }
    }
}

impl fmt::Display for ScanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanFilter::MatchAll => f.write_str("all devices"),
            ScanFilter::Services(services) => {
                let names: Vec<String> = services.iter().map(Uuid::to_string).collect();
                write!(f, "services [{}]", names.join(", "))
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Radio Events
// ----------------------------------------------------------------------------

/// A peripheral seen while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPeripheral {
    /// Platform address of the peripheral
    pub address: String,
    /// Advertised local name, if any
    pub name: Option<String>,
    /// Signal strength in dBm
    pub rssi: Option<i16>,
}

/// Notifications delivered by a radio session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadioEvent {
    StateChanged(RadioState),
    PeripheralDiscovered(DiscoveredPeripheral),
    /// A connection to a peripheral was established. The name is `None` while
    /// the platform has not resolved it yet.
    PeripheralConnected {
        address: String,
        name: Option<String>,
    },
    PeripheralDisconnected { address: String },
}

/// Sending half handed to the radio subsystem
pub type EventSink = mpsc::UnboundedSender<RadioEvent>;

/// Receiving half kept by the transmitter
pub type EventReceiver = mpsc::UnboundedReceiver<RadioEvent>;

// ----------------------------------------------------------------------------
// Radio Traits
// ----------------------------------------------------------------------------

/// An open session with the local adapter
///
/// None of these calls block. `start_scan` only issues the request; results
/// come back as [`RadioEvent::PeripheralDiscovered`].
pub trait Radio: Send + Sync {
    /// Current adapter state
    fn state(&self) -> RadioState;

    /// Whether this session has a scan running
    ///
    /// The adapter is shared between sessions, so this turns false whenever
    /// the adapter stops scanning, whoever caused it.
    fn is_scanning(&self) -> bool;

    /// Request a scan with the given filter
    fn start_scan(&self, filter: ScanFilter) -> Result<(), RadioError>;

    /// Stop this session's scan. The adapter keeps scanning for other
    /// sessions that still want it.
    fn stop_scan(&self) -> Result<(), RadioError>;
}

/// Factory for radio sessions
pub trait RadioProvider {
    type Radio: Radio;

    /// Open a session bound to `sink`, with no filter and no extra options
    fn open_session(&self, sink: EventSink) -> Result<Self::Radio, RadioError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_advertisement_matches_all() {
        let filter = ScanFilter::for_advertisement("").unwrap();
        assert_eq!(filter, ScanFilter::MatchAll);
        assert!(filter.services().is_empty());
    }

    #[test]
    fn test_advertisement_filter_has_single_service() {
        let filter = ScanFilter::for_advertisement("0000FFE0-0000-1000-8000-00805F9B34FB").unwrap();
        assert_eq!(
            filter.services(),
            &[Uuid::from_u128(0x0000FFE0_0000_1000_8000_00805F9B34FB)]
        );
    }

    #[test]
    fn test_invalid_advertisement_rejected() {
        assert!(ScanFilter::for_advertisement("not-a-uuid").is_err());
    }

    #[test]
    fn test_only_powered_on_is_ready() {
        let states = [
            RadioState::Unknown,
            RadioState::Resetting,
            RadioState::Unsupported,
            RadioState::Unauthorized,
            RadioState::PoweredOff,
        ];
        assert!(states.iter().all(|state| !state.is_ready()));
        assert!(RadioState::PoweredOn.is_ready());
    }
}
