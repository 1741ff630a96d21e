//! Scanning lifecycle
//!
//! [`start_scanning`] turns the state of a transmitter's radio session into a
//! [`ScanOutcome`]. The checks form a strict priority chain:
//!
//! 1. no radio session: [`ScanOutcome::Other`]
//! 2. radio not powered on: [`ScanOutcome::RadioNotReady`]
//! 3. scan already running: [`ScanOutcome::AlreadyScanning`]
//! 4. otherwise a scan is requested: [`ScanOutcome::Success`]
//!
//! Only the last case touches the radio. Nothing here blocks or retries.

use std::future::Future;

use tracing::{error, info, warn};

use crate::connection::{ConnectionState, SessionEvent};
use crate::radio::{Radio, ScanFilter};
use crate::registry::ScanOutcome;
use crate::transmitter::{ConnectionToken, Transmitter};

// ----------------------------------------------------------------------------
// Scanning Algorithm
// ----------------------------------------------------------------------------

/// Decide whether to start a scan for `advertisement` and issue it if so
pub fn start_scanning<R: Radio>(
    advertisement: &str,
    connection: &ConnectionState<R>,
) -> ScanOutcome {
    let Some(radio) = connection.radio() else {
        error!("No radio session, can not start scanning");
        return ScanOutcome::Other;
    };

    let state = radio.state();
    if !state.is_ready() {
        warn!("Bluetooth not powered on ({:?}), not scanning", state);
        return ScanOutcome::RadioNotReady;
    }

    if radio.is_scanning() {
        info!("Bluetooth scanning ongoing");
        return ScanOutcome::AlreadyScanning;
    }

    let filter = match ScanFilter::for_advertisement(advertisement) {
        Ok(filter) => filter,
        Err(e) => {
            error!("Invalid advertisement uuid {:?}: {}", advertisement, e);
            return ScanOutcome::Other;
        }
    };

    info!("Start bluetooth scanning for {}", filter);
    match radio.start_scan(filter) {
        Ok(()) => ScanOutcome::Success,
        Err(e) => {
            error!("Failed to start bluetooth scanning: {}", e);
            ScanOutcome::Other
        }
    }
}

/// Stop a running scan, returns whether a stop was issued
pub fn stop_scanning<R: Radio>(connection: &ConnectionState<R>) -> bool {
    let Some(radio) = connection.radio().filter(|radio| radio.is_scanning()) else {
        return false;
    };

    match radio.stop_scan() {
        Ok(()) => {
            info!("Stopped bluetooth scanning");
            true
        }
        Err(e) => {
            error!("Failed to stop bluetooth scanning: {}", e);
            false
        }
    }
}

// ----------------------------------------------------------------------------
// Extension Trait
// ----------------------------------------------------------------------------

/// Lifecycle shared by every [`Transmitter`]
pub trait ScanExt: Transmitter {
    /// Start scanning for this transmitter's advertisement
    fn start_scanning(&self) -> ScanOutcome {
        start_scanning(self.advertisement_uuid(), self.connection())
    }

    /// Stop this instance's scan, returns whether a stop was issued
    fn stop_scanning(&self) -> bool {
        stop_scanning(self.connection())
    }

    /// Address of the transmitter, `None` if it never connected
    fn address(&self) -> Option<&str> {
        self.connection().address()
    }

    /// Name of the transmitter, `None` until it is known
    fn name(&self) -> Option<&str> {
        self.connection().name()
    }

    /// Wait for the next event from this instance's radio session
    ///
    /// Connection events update the identity before the event is returned.
    fn next_event(&mut self) -> impl Future<Output = Option<SessionEvent>> + '_ {
        self.connection_mut(ConnectionToken(())).next_event()
    }

    /// Next queued event from this instance's radio session, without waiting
    fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.connection_mut(ConnectionToken(())).try_next_event()
    }

    /// Drop the radio session. Later scans report [`ScanOutcome::Other`].
    fn release_radio(&mut self) -> bool {
        self.connection_mut(ConnectionToken(()))
            .release_radio()
            .is_some()
    }
}

impl<T: Transmitter + ?Sized> ScanExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::KnownDevice;
    use crate::mock::MockRadioProvider;
    use crate::radio::RadioState;

    const XDRIP_ADVERTISEMENT: &str = "0000FFE0-0000-1000-8000-00805F9B34FB";

    #[test]
    fn test_released_radio_reports_other() {
        let provider = MockRadioProvider::new();
        provider.set_state(RadioState::PoweredOn);
        let mut connection = ConnectionState::open(&provider, None, None).unwrap();
        connection.release_radio();

        assert_eq!(
            start_scanning(XDRIP_ADVERTISEMENT, &connection),
            ScanOutcome::Other
        );
        assert!(provider.scan_requests().is_empty());
    }

    #[test]
    fn test_not_ready_checked_before_activity() {
        let provider = MockRadioProvider::new();
        provider.set_state(RadioState::PoweredOff);
        provider.set_scanning(true);
        let connection = ConnectionState::open(&provider, None, None).unwrap();

        assert_eq!(
            start_scanning(XDRIP_ADVERTISEMENT, &connection),
            ScanOutcome::RadioNotReady
        );
        assert!(provider.scan_requests().is_empty());
    }

    #[test]
    fn test_ready_and_idle_starts_filtered_scan() {
        let provider = MockRadioProvider::new();
        provider.set_state(RadioState::PoweredOn);
        let known = KnownDevice::new("AA:BB", "Dexcom01");
        let connection = ConnectionState::open(&provider, Some(known), None).unwrap();

        assert_eq!(
            start_scanning(XDRIP_ADVERTISEMENT, &connection),
            ScanOutcome::Success
        );
        assert_eq!(
            provider.scan_requests(),
            vec![ScanFilter::for_advertisement(XDRIP_ADVERTISEMENT).unwrap()]
        );
    }

    #[test]
    fn test_invalid_advertisement_reports_other() {
        let provider = MockRadioProvider::new();
        provider.set_state(RadioState::PoweredOn);
        let connection = ConnectionState::open(&provider, None, None).unwrap();

        assert_eq!(start_scanning("FFE0?", &connection), ScanOutcome::Other);
        assert!(provider.scan_requests().is_empty());
    }

    #[test]
    fn test_rejected_scan_reports_other() {
        let provider = MockRadioProvider::new();
        provider.set_state(RadioState::PoweredOn);
        provider.fail_scans(true);
        let connection = ConnectionState::open(&provider, None, None).unwrap();

        assert_eq!(start_scanning("", &connection), ScanOutcome::Other);
    }

    #[test]
    fn test_stop_scanning() {
        let provider = MockRadioProvider::new();
        provider.set_state(RadioState::PoweredOn);
        let connection = ConnectionState::open(&provider, None, None).unwrap();

        assert!(!stop_scanning(&connection));
        assert_eq!(start_scanning("", &connection), ScanOutcome::Success);
        assert!(stop_scanning(&connection));
        assert_eq!(start_scanning("", &connection), ScanOutcome::Success);
    }
}
