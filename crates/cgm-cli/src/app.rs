//! Scan session driver

use std::time::Duration;

use cgm_ble::BtleplugProvider;
use cgm_core::families;
use cgm_core::{DiscoveredPeripheral, DiscoveryMatch, RadioEvent, ScanExt, ScanOutcome, Transmitter};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::Result;

// ----------------------------------------------------------------------------
// Scan Report
// ----------------------------------------------------------------------------

/// What happened during one scan session
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Outcome of every scan attempt, in order
    pub outcomes: Vec<ScanOutcome>,
    /// Discovered peripherals that could be the transmitter
    pub candidates: Vec<(DiscoveredPeripheral, DiscoveryMatch)>,
}

impl ScanReport {
    pub fn last_outcome(&self) -> Option<ScanOutcome> {
        self.outcomes.last().copied()
    }
}

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// Identifiers and identity of a transmitter, one per line
pub fn describe<T: Transmitter + ?Sized>(transmitter: &T) -> String {
    let connection = transmitter.connection();
    let advertisement = match transmitter.advertisement_uuid() {
        "" => "(any device)",
        uuid => uuid,
    };

    format!(
        "Transmitter:    {}\n\
         Advertisement:  {}\n\
         Service:        {}\n\
         Read:           {}\n\
         Write:          {}\n\
         Type limited:   {}\n\
         Address:        {}\n\
         Name:           {}\n\
         Expected name:  {}",
        transmitter.transmitter_type(),
        advertisement,
        transmitter.service_uuid(),
        transmitter.read_characteristic_uuid(),
        transmitter.write_characteristic_uuid(),
        transmitter.is_type_limited(),
        connection.address().unwrap_or("unknown"),
        connection.name().unwrap_or("unknown"),
        connection.expected_device_name().unwrap_or("none"),
    )
}

/// Scan for `duration`, processing events from the transmitter's session
///
/// When the radio is not ready the scan is retried once it reports a ready
/// state, never by polling.
pub async fn scan_session<T: Transmitter + ?Sized>(
    transmitter: &mut T,
    duration: Duration,
) -> ScanReport {
    let mut report = ScanReport::default();

    let outcome = transmitter.start_scanning();
    info!("Scan attempt: {}", outcome);
    report.outcomes.push(outcome);

    let deadline = Instant::now() + duration;
    loop {
        let received = match timeout_at(deadline, transmitter.next_event()).await {
            Ok(Some(received)) => received,
            Ok(None) => {
                debug!("Radio event stream closed");
                break;
            }
            Err(_) => break,
        };

        match received.event {
            RadioEvent::StateChanged(state)
                if state.is_ready()
                    && report.last_outcome() == Some(ScanOutcome::RadioNotReady) =>
            {
                let outcome = transmitter.start_scanning();
                info!("Radio ready, scan attempt: {}", outcome);
                report.outcomes.push(outcome);
            }
            RadioEvent::PeripheralDiscovered(peripheral) => {
                if let Some(found) = received.discovery {
                    info!(
                        "Candidate {} ({}) {:?}",
                        peripheral.name.as_deref().unwrap_or("unnamed"),
                        peripheral.address,
                        found
                    );
                    report.candidates.push((peripheral, found));
                }
            }
            _ => {}
        }
    }

    transmitter.stop_scanning();
    report
}

/// Build the configured transmitter on the local adapter and scan
pub async fn run(config: AppConfig) -> Result<ScanReport> {
    let provider = BtleplugProvider::new(config.radio.clone()).await?;

    let known = config.transmitter.known_device()?;
    let mut transmitter = families::open(
        config.transmitter.family,
        &provider,
        config.transmitter.transmitter_id.as_deref(),
        known,
    )?;

    println!("{}", describe(&*transmitter));

    let duration = Duration::from_secs(config.scan_duration_secs);
    let report = scan_session(&mut *transmitter, duration).await;

    if let Some(address) = transmitter.address() {
        println!(
            "Connected:      {} ({})",
            transmitter.name().unwrap_or("name unknown"),
            address
        );
    }
    Ok(report)
}
