//! Scan session tests against the in-memory radio

use std::time::Duration;

use cgm_cli::app::describe;
use cgm_cli::scan_session;
use cgm_core::mock::MockRadioProvider;
use cgm_core::{
    DexcomG6Transmitter, DiscoveredPeripheral, DiscoveryMatch, MiaoMiaoTransmitter, RadioEvent,
    RadioState, ScanExt, ScanOutcome,
};

fn discovered(address: &str, name: &str) -> RadioEvent {
    RadioEvent::PeripheralDiscovered(DiscoveredPeripheral {
        address: address.to_string(),
        name: Some(name.to_string()),
        rssi: Some(-65),
    })
}

#[tokio::test]
async fn test_session_reports_matching_candidates() {
    let provider = MockRadioProvider::new();
    provider.set_state(RadioState::PoweredOn);

    let mut transmitter = DexcomG6Transmitter::new(&provider, "8G12EF", None).unwrap();

    provider.emit(discovered("01:01", "DexcomAB"));
    provider.emit(discovered("02:02", "DexcomEF"));

    let report = scan_session(&mut transmitter, Duration::from_millis(50)).await;

    assert_eq!(report.outcomes, vec![ScanOutcome::Success]);
    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].0.address, "02:02");
    assert_eq!(report.candidates[0].1, DiscoveryMatch::ExpectedName);
    assert_eq!(provider.scan_requests().len(), 1);
}

#[tokio::test]
async fn test_session_retries_when_radio_becomes_ready() {
    let provider = MockRadioProvider::new();
    provider.set_state(RadioState::PoweredOff);

    let mut transmitter = MiaoMiaoTransmitter::new(&provider, None).unwrap();

    let power = provider.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        power.set_state(RadioState::PoweredOn);
    });

    let report = scan_session(&mut transmitter, Duration::from_millis(200)).await;

    assert_eq!(
        report.outcomes,
        vec![ScanOutcome::RadioNotReady, ScanOutcome::Success]
    );
    assert_eq!(provider.scan_requests().len(), 1);
}

#[tokio::test]
async fn test_session_stops_scan_when_done() {
    let provider = MockRadioProvider::new();
    provider.set_state(RadioState::PoweredOn);

    let mut transmitter = MiaoMiaoTransmitter::new(&provider, None).unwrap();

    scan_session(&mut transmitter, Duration::from_millis(10)).await;

    assert_eq!(transmitter.start_scanning(), ScanOutcome::Success);
}

#[tokio::test]
async fn test_session_learns_identity_from_own_events() {
    let provider = MockRadioProvider::new();
    provider.set_state(RadioState::PoweredOn);

    let mut transmitter = DexcomG6Transmitter::new(&provider, "8G12EF", None).unwrap();

    provider.emit(RadioEvent::PeripheralConnected {
        address: "02:02".to_string(),
        name: None,
    });
    provider.emit(RadioEvent::PeripheralConnected {
        address: "02:02".to_string(),
        name: Some("DexcomEF".to_string()),
    });

    let report = scan_session(&mut transmitter, Duration::from_millis(50)).await;

    assert!(report.candidates.is_empty());
    assert_eq!(transmitter.address(), Some("02:02"));
    assert_eq!(transmitter.name(), Some("DexcomEF"));
    assert!(describe(&transmitter).contains("Name:           DexcomEF"));
}

#[test]
fn test_describe_unknown_transmitter() {
    let provider = MockRadioProvider::new();
    let transmitter = MiaoMiaoTransmitter::new(&provider, None).unwrap();

    let description = describe(&transmitter);
    assert!(description.contains("MiaoMiao"));
    assert!(description.contains("(any device)"));
    assert!(description.contains("Type limited:   true"));
    assert!(description.contains("Address:        unknown"));
}
