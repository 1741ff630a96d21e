//! In-memory radio for tests and demos
//!
//! [`MockRadioProvider`] plays the radio subsystem: it hands out
//! [`MockRadio`] sessions, lets the caller drive adapter state, records every
//! scan request, and delivers events to the sinks of open sessions.
//!
//! Scanning is tracked per adapter, like a real one: the adapter scans while
//! any session wants it to, and stopping the adapter (power loss, another
//! application) ends the scan of every session.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::RadioError;
use crate::radio::{EventSink, Radio, RadioEvent, RadioProvider, RadioState, ScanFilter};

// ----------------------------------------------------------------------------
// Shared State
// ----------------------------------------------------------------------------

#[derive(Debug)]
struct Session {
    sink: EventSink,
    requests: Vec<ScanFilter>,
}

#[derive(Debug, Default)]
struct Adapter {
    state: RadioState,
    /// Scan started outside of any session
    external_scan: bool,
    /// Sessions with a scan running
    scanning: BTreeSet<usize>,
    fail_next_session: bool,
    fail_scans: bool,
    sessions: Vec<Session>,
}

impl Adapter {
    fn is_scanning(&self, index: usize) -> bool {
        self.external_scan || self.scanning.contains(&index)
    }

    fn halt_scan(&mut self) {
        self.external_scan = false;
        self.scanning.clear();
    }
}

type SharedAdapter = Arc<Mutex<Adapter>>;

fn lock(adapter: &SharedAdapter) -> MutexGuard<'_, Adapter> {
    adapter.lock().unwrap_or_else(PoisonError::into_inner)
}

// ----------------------------------------------------------------------------
// Mock Provider
// ----------------------------------------------------------------------------

/// Simulated local adapter
#[derive(Debug, Clone, Default)]
pub struct MockRadioProvider {
    adapter: SharedAdapter,
}

impl MockRadioProvider {
    /// New adapter in [`RadioState::Unknown`] with no sessions
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the adapter state and notify every open session
    ///
    /// Leaving [`RadioState::PoweredOn`] ends any running scan.
    pub fn set_state(&self, state: RadioState) {
        let mut adapter = lock(&self.adapter);
        adapter.state = state;
        if !state.is_ready() {
            adapter.halt_scan();
        }
        for session in &adapter.sessions {
            let _ = session.sink.send(RadioEvent::StateChanged(state));
        }
    }

    /// Start or stop the adapter scan from outside the sessions
    ///
    /// While started every session, current and future, reports scanning.
    /// Stopping ends the scan of every session.
    pub fn set_scanning(&self, scanning: bool) {
        let mut adapter = lock(&self.adapter);
        if scanning {
            adapter.external_scan = true;
        } else {
            adapter.halt_scan();
        }
    }

    /// Whether the adapter is scanning for anyone
    pub fn adapter_scanning(&self) -> bool {
        let adapter = lock(&self.adapter);
        adapter.external_scan || !adapter.scanning.is_empty()
    }

    /// Make the next `open_session` call fail
    pub fn fail_next_session(&self) {
        lock(&self.adapter).fail_next_session = true;
    }

    /// Make scan requests fail
    pub fn fail_scans(&self, fail: bool) {
        lock(&self.adapter).fail_scans = fail;
    }

    /// Deliver an event to every open session
    pub fn emit(&self, event: RadioEvent) {
        let adapter = lock(&self.adapter);
        for session in &adapter.sessions {
            let _ = session.sink.send(event.clone());
        }
    }

    /// Number of sessions opened so far
    pub fn sessions_opened(&self) -> usize {
        lock(&self.adapter).sessions.len()
    }

    /// Every scan request issued, in order, across all sessions
    pub fn scan_requests(&self) -> Vec<ScanFilter> {
        lock(&self.adapter)
            .sessions
            .iter()
            .flat_map(|session| session.requests.iter().cloned())
            .collect()
    }
}

impl RadioProvider for MockRadioProvider {
    type Radio = MockRadio;

    fn open_session(&self, sink: EventSink) -> Result<MockRadio, RadioError> {
        let mut adapter = lock(&self.adapter);
        if adapter.fail_next_session {
            adapter.fail_next_session = false;
            return Err(RadioError::SessionFailed("mock session refused".to_string()));
        }

        adapter.sessions.push(Session {
            sink,
            requests: Vec::new(),
        });

        Ok(MockRadio {
            adapter: Arc::clone(&self.adapter),
            index: adapter.sessions.len() - 1,
        })
    }
}

// ----------------------------------------------------------------------------
// Mock Session
// ----------------------------------------------------------------------------

/// Session handed out by [`MockRadioProvider`]
#[derive(Debug)]
pub struct MockRadio {
    adapter: SharedAdapter,
    index: usize,
}

impl Radio for MockRadio {
    fn state(&self) -> RadioState {
        lock(&self.adapter).state
    }

    fn is_scanning(&self) -> bool {
        lock(&self.adapter).is_scanning(self.index)
    }

    fn start_scan(&self, filter: ScanFilter) -> Result<(), RadioError> {
        let mut adapter = lock(&self.adapter);
        if adapter.fail_scans {
            return Err(RadioError::ScanFailed("mock scan refused".to_string()));
        }

        debug!("Mock session {} scanning for {}", self.index, filter);
        adapter.scanning.insert(self.index);
        adapter.sessions[self.index].requests.push(filter);
        Ok(())
    }

    fn stop_scan(&self) -> Result<(), RadioError> {
        let mut adapter = lock(&self.adapter);
        adapter.scanning.remove(&self.index);
        if adapter.scanning.is_empty() && !adapter.external_scan {
            debug!("Mock adapter stopped scanning");
        }
        Ok(())
    }
}
