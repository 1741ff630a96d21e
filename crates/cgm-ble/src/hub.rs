//! Adapter shared by every session
//!
//! btleplug scans per adapter, not per session. [`AdapterHub`] records which
//! sessions want a scan and with which filter, keeps the adapter scanning for
//! the union of those filters, and fans the adapter's central events out to
//! every session's sink.
//!
//! Adapter calls are queued on one command task so they reach btleplug in the
//! order the sessions asked for them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use btleplug::api::{Central, ScanFilter as BtleScanFilter};
use btleplug::platform::Adapter;
use cgm_core::{EventSink, RadioError, RadioEvent, RadioState, ScanFilter};
use futures::stream::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::radio::{decode_state, encode_state, map_central_event};

pub(crate) type SessionId = u64;

// ----------------------------------------------------------------------------
// Scan Bookkeeping
// ----------------------------------------------------------------------------

/// Adapter call needed to match what the sessions want
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScanCommand {
    /// Start scanning for these services, every device when empty
    Start(Vec<Uuid>),
    /// Replace the running scan's filter
    Restart(Vec<Uuid>),
    Stop,
}

impl ScanCommand {
    fn filter(services: &[Uuid]) -> BtleScanFilter {
        BtleScanFilter {
            services: services.to_vec(),
        }
    }
}

impl fmt::Display for ScanCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanCommand::Start(services) if services.is_empty() => f.write_str("start (all devices)"),
            ScanCommand::Start(services) => write!(f, "start ({} services)", services.len()),
            ScanCommand::Restart(services) if services.is_empty() => {
                f.write_str("restart (all devices)")
            }
            ScanCommand::Restart(services) => write!(f, "restart ({} services)", services.len()),
            ScanCommand::Stop => f.write_str("stop"),
        }
    }
}

/// Which sessions are scanning, and what the adapter is scanning for
#[derive(Debug, Default)]
pub(crate) struct ScanRegistry {
    wanted: BTreeMap<SessionId, ScanFilter>,
    running: Option<Vec<Uuid>>,
}

impl ScanRegistry {
    pub(crate) fn is_scanning(&self, session: SessionId) -> bool {
        self.wanted.contains_key(&session)
    }

    pub(crate) fn start(&mut self, session: SessionId, filter: ScanFilter) -> Option<ScanCommand> {
        self.wanted.insert(session, filter);
        self.reconcile()
    }

    /// The adapter only stops once no session wants a scan
    pub(crate) fn stop(&mut self, session: SessionId) -> Option<ScanCommand> {
        self.wanted.remove(&session)?;
        self.reconcile()
    }

    /// Drop a session without touching the running scan
    pub(crate) fn forget(&mut self, session: SessionId) {
        self.wanted.remove(&session);
    }

    /// The adapter stopped on its own (power loss, failed request)
    pub(crate) fn halt(&mut self) {
        if !self.wanted.is_empty() {
            debug!("Adapter scan ended for {} sessions", self.wanted.len());
        }
        self.wanted.clear();
        self.running = None;
    }

    fn union(&self) -> Option<Vec<Uuid>> {
        if self.wanted.is_empty() {
            return None;
        }
        if self.wanted.values().any(|filter| *filter == ScanFilter::MatchAll) {
            return Some(Vec::new());
        }

        let services: BTreeSet<Uuid> = self
            .wanted
            .values()
            .flat_map(|filter| filter.services().iter().copied())
            .collect();
        Some(services.into_iter().collect())
    }

    fn reconcile(&mut self) -> Option<ScanCommand> {
        let wanted = self.union();
        if wanted == self.running {
            return None;
        }

        let command = match (&self.running, &wanted) {
            (_, None) => ScanCommand::Stop,
            (None, Some(services)) => ScanCommand::Start(services.clone()),
            (Some(_), Some(services)) => ScanCommand::Restart(services.clone()),
        };
        self.running = wanted;
        Some(command)
    }
}

// ----------------------------------------------------------------------------
// Adapter Hub
// ----------------------------------------------------------------------------

#[derive(Debug, Default)]
struct HubInner {
    next_session: SessionId,
    sinks: BTreeMap<SessionId, EventSink>,
    scans: ScanRegistry,
}

/// State of one adapter shared by all of its sessions
pub(crate) struct AdapterHub {
    state: AtomicU8,
    inner: Mutex<HubInner>,
    commands: mpsc::UnboundedSender<ScanCommand>,
    event_task: Mutex<Option<JoinHandle<()>>>,
}

impl AdapterHub {
    /// Start the event and command tasks for `adapter` on `runtime`
    pub(crate) fn start(adapter: Adapter, initial_state: RadioState, runtime: &Handle) -> Arc<Self> {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let hub = Arc::new(Self {
            state: AtomicU8::new(encode_state(initial_state)),
            inner: Mutex::new(HubInner::default()),
            commands,
            event_task: Mutex::new(None),
        });

        runtime.spawn(run_scan_commands(
            adapter.clone(),
            command_rx,
            Arc::downgrade(&hub),
        ));
        let event_task = runtime.spawn(forward_events(adapter, Arc::downgrade(&hub)));
        *lock(&hub.event_task) = Some(event_task);

        hub
    }

    fn inner(&self) -> MutexGuard<'_, HubInner> {
        lock(&self.inner)
    }

    pub(crate) fn state(&self) -> RadioState {
        decode_state(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn register(&self, sink: EventSink) -> SessionId {
        let mut inner = self.inner();
        let session = inner.next_session;
        inner.next_session += 1;
        inner.sinks.insert(session, sink);
        debug!("Registered BLE session {}", session);
        session
    }

    pub(crate) fn unregister(&self, session: SessionId, stop_scan: bool) {
        let mut inner = self.inner();
        inner.sinks.remove(&session);
        if stop_scan {
            if let Some(command) = inner.scans.stop(session) {
                self.send(command);
            }
        } else {
            inner.scans.forget(session);
        }
        debug!("Unregistered BLE session {}", session);
    }

    pub(crate) fn is_scanning(&self, session: SessionId) -> bool {
        self.inner().scans.is_scanning(session)
    }

    pub(crate) fn start_scan(&self, session: SessionId, filter: ScanFilter) -> Result<(), RadioError> {
        let mut inner = self.inner();
        let Some(command) = inner.scans.start(session, filter) else {
            return Ok(());
        };
        if self.send(command) {
            Ok(())
        } else {
            inner.scans.halt();
            Err(RadioError::ScanFailed("BLE scan worker stopped".to_string()))
        }
    }

    pub(crate) fn stop_scan(&self, session: SessionId) {
        let mut inner = self.inner();
        if let Some(command) = inner.scans.stop(session) {
            self.send(command);
        }
    }

    fn send(&self, command: ScanCommand) -> bool {
        debug!("Queueing BLE scan {}", command);
        self.commands.send(command).is_ok()
    }

    fn apply_state(&self, state: RadioState) {
        self.state.store(encode_state(state), Ordering::Release);
        if !state.is_ready() {
            self.inner().scans.halt();
        }
    }

    fn scan_failed(&self) {
        self.inner().scans.halt();
    }

    fn broadcast(&self, event: RadioEvent) {
        for sink in self.inner().sinks.values() {
            let _ = sink.send(event.clone());
        }
    }
}

impl Drop for AdapterHub {
    fn drop(&mut self) {
        let task = self
            .event_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ----------------------------------------------------------------------------
// Background Tasks
// ----------------------------------------------------------------------------

async fn run_scan_commands(
    adapter: Adapter,
    mut commands: mpsc::UnboundedReceiver<ScanCommand>,
    hub: Weak<AdapterHub>,
) {
    while let Some(command) = commands.recv().await {
        let result = match &command {
            ScanCommand::Start(services) => adapter.start_scan(ScanCommand::filter(services)).await,
            ScanCommand::Restart(services) => {
                if let Err(e) = adapter.stop_scan().await {
                    debug!("Stopping BLE scan before restart failed: {}", e);
                }
                adapter.start_scan(ScanCommand::filter(services)).await
            }
            ScanCommand::Stop => adapter.stop_scan().await,
        };

        match result {
            Ok(()) => info!("BLE scan {}", command),
            Err(e) => {
                error!("BLE scan {} failed: {}", command, e);
                if command != ScanCommand::Stop {
                    if let Some(hub) = hub.upgrade() {
                        hub.scan_failed();
                    }
                }
            }
        }
    }
    debug!("BLE scan command queue closed");
}

async fn forward_events(adapter: Adapter, hub: Weak<AdapterHub>) {
    let mut events = match adapter.events().await {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to get BLE events: {}", e);
            return;
        }
    };

    while let Some(event) = events.next().await {
        let forwarded = map_central_event(&adapter, event).await;

        let Some(hub) = hub.upgrade() else {
            debug!("All BLE sessions closed, stopping event forwarding");
            break;
        };

        if let Some(event) = forwarded {
            if let RadioEvent::StateChanged(state) = event {
                hub.apply_state(state);
            }
            hub.broadcast(event);
        }
    }
}
