//! Fleet state and mutation subsystem.
//!
//! # Data Flow
//! ```text
//! ConfigSynchronizer.reconcile ──┐
//!                                ▼
//! FleetState (workers, windows, loads, pending marker)
//!                                │
//! MetricsPoller.poll ────────────┤
//! ScalingPolicy.evaluate ◀───────┤ (snapshot)
//! FleetController.scale_up/down ─┘
//! ```
//!
//! # Design Decisions
//! - FleetState is a plain value owned by the control loop and threaded
//!   explicitly; no component holds a competing copy
//! - Workers are kept in registration order: the first ever registered
//!   is the base worker and policy ties resolve to the earliest worker
//! - A load of None (never polled, or unreachable this tick) is distinct
//!   from a load of 0

pub mod controller;
pub mod policy;

use std::collections::HashMap;
use std::fmt;

use crate::poller::LoadWindow;

pub use controller::FleetController;
pub use policy::{Decision, FleetSnapshot, ScalingPolicy};

/// One worker container. Identity is the port; the name doubles as the
/// host in the LB routing entry. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRecord {
    pub name: String,
    pub port: u16,
}

impl WorkerRecord {
    pub fn new(name: String, port: u16) -> Self {
        Self { name, port }
    }

    /// The `host:port` routing entry for this worker.
    pub fn address(&self) -> String {
        format!("{}:{}", self.name, self.port)
    }
}

/// A multi-step mutation that has started but not yet committed its LB
/// reload. Left in place when a step fails, so the inconsistency window
/// is observable instead of silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub action: PendingAction,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    ScaleUp,
    ScaleDown,
}

impl fmt::Display for PendingMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.action {
            PendingAction::ScaleUp => "scale-up",
            PendingAction::ScaleDown => "scale-down",
        };
        write!(f, "{verb} of {}", self.address)
    }
}

/// All mutable fleet data, owned by the control loop for its lifetime.
#[derive(Debug, Default)]
pub struct FleetState {
    /// Registration order; index 0 is the base worker.
    workers: Vec<WorkerRecord>,
    windows: HashMap<u16, LoadWindow>,
    loads: HashMap<u16, Option<f64>>,
    pending: Option<PendingMutation>,
}

impl FleetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn contains_port(&self, port: u16) -> bool {
        self.workers.iter().any(|w| w.port == port)
    }

    pub fn worker(&self, port: u16) -> Option<&WorkerRecord> {
        self.workers.iter().find(|w| w.port == port)
    }

    /// Ports in registration order.
    pub fn ports(&self) -> Vec<u16> {
        self.workers.iter().map(|w| w.port).collect()
    }

    /// The first worker ever registered; never removed by policy.
    pub fn base_port(&self) -> Option<u16> {
        self.workers.first().map(|w| w.port)
    }

    pub fn highest_port(&self) -> Option<u16> {
        self.workers.iter().map(|w| w.port).max()
    }

    /// Track a new worker with an undefined load.
    ///
    /// Ports are unique; a duplicate registration is ignored.
    pub fn register(&mut self, record: WorkerRecord) {
        if self.contains_port(record.port) {
            tracing::warn!(port = record.port, "worker already tracked; ignoring registration");
            return;
        }
        self.windows.insert(record.port, LoadWindow::new());
        self.loads.insert(record.port, None);
        self.workers.push(record);
    }

    /// Drop a worker's record, window and load.
    pub fn remove(&mut self, port: u16) {
        self.workers.retain(|w| w.port != port);
        self.windows.remove(&port);
        self.loads.remove(&port);
    }

    pub fn window_mut(&mut self, port: u16) -> &mut LoadWindow {
        self.windows.entry(port).or_default()
    }

    pub fn set_load(&mut self, port: u16, load: Option<f64>) {
        self.loads.insert(port, load);
    }

    pub fn load(&self, port: u16) -> Option<f64> {
        self.loads.get(&port).copied().flatten()
    }

    /// The policy input: loads in registration order plus the base port.
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            loads: self
                .workers
                .iter()
                .map(|w| (w.port, self.loads.get(&w.port).copied().flatten()))
                .collect(),
            base_port: self.base_port(),
        }
    }

    pub fn pending(&self) -> Option<&PendingMutation> {
        self.pending.as_ref()
    }

    pub fn set_pending(&mut self, pending: PendingMutation) {
        self.pending = Some(pending);
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registered_worker_is_the_base() {
        let mut state = FleetState::new();
        state.register(WorkerRecord::new("w-a".into(), 8001));
        state.register(WorkerRecord::new("w-b".into(), 8002));

        assert_eq!(state.base_port(), Some(8001));
        assert_eq!(state.ports(), vec![8001, 8002]);
    }

    #[test]
    fn duplicate_ports_are_ignored() {
        let mut state = FleetState::new();
        state.register(WorkerRecord::new("w-a".into(), 8001));
        state.register(WorkerRecord::new("w-dup".into(), 8001));

        assert_eq!(state.len(), 1);
        assert_eq!(state.worker(8001).unwrap().name, "w-a");
    }

    #[test]
    fn unpolled_worker_has_undefined_load() {
        let mut state = FleetState::new();
        state.register(WorkerRecord::new("w-a".into(), 8001));

        assert_eq!(state.load(8001), None);
        state.set_load(8001, Some(0.0));
        assert_eq!(state.load(8001), Some(0.0));
    }

    #[test]
    fn remove_drops_all_traces() {
        let mut state = FleetState::new();
        state.register(WorkerRecord::new("w-a".into(), 8001));
        state.register(WorkerRecord::new("w-b".into(), 8002));
        state.set_load(8002, Some(3.0));

        state.remove(8002);

        assert_eq!(state.len(), 1);
        assert!(!state.contains_port(8002));
        assert_eq!(state.load(8002), None);
    }

    #[test]
    fn snapshot_follows_registration_order() {
        let mut state = FleetState::new();
        state.register(WorkerRecord::new("w-a".into(), 8005));
        state.register(WorkerRecord::new("w-b".into(), 8001));
        state.set_load(8001, Some(2.5));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.loads, vec![(8005, None), (8001, Some(2.5))]);
        assert_eq!(snapshot.base_port, Some(8005));
        assert_eq!(state.highest_port(), Some(8005));
    }
}
