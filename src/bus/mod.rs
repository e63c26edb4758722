//! Bus handlers compute the value of a net from the outputs driving it.
//!
//! Each net has exactly one active handler. By default it is a
//! [`SingleBusHandler`]; while closed switches join nets, all of them share a
//! [`ConnectedBusHandler`]. Handlers are replaced on every topology change,
//! the nets themselves keep their identity.

pub mod connected;
pub mod resolve;
pub mod single;

pub use connected::ConnectedBusHandler;
pub use resolve::{resolve, BurnState, Resolution};
pub use single::SingleBusHandler;

use crate::coordinator::Coordinator;
use crate::error::BurnError;
use crate::net::NetId;
use crate::netlist::Netlist;
use crate::signal::SignalId;
use crate::value::{BitWidth, PullResistor};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandlerId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandlerKind {
    Single,
    Connected,
}

/// Deferred burn bookkeeping of one handler.
#[derive(Debug, Clone, Default)]
pub struct BurnTracker {
    state: BurnState,
    drivers: Vec<SignalId>,
    added_version: Option<u64>,
}

impl BurnTracker {
    pub fn state(&self) -> BurnState {
        self.state
    }

    /// Drivers that were asserting a value at the last recalculation.
    pub fn drivers(&self) -> &[SignalId] {
        &self.drivers
    }

    pub fn added_version(&self) -> Option<u64> {
        self.added_version
    }

    fn record(&mut self, state: BurnState, drivers: Vec<SignalId>) {
        self.state = state;
        self.drivers = drivers;
    }

    /// Returns true if the handler was not yet queued for `version`.
    pub(crate) fn mark_added(&mut self, version: u64) -> bool {
        if self.added_version == Some(version) {
            return false;
        }
        self.added_version = Some(version);
        true
    }
}

#[derive(Debug, Clone)]
pub enum BusHandler {
    Single(SingleBusHandler),
    Connected(ConnectedBusHandler),
}

impl BusHandler {
    pub fn kind(&self) -> HandlerKind {
        match self {
            BusHandler::Single(_) => HandlerKind::Single,
            BusHandler::Connected(_) => HandlerKind::Connected,
        }
    }

    pub fn inputs(&self) -> &[SignalId] {
        match self {
            BusHandler::Single(h) => h.inputs(),
            BusHandler::Connected(h) => h.inputs(),
        }
    }

    pub fn resistor(&self) -> PullResistor {
        match self {
            BusHandler::Single(h) => h.resistor(),
            BusHandler::Connected(h) => h.resistor(),
        }
    }

    pub fn width(&self) -> BitWidth {
        match self {
            BusHandler::Single(h) => h.width(),
            BusHandler::Connected(h) => h.width(),
        }
    }

    /// Nets whose output receives the resolved value.
    pub fn nets(&self) -> &[NetId] {
        match self {
            BusHandler::Single(h) => h.nets(),
            BusHandler::Connected(h) => h.nets(),
        }
    }

    pub fn tracker(&self) -> &BurnTracker {
        match self {
            BusHandler::Single(h) => &h.tracker,
            BusHandler::Connected(h) => &h.tracker,
        }
    }

    pub(crate) fn tracker_mut(&mut self) -> &mut BurnTracker {
        match self {
            BusHandler::Single(h) => &mut h.tracker,
            BusHandler::Connected(h) => &mut h.tracker,
        }
    }

    /// Fails if the handler is still burning at the end of a step.
    ///
    /// Only the coordinator's step sweep calls this.
    pub(crate) fn check_burn(&self, netlist: &Netlist) -> Result<(), BurnError> {
        let nets = || -> Vec<String> {
            self.nets()
                .iter()
                .map(|&n| netlist.net(n).label().to_string())
                .collect()
        };
        let origins = || -> Vec<String> {
            self.nets()
                .iter()
                .filter_map(|&n| netlist.net(n).origin())
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        match self.tracker().state() {
            BurnState::Ok => Ok(()),
            BurnState::ShortCircuit => Err(BurnError::ShortCircuit {
                nets: nets(),
                drivers: netlist.names_of(self.tracker().drivers()),
                origins: origins(),
            }),
            BurnState::PullConflict => Err(BurnError::PullUpAndDown {
                nets: nets(),
                origins: origins(),
            }),
        }
    }
}

/// All live handlers of a model. Ids are not reused until the counter wraps.
#[derive(Debug, Default)]
pub struct HandlerTable {
    handlers: HashMap<HandlerId, BusHandler>,
    next_id: u32,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handler: BusHandler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.handlers.insert(id, handler);
        id
    }

    pub fn get(&self, id: HandlerId) -> Option<&BusHandler> {
        self.handlers.get(&id)
    }

    pub fn get_mut(&mut self, id: HandlerId) -> Option<&mut BusHandler> {
        self.handlers.get_mut(&id)
    }

    pub(crate) fn connected_mut(&mut self, id: HandlerId) -> Option<&mut ConnectedBusHandler> {
        match self.handlers.get_mut(&id) {
            Some(BusHandler::Connected(h)) => Some(h),
            _ => None,
        }
    }

    pub fn remove(&mut self, id: HandlerId) -> Option<BusHandler> {
        self.handlers.remove(&id)
    }

    pub fn ids_of_kind(&self, kind: HandlerKind) -> Vec<HandlerId> {
        let mut ids: Vec<HandlerId> = self
            .handlers
            .iter()
            .filter(|(_, h)| h.kind() == kind)
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Recomputes one handler and writes the result to every net it serves.
///
/// Returns the net outputs whose value changed. A burning handler is queued
/// on the coordinator at most once per step.
pub(crate) fn recalculate(
    id: HandlerId,
    netlist: &mut Netlist,
    handlers: &mut HandlerTable,
    coordinator: &mut Coordinator,
) -> Vec<SignalId> {
    let Some(handler) = handlers.get_mut(id) else {
        return Vec::new();
    };

    debug_assert!(
        handler
            .inputs()
            .iter()
            .all(|&s| netlist.signal(s).width() == handler.width()),
        "handler {:?} has inputs of mixed width",
        id
    );

    let resolution = resolve(
        handler
            .inputs()
            .iter()
            .map(|&s| (s, netlist.signal(s).value())),
        handler.resistor(),
        handler.width(),
        coordinator.config().pull_conflict,
    );

    let mut changed = Vec::new();
    for &net in handler.nets() {
        let output = netlist.net(net).output();
        if netlist
            .signal_mut(output)
            .set(resolution.value.bits(), resolution.value.is_high_z())
        {
            changed.push(output);
        }
    }

    let burn = resolution.burn;
    handler.tracker_mut().record(burn, resolution.drivers);
    if burn != BurnState::Ok {
        trace!(handler = ?id, ?burn, "net in burn condition");
        coordinator.register_burn(id, handler.tracker_mut());
    }

    changed
}

/// Forwards signal changes to the nets observing them until nothing changes.
pub(crate) fn propagate(
    changed: Vec<SignalId>,
    netlist: &mut Netlist,
    handlers: &mut HandlerTable,
    coordinator: &mut Coordinator,
) {
    let mut queue: VecDeque<SignalId> = changed.into();
    while let Some(signal) = queue.pop_front() {
        let mut targets: Vec<HandlerId> = Vec::new();
        for &net in netlist.signal(signal).observers() {
            let handler = netlist.net(net).handler();
            if !targets.contains(&handler) {
                targets.push(handler);
            }
        }
        for handler in targets {
            queue.extend(recalculate(handler, netlist, handlers, coordinator));
        }
    }
}
