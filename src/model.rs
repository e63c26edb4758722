use crate::bus::{self, HandlerKind, HandlerTable};
use crate::config::BusConfig;
use crate::coordinator::{Coordinator, CoordinatorStats, ModelEvent};
use crate::data_bus::DataBus;
use crate::error::{BurnError, WiringError};
use crate::fault::BurnHistory;
use crate::net::NetId;
use crate::netlist::Netlist;
use crate::signal::SignalId;
use crate::switch::SwitchId;
use crate::value::{BitWidth, PullResistor, Value};
use tracing::debug;

/// The bus side of one simulation model.
///
/// Owns the netlist, the bus handlers and the [`Coordinator`]. The scheduler
/// drives outputs, toggles switches and reports settled steps through this
/// type; everything runs synchronously to completion inside each call.
#[derive(Debug)]
pub struct Model {
    netlist: Netlist,
    handlers: HandlerTable,
    coordinator: Coordinator,
    history: BurnHistory,
    step_count: u64,
}

impl Model {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            netlist: Netlist::new(),
            handlers: HandlerTable::new(),
            coordinator: Coordinator::new(config),
            history: BurnHistory::new(),
            step_count: 0,
        }
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Netlist, &mut HandlerTable, &mut Coordinator) {
        (&mut self.netlist, &mut self.handlers, &mut self.coordinator)
    }

    // --- building -------------------------------------------------------

    /// Adds a component output, initially high-Z.
    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        bits: u8,
    ) -> Result<SignalId, WiringError> {
        self.add_output_with_pull(name, bits, PullResistor::None)
    }

    pub fn add_output_with_pull(
        &mut self,
        name: impl Into<String>,
        bits: u8,
        pull: PullResistor,
    ) -> Result<SignalId, WiringError> {
        let width = BitWidth::new(bits)?;
        Ok(self.netlist.add_signal(name, width, pull))
    }

    /// Joins `outputs` into one net. See [`DataBus::builder`] for labels and origins.
    pub fn build_bus(&mut self, outputs: &[SignalId]) -> Result<DataBus, WiringError> {
        DataBus::builder(outputs).build(self)
    }

    pub fn add_switch(
        &mut self,
        left: NetId,
        right: NetId,
        closed: bool,
    ) -> Result<SwitchId, WiringError> {
        self.insert_switch(left, right, None, closed)
    }

    /// Adds a switch whose own pins `terminals` are wired into its endpoint
    /// nets. The pins are ignored while the switch is closed.
    pub fn add_switch_with_terminals(
        &mut self,
        left: NetId,
        right: NetId,
        terminals: [SignalId; 2],
        closed: bool,
    ) -> Result<SwitchId, WiringError> {
        self.insert_switch(left, right, Some(terminals), closed)
    }

    fn insert_switch(
        &mut self,
        left: NetId,
        right: NetId,
        terminals: Option<[SignalId; 2]>,
        closed: bool,
    ) -> Result<SwitchId, WiringError> {
        let (l, r) = (self.netlist.net(left), self.netlist.net(right));
        if left == right {
            return Err(WiringError::SwitchLoop(l.label().to_string()));
        }
        if l.width() != r.width() {
            return Err(WiringError::SwitchWidthMismatch {
                left: l.label().to_string(),
                left_bits: l.width().bits(),
                right: r.label().to_string(),
                right_bits: r.width().bits(),
            });
        }

        let id = self.netlist.add_switch(left, right, terminals);
        if closed {
            self.set_switch(id, true);
        }
        Ok(id)
    }

    // --- driving --------------------------------------------------------

    /// Drives `signal` with `value`, masked to the signal's width.
    pub fn set_output(&mut self, signal: SignalId, value: u64) {
        self.set_signal(signal, value, false);
    }

    /// Releases `signal`.
    pub fn set_high_z(&mut self, signal: SignalId) {
        self.set_signal(signal, 0, true);
    }

    pub fn drive(&mut self, signal: SignalId, value: Value) {
        self.set_signal(signal, value.bits(), value.is_high_z());
    }

    fn set_signal(&mut self, signal: SignalId, bits: u64, high_z: bool) {
        if self.netlist.signal_mut(signal).set(bits, high_z) {
            bus::propagate(
                vec![signal],
                &mut self.netlist,
                &mut self.handlers,
                &mut self.coordinator,
            );
        }
    }

    /// Opens or closes a switch. Delegates to [`Coordinator::set_closed`].
    pub fn set_switch(&mut self, switch: SwitchId, closed: bool) {
        self.coordinator
            .set_closed(switch, closed, &mut self.netlist, &mut self.handlers);
    }

    // --- steps ----------------------------------------------------------

    /// Reports a settled step. Fails if a burn condition survived it.
    pub fn step(&mut self) -> Result<(), BurnError> {
        self.handle_event(ModelEvent::Step)
    }

    /// Runs the burn check for a step that had nothing to update.
    pub fn check_burn(&mut self) -> Result<(), BurnError> {
        self.handle_event(ModelEvent::CheckBurn)
    }

    pub fn handle_event(&mut self, event: ModelEvent) -> Result<(), BurnError> {
        if event == ModelEvent::Step {
            self.step_count += 1;
        }
        let result = self
            .coordinator
            .handle_event(event, &self.netlist, &mut self.handlers);
        if let Err(e) = &result {
            debug!(step = self.step_count, error = %e, "step aborted");
            if self.coordinator.config().history_enabled {
                self.history.record(e, self.step_count);
            }
        }
        result
    }

    // --- inspection -----------------------------------------------------

    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn read(&self, signal: SignalId) -> Value {
        self.netlist.signal(signal).value()
    }

    pub fn net_signal(&self, net: NetId) -> SignalId {
        self.netlist.net(net).output()
    }

    pub fn net_value(&self, net: NetId) -> Value {
        self.read(self.net_signal(net))
    }

    /// Kind of the handler currently installed on `net`.
    pub fn handler_kind(&self, net: NetId) -> Option<HandlerKind> {
        self.handlers
            .get(self.netlist.net(net).handler())
            .map(bus::BusHandler::kind)
    }

    /// All nets sharing `net`'s handler, sorted; just `net` when unmerged.
    pub fn group_of(&self, net: NetId) -> Vec<NetId> {
        let mut nets = self
            .handlers
            .get(self.netlist.net(net).handler())
            .map(|h| h.nets().to_vec())
            .unwrap_or_default();
        nets.sort_unstable();
        nets
    }

    pub fn is_closed(&self, switch: SwitchId) -> bool {
        self.coordinator.is_closed(switch)
    }

    /// Number of handlers queued for the next step-end check.
    pub fn pending_checks(&self) -> usize {
        self.coordinator.pending().len()
    }

    pub fn version(&self) -> u64 {
        self.coordinator.version()
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn stats(&self) -> &CoordinatorStats {
        self.coordinator.stats()
    }

    pub fn history(&self) -> &BurnHistory {
        &self.history
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
