use super::BurnTracker;
use crate::net::{Net, NetId};
use crate::signal::SignalId;
use crate::value::{BitWidth, PullResistor};
use std::collections::HashSet;

/// Handler shared by all nets joined through closed switches.
///
/// Every absorbed net receives the same resolved value.
#[derive(Debug, Clone)]
pub struct ConnectedBusHandler {
    nets: Vec<NetId>,
    width: BitWidth,
    inputs: Vec<SignalId>,
    resistor: PullResistor,
    excludes: HashSet<SignalId>,
    pub(super) tracker: BurnTracker,
}

impl ConnectedBusHandler {
    pub fn new(width: BitWidth) -> Self {
        Self {
            nets: Vec::new(),
            width,
            inputs: Vec::new(),
            resistor: PullResistor::None,
            excludes: HashSet::new(),
            tracker: BurnTracker::default(),
        }
    }

    /// Absorbs the drivers and resistor of `net`.
    pub fn add_net(&mut self, net: &Net) {
        if self.nets.contains(&net.id()) {
            return;
        }
        self.nets.push(net.id());
        self.inputs.extend_from_slice(net.inputs());
        self.resistor = self.resistor.combine(net.resistor());
    }

    /// Absorbs another group, including its pending excludes.
    pub fn merge(&mut self, other: ConnectedBusHandler) {
        for net in other.nets {
            if !self.nets.contains(&net) {
                self.nets.push(net);
            }
        }
        self.inputs.extend(other.inputs);
        self.resistor = self.resistor.combine(other.resistor);
        self.excludes.extend(other.excludes);
    }

    /// Marks switch terminals to be dropped from the driver list.
    pub fn add_excludes(&mut self, pins: &[SignalId]) {
        self.excludes.extend(pins.iter().copied());
    }

    /// Drops the excluded pins and any duplicated driver.
    pub fn remove_excludes(&mut self) {
        let mut seen = HashSet::new();
        let excludes = std::mem::take(&mut self.excludes);
        self.inputs.retain(|s| !excludes.contains(s) && seen.insert(*s));
    }

    pub fn nets(&self) -> &[NetId] {
        &self.nets
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    pub fn inputs(&self) -> &[SignalId] {
        &self.inputs
    }

    pub fn resistor(&self) -> PullResistor {
        self.resistor
    }
}
