use crate::net::NetId;
use crate::value::{BitWidth, PullResistor, Value};
use serde::{Deserialize, Serialize};

/// Index of a signal inside a [`Netlist`](crate::netlist::Netlist).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SignalId(pub(crate) u32);

impl SignalId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A multi-bit tri-state value that notifies the nets observing it.
#[derive(Debug, Clone)]
pub struct Signal {
    name: String,
    value: Value,
    pull: PullResistor,
    observers: Vec<NetId>,
    changes: u64,
}

impl Signal {
    /// A new signal, initially high-Z.
    pub fn new(name: impl Into<String>, width: BitWidth, pull: PullResistor) -> Self {
        Self {
            name: name.into(),
            value: Value::high_z(width),
            pull,
            observers: Vec::new(),
            changes: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> BitWidth {
        self.value.width()
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn is_high_z(&self) -> bool {
        self.value.is_high_z()
    }

    pub fn pull(&self) -> PullResistor {
        self.pull
    }

    pub fn observers(&self) -> &[NetId] {
        &self.observers
    }

    /// Number of effective changes since creation.
    pub fn changes(&self) -> u64 {
        self.changes
    }

    pub(crate) fn add_observer(&mut self, net: NetId) {
        if !self.observers.contains(&net) {
            self.observers.push(net);
        }
    }

    /// Stores a new value; returns true if observers must be notified.
    pub(crate) fn set(&mut self, bits: u64, high_z: bool) -> bool {
        let next = Value::from_parts(self.value.width(), bits, high_z);
        if next == self.value {
            return false;
        }
        self.value = next;
        self.changes += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reports_only_effective_changes() {
        let mut signal = Signal::new("O1", BitWidth::new(4).unwrap(), PullResistor::None);
        assert!(signal.is_high_z());

        assert!(signal.set(5, false));
        assert!(!signal.set(5, false));
        assert!(!signal.set(0x15, false)); // masked to 5
        assert!(signal.set(0, true));
        assert!(!signal.set(3, true));
        assert_eq!(signal.changes(), 2);
    }

    #[test]
    fn test_observer_registered_once() {
        let mut signal = Signal::new("O1", BitWidth::new(1).unwrap(), PullResistor::None);
        signal.add_observer(NetId(0));
        signal.add_observer(NetId(0));
        signal.add_observer(NetId(1));
        assert_eq!(signal.observers(), [NetId(0), NetId(1)]);
    }
}
