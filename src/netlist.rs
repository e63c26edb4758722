use crate::bus::HandlerId;
use crate::net::{Net, NetId};
use crate::signal::{Signal, SignalId};
use crate::switch::{Switch, SwitchId};
use crate::value::{BitWidth, PullResistor};

/// Storage for the signals, nets and switches of one circuit.
///
/// Ids are handed out in insertion order and never reused. They are only
/// meaningful for the netlist that issued them.
#[derive(Debug, Default)]
pub struct Netlist {
    signals: Vec<Signal>,
    nets: Vec<Net>,
    switches: Vec<Switch>,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panics if `id` was issued by another netlist and is out of range.
    pub fn signal(&self, id: SignalId) -> &Signal {
        &self.signals[id.index()]
    }

    pub(crate) fn signal_mut(&mut self, id: SignalId) -> &mut Signal {
        &mut self.signals[id.index()]
    }

    pub fn signals(&self) -> impl Iterator<Item = (SignalId, &Signal)> {
        self.signals
            .iter()
            .enumerate()
            .map(|(i, s)| (SignalId(i as u32), s))
    }

    /// Panics if `id` was issued by another netlist and is out of range.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.index()]
    }

    pub(crate) fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id.index()]
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    /// Panics if `id` was issued by another netlist and is out of range.
    pub fn switch(&self, id: SwitchId) -> &Switch {
        &self.switches[id.index()]
    }

    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    pub(crate) fn add_signal(
        &mut self,
        name: impl Into<String>,
        width: BitWidth,
        pull: PullResistor,
    ) -> SignalId {
        let id = SignalId(self.signals.len() as u32);
        self.signals.push(Signal::new(name, width, pull));
        id
    }

    pub(crate) fn next_net_id(&self) -> NetId {
        NetId(self.nets.len() as u32)
    }

    /// Adds a net and registers it as observer of each of its inputs.
    pub(crate) fn add_net(
        &mut self,
        label: String,
        origin: Option<String>,
        width: BitWidth,
        inputs: Vec<SignalId>,
        resistor: PullResistor,
        handler: HandlerId,
    ) -> NetId {
        let id = self.next_net_id();
        let output = self.add_signal(label.clone(), width, PullResistor::None);
        for &input in &inputs {
            self.signal_mut(input).add_observer(id);
        }
        self.nets
            .push(Net::new(id, label, origin, width, output, inputs, resistor, handler));
        id
    }

    pub(crate) fn add_switch(
        &mut self,
        left: NetId,
        right: NetId,
        terminals: Option<[SignalId; 2]>,
    ) -> SwitchId {
        let id = SwitchId(self.switches.len() as u32);
        self.switches.push(Switch::new(id, left, right, terminals));
        id
    }

    /// Names of the given signals, in order.
    pub fn names_of(&self, ids: &[SignalId]) -> Vec<String> {
        ids.iter().map(|&id| self.signal(id).name().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width() -> BitWidth {
        BitWidth::new(4).unwrap()
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut netlist = Netlist::new();
        let a = netlist.add_signal("a", width(), PullResistor::None);
        let b = netlist.add_signal("b", width(), PullResistor::PullUp);
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(netlist.names_of(&[b, a]), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(netlist.signal(b).pull(), PullResistor::PullUp);
    }

    #[test]
    #[should_panic]
    fn test_foreign_signal_id_panics() {
        let mut other = Netlist::new();
        other.add_signal("a", width(), PullResistor::None);
        let foreign = other.add_signal("b", width(), PullResistor::None);

        let mut netlist = Netlist::new();
        netlist.add_signal("a", width(), PullResistor::None);
        let _ = netlist.signal(foreign);
    }

    #[test]
    #[should_panic]
    fn test_foreign_net_id_panics() {
        let netlist = Netlist::new();
        let _ = netlist.net(NetId(3));
    }
}
