use super::BurnTracker;
use crate::net::{Net, NetId};
use crate::signal::SignalId;
use crate::value::{BitWidth, PullResistor};

/// Handler of a net that shares nothing through a switch.
#[derive(Debug, Clone)]
pub struct SingleBusHandler {
    net: NetId,
    width: BitWidth,
    inputs: Vec<SignalId>,
    resistor: PullResistor,
    pub(super) tracker: BurnTracker,
}

impl SingleBusHandler {
    pub fn new(net: &Net) -> Self {
        Self::from_parts(net.id(), net.width(), net.inputs().to_vec(), net.resistor())
    }

    pub(crate) fn from_parts(
        net: NetId,
        width: BitWidth,
        inputs: Vec<SignalId>,
        resistor: PullResistor,
    ) -> Self {
        Self {
            net,
            width,
            inputs,
            resistor,
            tracker: BurnTracker::default(),
        }
    }

    pub fn net(&self) -> NetId {
        self.net
    }

    pub fn nets(&self) -> &[NetId] {
        std::slice::from_ref(&self.net)
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
