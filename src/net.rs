use crate::bus::HandlerId;
use crate::signal::SignalId;
use crate::value::{BitWidth, PullResistor};
use serde::{Deserialize, Serialize};

/// Index of a net inside a [`Netlist`](crate::netlist::Netlist).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NetId(pub(crate) u32);

impl NetId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One electrical junction.
///
/// The net's resolved value lives in its `output` signal, which keeps its
/// identity while the handler computing it is swapped.
#[derive(Debug, Clone)]
pub struct Net {
    id: NetId,
    label: String,
    origin: Option<String>,
    width: BitWidth,
    output: SignalId,
    inputs: Vec<SignalId>,
    resistor: PullResistor,
    handler: HandlerId,
}

impl Net {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: NetId,
        label: String,
        origin: Option<String>,
        width: BitWidth,
        output: SignalId,
        inputs: Vec<SignalId>,
        resistor: PullResistor,
        handler: HandlerId,
    ) -> Self {
        Self {
            id,
            label,
            origin,
            width,
            output,
            inputs,
            resistor,
            handler,
        }
    }

    pub fn id(&self) -> NetId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Circuit the net was defined in, used in error messages.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// The readable signal carrying the resolved value.
    pub fn output(&self) -> SignalId {
        self.output
    }

    /// Outputs wired to this junction.
    pub fn inputs(&self) -> &[SignalId] {
        &self.inputs
    }

    pub fn resistor(&self) -> PullResistor {
        self.resistor
    }

    pub fn handler(&self) -> HandlerId {
        self.handler
    }

    pub(crate) fn install_handler(&mut self, handler: HandlerId) {
        self.handler = handler;
    }
}
