//! Construction of a net from the outputs wired to one junction.
//!
//! A data bus joins outputs that may go high-Z. If exactly one of them drives
//! a value, the net carries that value. If several drive different values the
//! net is in a burn condition, which only becomes an error if it is still
//! present when the step completes.

use crate::bus::{self, BusHandler, SingleBusHandler};
use crate::error::WiringError;
use crate::model::Model;
use crate::net::NetId;
use crate::signal::SignalId;
use crate::value::PullResistor;

#[derive(Debug, Clone)]
pub struct DataBusBuilder {
    outputs: Vec<SignalId>,
    label: Option<String>,
    origin: Option<String>,
}

impl DataBusBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Circuit the net belongs to, reported in burn errors.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn build(self, model: &mut Model) -> Result<DataBus, WiringError> {
        let (netlist, handlers, coordinator) = model.parts_mut();

        let id = netlist.next_net_id();
        let label = self.label.unwrap_or_else(|| format!("net{}", id.index()));

        let Some(&first) = self.outputs.first() else {
            return Err(WiringError::EmptyNet);
        };
        let width = netlist.signal(first).width();

        let mut resistor = PullResistor::None;
        let mut pulled: Vec<SignalId> = Vec::new();
        for &output in &self.outputs {
            let signal = netlist.signal(output);
            if signal.width() != width {
                return Err(WiringError::BitWidthMismatch {
                    net: label,
                    expected: width.bits(),
                    found: signal.width().bits(),
                    signal: signal.name().to_string(),
                });
            }

            match (resistor, signal.pull()) {
                (_, PullResistor::None) => {}
                (PullResistor::PullUp, PullResistor::PullDown | PullResistor::Both)
                | (PullResistor::PullDown, PullResistor::PullUp | PullResistor::Both)
                | (_, PullResistor::Both) => {
                    pulled.push(output);
                    return Err(WiringError::PullUpAndDown {
                        net: label,
                        signals: netlist.names_of(&pulled),
                    });
                }
                (_, pull) => {
                    resistor = pull;
                    pulled.push(output);
                }
            }
        }

        let handler = handlers.insert(BusHandler::Single(SingleBusHandler::from_parts(
            id,
            width,
            self.outputs.clone(),
            resistor,
        )));
        let net = netlist.add_net(label, self.origin, width, self.outputs, resistor, handler);
        let output = netlist.net(net).output();

        let changed = bus::recalculate(handler, netlist, handlers, coordinator);
        bus::propagate(changed, netlist, handlers, coordinator);

        Ok(DataBus { net, output })
    }
}

/// A validated net built from a set of wired outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBus {
    net: NetId,
    output: SignalId,
}

impl DataBus {
    pub fn builder(outputs: &[SignalId]) -> DataBusBuilder {
        DataBusBuilder {
            outputs: outputs.to_vec(),
            label: None,
            origin: None,
        }
    }

    pub fn net(&self) -> NetId {
        self.net
    }

    /// The signal other components read the bus value from.
    pub fn readable_output(&self) -> SignalId {
        self.output
    }
}
