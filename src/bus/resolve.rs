use crate::config::PullConflictPolicy;
use crate::signal::SignalId;
use crate::value::{BitWidth, PullResistor, Value};
use serde::{Deserialize, Serialize};

/// Burn condition found by the last recalculation of a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BurnState {
    #[default]
    Ok,
    /// Two or more drivers assert different values.
    ShortCircuit,
    /// Pull-up and pull-down meet on a merged net under [`PullConflictPolicy::Fault`].
    PullConflict,
}

/// Outcome of resolving one net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub value: Value,
    pub burn: BurnState,
    /// Every input that was driving a defined value.
    pub drivers: Vec<SignalId>,
}

/// Resolves the value a group of tri-state drivers presents on a net.
///
/// All inputs are scanned even after a mismatch has been found, so the burn
/// state does not depend on input order. A burn never changes the value
/// that is presented; the first defined driver wins until the step settles.
pub fn resolve<I>(
    inputs: I,
    resistor: PullResistor,
    width: BitWidth,
    policy: PullConflictPolicy,
) -> Resolution
where
    I: IntoIterator<Item = (SignalId, Value)>,
{
    if resistor == PullResistor::Both && policy == PullConflictPolicy::Fault {
        return Resolution {
            value: Value::high_z(width),
            burn: BurnState::PullConflict,
            drivers: Vec::new(),
        };
    }

    let mut value: Option<u64> = None;
    let mut burn = BurnState::Ok;
    let mut drivers = Vec::new();

    for (id, input) in inputs {
        let Some(bits) = input.as_defined() else {
            continue;
        };
        drivers.push(id);
        match value {
            None => value = Some(bits),
            Some(adopted) if adopted != bits => burn = BurnState::ShortCircuit,
            Some(_) => {}
        }
    }

    let value = match value.or_else(|| resistor.floating_value(width)) {
        Some(bits) => Value::defined(width, bits),
        None => Value::high_z(width),
    };

    Resolution { value, burn, drivers }
}
