use crate::net::NetId;
use crate::signal::SignalId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SwitchId(pub(crate) u32);

impl SwitchId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A bidirectional switch between two nets.
///
/// Whether it is closed is owned by the [`Coordinator`](crate::coordinator::Coordinator),
/// not by the switch.
#[derive(Debug, Clone)]
pub struct Switch {
    id: SwitchId,
    left: NetId,
    right: NetId,
    terminals: Option<[SignalId; 2]>,
}

impl Switch {
    pub(crate) fn new(
        id: SwitchId,
        left: NetId,
        right: NetId,
        terminals: Option<[SignalId; 2]>,
    ) -> Self {
        Self {
            id,
            left,
            right,
            terminals,
        }
    }

    pub fn id(&self) -> SwitchId {
        self.id
    }

    pub fn left(&self) -> NetId {
        self.left
    }

    pub fn right(&self) -> NetId {
        self.right
    }

    pub fn endpoints(&self) -> [NetId; 2] {
        [self.left, self.right]
    }

    /// The switch's own pins, dropped from the driver list of a merged net.
    pub fn terminals(&self) -> &[SignalId] {
        match &self.terminals {
            Some(pins) => pins.as_slice(),
            None => &[],
        }
    }
}
