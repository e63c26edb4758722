use crate::error::WiringError;
use serde::{Deserialize, Serialize};

pub const MAX_BITS: u8 = 64;

/// Number of bits carried by a signal, always in `1..=64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BitWidth(u8);

impl BitWidth {
    pub fn new(bits: u8) -> Result<Self, WiringError> {
        if bits == 0 || bits > MAX_BITS {
            return Err(WiringError::InvalidBitWidth(bits));
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// All bits of this width set.
    pub fn mask(self) -> u64 {
        if self.0 == MAX_BITS {
            u64::MAX
        } else {
            (1u64 << self.0) - 1
        }
    }
}

impl TryFrom<u8> for BitWidth {
    type Error = WiringError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<BitWidth> for u8 {
    fn from(width: BitWidth) -> Self {
        width.0
    }
}

impl core::fmt::Display for BitWidth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A width-bound integer together with its tri-state flag.
///
/// A high-Z value never carries value bits, so two high-Z values of the same
/// width always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    width: BitWidth,
    bits: u64,
    high_z: bool,
}

impl Value {
    /// A driven value, masked to `width`.
    pub fn defined(width: BitWidth, bits: u64) -> Self {
        Self {
            width,
            bits: bits & width.mask(),
            high_z: false,
        }
    }

    pub fn high_z(width: BitWidth) -> Self {
        Self {
            width,
            bits: 0,
            high_z: true,
        }
    }

    pub(crate) fn from_parts(width: BitWidth, bits: u64, high_z: bool) -> Self {
        if high_z {
            Self::high_z(width)
        } else {
            Self::defined(width, bits)
        }
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// The value bits; zero while high-Z.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn is_high_z(&self) -> bool {
        self.high_z
    }

    /// The value bits if the value is driven.
    pub fn as_defined(&self) -> Option<u64> {
        (!self.high_z).then_some(self.bits)
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.high_z {
            write!(f, "Z")
        } else {
            write!(f, "0x{:x}", self.bits)
        }
    }
}

/// Weak driver attached to an output or a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PullResistor {
    #[default]
    None,
    PullUp,
    PullDown,
    /// Pull-up and pull-down meet on one net after a switch merge.
    Both,
}

impl PullResistor {
    /// Combines the resistors of two nets joined by a closed switch.
    pub fn combine(self, other: PullResistor) -> PullResistor {
        match (self, other) {
            (PullResistor::None, r) | (r, PullResistor::None) => r,
            (a, b) if a == b => a,
            _ => PullResistor::Both,
        }
    }

    /// The value a floating net takes under this resistor, if any.
    pub fn floating_value(self, width: BitWidth) -> Option<u64> {
        match self {
            PullResistor::PullUp => Some(width.mask()),
            PullResistor::PullDown => Some(0),
            PullResistor::None | PullResistor::Both => None,
        }
    }
}
