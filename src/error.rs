use thiserror::Error;

/// Static wiring errors, raised while a circuit is being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringError {
    #[error("bit width {0} is outside 1..=64")]
    InvalidBitWidth(u8),

    #[error("a net needs at least one output")]
    EmptyNet,

    #[error("outputs of net {net} differ in bit width: expected {expected}, {signal} has {found}")]
    BitWidthMismatch {
        net: String,
        expected: u8,
        found: u8,
        signal: String,
    },

    #[error(
        "pull-up and pull-down resistors are not allowed on the same net {net} ({})",
        .signals.join(", ")
    )]
    PullUpAndDown { net: String, signals: Vec<String> },

    #[error("switch joins {left} ({left_bits} bits) and {right} ({right_bits} bits)")]
    SwitchWidthMismatch {
        left: String,
        left_bits: u8,
        right: String,
        right_bits: u8,
    },

    #[error("switch connects net {0} to itself")]
    SwitchLoop(String),
}

/// A short circuit that survived to the end of a simulation step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BurnError {
    #[error(
        "short circuit on net {}: {} drive different values{}",
        .nets.join("/"),
        .drivers.join(", "),
        format_origins(.origins)
    )]
    ShortCircuit {
        nets: Vec<String>,
        drivers: Vec<String>,
        origins: Vec<String>,
    },

    #[error(
        "pull-up and pull-down resistors meet on net {}{}",
        .nets.join("/"),
        format_origins(.origins)
    )]
    PullUpAndDown {
        nets: Vec<String>,
        origins: Vec<String>,
    },
}

impl BurnError {
    /// Labels of the nets involved.
    pub fn nets(&self) -> &[String] {
        match self {
            BurnError::ShortCircuit { nets, .. } | BurnError::PullUpAndDown { nets, .. } => nets,
        }
    }

    /// Names of the conflicting drivers; empty for a resistor conflict.
    pub fn drivers(&self) -> &[String] {
        match self {
            BurnError::ShortCircuit { drivers, .. } => drivers,
            BurnError::PullUpAndDown { .. } => &[],
        }
    }
}

fn format_origins(origins: &[String]) -> String {
    if origins.is_empty() {
        String::new()
    } else {
        format!(" (in {})", origins.join(", "))
    }
}

/// Either kind of error, for callers that build and run in one place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),

    #[error("burn error: {0}")]
    Burn(#[from] BurnError),
}
