//! # Tri-state Bus Resolution
//!
//! Resolves the value of nets where several tri-state outputs are wired
//! together, detects short circuits with a deferred per-step fault model, and
//! merges or splits nets while switches open and close during simulation.
//!
//! ## Features
//!
//! - **Net resolution**: one defined driver wins, pull resistors define floating nets
//! - **Deferred burn checks**: conflicts inside a step are tolerated, conflicts
//!   surviving to the end of the step are reported
//! - **Switch topology**: closed switches join nets into one shared bus, rebuilt
//!   from scratch on every toggle
//! - **Static validation**: bit widths and pull resistors are checked when a bus is built
//!
//! ## Quick Start
//!
//! ```rust
//! use busnet::Model;
//!
//! let mut model = Model::new();
//! let a = model.add_output("a", 8).unwrap();
//! let b = model.add_output("b", 8).unwrap();
//! let bus = model.build_bus(&[a, b]).unwrap();
//!
//! model.set_output(a, 0x42);
//! assert_eq!(model.read(bus.readable_output()).as_defined(), Some(0x42));
//!
//! // Two different values on one net: tolerated until the step ends.
//! model.set_output(b, 0x17);
//! assert!(model.step().is_err());
//! ```
//!
//! ## Architecture
//!
//! - [`model`] - Owner of all bus state and entry point for the scheduler
//! - [`data_bus`] - Validation and construction of nets
//! - [`bus`] - Resolution algorithm and the single/connected handlers
//! - [`coordinator`] - Step-end burn checks and switch-driven reconfiguration
//! - [`fault`] - History of burns that aborted a step

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod bus;
pub mod config;
pub mod coordinator;
pub mod data_bus;
pub mod error;
pub mod fault;
pub mod model;
pub mod net;
pub mod netlist;
pub mod signal;
pub mod switch;
pub mod value;

// Re-export main public types for convenience
pub use config::{BusConfig, PullConflictPolicy};
pub use coordinator::{Coordinator, ModelEvent};
pub use data_bus::DataBus;
pub use error::{BurnError, SimError, WiringError};
pub use model::Model;
pub use net::NetId;
pub use signal::SignalId;
pub use switch::SwitchId;
pub use value::{BitWidth, PullResistor, Value};
