//! Core state machine types.
//!
//! This module contains the building blocks the machine is assembled from:
//! - Identifier traits for states and triggers
//! - The per-fire transition record
//! - The controller contract (with the cancellation extension)
//! - State vertices with guarded edges and recursive enter/exit
//! - The configuration and lookup error taxonomy

mod controller;
mod error;
mod representation;
mod state;
mod transition;

pub use controller::{CancellableController, EnterData, ExitData, StateController};
pub use error::{ConfigError, LookupError};
pub use representation::{Callback, EnterDataFn, ExitDataFn, GuardFn, StateRepresentation};
pub use state::{StateId, TriggerId};
pub use transition::Transition;
