//! Stance: an embeddable hierarchical state machine.
//!
//! Callers define states, triggers, guarded transitions, entry/exit
//! callbacks, and single-tier state nesting, then drive the machine by
//! firing triggers. The engine resolves each trigger to a transition, runs
//! lifecycle callbacks in a well-defined order, and exposes introspection
//! over the current state and the permitted triggers.
//!
//! # Core Concepts
//!
//! - **States and triggers**: any value-equality types via the [`StateId`]
//!   and [`TriggerId`] marker traits
//! - **Guarded edges**: several candidates may share a trigger; the first
//!   whose guard holds at fire time wins
//! - **Single-tier nesting**: a substate inherits its superstate's edges as
//!   a fallback and cascades entry/exit across the boundary
//! - **Any-state**: one wildcard vertex consulted when nothing else resolves
//!   a trigger
//! - **Controllers**: per-state collaborators notified on enter/exit,
//!   optionally handed a cancellation token tied to state occupancy
//! - **Re-entrant firing**: triggers fired from inside callbacks are queued
//!   and processed after the in-progress transition completes
//!
//! The machine runs entirely on the calling thread; it is not meant to be
//! fired from multiple threads concurrently.
//!
//! # Example
//!
//! ```rust
//! use stance::StateMachine;
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Player {
//!     Idle,
//!     Running,
//!     Paused,
//! }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Input {
//!     Start,
//!     Pause,
//!     Resume,
//!     Stop,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let machine = StateMachine::named("player");
//!
//! machine
//!     .configure(Player::Idle, None)
//!     .permit(Input::Start, Player::Running);
//!
//! machine
//!     .configure(Player::Running, None)
//!     .permit(Input::Pause, Player::Paused)
//!     .permit(Input::Stop, Player::Idle);
//!
//! machine
//!     .configure(Player::Paused, None)
//!     .substate_of(Player::Running)?
//!     .permit(Input::Resume, Player::Running)
//!     .permit(Input::Stop, Player::Idle);
//!
//! machine.start(Player::Idle)?;
//! machine.fire(Input::Start)?;
//! assert_eq!(machine.current_state(), Some(Player::Running));
//!
//! machine.fire(Input::Pause)?;
//! assert_eq!(machine.current_state(), Some(Player::Paused));
//! // Paused is nested inside Running, so the machine is in both.
//! assert!(machine.is_in_state(&Player::Running));
//!
//! machine.fire(Input::Stop)?;
//! assert_eq!(machine.current_state(), Some(Player::Idle));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use crate::builder::{action, StateBuilder};
pub use crate::core::{
    Callback, CancellableController, ConfigError, EnterData, ExitData, LookupError,
    StateController, StateId, StateRepresentation, Transition, TriggerId,
};
pub use crate::machine::StateMachine;
