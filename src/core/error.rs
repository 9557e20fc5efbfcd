//! Error types raised during configuration and lookup.
//!
//! Configuration-time violations fail fast: a graph that breaks an invariant
//! cannot be constructed. Runtime firing never surfaces these — an
//! unresolved trigger is a silent no-op, not an error.

use thiserror::Error;

/// A reference to a state or trigger that was never configured.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The state was never passed to `configure`, so no vertex exists for it.
    #[error("state {state} is not configured")]
    UnknownState { state: String },

    /// The vertex has no edge list for the trigger.
    #[error("no transition is registered for trigger {trigger}")]
    UnknownTrigger { trigger: String },

    /// The operation needs a current state, but `start` was never called.
    #[error("the state machine has not been started")]
    NotStarted,
}

/// A configuration-time invariant violation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A second vertex was flagged as the wildcard any-state.
    #[error("an any-state is already registered: {existing}")]
    AnyStateAlreadySet { existing: String },

    /// A state was declared a substate of itself.
    #[error("state {state} cannot be its own superstate")]
    SelfSuperstate { state: String },

    /// The chosen superstate already has a superstate of its own.
    #[error("superstate {superstate} is itself a substate; only single-tier nesting is supported")]
    NestedSuperstate { superstate: String },

    /// The same callback handle was registered twice on one list.
    #[error("callback is already registered on state {state}")]
    DuplicateCallback { state: String },

    /// Configuration referenced a state that does not exist yet.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
