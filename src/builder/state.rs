//! Per-state fluent configuration.

use std::rc::Rc;

use crate::core::{
    Callback, ConfigError, EnterData, StateId, StateRepresentation, Transition, TriggerId,
};
use crate::machine::StateMachine;

/// Fluent configuration handle for one state, returned by
/// [`StateMachine::configure`].
///
/// Infallible steps consume and return the builder for chaining; steps that
/// can violate a configuration invariant return `Result<Self, ConfigError>`
/// and compose with `?`. All edits apply immediately to the machine's vertex
/// — dropping the builder loses nothing.
pub struct StateBuilder<'m, S: StateId, T: TriggerId> {
    machine: &'m StateMachine<S, T>,
    representation: StateRepresentation<S, T>,
}

impl<'m, S: StateId, T: TriggerId> std::fmt::Debug for StateBuilder<'m, S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateBuilder")
            .field("state", &self.representation.id())
            .finish_non_exhaustive()
    }
}

impl<'m, S: StateId, T: TriggerId> StateBuilder<'m, S, T> {
    pub(crate) fn new(
        machine: &'m StateMachine<S, T>,
        representation: StateRepresentation<S, T>,
    ) -> Self {
        Self {
            machine,
            representation,
        }
    }

    /// The state being configured.
    pub fn state(&self) -> S {
        self.representation.id()
    }

    /// Permit `trigger` to move the machine to `destination`.
    pub fn permit(self, trigger: T, destination: S) -> Self {
        self.representation.add_transition(trigger, destination, None);
        self
    }

    /// Permit `trigger` to move to `destination` while `guard` holds.
    ///
    /// The guard is retained and re-evaluated on every fire. Several
    /// candidates may share a trigger; they are tried in registration order
    /// and the first satisfied guard wins.
    pub fn permit_if(
        self,
        trigger: T,
        destination: S,
        guard: impl Fn() -> bool + 'static,
    ) -> Self {
        self.representation
            .add_transition(trigger, destination, Some(Rc::new(guard)));
        self
    }

    /// Permit `trigger` to re-enter this same state.
    pub fn permit_reentry(self, trigger: T) -> Self {
        let own = self.state();
        self.permit(trigger, own)
    }

    /// Conditionally permit reentry: `guard` runs once, right now.
    ///
    /// A passing guard registers an *unconditional* reentry edge — the guard
    /// is not retained and never consulted again. This is deliberately
    /// different from [`permit_if`], whose guard is re-evaluated per fire;
    /// the `FnOnce` bound spells the difference out.
    ///
    /// [`permit_if`]: Self::permit_if
    pub fn permit_reentry_if(self, trigger: T, guard: impl FnOnce() -> bool) -> Self {
        if guard() {
            self.permit_reentry(trigger)
        } else {
            self
        }
    }

    /// Flag this state as the machine's wildcard: its edges resolve triggers
    /// no other lookup could. At most one state per machine may be flagged.
    pub fn set_as_any_state(self) -> Result<Self, ConfigError> {
        self.machine.set_any_state(&self.representation)?;
        Ok(self)
    }

    /// Append an entry callback. The same handle may only be registered once
    /// per list.
    pub fn on_enter(self, action: Callback) -> Result<Self, ConfigError> {
        self.representation.add_entry_action(action)?;
        Ok(self)
    }

    /// Append an exit callback. The same handle may only be registered once
    /// per list.
    pub fn on_exit(self, action: Callback) -> Result<Self, ConfigError> {
        self.representation.add_exit_action(action)?;
        Ok(self)
    }

    /// Install the entry-data producer, replacing any previous one. Its
    /// result is stored on the transition and handed to the controller.
    pub fn on_enter_data(
        self,
        produce: impl Fn(&Transition<S, T>) -> EnterData + 'static,
    ) -> Self {
        self.representation.set_enter_data_fn(Rc::new(produce));
        self
    }

    /// Install the exit-data consumer, replacing any previous one. It runs
    /// last in the exit sequence, after the controller's payload has been
    /// stored on the transition.
    pub fn on_exit_data(self, consume: impl Fn(&Transition<S, T>) + 'static) -> Self {
        self.representation.set_exit_data_fn(Rc::new(consume));
        self
    }

    /// Nest this state under `superstate`.
    ///
    /// Nesting is single-tier: the superstate must not itself be a substate,
    /// and a state cannot adopt itself. The superstate must already be
    /// configured.
    pub fn substate_of(self, superstate: S) -> Result<Self, ConfigError> {
        if self.state() == superstate {
            return Err(ConfigError::SelfSuperstate {
                state: format!("{superstate:?}"),
            });
        }
        let parent = self.machine.state_representation(&superstate)?;
        if parent.superstate().is_some() {
            return Err(ConfigError::NestedSuperstate {
                superstate: format!("{superstate:?}"),
            });
        }
        self.representation.set_superstate(&parent);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LookupError;
    use std::cell::Cell;

    fn machine() -> StateMachine<&'static str, &'static str> {
        StateMachine::new()
    }

    #[test]
    fn permit_registers_an_edge() {
        let machine = machine();
        machine.configure("a", None).permit("go", "b");

        let node = machine.state_representation(&"a").unwrap();
        assert!(node.can_handle(&"go"));
        assert_eq!(node.resolve(&"go").unwrap(), Some("b"));
    }

    #[test]
    fn permit_reentry_targets_the_own_state() {
        let machine = machine();
        machine.configure("a", None).permit_reentry("again");

        let node = machine.state_representation(&"a").unwrap();
        assert_eq!(node.resolve(&"again").unwrap(), Some("a"));
    }

    #[test]
    fn reentry_guard_is_evaluated_at_configuration_time() {
        let allow = Rc::new(Cell::new(true));
        let machine = machine();
        let flag = Rc::clone(&allow);
        machine
            .configure("a", None)
            .permit_reentry_if("again", move || flag.get());

        // Flipping the flag afterwards changes nothing: the edge is already
        // registered unconditionally.
        allow.set(false);
        let node = machine.state_representation(&"a").unwrap();
        assert_eq!(node.resolve(&"again").unwrap(), Some("a"));
    }

    #[test]
    fn failing_reentry_guard_registers_nothing() {
        let machine = machine();
        machine
            .configure("a", None)
            .permit_reentry_if("again", || false);

        let node = machine.state_representation(&"a").unwrap();
        assert!(!node.can_handle(&"again"));
    }

    #[test]
    fn substate_of_self_is_rejected() {
        let machine = machine();
        let err = machine
            .configure("a", None)
            .substate_of("a")
            .unwrap_err();
        assert!(matches!(err, ConfigError::SelfSuperstate { .. }));
    }

    #[test]
    fn multi_tier_nesting_is_rejected() {
        let machine = machine();
        machine.configure("grandparent", None);
        machine
            .configure("parent", None)
            .substate_of("grandparent")
            .unwrap();

        let err = machine
            .configure("child", None)
            .substate_of("parent")
            .unwrap_err();
        assert!(matches!(err, ConfigError::NestedSuperstate { .. }));
    }

    #[test]
    fn unknown_superstate_is_a_lookup_error() {
        let machine = machine();
        let err = machine
            .configure("a", None)
            .substate_of("never-configured")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Lookup(LookupError::UnknownState { .. })
        ));
    }

    #[test]
    fn second_any_state_is_rejected() {
        let machine = machine();
        machine
            .configure("wildcard", None)
            .set_as_any_state()
            .unwrap();

        let err = machine
            .configure("other", None)
            .set_as_any_state()
            .unwrap_err();
        assert!(matches!(err, ConfigError::AnyStateAlreadySet { .. }));
    }

    #[test]
    fn duplicate_entry_callback_is_rejected_on_the_second_call() {
        let machine = machine();
        let action: Callback = Rc::new(|| {});

        let builder = machine
            .configure("a", None)
            .on_enter(Rc::clone(&action))
            .unwrap();
        let err = builder.on_enter(action).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCallback { .. }));
    }

    #[test]
    fn chained_configuration_reads_fluently() {
        let machine = machine();
        machine.configure("running", None);
        machine
            .configure("paused", None)
            .substate_of("running")
            .unwrap()
            .permit("resume", "running")
            .permit("stop", "idle")
            .on_enter(Rc::new(|| {}))
            .unwrap();

        let node = machine.state_representation(&"paused").unwrap();
        assert!(node.can_handle(&"resume"));
        assert!(node.can_handle(&"stop"));
        assert_eq!(node.superstate().unwrap().id(), "running");
    }
}
