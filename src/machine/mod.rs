//! The state machine: trigger resolution, the re-entrant fire queue, and
//! introspection.
//!
//! A machine owns one [`StateRepresentation`] per configured state and a
//! current-state pointer. Firing a trigger resolves it against the current
//! vertex, then (only when that vertex has no edge at all for the trigger)
//! against its superstate and finally the any-state wildcard; the winning
//! edge drives exit callbacks on the old vertex and entry callbacks on the
//! new one.
//!
//! All operations take `&self` and run synchronously on the calling thread.
//! Callbacks and guards may call back into the machine — including firing
//! further triggers, which are queued and processed strictly after the
//! in-progress transition completes. To fire from inside a callback, capture
//! a clone of an `Rc<StateMachine>` handle (or a `Weak` one if the machine
//! must be droppable while callbacks are alive). The machine is not safe for
//! concurrent firing from multiple threads.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::builder::StateBuilder;
use crate::core::{
    Callback, ConfigError, LookupError, StateController, StateId, StateRepresentation, Transition,
    TriggerId,
};

/// A hierarchical, trigger-driven state machine.
///
/// # Example
///
/// ```rust
/// use stance::StateMachine;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Push {
///     Toggle,
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let machine = StateMachine::named("door");
/// machine.configure(Door::Open, None).permit(Push::Toggle, Door::Closed);
/// machine.configure(Door::Closed, None).permit(Push::Toggle, Door::Open);
///
/// machine.start(Door::Closed)?;
/// machine.fire(Push::Toggle)?;
/// assert_eq!(machine.current_state(), Some(Door::Open));
/// # Ok(())
/// # }
/// ```
pub struct StateMachine<S: StateId, T: TriggerId> {
    name: String,
    states: RefCell<HashMap<S, StateRepresentation<S, T>>>,
    current: RefCell<Option<S>>,
    any_state: RefCell<Option<StateRepresentation<S, T>>>,
    fire_queue: RefCell<VecDeque<T>>,
    on_transition: RefCell<Option<Callback>>,
}

impl<S: StateId, T: TriggerId> StateMachine<S, T> {
    /// Create an unnamed machine.
    pub fn new() -> Self {
        Self::named("")
    }

    /// Create a machine whose name appears in diagnostics.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: RefCell::new(HashMap::new()),
            current: RefCell::new(None),
            any_state: RefCell::new(None),
            fire_queue: RefCell::new(VecDeque::new()),
            on_transition: RefCell::new(None),
        }
    }

    /// The machine's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Begin (or resume) configuring `state`.
    ///
    /// The first call for a state creates its vertex and binds `controller`;
    /// later calls return a builder over the existing vertex and leave the
    /// original controller in place.
    pub fn configure(
        &self,
        state: S,
        controller: Option<Rc<dyn StateController>>,
    ) -> StateBuilder<'_, S, T> {
        let representation = {
            let mut states = self.states.borrow_mut();
            states
                .entry(state)
                .or_insert_with_key(|id| StateRepresentation::new(id.clone(), controller))
                .clone()
        };
        StateBuilder::new(self, representation)
    }

    /// Enter `initial` and make it the current state.
    ///
    /// The entry cascades through the initial state's superstate, outermost
    /// first. Fails if `initial` was never configured.
    pub fn start(&self, initial: S) -> Result<(), LookupError> {
        let representation = self.state_representation(&initial)?;
        *self.current.borrow_mut() = Some(initial.clone());
        tracing::info!(machine = %self.name, state = ?initial, "state machine started");

        let mut transition = Transition::new(initial.clone(), initial, None);
        representation.enter(&mut transition);
        Ok(())
    }

    /// Register `representation` as the wildcard consulted when neither the
    /// current vertex nor its superstate can resolve a trigger. At most one
    /// wildcard may be registered.
    pub fn set_any_state(
        &self,
        representation: &StateRepresentation<S, T>,
    ) -> Result<(), ConfigError> {
        let mut slot = self.any_state.borrow_mut();
        if let Some(existing) = slot.as_ref() {
            return Err(ConfigError::AnyStateAlreadySet {
                existing: format!("{:?}", existing.id()),
            });
        }
        *slot = Some(representation.clone());
        Ok(())
    }

    /// Fire `trigger` at the machine.
    ///
    /// A trigger that nothing permits, or whose every guard declines, is a
    /// silent no-op (a diagnostic line is emitted, nothing else happens).
    /// Firing from inside a callback does not recurse: the trigger joins a
    /// FIFO queue and is processed after the in-progress transition has
    /// fully completed, in the order fired, on the stack of the outermost
    /// `fire` call.
    ///
    /// `Err` is reserved for the fatal lookup class: firing before `start`,
    /// or a resolved edge whose destination state was never configured.
    pub fn fire(&self, trigger: T) -> Result<(), LookupError> {
        {
            let mut queue = self.fire_queue.borrow_mut();
            if !queue.is_empty() {
                // Already processing: queue behind the in-progress trigger.
                queue.push_back(trigger);
                return Ok(());
            }
            queue.push_back(trigger.clone());
        }

        let outcome = self.drain(trigger);
        if outcome.is_err() {
            self.fire_queue.borrow_mut().clear();
        }
        outcome
    }

    fn drain(&self, first: T) -> Result<(), LookupError> {
        self.fire_one(&first)?;
        self.fire_queue.borrow_mut().pop_front();

        loop {
            let next = self.fire_queue.borrow().front().cloned();
            let Some(trigger) = next else {
                return Ok(());
            };
            self.fire_one(&trigger)?;
            self.fire_queue.borrow_mut().pop_front();
        }
    }

    fn fire_one(&self, trigger: &T) -> Result<(), LookupError> {
        let current_id = self.current.borrow().clone().ok_or(LookupError::NotStarted)?;
        let current = self.state_representation(&current_id)?;

        if !self.permitted_triggers().contains(trigger) {
            tracing::debug!(
                machine = %self.name,
                trigger = ?trigger,
                state = ?current_id,
                "trigger is not permitted here; ignoring"
            );
            return Ok(());
        }

        // Own edges first. Fallback through the superstate and then the
        // wildcard engages only when the current vertex has *no* edge for
        // the trigger — a guard that declines does not fall through.
        let resolved = match current.resolve(trigger) {
            Ok(found) => found,
            Err(_) => {
                let mut found = current
                    .superstate()
                    .and_then(|superstate| superstate.resolve(trigger).ok().flatten());
                if found.is_none() {
                    let any_state = self.any_state.borrow().clone();
                    if let Some(any_state) = any_state {
                        found = any_state.resolve(trigger).ok().flatten();
                    }
                }
                found
            }
        };

        let Some(destination) = resolved else {
            tracing::debug!(
                machine = %self.name,
                trigger = ?trigger,
                state = ?current_id,
                "no candidate edge resolved; ignoring"
            );
            return Ok(());
        };

        self.transition_to(current_id, destination, trigger.clone())
    }

    fn transition_to(&self, source: S, destination: S, trigger: T) -> Result<(), LookupError> {
        let old = self.state_representation(&source)?;
        let new = self.state_representation(&destination)?;

        // The observer sees the change before any exit/entry callback runs.
        let observer = self.on_transition.borrow().clone();
        if let Some(observer) = observer {
            observer();
        }

        let mut transition = Transition::new(source, destination.clone(), Some(trigger));
        old.exit(&mut transition, false);
        new.enter(&mut transition);
        *self.current.borrow_mut() = Some(destination.clone());

        tracing::debug!(machine = %self.name, state = ?destination, "state changed");
        Ok(())
    }

    /// The current state, or `None` before `start` (and after `stop`).
    pub fn current_state(&self) -> Option<S> {
        self.current.borrow().clone()
    }

    /// True iff the machine is in `state` or in a direct substate of it.
    pub fn is_in_state(&self, state: &S) -> bool {
        let Some(current_id) = self.current_state() else {
            return false;
        };
        if current_id == *state {
            return true;
        }
        self.state_representation(&current_id)
            .ok()
            .and_then(|current| current.superstate())
            .is_some_and(|superstate| superstate.id() == *state)
    }

    /// True iff the current vertex itself has an edge for `trigger`.
    ///
    /// Narrower than the union `fire` checks against: superstate and
    /// any-state edges do not count here.
    pub fn can_fire(&self, trigger: &T) -> bool {
        self.current_state()
            .and_then(|id| self.state_representation(&id).ok())
            .is_some_and(|current| current.can_handle(trigger))
    }

    /// Every trigger the machine could currently act on: the union of the
    /// current vertex's, the any-state's, and the superstate's own edges.
    pub fn permitted_triggers(&self) -> HashSet<T> {
        let mut triggers = HashSet::new();
        let Some(current) = self
            .current_state()
            .and_then(|id| self.state_representation(&id).ok())
        else {
            return triggers;
        };

        triggers.extend(current.permitted_triggers());
        let any_state = self.any_state.borrow().clone();
        if let Some(any_state) = any_state {
            triggers.extend(any_state.permitted_triggers());
        }
        if let Some(superstate) = current.superstate() {
            triggers.extend(superstate.permitted_triggers());
        }
        triggers
    }

    /// Install the single transition observer, replacing any previous one.
    /// It runs on every resolved transition, before the exit and entry
    /// callbacks of the transition being performed.
    pub fn on_transitioned(&self, observer: Callback) {
        *self.on_transition.borrow_mut() = Some(observer);
    }

    /// The vertex configured for `state`.
    pub fn state_representation(
        &self,
        state: &S,
    ) -> Result<StateRepresentation<S, T>, LookupError> {
        self.states.borrow().get(state).cloned().ok_or_else(|| {
            LookupError::UnknownState {
                state: format!("{state:?}"),
            }
        })
    }

    /// Tear the machine down: force-exit the current vertex without entering
    /// a replacement, and clear the current-state pointer.
    pub fn stop(&self) -> Result<(), LookupError> {
        let current_id = self.current.borrow().clone().ok_or(LookupError::NotStarted)?;
        let representation = self.state_representation(&current_id)?;
        tracing::info!(machine = %self.name, state = ?current_id, "state machine stopped");

        let mut transition = Transition::new(current_id.clone(), current_id, None);
        representation.exit(&mut transition, true);
        *self.current.borrow_mut() = None;
        Ok(())
    }
}

impl<S: StateId, T: TriggerId> Default for StateMachine<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StateId, T: TriggerId> fmt::Display for StateMachine<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut triggers: Vec<String> = self
            .permitted_triggers()
            .iter()
            .map(|trigger| format!("{trigger:?}"))
            .collect();
        triggers.sort();
        write!(
            f,
            "{} current state: {:?} | permitted triggers: [{}]",
            self.name,
            self.current.borrow(),
            triggers.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum Media {
        Idle,
        Running,
        Paused,
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum Cmd {
        Start,
        Pause,
        Resume,
        Stop,
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn log_action(log: &Log, label: &'static str) -> Callback {
        let sink = Rc::clone(log);
        Rc::new(move || sink.borrow_mut().push(label.to_string()))
    }

    /// Idle --Start--> Running; Running --Pause--> Paused (substate of
    /// Running); Paused --Resume--> Running; both Running and Paused permit
    /// Stop back to Idle. Every state logs its entries and exits.
    fn player() -> (StateMachine<Media, Cmd>, Log) {
        let log: Log = Rc::default();
        let machine = StateMachine::named("player");

        machine
            .configure(Media::Idle, None)
            .permit(Cmd::Start, Media::Running)
            .on_enter(log_action(&log, "idle-enter"))
            .unwrap()
            .on_exit(log_action(&log, "idle-exit"))
            .unwrap();

        machine
            .configure(Media::Running, None)
            .permit(Cmd::Pause, Media::Paused)
            .permit(Cmd::Stop, Media::Idle)
            .on_enter(log_action(&log, "running-enter"))
            .unwrap()
            .on_exit(log_action(&log, "running-exit"))
            .unwrap();

        machine
            .configure(Media::Paused, None)
            .substate_of(Media::Running)
            .unwrap()
            .permit(Cmd::Resume, Media::Running)
            .permit(Cmd::Stop, Media::Idle)
            .on_enter(log_action(&log, "paused-enter"))
            .unwrap()
            .on_exit(log_action(&log, "paused-exit"))
            .unwrap();

        (machine, log)
    }

    #[test]
    fn start_requires_a_configured_state() {
        let machine: StateMachine<&str, &str> = StateMachine::new();
        let err = machine.start("ghost").unwrap_err();
        assert!(matches!(err, LookupError::UnknownState { .. }));
    }

    #[test]
    fn start_sets_current_and_runs_entry_callbacks() {
        let (machine, log) = player();
        machine.start(Media::Idle).unwrap();

        assert_eq!(machine.current_state(), Some(Media::Idle));
        assert_eq!(*log.borrow(), vec!["idle-enter"]);
    }

    #[test]
    fn starting_in_a_substate_enters_the_superstate_first() {
        let (machine, log) = player();
        machine.start(Media::Paused).unwrap();

        assert_eq!(*log.borrow(), vec!["running-enter", "paused-enter"]);
        let running = machine.state_representation(&Media::Running).unwrap();
        assert!(running.is_active());
    }

    #[test]
    fn fire_before_start_is_an_error() {
        let (machine, _log) = player();
        let err = machine.fire(Cmd::Start).unwrap_err();
        assert!(matches!(err, LookupError::NotStarted));
    }

    #[test]
    fn fire_walks_the_configured_edges() {
        let (machine, log) = player();
        machine.start(Media::Idle).unwrap();
        machine.fire(Cmd::Start).unwrap();

        assert_eq!(machine.current_state(), Some(Media::Running));
        assert_eq!(
            *log.borrow(),
            vec!["idle-enter", "idle-exit", "running-enter"]
        );
    }

    #[test]
    fn entering_a_substate_keeps_the_superstate_entered() {
        let (machine, log) = player();
        machine.start(Media::Idle).unwrap();
        machine.fire(Cmd::Start).unwrap();
        log.borrow_mut().clear();

        machine.fire(Cmd::Pause).unwrap();

        assert_eq!(machine.current_state(), Some(Media::Paused));
        // Running is already active, so only Paused's entry runs.
        assert_eq!(*log.borrow(), vec!["paused-enter"]);
    }

    #[test]
    fn leaving_a_substate_cascades_exit_through_the_superstate() {
        let (machine, log) = player();
        machine.start(Media::Idle).unwrap();
        machine.fire(Cmd::Start).unwrap();
        machine.fire(Cmd::Pause).unwrap();
        log.borrow_mut().clear();

        machine.fire(Cmd::Stop).unwrap();

        assert_eq!(machine.current_state(), Some(Media::Idle));
        assert_eq!(
            *log.borrow(),
            vec!["paused-exit", "running-exit", "idle-enter"]
        );
    }

    #[test]
    fn unpermitted_trigger_changes_nothing() {
        // Firing outside the permitted union leaves the machine untouched
        // and runs no callback.
        let (machine, log) = player();
        machine.start(Media::Idle).unwrap();
        log.borrow_mut().clear();

        machine.fire(Cmd::Resume).unwrap();

        assert_eq!(machine.current_state(), Some(Media::Idle));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn guards_are_reevaluated_on_every_fire() {
        let allowed = Rc::new(Cell::new(false));
        let machine: StateMachine<&str, &str> = StateMachine::new();
        let gate = Rc::clone(&allowed);
        machine
            .configure("a", None)
            .permit_if("go", "b", move || gate.get());
        machine.configure("b", None);
        machine.start("a").unwrap();

        machine.fire("go").unwrap();
        assert_eq!(machine.current_state(), Some("a"));

        allowed.set(true);
        machine.fire("go").unwrap();
        assert_eq!(machine.current_state(), Some("b"));
    }

    #[test]
    fn alternative_candidates_resolve_in_registration_order() {
        let machine: StateMachine<&str, &str> = StateMachine::new();
        machine
            .configure("a", None)
            .permit_if("go", "first", || false)
            .permit_if("go", "second", || true)
            .permit("go", "third");
        machine.configure("first", None);
        machine.configure("second", None);
        machine.configure("third", None);
        machine.start("a").unwrap();

        machine.fire("go").unwrap();
        assert_eq!(machine.current_state(), Some("second"));
    }

    #[test]
    fn declined_own_guard_does_not_fall_through_to_the_superstate() {
        // The superstate could handle the trigger unconditionally, but the
        // fallback only engages when the substate has no edge at all.
        let machine: StateMachine<&str, &str> = StateMachine::new();
        machine.configure("parent", None).permit("go", "elsewhere");
        machine
            .configure("child", None)
            .substate_of("parent")
            .unwrap()
            .permit_if("go", "elsewhere", || false);
        machine.configure("elsewhere", None);
        machine.start("child").unwrap();

        machine.fire("go").unwrap();
        assert_eq!(machine.current_state(), Some("child"));
    }

    #[test]
    fn superstate_resolves_triggers_the_substate_lacks() {
        let (machine, _log) = player();
        machine.start(Media::Paused).unwrap();

        // Paused has no Pause edge; Running does.
        machine.fire(Cmd::Pause).unwrap();
        assert_eq!(machine.current_state(), Some(Media::Paused));
    }

    #[test]
    fn any_state_is_the_last_resort() {
        let machine: StateMachine<&str, &str> = StateMachine::new();
        machine
            .configure("panic-handler", None)
            .permit("abort", "safe")
            .set_as_any_state()
            .unwrap();
        machine.configure("safe", None);
        machine.configure("a", None).permit("abort", "own-target");
        machine.configure("own-target", None);
        machine.start("a").unwrap();

        // The current vertex's own edge outranks the wildcard.
        machine.fire("abort").unwrap();
        assert_eq!(machine.current_state(), Some("own-target"));

        // From a state without the edge, the wildcard resolves it.
        machine.fire("abort").unwrap();
        assert_eq!(machine.current_state(), Some("safe"));
    }

    #[test]
    fn reentry_leaves_lifecycle_callbacks_untouched() {
        // A self-transition never re-runs entry/exit callbacks: exit skips
        // because the destination is the exiting vertex itself, and enter
        // skips because the vertex is still active. The transition still
        // resolves, so the observer does fire.
        let (machine, log) = player();
        let observed = Rc::new(Cell::new(0u32));
        let count = Rc::clone(&observed);
        machine.on_transitioned(Rc::new(move || count.set(count.get() + 1)));
        machine
            .configure(Media::Running, None)
            .permit_reentry(Cmd::Start);

        machine.start(Media::Running).unwrap();
        log.borrow_mut().clear();

        machine.fire(Cmd::Start).unwrap();

        assert_eq!(machine.current_state(), Some(Media::Running));
        assert!(log.borrow().is_empty());
        assert_eq!(observed.get(), 1);
    }

    #[test]
    fn configuration_time_reentry_guard_is_not_reconsulted() {
        let allowed = Rc::new(Cell::new(true));
        let machine: StateMachine<&str, &str> = StateMachine::new();
        let gate = Rc::clone(&allowed);
        machine
            .configure("a", None)
            .permit_reentry_if("again", move || gate.get());
        machine.start("a").unwrap();

        let observed = Rc::new(Cell::new(0u32));
        let count = Rc::clone(&observed);
        machine.on_transitioned(Rc::new(move || count.set(count.get() + 1)));

        // The guard passed at configuration time; flipping it now is moot.
        allowed.set(false);
        machine.fire("again").unwrap();
        assert_eq!(observed.get(), 1);
    }

    #[test]
    fn triggers_fired_inside_callbacks_are_queued_in_order() {
        let machine: Rc<StateMachine<&str, &str>> = Rc::new(StateMachine::new());
        let log: Log = Rc::default();

        machine
            .configure("a", None)
            .permit("one", "b")
            .on_exit(log_action(&log, "a-exit"))
            .unwrap();

        let relay = Rc::clone(&machine);
        let sink = Rc::clone(&log);
        machine
            .configure("b", None)
            .permit("two", "c")
            .on_enter(Rc::new(move || {
                sink.borrow_mut().push("b-enter".to_string());
                // Queued: processed only after this transition completes.
                relay.fire("two").unwrap();
                sink.borrow_mut().push("b-enter-done".to_string());
            }))
            .unwrap()
            .on_exit(log_action(&log, "b-exit"))
            .unwrap();

        machine
            .configure("c", None)
            .on_enter(log_action(&log, "c-enter"))
            .unwrap();

        machine.start("a").unwrap();
        machine.fire("one").unwrap();

        assert_eq!(machine.current_state(), Some("c"));
        assert_eq!(
            *log.borrow(),
            vec!["a-exit", "b-enter", "b-enter-done", "b-exit", "c-enter"]
        );
    }

    #[test]
    fn observer_runs_before_exit_and_entry_callbacks() {
        let (machine, log) = player();
        let sink = Rc::clone(&log);
        machine.on_transitioned(Rc::new(move || {
            sink.borrow_mut().push("observer".to_string())
        }));

        machine.start(Media::Idle).unwrap();
        log.borrow_mut().clear();
        machine.fire(Cmd::Start).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["observer", "idle-exit", "running-enter"]
        );
    }

    #[test]
    fn on_transitioned_replaces_the_previous_observer() {
        let (machine, _log) = player();
        let first = Rc::new(Cell::new(0u32));
        let second = Rc::new(Cell::new(0u32));

        let count = Rc::clone(&first);
        machine.on_transitioned(Rc::new(move || count.set(count.get() + 1)));
        let count = Rc::clone(&second);
        machine.on_transitioned(Rc::new(move || count.set(count.get() + 1)));

        machine.start(Media::Idle).unwrap();
        machine.fire(Cmd::Start).unwrap();

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn can_fire_ignores_superstate_and_wildcard_edges() {
        let (machine, _log) = player();
        machine.start(Media::Paused).unwrap();

        // Pause is handled by the superstate, not by Paused itself.
        assert!(!machine.can_fire(&Cmd::Pause));
        assert!(machine.can_fire(&Cmd::Resume));
        assert!(machine.permitted_triggers().contains(&Cmd::Pause));
    }

    #[test]
    fn permitted_triggers_union_covers_superstate_and_wildcard() {
        let machine: StateMachine<&str, &str> = StateMachine::new();
        machine
            .configure("wildcard", None)
            .permit("abort", "safe")
            .set_as_any_state()
            .unwrap();
        machine.configure("safe", None);
        machine.configure("parent", None).permit("up", "safe");
        machine
            .configure("child", None)
            .substate_of("parent")
            .unwrap()
            .permit("down", "safe");
        machine.start("child").unwrap();

        let permitted = machine.permitted_triggers();
        assert_eq!(
            permitted,
            HashSet::from(["down", "up", "abort"])
        );
    }

    #[test]
    fn is_in_state_sees_the_direct_superstate() {
        let (machine, _log) = player();
        machine.start(Media::Idle).unwrap();
        machine.fire(Cmd::Start).unwrap();
        machine.fire(Cmd::Pause).unwrap();

        assert!(machine.is_in_state(&Media::Paused));
        assert!(machine.is_in_state(&Media::Running));
        assert!(!machine.is_in_state(&Media::Idle));
    }

    #[test]
    fn configure_is_idempotent_per_state() {
        let machine: StateMachine<&str, &str> = StateMachine::new();
        machine.configure("a", None).permit("one", "b");
        machine.configure("a", None).permit("two", "c");
        machine.configure("b", None);
        machine.configure("c", None);
        machine.start("a").unwrap();

        assert!(machine.can_fire(&"one"));
        assert!(machine.can_fire(&"two"));
    }

    #[test]
    fn firing_toward_an_unconfigured_destination_is_fatal() {
        let machine: StateMachine<&str, &str> = StateMachine::new();
        machine.configure("a", None).permit("go", "ghost");
        machine.start("a").unwrap();

        let err = machine.fire("go").unwrap_err();
        assert!(matches!(err, LookupError::UnknownState { .. }));
        // The machine stays where it was and keeps accepting fires.
        assert_eq!(machine.current_state(), Some("a"));
        machine.fire("go").unwrap_err();
    }

    #[test]
    fn stop_force_exits_without_entering_a_replacement() {
        let (machine, log) = player();
        machine.start(Media::Idle).unwrap();
        log.borrow_mut().clear();

        machine.stop().unwrap();

        assert_eq!(*log.borrow(), vec!["idle-exit"]);
        assert_eq!(machine.current_state(), None);
        assert!(matches!(machine.fire(Cmd::Start), Err(LookupError::NotStarted)));
    }

    #[test]
    fn stop_from_a_substate_leaves_the_superstate_in_place() {
        // Forced teardown exits the current vertex; the enclosing superstate
        // still includes the teardown destination and is skipped.
        let (machine, log) = player();
        machine.start(Media::Paused).unwrap();
        log.borrow_mut().clear();

        machine.stop().unwrap();

        assert_eq!(*log.borrow(), vec!["paused-exit"]);
        let running = machine.state_representation(&Media::Running).unwrap();
        assert!(running.is_active());
    }

    #[test]
    fn stop_before_start_is_an_error() {
        let (machine, _log) = player();
        assert!(matches!(machine.stop(), Err(LookupError::NotStarted)));
    }

    #[test]
    fn display_summarizes_state_and_triggers() {
        let (machine, _log) = player();
        machine.start(Media::Running).unwrap();

        let rendered = machine.to_string();
        assert!(rendered.starts_with("player current state: Some(Running)"));
        assert!(rendered.contains("Pause"));
        assert!(rendered.contains("Stop"));
    }
}
