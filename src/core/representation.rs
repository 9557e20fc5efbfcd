//! State vertices: outgoing edges, lifecycle callbacks, and the recursive
//! enter/exit semantics across superstate boundaries.
//!
//! Every transition is outgoing: a vertex controls where the machine may go
//! next, never where it was reached from. The edges stored here belong to
//! this vertex alone — fallback through a superstate or the any-state vertex
//! is the machine's job, not the vertex's.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tokio_util::sync::CancellationToken;

use crate::core::controller::{EnterData, StateController};
use crate::core::error::{ConfigError, LookupError};
use crate::core::state::{StateId, TriggerId};
use crate::core::transition::Transition;

/// Zero-argument lifecycle callback.
///
/// Shared handles (`Rc`) make duplicate registration detectable: adding the
/// same handle to the same list twice is rejected.
pub type Callback = Rc<dyn Fn()>;

/// Zero-argument predicate gating one candidate edge.
pub type GuardFn = Rc<dyn Fn() -> bool>;

/// Produces the payload handed to the controller when the state is entered.
pub type EnterDataFn<S, T> = Rc<dyn Fn(&Transition<S, T>) -> EnterData>;

/// Consumes the transition record after exit data has been collected.
pub type ExitDataFn<S, T> = Rc<dyn Fn(&Transition<S, T>)>;

/// One candidate destination for a trigger. An absent guard is always
/// satisfied.
struct TransitionTarget<S> {
    destination: S,
    guard: Option<GuardFn>,
}

impl<S: Clone> Clone for TransitionTarget<S> {
    fn clone(&self) -> Self {
        Self {
            destination: self.destination.clone(),
            guard: self.guard.clone(),
        }
    }
}

struct Vertex<S: StateId, T: TriggerId> {
    id: S,
    superstate: Option<StateRepresentation<S, T>>,
    substates: Vec<Weak<RefCell<Vertex<S, T>>>>,
    edges: HashMap<T, Vec<TransitionTarget<S>>>,
    entry_actions: Vec<Callback>,
    exit_actions: Vec<Callback>,
    enter_data_fn: Option<EnterDataFn<S, T>>,
    exit_data_fn: Option<ExitDataFn<S, T>>,
    active: bool,
    controller: Option<Rc<dyn StateController>>,
    cancellation: Option<CancellationToken>,
}

/// A vertex of the state graph: shared handle, cloning aliases the vertex.
///
/// The machine owns one representation per configured state for its whole
/// lifetime. The `active` flag is the single source of truth for "the
/// machine is currently inside this state or one of its substates".
pub struct StateRepresentation<S: StateId, T: TriggerId> {
    vertex: Rc<RefCell<Vertex<S, T>>>,
}

impl<S: StateId, T: TriggerId> Clone for StateRepresentation<S, T> {
    fn clone(&self) -> Self {
        Self {
            vertex: Rc::clone(&self.vertex),
        }
    }
}

impl<S: StateId, T: TriggerId> StateRepresentation<S, T> {
    pub(crate) fn new(id: S, controller: Option<Rc<dyn StateController>>) -> Self {
        Self {
            vertex: Rc::new(RefCell::new(Vertex {
                id,
                superstate: None,
                substates: Vec::new(),
                edges: HashMap::new(),
                entry_actions: Vec::new(),
                exit_actions: Vec::new(),
                enter_data_fn: None,
                exit_data_fn: None,
                active: false,
                controller,
                cancellation: None,
            })),
        }
    }

    /// The state this vertex stands for.
    pub fn id(&self) -> S {
        self.vertex.borrow().id.clone()
    }

    /// True while the machine is inside this state or one of its substates.
    pub fn is_active(&self) -> bool {
        self.vertex.borrow().active
    }

    /// The enclosing superstate, if one was configured.
    pub fn superstate(&self) -> Option<StateRepresentation<S, T>> {
        self.vertex.borrow().superstate.clone()
    }

    /// The controller bound at configuration time, if any.
    pub fn controller(&self) -> Option<Rc<dyn StateController>> {
        self.vertex.borrow().controller.clone()
    }

    /// True iff this vertex itself has an edge for `trigger`. Superstate and
    /// any-state fallback are deliberately not consulted here.
    pub fn can_handle(&self, trigger: &T) -> bool {
        self.vertex.borrow().edges.contains_key(trigger)
    }

    /// The triggers this vertex itself has edges for.
    pub fn permitted_triggers(&self) -> Vec<T> {
        self.vertex.borrow().edges.keys().cloned().collect()
    }

    /// Resolve `trigger` against this vertex's own edges.
    ///
    /// Candidates are scanned in registration order; the first whose guard is
    /// absent or currently true wins. `Ok(None)` means every guard declined —
    /// distinct from `Err`, which means no edge exists for the trigger at
    /// all. Guards are re-evaluated on every call, never cached.
    pub fn resolve(&self, trigger: &T) -> Result<Option<S>, LookupError> {
        // Clone the candidate list out so guards run without a live borrow;
        // a guard may read the machine re-entrantly.
        let candidates = {
            let vertex = self.vertex.borrow();
            match vertex.edges.get(trigger) {
                Some(candidates) => candidates.clone(),
                None => {
                    return Err(LookupError::UnknownTrigger {
                        trigger: format!("{trigger:?}"),
                    })
                }
            }
        };

        for candidate in candidates {
            match &candidate.guard {
                None => return Ok(Some(candidate.destination)),
                Some(guard) if guard() => return Ok(Some(candidate.destination)),
                Some(_) => {}
            }
        }
        Ok(None)
    }

    /// True iff `state` is this vertex or any registered substate,
    /// transitively.
    pub fn includes(&self, state: &S) -> bool {
        let vertex = self.vertex.borrow();
        if vertex.id == *state {
            return true;
        }
        vertex
            .substates
            .iter()
            .filter_map(Weak::upgrade)
            .any(|child| StateRepresentation { vertex: child }.includes(state))
    }

    pub(crate) fn add_transition(&self, trigger: T, destination: S, guard: Option<GuardFn>) {
        self.vertex
            .borrow_mut()
            .edges
            .entry(trigger)
            .or_default()
            .push(TransitionTarget { destination, guard });
    }

    pub(crate) fn add_entry_action(&self, action: Callback) -> Result<(), ConfigError> {
        let mut vertex = self.vertex.borrow_mut();
        if vertex
            .entry_actions
            .iter()
            .any(|existing| Rc::ptr_eq(existing, &action))
        {
            return Err(ConfigError::DuplicateCallback {
                state: format!("{:?}", vertex.id),
            });
        }
        vertex.entry_actions.push(action);
        Ok(())
    }

    pub(crate) fn add_exit_action(&self, action: Callback) -> Result<(), ConfigError> {
        let mut vertex = self.vertex.borrow_mut();
        if vertex
            .exit_actions
            .iter()
            .any(|existing| Rc::ptr_eq(existing, &action))
        {
            return Err(ConfigError::DuplicateCallback {
                state: format!("{:?}", vertex.id),
            });
        }
        vertex.exit_actions.push(action);
        Ok(())
    }

    /// Install the entry-data producer, replacing any previous one.
    pub(crate) fn set_enter_data_fn(&self, producer: EnterDataFn<S, T>) {
        self.vertex.borrow_mut().enter_data_fn = Some(producer);
    }

    /// Install the exit-data consumer, replacing any previous one.
    pub(crate) fn set_exit_data_fn(&self, consumer: ExitDataFn<S, T>) {
        self.vertex.borrow_mut().exit_data_fn = Some(consumer);
    }

    /// Link this vertex under `superstate` and register it as a child there.
    /// Re-linking moves the child: the old parent forgets it.
    pub(crate) fn set_superstate(&self, superstate: &StateRepresentation<S, T>) {
        let previous = self.vertex.borrow().superstate.clone();
        if let Some(previous) = previous {
            let this = Rc::downgrade(&self.vertex);
            previous
                .vertex
                .borrow_mut()
                .substates
                .retain(|child| !child.ptr_eq(&this));
        }
        self.vertex.borrow_mut().superstate = Some(superstate.clone());
        superstate
            .vertex
            .borrow_mut()
            .substates
            .push(Rc::downgrade(&self.vertex));
    }

    /// Enter this vertex: superstates first, then self, idempotent while
    /// already active.
    ///
    /// Order within a fresh entry: flag active, entry callbacks in
    /// registration order, cancellation capability install, entry-data
    /// producer, controller `on_entered`.
    pub(crate) fn enter(&self, transition: &mut Transition<S, T>) {
        if let Some(superstate) = self.superstate() {
            superstate.enter(transition);
        }

        if self.is_active() {
            return;
        }
        self.vertex.borrow_mut().active = true;

        let actions = self.vertex.borrow().entry_actions.clone();
        for action in &actions {
            action();
        }

        self.install_cancellation();

        let producer = self.vertex.borrow().enter_data_fn.clone();
        let data = producer.map(|produce| produce(transition));
        transition.set_enter_data(data.clone());

        if let Some(controller) = self.controller() {
            controller.on_entered(data);
        }
    }

    /// Exit this vertex and cascade into the superstate.
    ///
    /// Unless `forced`, exiting is skipped while the vertex is inactive or
    /// while the transition's destination lies inside this vertex's subtree
    /// (the machine is moving deeper, not away). The superstate cascade runs
    /// either way, never forced.
    pub(crate) fn exit(&self, transition: &mut Transition<S, T>, forced: bool) {
        let skip = !forced && (!self.is_active() || self.includes(transition.destination()));

        if !skip {
            let actions = self.vertex.borrow().exit_actions.clone();
            for action in &actions {
                action();
            }

            self.vertex.borrow_mut().active = false;
            self.revoke_cancellation();

            let data = self.controller().and_then(|controller| controller.on_exited());
            transition.set_exit_data(data);

            let consumer = self.vertex.borrow().exit_data_fn.clone();
            if let Some(consume) = consumer {
                consume(transition);
            }
        }

        if let Some(superstate) = self.superstate() {
            superstate.exit(transition, false);
        }
    }

    fn install_cancellation(&self) {
        let Some(controller) = self.controller() else {
            return;
        };
        if let Some(cancellable) = controller.as_cancellable() {
            let token = CancellationToken::new();
            cancellable.set_cancellation(token.clone());
            cancellable.set_active(true);
            self.vertex.borrow_mut().cancellation = Some(token);
        }
    }

    fn revoke_cancellation(&self) {
        let Some(controller) = self.controller() else {
            return;
        };
        if let Some(cancellable) = controller.as_cancellable() {
            let token = self.vertex.borrow_mut().cancellation.take();
            if let Some(token) = token {
                token.cancel();
            }
            cancellable.set_active(false);
        }
    }
}
