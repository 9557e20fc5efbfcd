//! Fluent configuration API for assembling the state graph.
//!
//! Each call to [`StateMachine::configure`] hands back a [`StateBuilder`]
//! scoped to one state; the builder populates that state's edges, callbacks,
//! and superstate link, validating configuration invariants as it goes.
//!
//! [`StateMachine::configure`]: crate::machine::StateMachine::configure

mod state;

pub use state::StateBuilder;

use std::rc::Rc;

use crate::core::Callback;

/// Wrap a closure into a shareable lifecycle [`Callback`].
///
/// Entry and exit callbacks are registered by handle so duplicate
/// registration can be detected; keep a clone of the handle if you need to
/// refer to the same callback twice.
///
/// # Example
///
/// ```rust
/// use stance::{action, StateMachine};
///
/// let machine: StateMachine<&str, &str> = StateMachine::new();
/// let greet = action(|| println!("hello"));
/// machine
///     .configure("greeting", None)
///     .on_enter(greet.clone())
///     .unwrap();
///
/// // The same handle cannot be registered twice.
/// assert!(machine.configure("greeting", None).on_enter(greet).is_err());
/// ```
pub fn action(f: impl Fn() + 'static) -> Callback {
    Rc::new(f)
}
