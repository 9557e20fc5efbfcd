//! Identifier traits for states and triggers.
//!
//! The engine does not prescribe what a state or trigger *is*: any type with
//! value equality and hashing can key the state graph. Enums are the common
//! choice, but strings or integers work just as well.

use std::fmt::Debug;
use std::hash::Hash;

/// Marker trait for state identifiers.
///
/// Blanket-implemented for every type that supports value equality and
/// hashing, so callers never implement it by hand.
///
/// # Example
///
/// ```rust
/// use stance::StateId;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Phase {
///     Boot,
///     Ready,
/// }
///
/// fn assert_state_id<S: StateId>() {}
/// assert_state_id::<Phase>();
/// assert_state_id::<&'static str>();
/// assert_state_id::<u32>();
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + 'static {}

impl<S> StateId for S where S: Clone + Eq + Hash + Debug + 'static {}

/// Marker trait for trigger identifiers.
///
/// Triggers are the external events fired at the machine; like states they
/// are plain value-equality keys and the trait is blanket-implemented.
pub trait TriggerId: Clone + Eq + Hash + Debug + 'static {}

impl<T> TriggerId for T where T: Clone + Eq + Hash + Debug + 'static {}
