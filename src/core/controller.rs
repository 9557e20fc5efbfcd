//! Controller contract invoked on state entry and exit.
//!
//! A controller is the external collaborator bound to one state: the engine
//! calls into it after the state's entry callbacks and before the exit-data
//! consumer. How controllers are obtained or constructed is the caller's
//! business; the engine only holds them behind `Rc<dyn StateController>`.
//!
//! Controllers that supervise background work tied to state occupancy can
//! opt into the cancellation extension by answering [`as_cancellable`]: the
//! engine then installs a fresh [`CancellationToken`] on entry and cancels
//! it on exit. Cancellation is advisory — the engine never waits for the
//! supervised work to notice.
//!
//! [`as_cancellable`]: StateController::as_cancellable

use std::any::Any;
use std::rc::Rc;

use tokio_util::sync::CancellationToken;

/// Payload handed to a controller when its state is entered.
///
/// Produced by the state's entry-data producer; consumers downcast to the
/// concrete type they agreed on with the producer.
pub type EnterData = Rc<dyn Any>;

/// Payload returned by a controller when its state is exited.
pub type ExitData = Rc<dyn Any>;

/// Per-state lifecycle collaborator.
///
/// Methods take `&self`; controllers that keep state use interior
/// mutability. The engine runs on a single thread, so `RefCell`/`Cell`
/// suffice.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use stance::{EnterData, ExitData, StateController};
///
/// #[derive(Default)]
/// struct Counter {
///     entries: Cell<u32>,
/// }
///
/// impl StateController for Counter {
///     fn on_entered(&self, _data: Option<EnterData>) {
///         self.entries.set(self.entries.get() + 1);
///     }
///
///     fn on_exited(&self) -> Option<ExitData> {
///         None
///     }
/// }
/// ```
pub trait StateController {
    /// Called after the state's entry callbacks, with whatever the state's
    /// entry-data producer returned.
    fn on_entered(&self, data: Option<EnterData>);

    /// Called when the state is exited; the returned payload is stored on
    /// the transition record for the exit-data consumer.
    fn on_exited(&self) -> Option<ExitData>;

    /// Capability query for the cancellation extension.
    ///
    /// The default answer is `None`; controllers that supervise cancellable
    /// work return `Some(self)`.
    fn as_cancellable(&self) -> Option<&dyn CancellableController> {
        None
    }
}

/// Extension for controllers whose background work should track state
/// occupancy.
///
/// Both slots are written by the engine: on entry a fresh token is installed
/// and the flag set, on exit the token is cancelled and the flag cleared.
pub trait CancellableController: StateController {
    /// Receive the token that will be cancelled when the state is exited.
    fn set_cancellation(&self, token: CancellationToken);

    /// Flipped to `true` on entry and `false` on exit.
    fn set_active(&self, active: bool);
}
