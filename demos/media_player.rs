//! Media Player State Machine
//!
//! This example demonstrates hierarchical states and lifecycle controllers.
//!
//! Key concepts:
//! - Single-tier nesting: Paused lives inside Running
//! - Entry/exit callbacks cascading across the superstate boundary
//! - A cancellable controller whose token tracks state occupancy
//!
//! Run with: cargo run --example media_player

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use stance::{
    action, CancellableController, EnterData, ExitData, StateController, StateMachine,
};
use tokio_util::sync::CancellationToken;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum Player {
    Idle,
    Running,
    Paused,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum Input {
    Start,
    Pause,
    Resume,
    Stop,
}

/// Pretend playback engine: in a real player the token would interrupt a
/// decoder loop running elsewhere.
#[derive(Default)]
struct PlaybackController {
    token: RefCell<Option<CancellationToken>>,
    active: Cell<bool>,
}

impl StateController for PlaybackController {
    fn on_entered(&self, _data: Option<EnterData>) {
        println!("  controller: playback supervised");
    }

    fn on_exited(&self) -> Option<ExitData> {
        println!("  controller: playback released");
        None
    }

    fn as_cancellable(&self) -> Option<&dyn CancellableController> {
        Some(self)
    }
}

impl CancellableController for PlaybackController {
    fn set_cancellation(&self, token: CancellationToken) {
        *self.token.borrow_mut() = Some(token);
    }

    fn set_active(&self, active: bool) {
        self.active.set(active);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Media Player State Machine ===\n");

    let controller = Rc::new(PlaybackController::default());
    let machine = StateMachine::named("player");

    machine
        .configure(Player::Idle, None)
        .permit(Input::Start, Player::Running);

    machine
        .configure(Player::Running, Some(controller.clone()))
        .permit(Input::Pause, Player::Paused)
        .permit(Input::Stop, Player::Idle)
        .on_enter(action(|| println!("  running: spinning up")))?
        .on_exit(action(|| println!("  running: spinning down")))?;

    machine
        .configure(Player::Paused, None)
        .substate_of(Player::Running)?
        .permit(Input::Resume, Player::Running)
        .permit(Input::Stop, Player::Idle)
        .on_enter(action(|| println!("  paused: holding position")))?;

    machine.start(Player::Idle)?;
    println!("started in {:?}\n", machine.current_state().unwrap());

    println!("fire Start:");
    machine.fire(Input::Start)?;
    let token = controller.token.borrow().clone().unwrap();
    println!("  supervision token cancelled: {}\n", token.is_cancelled());

    println!("fire Pause (Running stays entered):");
    machine.fire(Input::Pause)?;
    println!(
        "  in Paused: {}, still in Running: {}\n",
        machine.is_in_state(&Player::Paused),
        machine.is_in_state(&Player::Running)
    );

    println!("fire Stop (exit cascades out of the hierarchy):");
    machine.fire(Input::Stop)?;
    println!(
        "  back in {:?}, supervision token cancelled: {}\n",
        machine.current_state().unwrap(),
        token.is_cancelled()
    );

    println!("{machine}");
    println!("\n=== Example Complete ===");
    Ok(())
}
