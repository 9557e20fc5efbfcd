//! Guarded Door State Machine
//!
//! This example demonstrates guarded transitions and the any-state wildcard.
//!
//! Key concepts:
//! - Alternative candidates for one trigger, tried in registration order
//! - Guards re-evaluated on every fire
//! - A wildcard state resolving triggers no other lookup could
//!
//! Run with: cargo run --example door

use std::cell::Cell;
use std::rc::Rc;

use stance::{action, StateMachine};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Guarded Door State Machine ===\n");

    let locked = Rc::new(Cell::new(true));
    let machine = StateMachine::named("door");

    let lock = Rc::clone(&locked);
    machine
        .configure("closed", None)
        .permit_if("open", "alarm", move || lock.get())
        .permit("open", "open")
        .on_enter(action(|| println!("  door closed")))?;

    machine
        .configure("open", None)
        .permit("close", "closed")
        .on_enter(action(|| println!("  door open")))?;

    machine
        .configure("alarm", None)
        .permit("reset", "closed")
        .on_enter(action(|| println!("  ALARM: attempted entry while locked")))?;

    // Wherever the door is, a fire drill forces it open.
    machine
        .configure("drill", None)
        .permit("fire-drill", "open")
        .set_as_any_state()?;

    machine.on_transitioned(action(|| println!("  (observer: transition)")));

    machine.start("closed")?;

    println!("try to open while locked:");
    machine.fire("open")?;
    println!("  now in: {:?}\n", machine.current_state().unwrap());

    println!("reset, unlock, try again:");
    machine.fire("reset")?;
    locked.set(false);
    machine.fire("open")?;
    println!("  now in: {:?}\n", machine.current_state().unwrap());

    println!("close, then run the fire drill from anywhere:");
    machine.fire("close")?;
    machine.fire("fire-drill")?;
    println!("  now in: {:?}\n", machine.current_state().unwrap());

    println!("{machine}");
    println!("\n=== Example Complete ===");
    Ok(())
}
