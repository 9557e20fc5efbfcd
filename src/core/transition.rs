//! Transition records describing a single state change.
//!
//! A record is created fresh for every resolved fire, threaded through the
//! exit and enter phases so data producers and controllers can attach
//! payloads, and discarded once the callbacks have run. No history is kept.

use std::fmt;

use crate::core::controller::{EnterData, ExitData};
use crate::core::state::{StateId, TriggerId};

/// One completed (or in-progress) state change.
///
/// `trigger` is `None` for the synthetic self-transitions the engine builds
/// for `start` and `stop`; every trigger-driven transition carries the
/// trigger that caused it.
pub struct Transition<S: StateId, T: TriggerId> {
    source: S,
    destination: S,
    trigger: Option<T>,
    enter_data: Option<EnterData>,
    exit_data: Option<ExitData>,
}

impl<S: StateId, T: TriggerId> Transition<S, T> {
    pub(crate) fn new(source: S, destination: S, trigger: Option<T>) -> Self {
        Self {
            source,
            destination,
            trigger,
            enter_data: None,
            exit_data: None,
        }
    }

    /// The state transitioned from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The state transitioned to.
    pub fn destination(&self) -> &S {
        &self.destination
    }

    /// The trigger that caused the transition, if any.
    pub fn trigger(&self) -> Option<&T> {
        self.trigger.as_ref()
    }

    /// True for the identity transition: source and destination are equal.
    pub fn is_reentry(&self) -> bool {
        self.source == self.destination
    }

    /// Payload produced by the destination state's entry-data producer.
    pub fn enter_data(&self) -> Option<EnterData> {
        self.enter_data.clone()
    }

    /// Payload returned by the source state's controller on exit.
    pub fn exit_data(&self) -> Option<ExitData> {
        self.exit_data.clone()
    }

    pub(crate) fn set_enter_data(&mut self, data: Option<EnterData>) {
        self.enter_data = data;
    }

    pub(crate) fn set_exit_data(&mut self, data: Option<ExitData>) {
        self.exit_data = data;
    }
}

impl<S: StateId, T: TriggerId> fmt::Debug for Transition<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("trigger", &self.trigger)
            .field("is_reentry", &self.is_reentry())
            .field("has_enter_data", &self.enter_data.is_some())
            .field("has_exit_data", &self.exit_data.is_some())
            .finish()
    }
}
