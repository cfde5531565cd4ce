//! Events emitted by the homing machine
//!
//! The machine itself performs no I/O besides actuator commands; anything
//! worth logging is returned from [`Homing::process`](super::Homing::process)
//! as an event record for an external logger to consume.

use super::machine::HomingState;

/// One-shot notification returned by a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingEvent {
    /// The machine entered `to` since the previous poll
    ///
    /// Emitted exactly once per state entry. Purely informational: nothing
    /// in the sequence logic is gated on whether the caller observes it.
    Entered { from: HomingState, to: HomingState },
}
