//! Homing state machine
//!
//! Drives a bidirectional actuator between two limit switches to measure
//! travel times and park at the computed mechanical center, using only the
//! switches and elapsed time - no position sensor.

pub mod events;
pub mod machine;

pub use events::HomingEvent;
pub use machine::{Homing, HomingError, HomingState, SwitchDiagnostics, SwitchLevels};
