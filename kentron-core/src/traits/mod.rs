//! Hardware abstraction traits
//!
//! These traits define the interface between the homing logic and
//! hardware-specific implementations.

pub mod actuator;

pub use actuator::{ActuatorAdapter, Direction};
