//! Board-agnostic core logic for the actuator homing controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction trait (actuator direction + limit switches + tick)
//! - Homing state machine (travel-time measurement and centering)
//! - Signal conditioning primitives (on-delay timer, edge detector)
//! - Configuration type definitions
//!
//! The machine is poll-driven: the owning application calls
//! [`homing::Homing::process`] once per control-loop tick. There are no
//! blocking calls and no internal threads; all timing is derived from the
//! millisecond counter supplied by the [`traits::ActuatorAdapter`].

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod homing;
pub mod signal;
pub mod traits;
