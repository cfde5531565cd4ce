//! GPIO implementation of the actuator adapter
//!
//! Binds the relay pair and limit-switch inputs of the appliance board to
//! [`ActuatorAdapter`]. This is the only place the homing core touches real
//! hardware.

use embassy_stm32::gpio::{Input, Output};
use embassy_time::Instant;

use kentron_core::traits::{ActuatorAdapter, Direction};

/// Actuator driven by an extend/retract relay pair
///
/// The opposing relay is always dropped before the requested one is
/// energized, so both coils are never closed at once. Limit switches are
/// wired to ground with pull-ups: a low read means engaged.
pub struct RelayActuator<'d> {
    extend_relay: Output<'d>,
    retract_relay: Output<'d>,
    retract_switch: Input<'d>,
    extend_switch: Input<'d>,
}

impl<'d> RelayActuator<'d> {
    pub fn new(
        extend_relay: Output<'d>,
        retract_relay: Output<'d>,
        retract_switch: Input<'d>,
        extend_switch: Input<'d>,
    ) -> Self {
        Self {
            extend_relay,
            retract_relay,
            retract_switch,
            extend_switch,
        }
    }
}

impl ActuatorAdapter for RelayActuator<'_> {
    fn set_direction(&mut self, dir: Direction) {
        match dir {
            Direction::Stop => {
                self.extend_relay.set_low();
                self.retract_relay.set_low();
            }
            Direction::Extend => {
                self.retract_relay.set_low();
                self.extend_relay.set_high();
            }
            Direction::Retract => {
                self.extend_relay.set_low();
                self.retract_relay.set_high();
            }
        }
    }

    fn retract_switch(&mut self) -> bool {
        self.retract_switch.is_low()
    }

    fn extend_switch(&mut self) -> bool {
        self.extend_switch.is_low()
    }

    fn now_ms(&mut self) -> u32 {
        // The core's duration math wraps with the counter
        Instant::now().as_millis() as u32
    }
}
