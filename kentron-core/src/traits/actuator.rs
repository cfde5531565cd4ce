//! Actuator hardware adapter trait
//!
//! The homing machine's only coupling to physical I/O: a direction command,
//! two raw limit-switch reads, and a monotonic millisecond tick. The adapter
//! is injected at construction and held by the machine, so multiple
//! instances with different hardware can coexist and tests can supply a
//! scripted fake.

/// Commanded actuator direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// De-energized, no motion
    #[default]
    Stop,
    /// Drive toward the extend limit switch
    Extend,
    /// Drive toward the retract limit switch
    Retract,
}

/// Hardware capability object consumed by the homing machine
///
/// All methods must be synchronous and non-blocking; the control loop
/// stalls if they block. `set_direction` must be idempotent - the machine
/// may repeat a command it has already issued.
pub trait ActuatorAdapter {
    /// Command the actuator drive direction
    fn set_direction(&mut self, dir: Direction);

    /// Raw (un-debounced) retract limit switch level, true = engaged
    fn retract_switch(&mut self) -> bool;

    /// Raw (un-debounced) extend limit switch level, true = engaged
    fn extend_switch(&mut self) -> bool;

    /// Monotonically increasing millisecond counter
    ///
    /// Wraps at the counter's native 32-bit width; the core's duration
    /// arithmetic is wrapping and tolerates a single rollover per window.
    fn now_ms(&mut self) -> u32;
}
