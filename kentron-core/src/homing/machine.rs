//! Homing state machine implementation
//!
//! Poll-driven: the owning application calls [`Homing::process`] once per
//! control-loop tick. Each poll reads both switches through the
//! debounce+edge pipeline, evaluates one timeout check, then executes
//! exactly one state's logic. Every handler runs in bounded, constant time;
//! there are no blocking calls.
//!
//! The sequence measures extend travel going one direction (retract limit →
//! extend limit) and retract travel the opposite way, so asymmetric
//! extend/retract speeds are each measured at their own rate. Centering is
//! a final extend-direction move of half the measured extend travel time,
//! made from the retract limit at the already-measured extend rate.

use super::events::HomingEvent;
use crate::config::{HomingConfig, MIN_TRAVEL_MS};
use crate::signal::{EdgeDetector, OnDelayTimer};
use crate::traits::{ActuatorAdapter, Direction};

/// Machine states
///
/// Linear progression from `Init` through `Complete`, with `Error`
/// reachable from any moving state on timeout or invalid-travel detection
/// and `Idle` as the safe fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingState {
    /// Not homing; waiting for [`Homing::start`]
    #[default]
    Idle,
    /// First poll of a run; issues the initial retract command
    Init,
    /// Driving toward the retract limit switch (unknown start position)
    MoveToRetractLimit,
    /// Paused at the retract limit to absorb mechanical bounce
    SettleAtRetract,
    /// Driving toward the extend limit, timing the full stroke
    MeasureExtend,
    /// Paused at the extend limit
    SettleAtExtend,
    /// Driving back toward the retract limit, timing the return stroke
    MeasureRetract,
    /// Paused at the retract limit before the centering move
    SettleAtRetract2,
    /// Extending for half the measured extend travel time
    MoveToCenter,
    /// Parked at center; homing done
    Complete,
    /// Fault; actuator stopped, retrying or exhausted
    Error,
}

impl HomingState {
    /// States bounded by the shared global timeout
    ///
    /// Everything between leaving `Init` and reaching `Complete`, settle
    /// pauses included.
    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            HomingState::MoveToRetractLimit
                | HomingState::SettleAtRetract
                | HomingState::MeasureExtend
                | HomingState::SettleAtExtend
                | HomingState::MeasureRetract
                | HomingState::SettleAtRetract2
                | HomingState::MoveToCenter
        )
    }
}

/// Fault classification, last-one-wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingError {
    /// A moving state failed to reach its condition within the global timeout
    Timeout,
    /// Reserved: switch engaged when it should not be (not yet raised)
    SwitchStuck,
    /// Reserved: switch never observed during a run (not yet raised)
    NoSwitchDetected,
    /// Measured travel between the limit switches was implausibly short
    InvalidTravel,
}

/// Conditioned levels for one limit switch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchLevels {
    /// Instantaneous hardware read
    pub raw: bool,
    /// Raw level sustained for the debounce time
    pub debounced: bool,
    /// One-poll pulse on the debounced rising edge
    pub pulse: bool,
}

/// Switch pipeline snapshot, refreshed on every poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchDiagnostics {
    pub retract: SwitchLevels,
    pub extend: SwitchLevels,
}

/// Linear-actuator homing state machine
///
/// Owns the injected hardware adapter and all run state. One instance per
/// actuator; reused across repeated start/process/abort cycles.
#[derive(Debug)]
pub struct Homing<A> {
    adapter: A,
    config: HomingConfig,

    state: HomingState,
    prev_state: HomingState,
    error: Option<HomingError>,

    // On-delay timers
    ton_retract_switch: OnDelayTimer,
    ton_extend_switch: OnDelayTimer,
    ton_timeout: OnDelayTimer,
    ton_settle: OnDelayTimer,
    ton_center_move: OnDelayTimer,

    // Edge detectors
    ed_retract_switch: EdgeDetector,
    ed_extend_switch: EdgeDetector,

    switches: SwitchDiagnostics,

    // Timing measurements
    retract_limit_reached_at: u32,
    extend_limit_reached_at: u32,
    extend_travel_ms: u32,
    retract_travel_ms: u32,

    current_retry: u8,
    active: bool,
    homed: bool,
    progress_percent: u8,
}

impl<A: ActuatorAdapter> Homing<A> {
    /// Create a new machine bound to `adapter`
    ///
    /// The machine starts in `Idle` with all run state cleared; call
    /// [`start`](Self::start) to begin a homing attempt.
    pub fn new(adapter: A, config: HomingConfig) -> Self {
        Self {
            adapter,
            config,
            state: HomingState::Idle,
            prev_state: HomingState::Idle,
            error: None,
            ton_retract_switch: OnDelayTimer::new(),
            ton_extend_switch: OnDelayTimer::new(),
            ton_timeout: OnDelayTimer::new(),
            ton_settle: OnDelayTimer::new(),
            ton_center_move: OnDelayTimer::new(),
            ed_retract_switch: EdgeDetector::new(),
            ed_extend_switch: EdgeDetector::new(),
            switches: SwitchDiagnostics::default(),
            retract_limit_reached_at: 0,
            extend_limit_reached_at: 0,
            extend_travel_ms: 0,
            retract_travel_ms: 0,
            current_retry: 0,
            active: false,
            homed: false,
            progress_percent: 0,
        }
    }

    /// Begin a homing attempt
    ///
    /// Returns false (and touches nothing) if a run is already active.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }

        self.state = HomingState::Init;
        self.error = None;
        self.active = true;
        self.homed = false;
        self.progress_percent = 0;
        self.current_retry = 0;
        self.extend_travel_ms = 0;
        self.retract_travel_ms = 0;
        self.reset_all_timers();

        true
    }

    /// Advance the machine by one poll
    ///
    /// No-op while inactive. Returns a one-shot [`HomingEvent`] when this
    /// poll is the first in a newly entered state; the event is purely for
    /// external logging and never gates sequence logic.
    pub fn process(&mut self) -> Option<HomingEvent> {
        if !self.active {
            return None;
        }

        let now = self.adapter.now_ms();
        self.update_switch_inputs(now);

        let from = self.prev_state;
        let state_changed = self.state != from;
        self.prev_state = self.state;
        let event = state_changed.then_some(HomingEvent::Entered {
            from,
            to: self.state,
        });

        // Global timeout bounds every moving state; tripping it skips the
        // state handler for this poll.
        if self.state.is_moving() && self.ton_timeout.evaluate(true, now, self.config.timeout_ms) {
            self.fault(HomingError::Timeout);
            return event;
        }

        match self.state {
            HomingState::Init => {
                self.progress_percent = 5;
                self.ton_timeout.reset();
                self.state = HomingState::MoveToRetractLimit;
                self.adapter.set_direction(Direction::Retract);
            }

            HomingState::MoveToRetractLimit => {
                self.progress_percent = 15;
                if self.switches.retract.pulse {
                    self.stop_actuator();
                    self.ton_settle.reset();
                    self.state = HomingState::SettleAtRetract;
                }
            }

            HomingState::SettleAtRetract => {
                self.progress_percent = 20;
                if self.ton_settle.evaluate(true, now, self.config.settle_ms) {
                    self.retract_limit_reached_at = now;
                    self.ton_timeout.reset();
                    self.state = HomingState::MeasureExtend;
                    self.adapter.set_direction(Direction::Extend);
                }
            }

            HomingState::MeasureExtend => {
                self.progress_percent = 40;
                if self.switches.extend.pulse {
                    self.extend_travel_ms = now.wrapping_sub(self.retract_limit_reached_at);
                    if self.extend_travel_ms < MIN_TRAVEL_MS {
                        self.fault(HomingError::InvalidTravel);
                    } else {
                        self.stop_actuator();
                        self.ton_settle.reset();
                        self.state = HomingState::SettleAtExtend;
                    }
                }
            }

            HomingState::SettleAtExtend => {
                self.progress_percent = 50;
                if self.ton_settle.evaluate(true, now, self.config.settle_ms) {
                    self.extend_limit_reached_at = now;
                    self.ton_timeout.reset();
                    self.state = HomingState::MeasureRetract;
                    self.adapter.set_direction(Direction::Retract);
                }
            }

            HomingState::MeasureRetract => {
                self.progress_percent = 60;
                if self.switches.retract.pulse {
                    self.retract_travel_ms = now.wrapping_sub(self.extend_limit_reached_at);
                    if self.retract_travel_ms < MIN_TRAVEL_MS {
                        self.fault(HomingError::InvalidTravel);
                    } else {
                        self.stop_actuator();
                        self.ton_settle.reset();
                        self.state = HomingState::SettleAtRetract2;
                    }
                }
            }

            HomingState::SettleAtRetract2 => {
                self.progress_percent = 70;
                if self.ton_settle.evaluate(true, now, self.config.settle_ms) {
                    self.ton_timeout.reset();
                    self.ton_center_move.reset();
                    self.state = HomingState::MoveToCenter;
                    self.adapter.set_direction(Direction::Extend);
                }
            }

            HomingState::MoveToCenter => {
                // Center is approached in the extend direction at the
                // already-measured extend rate, so half the extend travel
                // time lands at half the stroke.
                let half_travel = self.extend_travel_ms / 2;

                if half_travel > 0 {
                    if let Some(elapsed) = self.ton_center_move.elapsed(now) {
                        let ramp = (elapsed.saturating_mul(25) / half_travel).min(25) as u8;
                        self.progress_percent = (70 + ramp).min(95);
                    }
                }

                if self.ton_center_move.evaluate(true, now, half_travel) {
                    self.stop_actuator();
                    self.state = HomingState::Complete;
                    self.homed = true;
                    self.progress_percent = 100;
                }
            }

            HomingState::Complete => {
                self.active = false;
            }

            HomingState::Error => {
                self.stop_actuator();
                if self.current_retry < self.config.retry_count {
                    self.current_retry += 1;
                    self.error = None;
                    self.state = HomingState::Init;
                    self.reset_all_timers();
                } else {
                    self.active = false;
                }
            }

            // Safe fallback: an active machine sitting in Idle deactivates.
            HomingState::Idle => {
                self.active = false;
            }
        }

        event
    }

    /// Force-stop and return to idle
    ///
    /// Safe to call from any state, repeatedly. Leaves `error` readable for
    /// post-mortem inspection.
    pub fn abort(&mut self) {
        self.stop_actuator();
        self.state = HomingState::Idle;
        self.active = false;
        self.homed = false;
        self.progress_percent = 0;
        self.reset_all_timers();
    }

    /// Whether a homing run is in progress (including retry loops)
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the actuator is parked at center from a completed run
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    /// Last fault, if any
    pub fn error(&self) -> Option<HomingError> {
        self.error
    }

    /// Coarse completion estimate, 0-100
    ///
    /// Monotonically non-decreasing within one attempt; resets on retry
    /// restart and on abort. UI only, never a control signal.
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    /// Current machine state
    pub fn state(&self) -> HomingState {
        self.state
    }

    /// Measured retract-limit → extend-limit travel time (ms), 0 until measured
    pub fn extend_travel_ms(&self) -> u32 {
        self.extend_travel_ms
    }

    /// Measured extend-limit → retract-limit travel time (ms), 0 until measured
    pub fn retract_travel_ms(&self) -> u32 {
        self.retract_travel_ms
    }

    /// Retries consumed in the current run
    pub fn current_retry(&self) -> u8 {
        self.current_retry
    }

    /// Switch pipeline snapshot from the most recent poll
    pub fn switch_diagnostics(&self) -> SwitchDiagnostics {
        self.switches
    }

    /// Configuration the machine was built with
    pub fn config(&self) -> &HomingConfig {
        &self.config
    }

    /// Access the injected hardware adapter
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Run both switches through the debounce+edge pipeline
    ///
    /// Runs on every poll regardless of state so the conditioned levels
    /// never carry stale history into a handler.
    fn update_switch_inputs(&mut self, now: u32) {
        let retract_raw = self.adapter.retract_switch();
        let extend_raw = self.adapter.extend_switch();

        let retract_debounced =
            self.ton_retract_switch
                .evaluate(retract_raw, now, self.config.debounce_ms);
        let extend_debounced =
            self.ton_extend_switch
                .evaluate(extend_raw, now, self.config.debounce_ms);

        self.switches.retract = SwitchLevels {
            raw: retract_raw,
            debounced: retract_debounced,
            pulse: self.ed_retract_switch.detect(retract_debounced),
        };
        self.switches.extend = SwitchLevels {
            raw: extend_raw,
            debounced: extend_debounced,
            pulse: self.ed_extend_switch.detect(extend_debounced),
        };
    }

    fn stop_actuator(&mut self) {
        self.adapter.set_direction(Direction::Stop);
    }

    fn fault(&mut self, error: HomingError) {
        self.stop_actuator();
        self.error = Some(error);
        self.state = HomingState::Error;
    }

    fn reset_all_timers(&mut self) {
        self.ton_retract_switch.reset();
        self.ton_extend_switch.reset();
        self.ton_timeout.reset();
        self.ton_settle.reset();
        self.ton_center_move.reset();
        self.ed_retract_switch.reset();
        self.ed_extend_switch.reset();
    }
}
