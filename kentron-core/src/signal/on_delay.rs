//! On-delay (TON) timer
//!
//! IEC 61131-style on-delay timer: the output goes true once the input has
//! been continuously true for at least the preset duration. Used as the
//! debounce and wait-for-duration primitive throughout the homing sequence.
//!
//! Timestamps are raw millisecond ticks from the hardware adapter. All
//! duration math is wrapping, so a single tick-counter rollover inside a
//! timing window is handled correctly.

/// On-delay timer
///
/// One instance per monitored condition. The preset is passed to every
/// [`evaluate`](OnDelayTimer::evaluate) call rather than stored, matching
/// the owning state machine's immutable configuration.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OnDelayTimer {
    /// Tick captured when the input was first seen true
    since: u32,
    /// Whether a timing window is in progress
    armed: bool,
}

impl OnDelayTimer {
    /// Create a new, unarmed timer
    pub const fn new() -> Self {
        Self {
            since: 0,
            armed: false,
        }
    }

    /// Evaluate the timer against the current input level
    ///
    /// - Input false: output false, timing window invalidated.
    /// - Input true, not armed: captures `now` and arms. Output is false
    ///   unless `preset_ms` is 0, which trips immediately (relied upon to
    ///   force one-shot synchronous triggers).
    /// - Input true, armed: output is true iff at least `preset_ms` has
    ///   elapsed since the captured timestamp.
    pub fn evaluate(&mut self, input: bool, now: u32, preset_ms: u32) -> bool {
        if !input {
            self.armed = false;
            return false;
        }

        if !self.armed {
            self.armed = true;
            self.since = now;
            return preset_ms == 0;
        }

        now.wrapping_sub(self.since) >= preset_ms
    }

    /// Invalidate an in-progress timing window
    ///
    /// The next true input re-arms from its own (later) timestamp. Called
    /// at state transitions to keep a stale window from tripping right
    /// after a mode change.
    pub fn reset(&mut self) {
        self.armed = false;
    }

    /// Milliseconds elapsed since the timer armed, or None if not armed
    pub fn elapsed(&self, now: u32) -> Option<u32> {
        self.armed.then(|| now.wrapping_sub(self.since))
    }
}
