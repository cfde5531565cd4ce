//! Rising edge detection
//!
//! Converts a boolean level into a one-poll pulse on the false→true
//! transition. One instance per monitored signal; the stored previous
//! level persists across polls.

/// Rising edge detector
///
/// Output of [`detect`](EdgeDetector::detect) is true for exactly one call
/// when the input transitions from false to true, and false otherwise -
/// including while the input stays true and on the true→false transition.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeDetector {
    /// Input level seen on the previous call
    last: bool,
}

impl EdgeDetector {
    /// Create a new detector with a false previous level
    ///
    /// The first true input after construction produces a pulse.
    pub const fn new() -> Self {
        Self { last: false }
    }

    /// Evaluate the detector against the current input level
    ///
    /// Returns true only when the previous level was false and the current
    /// one is true. The stored previous level is updated unconditionally.
    pub fn detect(&mut self, input: bool) -> bool {
        let rising = input && !self.last;
        self.last = input;
        rising
    }

    /// Clear the stored previous level
    ///
    /// Arms the detector so that the next true input fires a pulse even if
    /// the input was already true before the reset. Called at state-entry
    /// boundaries to avoid acting on stale history.
    pub fn reset(&mut self) {
        self.last = false;
    }
}
