//! Configuration type definitions
//!
//! Homing parameters are fixed at machine construction and immutable for
//! the lifetime of the instance.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shortest travel time between limit switches accepted as plausible (ms)
///
/// A measured travel below this indicates a stuck switch, wiring fault, or
/// spurious pulse and is rejected as
/// [`HomingError::InvalidTravel`](crate::homing::HomingError::InvalidTravel).
pub const MIN_TRAVEL_MS: u32 = 100;

/// Homing sequence configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomingConfig {
    /// Stable time required before a switch level is trusted (ms)
    pub debounce_ms: u32,
    /// Global limit on time spent in any moving state (ms)
    pub timeout_ms: u32,
    /// Pause after reaching a limit switch before trusting timing (ms)
    pub settle_ms: u32,
    /// Automatic retries after a fault before giving up
    pub retry_count: u8,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            timeout_ms: 30_000,
            settle_ms: 100,
            retry_count: 3,
        }
    }
}
