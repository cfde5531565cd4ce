//! Signal conditioning primitives
//!
//! Small, self-contained building blocks for poll-driven logic: an IEC-style
//! on-delay timer (used for switch debounce and settle waits) and a rising
//! edge detector. The homing state machine depends on their exact timing
//! contracts, so both are kept free of any hardware coupling.

pub mod edge;
pub mod on_delay;

pub use edge::EdgeDetector;
pub use on_delay::OnDelayTimer;
