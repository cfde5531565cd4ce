//! End-to-end homing sequence tests
//!
//! Drives the state machine against a simulated actuator with a position
//! model: the carriage moves at a configurable rate per commanded
//! direction, and the limit switches engage from the carriage position.
//! Travel times and centering behavior therefore emerge from the simulated
//! physics instead of being scripted directly.

use kentron_core::config::HomingConfig;
use kentron_core::homing::{Homing, HomingError, HomingEvent, HomingState};
use kentron_core::traits::{ActuatorAdapter, Direction};

/// Simulated actuator and limit switches
///
/// Position is in abstract travel units; `extend_rate`/`retract_rate` are
/// units per millisecond, so asymmetric drive speeds can be modeled. The
/// retract switch engages at position 0, the extend switch at `stroke`.
struct SimActuator {
    pos: i64,
    stroke: i64,
    extend_rate: i64,
    retract_rate: i64,
    dir: Direction,
    now: u32,
    commands: Vec<Direction>,
}

impl SimActuator {
    fn new(stroke: i64, start_pos: i64, extend_rate: i64, retract_rate: i64) -> Self {
        Self {
            pos: start_pos,
            stroke,
            extend_rate,
            retract_rate,
            dir: Direction::Stop,
            now: 0,
            commands: Vec::new(),
        }
    }

    fn with_start_tick(mut self, now: u32) -> Self {
        self.now = now;
        self
    }

    /// Advance simulated time by one millisecond
    fn tick_1ms(&mut self) {
        self.now = self.now.wrapping_add(1);
        match self.dir {
            Direction::Stop => {}
            Direction::Extend => self.pos = (self.pos + self.extend_rate).min(self.stroke),
            Direction::Retract => self.pos = (self.pos - self.retract_rate).max(0),
        }
    }
}

impl ActuatorAdapter for SimActuator {
    fn set_direction(&mut self, dir: Direction) {
        self.dir = dir;
        self.commands.push(dir);
    }

    fn retract_switch(&mut self) -> bool {
        self.pos <= 0
    }

    fn extend_switch(&mut self) -> bool {
        self.pos >= self.stroke
    }

    fn now_ms(&mut self) -> u32 {
        self.now
    }
}

/// One control-loop cycle: 1 ms of simulated time, then one poll
fn step(h: &mut Homing<SimActuator>) -> Option<HomingEvent> {
    h.adapter_mut().tick_1ms();
    h.process()
}

/// Step until `stop` holds, collecting entry events; panics on budget overrun
fn run_until<F>(h: &mut Homing<SimActuator>, budget_ms: u32, mut stop: F) -> Vec<HomingEvent>
where
    F: FnMut(&Homing<SimActuator>) -> bool,
{
    let mut events = Vec::new();
    for _ in 0..budget_ms {
        if let Some(ev) = step(h) {
            events.push(ev);
        }
        if stop(h) {
            return events;
        }
    }
    panic!("stop condition not reached within {budget_ms} simulated ms");
}

/// Asymmetric-drive rig: 4000-unit stroke at 2 units/ms extending and
/// 1 unit/ms retracting, carriage starting mid-stroke.
fn asymmetric_rig() -> Homing<SimActuator> {
    Homing::new(
        SimActuator::new(4000, 1000, 2, 1),
        HomingConfig::default(),
    )
}

#[test]
fn happy_path_reaches_center() {
    let mut h = asymmetric_rig();
    assert!(h.start());

    run_until(&mut h, 60_000, |h| !h.is_active());

    assert_eq!(h.state(), HomingState::Complete);
    assert!(h.is_homed());
    assert_eq!(h.error(), None);
    assert_eq!(h.progress_percent(), 100);

    // Extend: 4000 units at 2/ms = 2000 ms, plus 50 ms debounce latency.
    let extend = h.extend_travel_ms();
    assert!(
        (2050..=2055).contains(&extend),
        "extend travel {extend} ms outside expected window"
    );
    // Retract: 4000 units at 1/ms = 4000 ms, plus debounce.
    let retract = h.retract_travel_ms();
    assert!(
        (4050..=4055).contains(&retract),
        "retract travel {retract} ms outside expected window"
    );

    // The final extend move runs extend_travel/2 at the measured extend
    // rate, so the carriage parks near mid-stroke despite the asymmetric
    // drive speeds. Debounce latency biases it slightly past center.
    let pos = h.adapter_mut().pos;
    assert!(
        (1900..=2200).contains(&pos),
        "parked at {pos}, expected near 2000"
    );
}

#[test]
fn happy_path_visits_states_in_order() {
    let mut h = asymmetric_rig();
    h.start();
    let events = run_until(&mut h, 60_000, |h| !h.is_active());

    let entered: Vec<HomingState> = events
        .iter()
        .map(|&HomingEvent::Entered { to, .. }| to)
        .collect();
    assert_eq!(
        entered,
        [
            HomingState::Init,
            HomingState::MoveToRetractLimit,
            HomingState::SettleAtRetract,
            HomingState::MeasureExtend,
            HomingState::SettleAtExtend,
            HomingState::MeasureRetract,
            HomingState::SettleAtRetract2,
            HomingState::MoveToCenter,
            HomingState::Complete,
        ]
    );

    // Each event's `from` chains to the previous event's `to`
    for pair in events.windows(2) {
        let HomingEvent::Entered { to: prev_to, .. } = pair[0];
        let HomingEvent::Entered { from, .. } = pair[1];
        assert_eq!(from, prev_to);
    }
}

#[test]
fn happy_path_command_sequence() {
    let mut h = asymmetric_rig();
    h.start();
    run_until(&mut h, 60_000, |h| !h.is_active());

    assert_eq!(
        h.adapter_mut().commands,
        [
            Direction::Retract, // Init: seek retract limit
            Direction::Stop,    // retract pulse
            Direction::Extend,  // measure extend travel
            Direction::Stop,    // extend pulse
            Direction::Retract, // measure retract travel
            Direction::Stop,    // retract pulse
            Direction::Extend,  // centering move
            Direction::Stop,    // parked
        ]
    );
}

#[test]
fn progress_is_monotonic_within_a_run() {
    let mut h = asymmetric_rig();
    h.start();

    let mut last = 0;
    for _ in 0..60_000 {
        step(&mut h);
        let p = h.progress_percent();
        assert!(p >= last, "progress went backwards: {last} -> {p}");
        last = p;
        if !h.is_active() {
            break;
        }
    }
    assert_eq!(last, 100);
}

#[test]
fn invalid_travel_faults_and_exhausts_retries() {
    // 20-unit stroke: travel comes out near 70 ms, under the 100 ms
    // plausibility floor, so every attempt faults.
    let mut h = Homing::new(SimActuator::new(20, 10, 1, 1), HomingConfig::default());
    h.start();

    // First fault
    run_until(&mut h, 10_000, |h| h.state() == HomingState::Error);
    assert_eq!(h.error(), Some(HomingError::InvalidTravel));
    assert_eq!(h.adapter_mut().dir, Direction::Stop);
    assert!(h.is_active()); // retries pending

    // Retries re-run the full sequence from Init and fail the same way
    run_until(&mut h, 10_000, |h| !h.is_active());
    assert_eq!(h.state(), HomingState::Error);
    assert_eq!(h.error(), Some(HomingError::InvalidTravel));
    assert_eq!(h.current_retry(), 3);
    assert!(!h.is_homed());

    // Exhausted: no further automatic retry
    assert_eq!(step(&mut h), None);
    assert_eq!(h.state(), HomingState::Error);
}

#[test]
fn timeout_when_switch_never_engages() {
    // Stroke too long to ever reach a switch within the timeout window
    let config = HomingConfig {
        timeout_ms: 500,
        ..HomingConfig::default()
    };
    let mut h = Homing::new(SimActuator::new(1_000_000, 500_000, 1, 1), config);
    h.start();

    run_until(&mut h, 5_000, |h| h.state() == HomingState::Error);
    assert_eq!(h.error(), Some(HomingError::Timeout));
    assert_eq!(h.adapter_mut().dir, Direction::Stop);

    // Every retry times out as well; the run eventually deactivates
    run_until(&mut h, 5_000, |h| !h.is_active());
    assert_eq!(h.error(), Some(HomingError::Timeout));
    assert_eq!(h.current_retry(), 3);
}

#[test]
fn abort_mid_measurement_then_restart() {
    let mut h = asymmetric_rig();
    h.start();
    run_until(&mut h, 60_000, |h| h.state() == HomingState::MeasureExtend);

    h.abort();
    assert_eq!(h.state(), HomingState::Idle);
    assert!(!h.is_active());
    assert!(!h.is_homed());
    assert_eq!(h.progress_percent(), 0);
    assert_eq!(h.adapter_mut().dir, Direction::Stop);

    // The same instance homes cleanly on the next attempt
    assert!(h.start());
    run_until(&mut h, 60_000, |h| !h.is_active());
    assert_eq!(h.state(), HomingState::Complete);
    assert!(h.is_homed());
}

#[test]
fn start_rejected_while_active_preserves_run() {
    let mut h = asymmetric_rig();
    h.start();
    run_until(&mut h, 60_000, |h| h.state() == HomingState::SettleAtExtend);

    let measured = h.extend_travel_ms();
    assert!(measured > 0);

    assert!(!h.start());
    assert_eq!(h.state(), HomingState::SettleAtExtend);
    assert_eq!(h.extend_travel_ms(), measured);
    assert!(h.is_active());

    run_until(&mut h, 60_000, |h| !h.is_active());
    assert!(h.is_homed());
}

#[test]
fn sequence_survives_tick_counter_wraparound() {
    // The whole run straddles the 32-bit rollover of the tick counter
    let sim = SimActuator::new(4000, 1000, 2, 1).with_start_tick(u32::MAX - 3000);
    let mut h = Homing::new(sim, HomingConfig::default());
    h.start();

    run_until(&mut h, 60_000, |h| !h.is_active());

    assert_eq!(h.state(), HomingState::Complete);
    assert!(h.is_homed());
    assert_eq!(h.error(), None);
    let extend = h.extend_travel_ms();
    assert!(
        (2050..=2055).contains(&extend),
        "extend travel {extend} ms corrupted by wraparound"
    );
}
