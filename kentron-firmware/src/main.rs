//! Kentron - Linear-actuator homing controller firmware
//!
//! Target binary for STM32-based appliance boards. Wires the GPIO relay
//! pair and limit switches into the board-agnostic homing core and polls
//! it from a periodic task.
//!
//! Named after the Greek "kentron" (κέντρον) meaning "center point" -
//! the firmware discovers actuator travel with two limit switches and a
//! clock, then parks at the computed mechanical center.

#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_time::{Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use kentron_core::config::HomingConfig;
use kentron_core::homing::{Homing, HomingEvent, HomingState};

use crate::adapter::RelayActuator;

mod adapter;

/// Control loop cadence; the core is poll-driven and tolerant of jitter
const POLL_INTERVAL_MS: u64 = 10;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("kentron firmware starting");

    let p = embassy_stm32::init(Default::default());

    // H-bridge relay pair driving the actuator; both low = stopped
    let extend_relay = Output::new(p.PB0, Level::Low, Speed::Low);
    let retract_relay = Output::new(p.PB1, Level::Low, Speed::Low);

    // Limit switches to ground, closed = engaged
    let retract_switch = Input::new(p.PA0, Pull::Up);
    let extend_switch = Input::new(p.PA1, Pull::Up);

    let board = RelayActuator::new(extend_relay, retract_relay, retract_switch, extend_switch);
    let mut homing = Homing::new(board, HomingConfig::default());

    if !homing.start() {
        defmt::panic!("homing already active at boot");
    }
    info!("homing started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    loop {
        ticker.next().await;

        if let Some(HomingEvent::Entered { from, to }) = homing.process() {
            info!("homing: {} -> {} ({}%)", from, to, homing.progress_percent());
        }

        if !homing.is_active() {
            break;
        }
    }

    match homing.state() {
        HomingState::Complete => info!(
            "homed at center: extend travel {} ms, retract travel {} ms",
            homing.extend_travel_ms(),
            homing.retract_travel_ms()
        ),
        _ => error!(
            "homing failed after {} retries: {}",
            homing.current_retry(),
            homing.error()
        ),
    }

    // Actuator is parked (or safely stopped on fault); idle the loop.
    loop {
        ticker.next().await;
    }
}
