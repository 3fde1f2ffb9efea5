//! Board constants generated from board.toml

use tickwork_core::config::{ButtonConfig, PinConfig};
use tickwork_core::{Pin, TimerConfig};
use tickwork_hal::{PortId, PrescalerMode};

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

/// Delay timer clocking
pub const TIMER: TimerConfig = match TimerConfig::new(CPU_FREQUENCY_HZ, PRESCALER) {
    Ok(config) => config,
    Err(_) => panic!("board.toml: timer cannot be calibrated"),
};

/// Pin constructor for the generated tables; build.rs has already
/// validated every pin.
const fn pin(port: PortId, index: u8, active_low: bool) -> PinConfig {
    match Pin::new(port, index) {
        Ok(pin) => PinConfig { pin, active_low },
        Err(_) => panic!("board.toml: pin out of range"),
    }
}
