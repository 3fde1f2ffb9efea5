//! Board configuration types
//!
//! Describes one board: CPU clock, delay prescaler, LED pins and the
//! button. The firmware build script reads these from `board.toml` (with
//! the `serde` feature), validates them and bakes the result into
//! constants, so nothing here is parsed at run time on the target.

pub mod board;
pub mod pins;

pub use board::*;
pub use pins::*;

use core::fmt;

use crate::dio::{DioError, Pin};
use crate::timer::TimerError;

/// Errors from board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin string not of the form `PA0` / `!PA0`
    InvalidPinSyntax,
    /// Pin string naming a port or index the chip lacks
    Pin(DioError),
    /// Clock setup that cannot be calibrated
    Timer(TimerError),
    /// No LED pins configured
    NoLeds,
    /// More LEDs than [`MAX_LEDS`]
    TooManyLeds(usize),
    /// Same pin assigned twice
    DuplicatePin(Pin),
    /// Debounce interval above [`MAX_DEBOUNCE_MS`]
    DebounceTooLong(u16),
}

impl From<DioError> for ConfigError {
    fn from(err: DioError) -> Self {
        ConfigError::Pin(err)
    }
}

impl From<TimerError> for ConfigError {
    fn from(err: TimerError) -> Self {
        ConfigError::Timer(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPinSyntax => {
                write!(f, "pin must look like \"PA0\" or \"!PA0\"")
            }
            ConfigError::Pin(err) => write!(f, "invalid pin: {:?}", err),
            ConfigError::Timer(err) => write!(f, "invalid timer setup: {:?}", err),
            ConfigError::NoLeds => write!(f, "at least one LED pin is required"),
            ConfigError::TooManyLeds(n) => {
                write!(f, "{} LEDs configured, at most {} supported", n, MAX_LEDS)
            }
            ConfigError::DuplicatePin(pin) => write!(f, "pin {} is assigned twice", pin),
            ConfigError::DebounceTooLong(ms) => write!(
                f,
                "debounce of {} ms exceeds the {} ms limit",
                ms, MAX_DEBOUNCE_MS
            ),
        }
    }
}
