//! Board description

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tickwork_hal::PrescalerMode;

use super::{ConfigError, PinConfig};
use crate::timer::TimerConfig;

/// Maximum LEDs per board
pub const MAX_LEDS: usize = 8;

/// Longest accepted button debounce interval
pub const MAX_DEBOUNCE_MS: u16 = 1000;

/// Debounce interval when the board file gives none
pub const DEFAULT_DEBOUNCE_MS: u16 = 20;

/// CPU clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// CPU frequency in Hz
    pub cpu_frequency_hz: u32,
}

/// Delay timer clocking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerHwConfig {
    /// Prescaler selected while a delay runs
    pub prescaler: PrescalerMode,
}

/// Push button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonConfig {
    /// Input pin; `!` for a button that pulls the line low
    pub pin: PinConfig,
    /// Settling time between the two debounce samples
    #[cfg_attr(feature = "serde", serde(default = "default_debounce_ms"))]
    pub debounce_ms: u16,
}

#[cfg(feature = "serde")]
fn default_debounce_ms() -> u16 {
    DEFAULT_DEBOUNCE_MS
}

/// Complete board description
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    pub clock: ClockConfig,
    pub timer: TimerHwConfig,
    /// LED pins in sequence order
    pub leds: Vec<PinConfig, MAX_LEDS>,
    pub button: ButtonConfig,
}

impl BoardConfig {
    /// Timer setup described by the clock and timer sections
    pub fn timer_config(&self) -> Result<TimerConfig, ConfigError> {
        TimerConfig::new(self.clock.cpu_frequency_hz, self.timer.prescaler)
            .map_err(ConfigError::from)
    }

    /// Check the board for settings the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timer_config()?;

        if self.leds.is_empty() {
            return Err(ConfigError::NoLeds);
        }

        let pins = self.leds.iter().chain(core::iter::once(&self.button.pin));
        for (i, a) in pins.clone().enumerate() {
            if pins.clone().skip(i + 1).any(|b| b.pin == a.pin) {
                return Err(ConfigError::DuplicatePin(a.pin));
            }
        }

        if self.button.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::DebounceTooLong(self.button.debounce_ms));
        }

        Ok(())
    }
}
