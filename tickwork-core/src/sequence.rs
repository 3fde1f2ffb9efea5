//! LED sequence state machine
//!
//! Cycles through `2 * N` stages for `N` LEDs. From all-off, each step
//! turns the next LED on until all are lit, then each step turns the
//! lowest lit LED off until all are dark again:
//!
//! ```text
//! N = 3:  ...  o..  oo.  ooo  .oo  ..o  ...
//! ```
//!
//! Every step changes exactly one LED, so the firmware only has to drive
//! the one pin reported by [`LedSequence::advance`].

use crate::config::{ConfigError, MAX_LEDS};

/// One LED changing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// LED position in the sequence
    pub led: usize,
    /// New state
    pub on: bool,
}

/// Sequence position for a fixed number of LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedSequence {
    leds: usize,
    stage: usize,
}

impl LedSequence {
    /// Start a sequence over `leds` LEDs with all of them off
    pub const fn new(leds: usize) -> Result<Self, ConfigError> {
        if leds == 0 {
            return Err(ConfigError::NoLeds);
        }
        if leds > MAX_LEDS {
            return Err(ConfigError::TooManyLeds(leds));
        }
        Ok(Self { leds, stage: 0 })
    }

    /// Number of LEDs driven
    pub const fn leds(&self) -> usize {
        self.leds
    }

    /// Current stage, `0..2 * leds`
    pub const fn stage(&self) -> usize {
        self.stage
    }

    /// Number of stages before the sequence repeats
    pub const fn period(&self) -> usize {
        2 * self.leds
    }

    /// Move to the next stage
    pub fn advance(&mut self) -> Step {
        let step = if self.stage < self.leds {
            Step {
                led: self.stage,
                on: true,
            }
        } else {
            Step {
                led: self.stage - self.leds,
                on: false,
            }
        };
        self.stage = (self.stage + 1) % self.period();
        step
    }

    /// Check whether LED `led` is lit at the current stage
    pub const fn is_on(&self, led: usize) -> bool {
        if led >= self.leds {
            false
        } else if self.stage <= self.leds {
            led < self.stage
        } else {
            led >= self.stage - self.leds
        }
    }

    /// Lit LEDs as a bit mask, LED 0 in bit 0
    pub fn pattern(&self) -> u8 {
        (0..self.leds)
            .filter(|&led| self.is_on(led))
            .fold(0u8, |mask, led| mask | (1u8 << led))
    }

    /// Back to all-off
    pub fn reset(&mut self) {
        self.stage = 0;
    }
}
