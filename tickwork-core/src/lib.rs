//! Board-agnostic port and timer logic for Tickwork
//!
//! This crate contains everything that only needs a register handle and a
//! register map, not a particular chip:
//!
//! - Digital I/O port abstraction (direction, level, toggle, read)
//! - Timer delay calibration and the busy-wait delay built on it
//! - Board configuration types (clock, prescaler, pin assignments)
//! - The LED sequence state machine driven by the firmware
//!
//! Register handles are passed to every operation as `&mut R` where
//! `R: Registers`. Nothing here owns hardware, so the same code runs
//! against the ATmega32 MMIO handle and against a host-side register image.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod dio;
pub mod sequence;
pub mod timer;

pub use config::{BoardConfig, ConfigError, PinConfig};
pub use dio::{Dio, DioError, Direction, Level, Pin};
pub use sequence::{LedSequence, Step};
pub use timer::{BoundDelay, Calibration, DelayTimer, PendingDelay, TimerConfig, TimerError};
