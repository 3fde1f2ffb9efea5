//! ATmega32-specific HAL for Tickwork
//!
//! This crate provides the ATmega32 pieces behind the `tickwork-hal`
//! abstractions:
//!
//! - [`map`] - data-space addresses of the I/O ports and Timer/Counter0,
//!   as a [`PortMap`](tickwork_hal::PortMap) and
//!   [`TimerRegisters`](tickwork_hal::TimerRegisters)
//! - [`Atmega32Prescaler`] - the CS02:0 clock-select table
//! - [`Mmio`] - the register handle doing volatile accesses, with every
//!   read-modify-write wrapped in a critical section
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware takes the handle once and passes it to the port and timer
//! drivers from `tickwork-core`. A `critical-section` implementation must be
//! linked in (the firmware gets one from `avr-device`).

#![no_std]

pub mod map;
pub mod mmio;

pub use map::{Atmega32Prescaler, PORTS, TIMER0};
pub use mmio::{is_accessible, Mmio};
