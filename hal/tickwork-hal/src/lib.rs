//! Tickwork Hardware Abstraction Layer
//!
//! This crate defines the register-level abstractions that chip-specific
//! HALs (ATmega32, ...) implement and that the port and timer drivers in
//! `tickwork-core` are written against.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tickwork-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tickwork-core / tickwork-drivers       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tickwork-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ tickwork-hal- │       │ RegisterImage │
//! │   atmega32    │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`register::Registers`] - Single-bit access to memory-mapped registers
//! - [`port`] - Port identifiers and their register triples
//! - [`timer`] - 8-bit timer register layout, prescaler modes and encodings
//! - `image::RegisterImage` - In-memory register file for host tests
//! - `sim::SimulatedMcu` - Register image with pin loopback and a running timer
//!
//! # Features
//!
//! - `sim` - Build the two host-side register files above. Only test
//!   builds enable it, so firmware cannot pick them up by accident.
//! - `defmt` - Enable debug formatting support
//! - `serde` - Derive `Serialize`/`Deserialize` for the prescaler mode

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "sim"))]
pub mod image;
pub mod port;
pub mod register;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod timer;

// Re-export key types at crate root for convenience
#[cfg(any(test, feature = "sim"))]
pub use image::RegisterImage;
pub use port::{InvalidPortId, Port, PortId, PortMap, PORT_WIDTH};
pub use register::{bit_mask, Register, Registers};
#[cfg(any(test, feature = "sim"))]
pub use sim::SimulatedMcu;
pub use timer::{
    EncodingError, PrescalerEncoding, PrescalerMode, TableEncoding, TimerRegisters,
    CLOCK_SELECT_MASK, COUNTER_WIDTH,
};
