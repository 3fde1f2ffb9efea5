//! Board-level drivers
//!
//! Thin drivers over the `tickwork-core` port abstraction:
//!
//! - [`Led`] - output pin with on/off/toggle and active-low wiring
//! - [`Button`] - input pin with active-low mapping, debouncing and press
//!   edge detection
//!
//! Like the port driver, these hold only pin assignments. The register
//! handle is passed to every call.

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod led;

pub use button::Button;
pub use led::Led;
