//! Timer delay engine
//!
//! Busy-wait delays built from an 8-bit overflow timer. A delay request is
//! turned into a [`Calibration`] (overflow count plus counter start value)
//! once, before the spin loop, against a fixed [`TimerConfig`]; the
//! [`DelayTimer`] then counts overflows until the request is covered.

pub mod calibration;
pub mod delay;

pub use calibration::Calibration;
pub use delay::{BoundDelay, DelayTimer, PendingDelay};

use tickwork_hal::{PrescalerMode, COUNTER_WIDTH};

/// Errors from timer configuration
///
/// The delay itself cannot fail; only selecting an invalid clock setup can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// CPU frequency of zero
    ZeroFrequency,
    /// Mode not clocked from the CPU, so it cannot be calibrated
    NoDivisor(PrescalerMode),
    /// Raw prescaler selector that names no mode
    UnknownPrescaler(u16),
}

/// Clock setup a delay timer is built against
///
/// Fixed for the lifetime of the firmware; usually a `const` generated from
/// the board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    cpu_frequency_hz: u32,
    prescaler: PrescalerMode,
    divisor: u16,
}

impl TimerConfig {
    /// Validate a clock setup
    pub const fn new(cpu_frequency_hz: u32, prescaler: PrescalerMode) -> Result<Self, TimerError> {
        if cpu_frequency_hz == 0 {
            return Err(TimerError::ZeroFrequency);
        }
        match prescaler.divisor() {
            Some(divisor) => Ok(Self {
                cpu_frequency_hz,
                prescaler,
                divisor,
            }),
            None => Err(TimerError::NoDivisor(prescaler)),
        }
    }

    /// CPU clock in Hz
    pub const fn cpu_frequency_hz(&self) -> u32 {
        self.cpu_frequency_hz
    }

    /// Prescaler selected while a delay runs
    pub const fn prescaler(&self) -> PrescalerMode {
        self.prescaler
    }

    /// CPU cycles per counter tick
    pub const fn divisor(&self) -> u16 {
        self.divisor
    }

    /// Seconds per counter tick
    pub fn tick_period_s(&self) -> f64 {
        self.divisor as f64 / self.cpu_frequency_hz as f64
    }

    /// Seconds from a zeroed counter to overflow
    pub fn max_overflow_period_s(&self) -> f64 {
        COUNTER_WIDTH as f64 * self.tick_period_s()
    }

    /// Counter ticks covering `delay_ms`, rounded up
    ///
    /// Negative and NaN requests count as zero.
    pub fn ticks_for_millis(&self, delay_ms: f32) -> u64 {
        let exact = delay_ms as f64 * self.cpu_frequency_hz as f64 / (self.divisor as f64 * 1000.0);
        ceil_ticks(exact)
    }

    /// Counter ticks covering `delay_ns`, rounded up
    pub fn ticks_for_nanos(&self, delay_ns: u64) -> u64 {
        let cycles = delay_ns as u128 * self.cpu_frequency_hz as u128;
        let per_tick = self.divisor as u128 * 1_000_000_000;
        u64::try_from(cycles.div_ceil(per_tick)).unwrap_or(u64::MAX)
    }
}

/// Smallest whole tick count not below `ticks`
fn ceil_ticks(ticks: f64) -> u64 {
    // Also rejects NaN
    if !(ticks > 0.0) {
        return 0;
    }
    // Saturating cast
    let whole = ticks as u64;
    if (whole as f64) < ticks {
        whole.saturating_add(1)
    } else {
        whole
    }
}
