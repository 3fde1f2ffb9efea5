//! Delay calibration
//!
//! Splits a tick budget into `N` overflow cycles that all start from the
//! same counter value:
//!
//! ```text
//! N    = ceil(ticks / 256)
//! init = 256 - ceil(ticks / N)
//! ```
//!
//! Both steps round up, so `N * (256 - init) >= ticks` holds for every
//! `u64` tick budget. When `ticks` does not divide evenly by `N` every
//! cycle carries the same remainder, giving an overshoot of less than `N`
//! ticks.
//!
//! Rounding the tick count up first and then dividing in integers gives
//! the same `N` and `init` as carrying the fractional tick count through
//! both divisions, because `ceil(ceil(x) / n) == ceil(x / n)` for whole
//! `n`.

use tickwork_hal::COUNTER_WIDTH;

use super::TimerConfig;

/// Overflow count and counter start value for one delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    overflows: u64,
    initial_value: u8,
}

impl Calibration {
    /// Calibration of an empty delay: no overflows to wait for
    pub const IDLE: Self = Self {
        overflows: 0,
        initial_value: 0,
    };

    /// Calibrate a delay given in (fractional) milliseconds
    pub fn for_millis(config: &TimerConfig, delay_ms: f32) -> Self {
        Self::for_ticks(config.ticks_for_millis(delay_ms))
    }

    /// Calibrate a delay given in nanoseconds
    pub fn for_nanos(config: &TimerConfig, delay_ns: u64) -> Self {
        Self::for_ticks(config.ticks_for_nanos(delay_ns))
    }

    /// Calibrate a delay of `ticks` counter ticks
    pub fn for_ticks(ticks: u64) -> Self {
        if ticks == 0 {
            return Self::IDLE;
        }

        let width = COUNTER_WIDTH as u64;
        let overflows = ticks.div_ceil(width);
        // N >= ticks / 256, so this is at most 256
        let per_cycle = ticks.div_ceil(overflows);

        Self {
            overflows,
            initial_value: (width - per_cycle) as u8,
        }
    }

    /// Number of overflow events to wait for
    pub const fn overflows(&self) -> u64 {
        self.overflows
    }

    /// Counter value every cycle starts from
    pub const fn initial_value(&self) -> u8 {
        self.initial_value
    }

    /// Ticks counted per cycle
    pub const fn ticks_per_overflow(&self) -> u16 {
        COUNTER_WIDTH - self.initial_value as u16
    }

    /// Ticks the delay actually lasts
    ///
    /// Wider than the request: a budget near `u64::MAX` rounds up past it.
    pub const fn realized_ticks(&self) -> u128 {
        self.overflows as u128 * self.ticks_per_overflow() as u128
    }

    /// Seconds the delay actually lasts under `config`
    pub fn realized_seconds(&self, config: &TimerConfig) -> f64 {
        self.realized_ticks() as f64 * config.tick_period_s()
    }
}
