//! Push-button driver
//!
//! A press is only reported when two samples taken `debounce_ms` apart
//! both read pressed. The wait between samples uses the delay timer, so
//! debouncing blocks for the debounce interval.

use tickwork_core::config::ButtonConfig;
use tickwork_core::{DelayTimer, Dio, DioError, Direction, Level};
use tickwork_hal::{PrescalerEncoding, Registers};

/// One push button on an input pin
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    dio: Dio,
    config: ButtonConfig,
    /// Debounced state at the last [`Button::poll_press`]
    held: bool,
}

impl Button {
    /// Create a button driver for `config`
    pub const fn new(dio: Dio, config: ButtonConfig) -> Self {
        Self {
            dio,
            config,
            held: false,
        }
    }

    /// Button wiring and debounce interval
    pub const fn config(&self) -> &ButtonConfig {
        &self.config
    }

    /// Make the pin an input
    ///
    /// Active-low buttons get the internal pull-up, so an open contact
    /// reads high.
    pub fn init<R: Registers>(&self, regs: &mut R) -> Result<(), DioError> {
        let pin = self.config.pin.pin;
        self.dio.init(regs, pin.index(), pin.port(), Direction::Input)?;
        let pull_up = Level::from(self.config.pin.active_low);
        self.dio.write(regs, pin.index(), pin.port(), pull_up)
    }

    /// Raw pin level
    pub fn level<R: Registers>(&self, regs: &mut R) -> Result<Level, DioError> {
        let pin = self.config.pin.pin;
        self.dio.read(regs, pin.index(), pin.port())
    }

    /// Check whether the button is pressed right now, without debouncing
    pub fn is_pressed<R: Registers>(&self, regs: &mut R) -> Result<bool, DioError> {
        let level = self.level(regs)?;
        Ok(level.is_high() != self.config.pin.active_low)
    }

    /// Check whether the button is pressed, debounced
    pub fn read_debounced<R: Registers, E: PrescalerEncoding>(
        &self,
        regs: &mut R,
        timer: &DelayTimer<E>,
    ) -> Result<bool, DioError> {
        if !self.is_pressed(regs)? {
            return Ok(false);
        }
        timer.delay_ms(regs, self.config.debounce_ms as f32);
        self.is_pressed(regs)
    }

    /// Check for a new press
    ///
    /// Returns `true` once per press, on the poll where the debounced state
    /// goes from released to pressed.
    pub fn poll_press<R: Registers, E: PrescalerEncoding>(
        &mut self,
        regs: &mut R,
        timer: &DelayTimer<E>,
    ) -> Result<bool, DioError> {
        let pressed = self.read_debounced(regs, timer)?;
        let edge = pressed && !self.held;
        self.held = pressed;

        #[cfg(feature = "defmt")]
        if edge {
            defmt::debug!("button {}: pressed", self.config.pin.pin);
        }

        Ok(edge)
    }
}
