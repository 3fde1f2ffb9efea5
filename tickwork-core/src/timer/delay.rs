//! Busy-wait delays on an overflow timer
//!
//! # Exclusive use
//!
//! The timer's control, counter and flag registers are process-wide. A
//! delay assumes nothing else touches them until it returns: the register
//! handle is borrowed `&mut` for the whole wait, and the hardware handle is
//! only handed out once. Starting a second delay from an interrupt handler
//! through a stolen handle corrupts both delays.
//!
//! # Termination
//!
//! [`DelayTimer::delay_ms`] has no timeout. If the counter never overflows
//! (no clock, wrong encoding) it spins forever. Callers that need to give
//! up must use [`DelayTimer::start`] and poll.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use tickwork_hal::{
    bit_mask, PrescalerEncoding, PrescalerMode, Registers, TimerRegisters, CLOCK_SELECT_MASK,
};

use super::{Calibration, TimerConfig, TimerError};

/// Delay generator on one overflow timer
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelayTimer<E> {
    config: TimerConfig,
    registers: TimerRegisters,
    encoding: E,
}

impl<E> DelayTimer<E> {
    /// Create a delay timer for `registers`, clocked per `config`
    pub const fn new(config: TimerConfig, registers: TimerRegisters, encoding: E) -> Self {
        Self {
            config,
            registers,
            encoding,
        }
    }

    /// Clock setup the timer was built against
    pub const fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Registers the timer drives
    pub const fn registers(&self) -> &TimerRegisters {
        &self.registers
    }
}

impl<E: PrescalerEncoding> DelayTimer<E> {
    /// Put the timer in plain counting mode
    ///
    /// Clears the waveform-generation and compare-output bits; the clock
    /// select field is left as it is.
    pub fn set_normal_mode<R: Registers>(&self, regs: &mut R) {
        let mask = self.registers.normal_mode_mask;
        regs.modify(self.registers.control, |v| v & !mask);
    }

    /// Load the counter
    pub fn set_initial_value<R: Registers>(&self, regs: &mut R, value: u8) {
        regs.write(self.registers.counter, value);
    }

    /// Select the counter clock
    ///
    /// Selecting any mode other than [`PrescalerMode::Off`] starts the
    /// counter.
    pub fn select_prescaler<R: Registers>(&self, regs: &mut R, mode: PrescalerMode) {
        let field = self.encoding.field(mode) & CLOCK_SELECT_MASK;
        regs.modify(self.registers.control, |v| (v & !CLOCK_SELECT_MASK) | field);
    }

    /// Select the counter clock from a raw divisor selector
    ///
    /// `0` stops the counter; `1`, `8`, `64`, `256` and `1024` select the
    /// matching divisor. Any other value stops the counter and is reported.
    pub fn select_prescaler_divisor<R: Registers>(
        &self,
        regs: &mut R,
        divisor: u16,
    ) -> Result<(), TimerError> {
        match PrescalerMode::from_divisor(divisor) {
            Some(mode) => {
                self.select_prescaler(regs, mode);
                Ok(())
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("timer: unknown prescaler divisor {}, stopping", divisor);
                self.select_prescaler(regs, PrescalerMode::Off);
                Err(TimerError::UnknownPrescaler(divisor))
            }
        }
    }

    /// Mode currently selected in the control register
    pub fn prescaler<R: Registers>(&self, regs: &mut R) -> Option<PrescalerMode> {
        let field = regs.read(self.registers.control) & CLOCK_SELECT_MASK;
        self.encoding.mode(field)
    }

    /// Stop the counter
    pub fn stop<R: Registers>(&self, regs: &mut R) {
        self.select_prescaler(regs, PrescalerMode::Off);
    }

    /// Calibrate a delay and load the counter with its start value
    pub fn calibrate<R: Registers>(&self, regs: &mut R, delay_ms: f32) -> Calibration {
        let calibration = Calibration::for_millis(&self.config, delay_ms);
        self.prime(regs, calibration);
        calibration
    }

    /// Block for at least `delay_ms` milliseconds
    ///
    /// Always returns with the counter stopped.
    pub fn delay_ms<R: Registers>(&self, regs: &mut R, delay_ms: f32) {
        let calibration = self.calibrate(regs, delay_ms);
        self.run(regs, calibration);
    }

    /// Start a delay without blocking
    ///
    /// The counter runs until the returned [`PendingDelay`] completes or is
    /// dropped.
    pub fn start<'a, R: Registers>(
        &'a self,
        regs: &'a mut R,
        delay_ms: f32,
    ) -> PendingDelay<'a, R, E> {
        let calibration = self.calibrate(regs, delay_ms);
        if calibration.overflows() > 0 {
            self.clear_overflow(regs);
            self.select_prescaler(regs, self.config.prescaler());
        }
        PendingDelay {
            timer: self,
            regs,
            calibration,
            remaining: calibration.overflows(),
        }
    }

    /// Borrow the timer and a register handle as an `embedded-hal` delay
    pub fn bind<'a, R: Registers>(&'a self, regs: &'a mut R) -> BoundDelay<'a, R, E> {
        BoundDelay { timer: self, regs }
    }

    fn prime<R: Registers>(&self, regs: &mut R, calibration: Calibration) {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "timer: {} overflows from {}",
            calibration.overflows(),
            calibration.initial_value()
        );
        self.set_initial_value(regs, calibration.initial_value());
    }

    /// Spin through a primed calibration
    fn run<R: Registers>(&self, regs: &mut R, calibration: Calibration) {
        if calibration.overflows() == 0 {
            self.stop(regs);
            return;
        }

        self.clear_overflow(regs);
        self.select_prescaler(regs, self.config.prescaler());

        for _ in 0..calibration.overflows() {
            while !self.overflowed(regs) {
                core::hint::spin_loop();
            }
            self.restart_cycle(regs, calibration);
        }

        self.stop(regs);
    }

    fn overflowed<R: Registers>(&self, regs: &mut R) -> bool {
        regs.read_bit(self.registers.flags, self.registers.overflow_flag)
    }

    fn restart_cycle<R: Registers>(&self, regs: &mut R, calibration: Calibration) {
        self.set_initial_value(regs, calibration.initial_value());
        self.clear_overflow(regs);
    }

    /// Flags are cleared by writing a one; zeros leave other flags alone
    fn clear_overflow<R: Registers>(&self, regs: &mut R) {
        regs.write(
            self.registers.flags,
            bit_mask(self.registers.overflow_flag),
        );
    }
}

/// A delay started with [`DelayTimer::start`]
///
/// Dropping it before completion stops the counter.
pub struct PendingDelay<'a, R: Registers, E: PrescalerEncoding> {
    timer: &'a DelayTimer<E>,
    regs: &'a mut R,
    calibration: Calibration,
    remaining: u64,
}

impl<R: Registers, E: PrescalerEncoding> PendingDelay<'_, R, E> {
    /// Check for completion without blocking
    ///
    /// Consumes at most one overflow per call.
    pub fn poll(&mut self) -> nb::Result<(), Infallible> {
        if self.remaining == 0 {
            return Ok(());
        }
        if !self.timer.overflowed(self.regs) {
            return Err(nb::Error::WouldBlock);
        }

        self.timer.restart_cycle(self.regs, self.calibration);
        self.remaining -= 1;

        if self.remaining == 0 {
            self.timer.stop(self.regs);
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Overflows still to wait for
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Calibration the delay runs with
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Spin until the delay completes
    pub fn wait(mut self) {
        match nb::block!(self.poll()) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
}

impl<R: Registers, E: PrescalerEncoding> Drop for PendingDelay<'_, R, E> {
    fn drop(&mut self) {
        self.timer.stop(self.regs);
    }
}

/// A [`DelayTimer`] bound to a register handle
///
/// Implements [`DelayNs`] with tick budgets computed exactly from integer
/// durations.
pub struct BoundDelay<'a, R, E> {
    timer: &'a DelayTimer<E>,
    regs: &'a mut R,
}

impl<R: Registers, E: PrescalerEncoding> BoundDelay<'_, R, E> {
    fn delay_nanos(&mut self, delay_ns: u64) {
        let calibration = Calibration::for_nanos(&self.timer.config, delay_ns);
        self.timer.prime(self.regs, calibration);
        self.timer.run(self.regs, calibration);
    }
}

impl<R: Registers, E: PrescalerEncoding> DelayNs for BoundDelay<'_, R, E> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_nanos(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_nanos(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_nanos(ms as u64 * 1_000_000);
    }
}
