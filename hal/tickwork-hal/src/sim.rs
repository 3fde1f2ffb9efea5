//! Simulated microcontroller
//!
//! Wraps a [`RegisterImage`] and models the register behaviour the port
//! and delay drivers depend on, so they can be exercised on the host:
//!
//! - **Ports**: reading an input register returns the output register for
//!   pins configured as outputs and the externally driven level for pins
//!   configured as inputs.
//! - **Timer**: while the clock-select field is not the stopped value,
//!   every read of the flag register runs the counter up to its next
//!   overflow and raises the overflow flag. The flag register is
//!   write-one-to-clear. Elapsed ticks are accumulated so tests can compare
//!   what a delay waited against what it was asked for.

use crate::image::RegisterImage;
use crate::port::{PortId, PortMap};
use crate::register::{bit_mask, Register, Registers};
use crate::timer::{TimerRegisters, CLOCK_SELECT_MASK, COUNTER_WIDTH};

#[derive(Debug, Clone, Copy)]
struct TimerModel {
    registers: TimerRegisters,
    stopped_field: u8,
}

/// Register image with ports and an overflow timer attached
#[derive(Debug, Clone)]
pub struct SimulatedMcu {
    image: RegisterImage,
    ports: Option<PortMap>,
    external: [u8; 4],
    timer: Option<TimerModel>,
    elapsed_ticks: u64,
    overflows: u32,
}

impl Default for SimulatedMcu {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedMcu {
    /// Plain register image with no peripherals modelled
    pub const fn new() -> Self {
        Self {
            image: RegisterImage::new(),
            ports: None,
            external: [0; 4],
            timer: None,
            elapsed_ticks: 0,
            overflows: 0,
        }
    }

    /// Model pin loopback for the ports in `ports`
    pub fn with_ports(mut self, ports: PortMap) -> Self {
        self.ports = Some(ports);
        self
    }

    /// Model an overflow timer
    ///
    /// `stopped_field` is the clock-select value that halts the counter.
    pub fn with_timer(mut self, timer: TimerRegisters, stopped_field: u8) -> Self {
        self.timer = Some(TimerModel {
            registers: timer,
            stopped_field: stopped_field & CLOCK_SELECT_MASK,
        });
        self
    }

    /// Drive an input pin from outside the chip
    pub fn drive_input(&mut self, port: PortId, pin: u8, high: bool) {
        let external = &mut self.external[port.index()];
        if high {
            *external |= bit_mask(pin);
        } else {
            *external &= !bit_mask(pin);
        }
    }

    /// Check whether the timer is being clocked
    pub fn is_timer_running(&self) -> bool {
        match self.timer {
            Some(model) => {
                self.image.peek(model.registers.control) & CLOCK_SELECT_MASK
                    != model.stopped_field
            }
            None => false,
        }
    }

    /// Ticks counted while the timer was running
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Overflow events raised
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Underlying register image
    pub fn image(&self) -> &RegisterImage {
        &self.image
    }

    /// Underlying register image, for presetting registers
    pub fn image_mut(&mut self) -> &mut RegisterImage {
        &mut self.image
    }

    fn run_to_overflow(&mut self, model: TimerModel) {
        let flag = bit_mask(model.registers.overflow_flag);
        let flags = self.image.peek(model.registers.flags);
        if flags & flag != 0 || !self.is_timer_running() {
            return;
        }

        let start = self.image.peek(model.registers.counter) as u64;
        self.elapsed_ticks += COUNTER_WIDTH as u64 - start;
        self.overflows += 1;
        self.image.poke(model.registers.counter, 0);
        self.image.poke(model.registers.flags, flags | flag);
    }

    fn pin_levels(&self, reg: Register) -> Option<u8> {
        let (id, port) = self.ports?.iter().find(|(_, port)| port.input == reg)?;
        let direction = self.image.peek(port.direction);
        let output = self.image.peek(port.output);
        Some((output & direction) | (self.external[id.index()] & !direction))
    }
}

impl Registers for SimulatedMcu {
    fn read(&mut self, reg: Register) -> u8 {
        if let Some(model) = self.timer {
            if reg == model.registers.flags {
                self.run_to_overflow(model);
            }
        }
        match self.pin_levels(reg) {
            Some(levels) => levels,
            None => self.image.read(reg),
        }
    }

    fn write(&mut self, reg: Register, value: u8) {
        match self.timer {
            Some(model) if reg == model.registers.flags => {
                let current = self.image.peek(reg);
                self.image.write(reg, current & !value);
            }
            _ => self.image.write(reg, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Port;

    const TIMER: TimerRegisters = TimerRegisters {
        control: Register::new(0x53),
        counter: Register::new(0x52),
        flags: Register::new(0x58),
        overflow_flag: 0,
        normal_mode_mask: 0b0111_1000,
    };

    const PORT_B: Port = Port {
        input: Register::new(0x36),
        direction: Register::new(0x37),
        output: Register::new(0x38),
    };

    fn ports() -> PortMap {
        PortMap::new([None, Some(PORT_B), None, None])
    }

    #[test]
    fn test_stopped_timer_never_overflows() {
        let mut mcu = SimulatedMcu::new().with_timer(TIMER, 0);
        for _ in 0..10 {
            assert!(!mcu.read_bit(TIMER.flags, 0));
        }
        assert_eq!(mcu.elapsed_ticks(), 0);
    }

    #[test]
    fn test_running_timer_counts_from_counter_value() {
        let mut mcu = SimulatedMcu::new().with_timer(TIMER, 0);
        mcu.write(TIMER.counter, 200);
        mcu.write(TIMER.control, 0b011);
        assert!(mcu.is_timer_running());

        assert!(mcu.read_bit(TIMER.flags, 0));
        assert_eq!(mcu.elapsed_ticks(), 56);
        assert_eq!(mcu.image().peek(TIMER.counter), 0);

        // Flag stays raised until cleared
        assert!(mcu.read_bit(TIMER.flags, 0));
        assert_eq!(mcu.overflows(), 1);
    }

    #[test]
    fn test_flag_register_is_write_one_to_clear() {
        let mut mcu = SimulatedMcu::new().with_timer(TIMER, 0);
        mcu.image_mut().poke(TIMER.flags, 0b0000_0011);

        mcu.write(TIMER.flags, 0b0000_0001);
        assert_eq!(mcu.image().peek(TIMER.flags), 0b0000_0010);

        mcu.write(TIMER.flags, 0);
        assert_eq!(mcu.image().peek(TIMER.flags), 0b0000_0010);
    }

    #[test]
    fn test_output_pins_loop_back() {
        let mut mcu = SimulatedMcu::new().with_ports(ports());
        mcu.write(PORT_B.direction, 0b0000_1111);
        mcu.write(PORT_B.output, 0b1010_0101);

        // Only the output half reflects the data register
        assert_eq!(mcu.read(PORT_B.input), 0b0000_0101);
    }

    #[test]
    fn test_input_pins_follow_external_drive() {
        let mut mcu = SimulatedMcu::new().with_ports(ports());
        mcu.drive_input(PortId::B, 6, true);
        assert!(mcu.read_bit(PORT_B.input, 6));

        // Driving an output pin externally has no effect
        mcu.write(PORT_B.direction, 0b0100_0000);
        assert!(!mcu.read_bit(PORT_B.input, 6));

        mcu.write(PORT_B.direction, 0);
        mcu.drive_input(PortId::B, 6, false);
        assert!(!mcu.read_bit(PORT_B.input, 6));
    }
}
