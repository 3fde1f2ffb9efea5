//! Digital I/O port abstraction
//!
//! Maps a (pin, port) pair onto the right register and bit. Every operation
//! goes through the same lookup in the chip's [`PortMap`], so a port is
//! either usable by all four operations or rejected by all four.

use core::fmt;

use tickwork_hal::{InvalidPortId, Port, PortId, PortMap, Registers, PORT_WIDTH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Direction bit cleared
    Input,
    /// Direction bit set
    Output,
}

impl TryFrom<u8> for Direction {
    type Error = DioError;

    /// `0` is input, `1` is output
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Input),
            1 => Ok(Direction::Output),
            _ => Err(DioError::UnknownDirection(value)),
        }
    }
}

/// Logic level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Check if the level is high
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// Check if the level is low
    pub const fn is_low(self) -> bool {
        !self.is_high()
    }

    /// The other level
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = DioError;

    /// `0` is low, `1` is high
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Level::Low),
            1 => Ok(Level::High),
            _ => Err(DioError::UnknownLevel(value)),
        }
    }
}

/// Errors from port operations
///
/// A failed operation leaves every register untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DioError {
    /// Raw port identifier outside A-D
    UnknownPort(u8),
    /// Port identifier the chip does not implement
    PortNotPresent(PortId),
    /// Pin index at or beyond the port width
    PinOutOfRange(u8),
    /// Raw direction value that is neither input nor output
    UnknownDirection(u8),
    /// Raw level value that is neither low nor high
    UnknownLevel(u8),
}

impl From<InvalidPortId> for DioError {
    fn from(err: InvalidPortId) -> Self {
        DioError::UnknownPort(err.0)
    }
}

/// A validated pin location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    port: PortId,
    index: u8,
}

impl Pin {
    /// Create a pin, rejecting indices beyond the port width
    pub const fn new(port: PortId, index: u8) -> Result<Self, DioError> {
        if index < PORT_WIDTH {
            Ok(Self { port, index })
        } else {
            Err(DioError::PinOutOfRange(index))
        }
    }

    /// Port the pin belongs to
    pub const fn port(self) -> PortId {
        self.port
    }

    /// Bit index within the port
    pub const fn index(self) -> u8 {
        self.index
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.index)
    }
}

/// Port driver
///
/// Holds the chip's port table; register access comes in per call.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dio {
    ports: PortMap,
}

impl Dio {
    /// Create a driver for the ports in `ports`
    pub const fn new(ports: PortMap) -> Self {
        Self { ports }
    }

    /// The port table this driver dispatches through
    pub const fn ports(&self) -> &PortMap {
        &self.ports
    }

    /// Set a pin's direction
    pub fn init<R: Registers>(
        &self,
        regs: &mut R,
        pin: u8,
        port: PortId,
        direction: Direction,
    ) -> Result<(), DioError> {
        let registers = self.locate(pin, port)?;
        match direction {
            Direction::Output => regs.set_bit(registers.direction, pin),
            Direction::Input => regs.clear_bit(registers.direction, pin),
        }
        Ok(())
    }

    /// Drive a pin's output latch
    pub fn write<R: Registers>(
        &self,
        regs: &mut R,
        pin: u8,
        port: PortId,
        level: Level,
    ) -> Result<(), DioError> {
        let registers = self.locate(pin, port)?;
        match level {
            Level::High => regs.set_bit(registers.output, pin),
            Level::Low => regs.clear_bit(registers.output, pin),
        }
        Ok(())
    }

    /// Flip a pin's output latch
    pub fn toggle<R: Registers>(&self, regs: &mut R, pin: u8, port: PortId) -> Result<(), DioError> {
        let registers = self.locate(pin, port)?;
        regs.toggle_bit(registers.output, pin);
        Ok(())
    }

    /// Sample a pin's input level
    pub fn read<R: Registers>(&self, regs: &mut R, pin: u8, port: PortId) -> Result<Level, DioError> {
        let registers = self.locate(pin, port)?;
        Ok(Level::from(regs.read_bit(registers.input, pin)))
    }

    /// Resolve a pin to its port registers
    ///
    /// The only dispatch point for all port operations.
    fn locate(&self, pin: u8, port: PortId) -> Result<Port, DioError> {
        let result = match self.ports.get(port) {
            Some(_) if pin >= PORT_WIDTH => Err(DioError::PinOutOfRange(pin)),
            Some(registers) => Ok(registers),
            None => Err(DioError::PortNotPresent(port)),
        };

        #[cfg(feature = "defmt")]
        if let Err(e) = result {
            defmt::warn!("dio: P{}{} rejected: {}", port.letter(), pin, e);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tickwork_hal::{RegisterImage, SimulatedMcu};
    use tickwork_hal_atmega32::map::reg;
    use tickwork_hal_atmega32::PORTS;

    fn board() -> SimulatedMcu {
        SimulatedMcu::new().with_ports(PORTS)
    }

    #[test]
    fn test_init_sets_and_clears_direction_bit() {
        let dio = Dio::new(PORTS);
        let mut regs = RegisterImage::new();

        dio.init(&mut regs, 3, PortId::A, Direction::Output).unwrap();
        assert_eq!(regs.peek(reg::DDRA), 0b0000_1000);

        dio.init(&mut regs, 5, PortId::A, Direction::Output).unwrap();
        dio.init(&mut regs, 3, PortId::A, Direction::Input).unwrap();
        assert_eq!(regs.peek(reg::DDRA), 0b0010_0000);
    }

    #[test]
    fn test_write_targets_only_data_register() {
        let dio = Dio::new(PORTS);
        let mut regs = RegisterImage::new();

        dio.write(&mut regs, 7, PortId::C, Level::High).unwrap();
        assert_eq!(regs.peek(reg::PORTC), 0b1000_0000);
        assert_eq!(regs.peek(reg::DDRC), 0);
        assert_eq!(regs.peek(reg::PINC), 0);

        dio.write(&mut regs, 7, PortId::C, Level::Low).unwrap();
        assert_eq!(regs.peek(reg::PORTC), 0);
    }

    #[test]
    fn test_read_uses_input_register() {
        let dio = Dio::new(PORTS);
        let mut regs = RegisterImage::new();
        regs.poke(reg::PIND, 0b0000_0100);
        regs.poke(reg::PORTD, 0b0000_0000);

        assert_eq!(dio.read(&mut regs, 2, PortId::D), Ok(Level::High));
        assert_eq!(dio.read(&mut regs, 3, PortId::D), Ok(Level::Low));
    }

    #[test]
    fn test_write_read_roundtrip_all_ports() {
        let dio = Dio::new(PORTS);
        let mut mcu = board();

        for port in PortId::ALL {
            for pin in 0..PORT_WIDTH {
                dio.init(&mut mcu, pin, port, Direction::Output).unwrap();
                dio.write(&mut mcu, pin, port, Level::High).unwrap();
                assert_eq!(dio.read(&mut mcu, pin, port), Ok(Level::High));
                dio.write(&mut mcu, pin, port, Level::Low).unwrap();
                assert_eq!(dio.read(&mut mcu, pin, port), Ok(Level::Low));
            }
        }
    }

    #[test]
    fn test_input_pin_reads_external_level() {
        let dio = Dio::new(PORTS);
        let mut mcu = board();

        dio.init(&mut mcu, 2, PortId::D, Direction::Input).unwrap();
        mcu.drive_input(PortId::D, 2, true);
        assert_eq!(dio.read(&mut mcu, 2, PortId::D), Ok(Level::High));
        mcu.drive_input(PortId::D, 2, false);
        assert_eq!(dio.read(&mut mcu, 2, PortId::D), Ok(Level::Low));
    }

    #[test]
    fn test_pin_out_of_range_touches_nothing() {
        let dio = Dio::new(PORTS);
        let mut regs = RegisterImage::new();

        assert_eq!(
            dio.init(&mut regs, 8, PortId::B, Direction::Output),
            Err(DioError::PinOutOfRange(8))
        );
        assert_eq!(
            dio.write(&mut regs, 9, PortId::B, Level::High),
            Err(DioError::PinOutOfRange(9))
        );
        assert_eq!(dio.toggle(&mut regs, 255, PortId::B), Err(DioError::PinOutOfRange(255)));
        assert_eq!(dio.read(&mut regs, 8, PortId::B), Err(DioError::PinOutOfRange(8)));
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn test_missing_port_rejected_by_every_operation() {
        // A chip without port A
        let ports = PortMap::new([
            None,
            PORTS.get(PortId::B),
            PORTS.get(PortId::C),
            PORTS.get(PortId::D),
        ]);
        let dio = Dio::new(ports);
        let mut regs = RegisterImage::new();
        let missing = Err(DioError::PortNotPresent(PortId::A));

        assert_eq!(dio.init(&mut regs, 0, PortId::A, Direction::Output), missing);
        assert_eq!(dio.write(&mut regs, 0, PortId::A, Level::High), missing);
        assert_eq!(dio.toggle(&mut regs, 0, PortId::A), missing);
        assert_eq!(dio.read(&mut regs, 0, PortId::A), Err(DioError::PortNotPresent(PortId::A)));
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn test_every_operation_supports_same_ports() {
        let maps = [
            PORTS,
            PortMap::new([None, PORTS.get(PortId::B), None, PORTS.get(PortId::D)]),
            PortMap::new([None; 4]),
        ];

        for map in maps {
            let dio = Dio::new(map);
            let mut mcu = SimulatedMcu::new().with_ports(map);
            for port in PortId::ALL {
                let init = dio.init(&mut mcu, 1, port, Direction::Output).is_ok();
                let write = dio.write(&mut mcu, 1, port, Level::High).is_ok();
                let toggle = dio.toggle(&mut mcu, 1, port).is_ok();
                let read = dio.read(&mut mcu, 1, port).is_ok();

                assert_eq!(init, map.contains(port));
                assert_eq!([init, init, init], [write, toggle, read]);
            }
        }
    }

    #[test]
    fn test_raw_identifiers() {
        assert_eq!(PortId::try_from(b'E').map_err(DioError::from), Err(DioError::UnknownPort(b'E')));
        assert_eq!(Direction::try_from(1u8), Ok(Direction::Output));
        assert_eq!(Direction::try_from(2u8), Err(DioError::UnknownDirection(2)));
        assert_eq!(Level::try_from(0u8), Ok(Level::Low));
        assert_eq!(Level::try_from(7u8), Err(DioError::UnknownLevel(7)));
    }

    #[test]
    fn test_pin_validation_and_display() {
        let pin = Pin::new(PortId::D, 2).unwrap();
        assert_eq!(pin.port(), PortId::D);
        assert_eq!(pin.index(), 2);

        let mut buf = heapless::String::<8>::new();
        core::fmt::write(&mut buf, format_args!("{}", pin)).unwrap();
        assert_eq!(buf.as_str(), "PD2");

        assert_eq!(Pin::new(PortId::A, 8), Err(DioError::PinOutOfRange(8)));
    }

    #[test]
    fn test_level_helpers() {
        assert!(Level::High.is_high());
        assert!(Level::Low.is_low());
        assert_eq!(Level::High.inverted(), Level::Low);
        assert_eq!(Level::from(true), Level::High);
    }

    proptest! {
        #[test]
        fn prop_double_toggle_restores_level(
            port in 0usize..4,
            pin in 0u8..PORT_WIDTH,
            start_high in any::<bool>(),
            neighbours in any::<u8>(),
        ) {
            let port = PortId::ALL[port];
            let dio = Dio::new(PORTS);
            let mut mcu = board();
            let output = PORTS.get(port).unwrap().output;

            mcu.image_mut().poke(output, neighbours);
            dio.init(&mut mcu, pin, port, Direction::Output).unwrap();
            dio.write(&mut mcu, pin, port, Level::from(start_high)).unwrap();
            let before_latch = mcu.image().peek(output);
            let before = dio.read(&mut mcu, pin, port).unwrap();

            dio.toggle(&mut mcu, pin, port).unwrap();
            prop_assert_eq!(dio.read(&mut mcu, pin, port).unwrap(), before.inverted());

            dio.toggle(&mut mcu, pin, port).unwrap();
            prop_assert_eq!(dio.read(&mut mcu, pin, port).unwrap(), before);
            prop_assert_eq!(mcu.image().peek(output), before_latch);
        }

        #[test]
        fn prop_operations_leave_other_bits_alone(
            port in 0usize..4,
            pin in 0u8..PORT_WIDTH,
            initial in any::<u8>(),
        ) {
            let port = PortId::ALL[port];
            let dio = Dio::new(PORTS);
            let mut regs = RegisterImage::new();
            let registers = PORTS.get(port).unwrap();
            regs.poke(registers.direction, initial);
            regs.poke(registers.output, initial);

            dio.init(&mut regs, pin, port, Direction::Output).unwrap();
            dio.write(&mut regs, pin, port, Level::Low).unwrap();
            dio.toggle(&mut regs, pin, port).unwrap();

            let others = !(1u8 << pin);
            prop_assert_eq!(regs.peek(registers.direction) & others, initial & others);
            prop_assert_eq!(regs.peek(registers.output) & others, initial & others);
        }
    }
}
