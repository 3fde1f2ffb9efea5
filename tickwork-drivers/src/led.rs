//! LED driver

use tickwork_core::config::PinConfig;
use tickwork_core::{Dio, DioError, Direction, Level};
use tickwork_hal::Registers;

/// One LED on an output pin
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Led {
    dio: Dio,
    config: PinConfig,
}

impl Led {
    /// Create an LED driver for `config`
    pub const fn new(dio: Dio, config: PinConfig) -> Self {
        Self { dio, config }
    }

    /// Pin the LED is wired to
    pub const fn config(&self) -> &PinConfig {
        &self.config
    }

    /// Make the pin an output, with the LED off
    pub fn init<R: Registers>(&self, regs: &mut R) -> Result<(), DioError> {
        self.off(regs)?;
        let pin = self.config.pin;
        self.dio.init(regs, pin.index(), pin.port(), Direction::Output)
    }

    /// Light the LED
    pub fn on<R: Registers>(&self, regs: &mut R) -> Result<(), DioError> {
        self.set(regs, true)
    }

    /// Turn the LED off
    pub fn off<R: Registers>(&self, regs: &mut R) -> Result<(), DioError> {
        self.set(regs, false)
    }

    /// Turn the LED on or off
    pub fn set<R: Registers>(&self, regs: &mut R, on: bool) -> Result<(), DioError> {
        let pin = self.config.pin;
        self.dio.write(regs, pin.index(), pin.port(), self.level_for(on))
    }

    /// Invert the LED
    pub fn toggle<R: Registers>(&self, regs: &mut R) -> Result<(), DioError> {
        let pin = self.config.pin;
        self.dio.toggle(regs, pin.index(), pin.port())
    }

    /// Check whether the LED is lit
    pub fn is_on<R: Registers>(&self, regs: &mut R) -> Result<bool, DioError> {
        let pin = self.config.pin;
        let level = self.dio.read(regs, pin.index(), pin.port())?;
        Ok(level == self.level_for(true))
    }

    fn level_for(&self, on: bool) -> Level {
        let level = Level::from(on);
        if self.config.active_low {
            level.inverted()
        } else {
            level
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickwork_core::Pin;
    use tickwork_hal::{PortId, SimulatedMcu};
    use tickwork_hal_atmega32::map::reg;
    use tickwork_hal_atmega32::PORTS;

    fn mcu() -> SimulatedMcu {
        SimulatedMcu::new().with_ports(PORTS)
    }

    fn led(config: &str) -> Led {
        Led::new(Dio::new(PORTS), PinConfig::parse(config).unwrap())
    }

    #[test]
    fn test_init_makes_dark_output() {
        let mut mcu = mcu();
        let led = led("PA3");

        led.init(&mut mcu).unwrap();

        assert_eq!(mcu.image().peek(reg::DDRA), 0b0000_1000);
        assert_eq!(mcu.image().peek(reg::PORTA), 0);
        assert!(!led.is_on(&mut mcu).unwrap());
    }

    #[test]
    fn test_on_off_toggle() {
        let mut mcu = mcu();
        let led = led("PB0");
        led.init(&mut mcu).unwrap();

        led.on(&mut mcu).unwrap();
        assert_eq!(mcu.image().peek(reg::PORTB), 0b0000_0001);
        assert!(led.is_on(&mut mcu).unwrap());

        led.toggle(&mut mcu).unwrap();
        assert!(!led.is_on(&mut mcu).unwrap());

        led.toggle(&mut mcu).unwrap();
        assert!(led.is_on(&mut mcu).unwrap());

        led.off(&mut mcu).unwrap();
        assert_eq!(mcu.image().peek(reg::PORTB), 0);
    }

    #[test]
    fn test_active_low_led() {
        let mut mcu = mcu();
        let led = led("!PC7");

        led.init(&mut mcu).unwrap();
        // Dark means driven high
        assert_eq!(mcu.image().peek(reg::PORTC), 0b1000_0000);
        assert!(!led.is_on(&mut mcu).unwrap());

        led.on(&mut mcu).unwrap();
        assert_eq!(mcu.image().peek(reg::PORTC), 0);
        assert!(led.is_on(&mut mcu).unwrap());
    }

    #[test]
    fn test_leds_share_a_port() {
        let mut mcu = mcu();
        let leds = [led("PA0"), led("PA1"), led("PA2")];
        for led in &leds {
            led.init(&mut mcu).unwrap();
        }

        leds[0].on(&mut mcu).unwrap();
        leds[2].on(&mut mcu).unwrap();
        assert_eq!(mcu.image().peek(reg::PORTA), 0b0000_0101);

        leds[0].off(&mut mcu).unwrap();
        assert_eq!(mcu.image().peek(reg::PORTA), 0b0000_0100);
    }

    #[test]
    fn test_missing_port_is_reported() {
        let mut mcu = SimulatedMcu::new();
        let ports = tickwork_hal::PortMap::new([PORTS.get(PortId::A), None, None, None]);
        let led = Led::new(
            Dio::new(ports),
            PinConfig::new(Pin::new(PortId::B, 1).unwrap()),
        );

        assert_eq!(
            led.init(&mut mcu),
            Err(DioError::PortNotPresent(PortId::B))
        );
        assert_eq!(mcu.image().write_count(), 0);
    }
}
