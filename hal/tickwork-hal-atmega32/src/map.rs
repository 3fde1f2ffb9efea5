//! ATmega32 register map
//!
//! Addresses are data-space (memory-mapped) addresses, i.e. the I/O
//! address plus 0x20.

use tickwork_hal::{Port, PortMap, PrescalerEncoding, PrescalerMode, TimerRegisters};

/// Register addresses
pub mod reg {
    use tickwork_hal::Register;

    /// Port A input pins
    pub const PINA: Register = Register::new(0x39);
    /// Port A data direction
    pub const DDRA: Register = Register::new(0x3A);
    /// Port A data
    pub const PORTA: Register = Register::new(0x3B);

    /// Port B input pins
    pub const PINB: Register = Register::new(0x36);
    /// Port B data direction
    pub const DDRB: Register = Register::new(0x37);
    /// Port B data
    pub const PORTB: Register = Register::new(0x38);

    /// Port C input pins
    pub const PINC: Register = Register::new(0x33);
    /// Port C data direction
    pub const DDRC: Register = Register::new(0x34);
    /// Port C data
    pub const PORTC: Register = Register::new(0x35);

    /// Port D input pins
    pub const PIND: Register = Register::new(0x30);
    /// Port D data direction
    pub const DDRD: Register = Register::new(0x31);
    /// Port D data
    pub const PORTD: Register = Register::new(0x32);

    /// Timer/Counter0 counter
    pub const TCNT0: Register = Register::new(0x52);
    /// Timer/Counter0 control
    pub const TCCR0: Register = Register::new(0x53);
    /// Timer/Counter interrupt flags
    pub const TIFR: Register = Register::new(0x58);
    /// Timer/Counter interrupt mask
    pub const TIMSK: Register = Register::new(0x59);
    /// Timer/Counter0 output compare
    pub const OCR0: Register = Register::new(0x5C);
}

/// Bit positions
pub mod bits {
    /// TCCR0: force output compare
    pub const FOC0: u8 = 7;
    /// TCCR0: waveform generation mode bit 0
    pub const WGM00: u8 = 6;
    /// TCCR0: compare match output mode bit 1
    pub const COM01: u8 = 5;
    /// TCCR0: compare match output mode bit 0
    pub const COM00: u8 = 4;
    /// TCCR0: waveform generation mode bit 1
    pub const WGM01: u8 = 3;
    /// TCCR0: clock select bit 2
    pub const CS02: u8 = 2;
    /// TCCR0: clock select bit 1
    pub const CS01: u8 = 1;
    /// TCCR0: clock select bit 0
    pub const CS00: u8 = 0;

    /// TIFR: Timer/Counter0 overflow flag
    pub const TOV0: u8 = 0;
    /// TIFR: Timer/Counter0 output compare flag
    pub const OCF0: u8 = 1;
}

/// Ports A-D
pub const PORTS: PortMap = PortMap::new([
    Some(Port {
        direction: reg::DDRA,
        output: reg::PORTA,
        input: reg::PINA,
    }),
    Some(Port {
        direction: reg::DDRB,
        output: reg::PORTB,
        input: reg::PINB,
    }),
    Some(Port {
        direction: reg::DDRC,
        output: reg::PORTC,
        input: reg::PINC,
    }),
    Some(Port {
        direction: reg::DDRD,
        output: reg::PORTD,
        input: reg::PIND,
    }),
]);

/// Timer/Counter0
pub const TIMER0: TimerRegisters = TimerRegisters {
    control: reg::TCCR0,
    counter: reg::TCNT0,
    flags: reg::TIFR,
    overflow_flag: bits::TOV0,
    normal_mode_mask: (1 << bits::WGM00)
        | (1 << bits::COM01)
        | (1 << bits::COM00)
        | (1 << bits::WGM01),
};

/// Timer/Counter0 clock-select table (CS02:0)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Atmega32Prescaler;

impl PrescalerEncoding for Atmega32Prescaler {
    fn field(&self, mode: PrescalerMode) -> u8 {
        match mode {
            PrescalerMode::Off => 0b000,
            PrescalerMode::Div1 => 0b001,
            PrescalerMode::Div8 => 0b010,
            PrescalerMode::Div64 => 0b011,
            PrescalerMode::Div256 => 0b100,
            PrescalerMode::Div1024 => 0b101,
            PrescalerMode::ExternalFalling => 0b110,
            PrescalerMode::ExternalRising => 0b111,
        }
    }
}
