//! 8-bit timer register layout and prescaler encodings
//!
//! The delay engine only needs four things from a timer: a control
//! register with a 3-bit clock-select field in bits 2:0, a free-running
//! 8-bit counter, and a status register holding an overflow flag that is
//! cleared by writing a one to it. How prescaler modes map onto the
//! clock-select field differs between chip families, so the mapping is a
//! [`PrescalerEncoding`] supplied by the chip HAL.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Register;

/// Number of counts between overflows of an 8-bit counter
pub const COUNTER_WIDTH: u16 = 256;

/// Mask of the clock-select field in the control register
pub const CLOCK_SELECT_MASK: u8 = 0b0000_0111;

/// Registers of one overflow-counting timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerRegisters {
    /// Control register; clock select lives in bits 2:0
    pub control: Register,
    /// Counter register
    pub counter: Register,
    /// Interrupt flag register
    pub flags: Register,
    /// Bit of the overflow flag in `flags`
    pub overflow_flag: u8,
    /// Control bits that must be cleared for plain counting (waveform
    /// generation and compare output)
    pub normal_mode_mask: u8,
}

/// Clock source feeding the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PrescalerMode {
    /// No clock source, counter stopped
    Off,
    /// CPU clock
    Div1,
    /// CPU clock / 8
    Div8,
    /// CPU clock / 64
    Div64,
    /// CPU clock / 256
    Div256,
    /// CPU clock / 1024
    Div1024,
    /// External clock on the T0 pin, falling edge
    ExternalFalling,
    /// External clock on the T0 pin, rising edge
    ExternalRising,
}

impl PrescalerMode {
    /// Every mode, in table order
    pub const ALL: [PrescalerMode; 8] = [
        PrescalerMode::Off,
        PrescalerMode::Div1,
        PrescalerMode::Div8,
        PrescalerMode::Div64,
        PrescalerMode::Div256,
        PrescalerMode::Div1024,
        PrescalerMode::ExternalFalling,
        PrescalerMode::ExternalRising,
    ];

    /// CPU clock divisor, for modes clocked from the CPU
    pub const fn divisor(self) -> Option<u16> {
        match self {
            PrescalerMode::Div1 => Some(1),
            PrescalerMode::Div8 => Some(8),
            PrescalerMode::Div64 => Some(64),
            PrescalerMode::Div256 => Some(256),
            PrescalerMode::Div1024 => Some(1024),
            PrescalerMode::Off
            | PrescalerMode::ExternalFalling
            | PrescalerMode::ExternalRising => None,
        }
    }

    /// Mode for a raw divisor selector
    ///
    /// `0` means off; `1`, `8`, `64`, `256` and `1024` select the matching
    /// CPU divisor. Anything else is unrecognized.
    pub const fn from_divisor(divisor: u16) -> Option<Self> {
        match divisor {
            0 => Some(PrescalerMode::Off),
            1 => Some(PrescalerMode::Div1),
            8 => Some(PrescalerMode::Div8),
            64 => Some(PrescalerMode::Div64),
            256 => Some(PrescalerMode::Div256),
            1024 => Some(PrescalerMode::Div1024),
            _ => None,
        }
    }

    /// Position of the mode in [`PrescalerMode::ALL`]
    pub const fn index(self) -> usize {
        match self {
            PrescalerMode::Off => 0,
            PrescalerMode::Div1 => 1,
            PrescalerMode::Div8 => 2,
            PrescalerMode::Div64 => 3,
            PrescalerMode::Div256 => 4,
            PrescalerMode::Div1024 => 5,
            PrescalerMode::ExternalFalling => 6,
            PrescalerMode::ExternalRising => 7,
        }
    }
}

/// Mapping from prescaler mode to clock-select field value
///
/// Implementations must be total and injective: every mode gets its own
/// field value in 0..=7.
pub trait PrescalerEncoding {
    /// Clock-select field value for `mode`
    fn field(&self, mode: PrescalerMode) -> u8;

    /// Mode selected by a clock-select field value, if any
    fn mode(&self, field: u8) -> Option<PrescalerMode> {
        PrescalerMode::ALL
            .iter()
            .copied()
            .find(|&mode| self.field(mode) == field & CLOCK_SELECT_MASK)
    }
}

/// Why an encoding table was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodingError {
    /// Field value does not fit the 3-bit clock-select field
    FieldOutOfRange(PrescalerMode),
    /// Two modes share one field value
    Duplicate(PrescalerMode, PrescalerMode),
}

/// Encoding backed by a lookup table in [`PrescalerMode::ALL`] order
///
/// Used for chip families whose clock-select layout is only known from
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TableEncoding {
    fields: [u8; 8],
}

impl TableEncoding {
    /// Validate and wrap a table
    pub const fn new(fields: [u8; 8]) -> Result<Self, EncodingError> {
        let mut i = 0;
        while i < fields.len() {
            if fields[i] > CLOCK_SELECT_MASK {
                return Err(EncodingError::FieldOutOfRange(PrescalerMode::ALL[i]));
            }
            let mut j = i + 1;
            while j < fields.len() {
                if fields[i] == fields[j] {
                    return Err(EncodingError::Duplicate(
                        PrescalerMode::ALL[i],
                        PrescalerMode::ALL[j],
                    ));
                }
                j += 1;
            }
            i += 1;
        }
        Ok(Self { fields })
    }
}

impl PrescalerEncoding for TableEncoding {
    fn field(&self, mode: PrescalerMode) -> u8 {
        self.fields[mode.index()]
    }
}

impl<E: PrescalerEncoding + ?Sized> PrescalerEncoding for &E {
    fn field(&self, mode: PrescalerMode) -> u8 {
        (**self).field(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisor_roundtrip() {
        for mode in PrescalerMode::ALL {
            if let Some(divisor) = mode.divisor() {
                assert_eq!(PrescalerMode::from_divisor(divisor), Some(mode));
            }
        }
        assert_eq!(PrescalerMode::from_divisor(0), Some(PrescalerMode::Off));
        assert_eq!(PrescalerMode::from_divisor(11), None);
        assert_eq!(PrescalerMode::from_divisor(128), None);
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, mode) in PrescalerMode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }

    #[test]
    fn test_table_encoding_accepts_permutation() {
        let encoding = TableEncoding::new([0, 1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(encoding.field(PrescalerMode::Div256), 4);
        assert_eq!(encoding.mode(5), Some(PrescalerMode::Div1024));
        // Bits above the field are ignored when decoding
        assert_eq!(encoding.mode(0b1111_1011), Some(PrescalerMode::Div64));
    }

    #[test]
    fn test_table_encoding_rejects_duplicates() {
        // DIV1024 and EXT_RISING both on 0b111
        let result = TableEncoding::new([0, 1, 2, 3, 5, 7, 6, 7]);
        assert_eq!(
            result,
            Err(EncodingError::Duplicate(
                PrescalerMode::Div1024,
                PrescalerMode::ExternalRising
            ))
        );
    }

    #[test]
    fn test_table_encoding_rejects_wide_field() {
        let result = TableEncoding::new([0, 1, 2, 3, 4, 5, 6, 8]);
        assert_eq!(
            result,
            Err(EncodingError::FieldOutOfRange(PrescalerMode::ExternalRising))
        );
    }
}
