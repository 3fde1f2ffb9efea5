//! Pin strings
//!
//! Pins are written as port letter plus bit index, `PA0` through `PD7`. A
//! leading `!` marks the pin active-low.

use core::fmt::{self, Write};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tickwork_hal::PortId;

use super::ConfigError;
use crate::dio::Pin;

/// Longest pin string, `!PA0`, with room to spare
pub const MAX_PIN_STR_LEN: usize = 8;

/// Pin assignment with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        try_from = "heapless::String<MAX_PIN_STR_LEN>",
        into = "heapless::String<MAX_PIN_STR_LEN>"
    )
)]
pub struct PinConfig {
    /// Pin location
    pub pin: Pin,
    /// Pin is active-low (inverted)
    pub active_low: bool,
}

impl PinConfig {
    /// Active-high pin
    pub const fn new(pin: Pin) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Active-low (inverted) pin
    pub const fn inverted(pin: Pin) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Parse a pin string such as `"PB3"` or `"!PD2"`
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();

        let (s, active_low) = match s.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let rest = s.strip_prefix('P').ok_or(ConfigError::InvalidPinSyntax)?;
        let mut chars = rest.chars();
        let port = chars.next().ok_or(ConfigError::InvalidPinSyntax)?;
        let digits = chars.as_str();
        // `u8::from_str` would also take "+1" and "01"
        let canonical = !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && (digits == "0" || !digits.starts_with('0'));
        if !canonical {
            return Err(ConfigError::InvalidPinSyntax);
        }
        let index: u8 = digits.parse().map_err(|_| ConfigError::InvalidPinSyntax)?;

        let port = PortId::try_from(port).map_err(crate::dio::DioError::from)?;
        let pin = Pin::new(port, index)?;

        Ok(Self { pin, active_low })
    }
}

impl fmt::Display for PinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.active_low {
            f.write_char('!')?;
        }
        write!(f, "{}", self.pin)
    }
}

impl TryFrom<&str> for PinConfig {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<heapless::String<MAX_PIN_STR_LEN>> for PinConfig {
    type Error = ConfigError;

    fn try_from(value: heapless::String<MAX_PIN_STR_LEN>) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PinConfig> for heapless::String<MAX_PIN_STR_LEN> {
    fn from(config: PinConfig) -> Self {
        let mut s = heapless::String::new();
        // At most four characters
        let _ = write!(s, "{}", config);
        s
    }
}
