//! In-memory register file
//!
//! A plain byte array standing in for the data address space, so drivers
//! can be exercised on the host. Registers behave like ordinary memory:
//! no write-one-to-clear flags and no free-running counters. Tests that
//! need those wrap a `RegisterImage` and add the behaviour they model.

use crate::register::{Register, Registers};

/// 256-byte register image covering the whole 8-bit address range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterImage {
    bytes: [u8; 256],
    writes: u32,
}

impl Default for RegisterImage {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterImage {
    /// Create an image with every register cleared
    pub const fn new() -> Self {
        Self {
            bytes: [0; 256],
            writes: 0,
        }
    }

    /// Inspect a register without going through [`Registers`]
    pub fn peek(&self, reg: Register) -> u8 {
        self.bytes[reg.address() as usize]
    }

    /// Preset a register without counting it as a driver write
    pub fn poke(&mut self, reg: Register, value: u8) {
        self.bytes[reg.address() as usize] = value;
    }

    /// Number of writes issued through [`Registers`]
    pub fn write_count(&self) -> u32 {
        self.writes
    }
}

impl Registers for RegisterImage {
    fn read(&mut self, reg: Register) -> u8 {
        self.peek(reg)
    }

    fn write(&mut self, reg: Register, value: u8) {
        self.writes = self.writes.wrapping_add(1);
        self.bytes[reg.address() as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_starts_cleared() {
        let image = RegisterImage::new();
        assert_eq!(image.peek(Register::new(0x00)), 0);
        assert_eq!(image.peek(Register::new(0xFF)), 0);
        assert_eq!(image.write_count(), 0);
    }

    #[test]
    fn test_poke_does_not_count_as_write() {
        let mut image = RegisterImage::new();
        let reg = Register::new(0x52);

        image.poke(reg, 0x42);
        assert_eq!(image.write_count(), 0);
        assert_eq!(image.read(reg), 0x42);

        image.write(reg, 0x43);
        assert_eq!(image.write_count(), 1);
        assert_eq!(image.peek(reg), 0x43);
    }
}
