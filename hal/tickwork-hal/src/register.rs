//! Register and bit access
//!
//! Every peripheral in this workspace is driven through 8-bit registers in
//! the data address space. The [`Registers`] trait is the single handle all
//! drivers take; chip HALs back it with volatile memory accesses and tests
//! back it with the in-memory `RegisterImage` behind the `sim` feature.

/// Address of an 8-bit register in the data address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register(u8);

impl Register {
    /// Create a register descriptor from its data-space address
    pub const fn new(address: u8) -> Self {
        Self(address)
    }

    /// Data-space address of the register
    pub const fn address(self) -> u8 {
        self.0
    }
}

/// Single-bit mask for `bit`
///
/// Bits outside 0..=7 yield an empty mask, so a bad index turns a bit
/// operation into a no-op instead of touching a neighbouring bit.
pub const fn bit_mask(bit: u8) -> u8 {
    if bit < 8 {
        1 << bit
    } else {
        0
    }
}

/// Access to a process-wide register file
///
/// Implementations only need [`read`](Registers::read) and
/// [`write`](Registers::write); the bit helpers are read-modify-write on
/// top of them and leave every other bit of the register untouched.
///
/// Reads take `&mut self` because status registers change under the
/// reader and simulated register files advance state on access.
pub trait Registers {
    /// Read the full register
    fn read(&mut self, reg: Register) -> u8;

    /// Overwrite the full register
    fn write(&mut self, reg: Register, value: u8);

    /// Read-modify-write the register
    ///
    /// Not atomic with respect to interrupts unless the implementation
    /// overrides it.
    fn modify<F>(&mut self, reg: Register, f: F)
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Set one bit
    fn set_bit(&mut self, reg: Register, bit: u8) {
        self.modify(reg, |v| v | bit_mask(bit));
    }

    /// Clear one bit
    fn clear_bit(&mut self, reg: Register, bit: u8) {
        self.modify(reg, |v| v & !bit_mask(bit));
    }

    /// Flip one bit
    fn toggle_bit(&mut self, reg: Register, bit: u8) {
        self.modify(reg, |v| v ^ bit_mask(bit));
    }

    /// Check whether one bit is set
    fn read_bit(&mut self, reg: Register, bit: u8) -> bool {
        self.read(reg) & bit_mask(bit) != 0
    }
}
