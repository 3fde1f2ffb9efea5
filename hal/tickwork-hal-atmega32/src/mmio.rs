//! Volatile register access
//!
//! [`Mmio`] is the one handle to the real register file. It is handed out
//! once by [`Mmio::take`], so the port and timer drivers can rely on
//! exclusive `&mut` access for the duration of an operation.
//!
//! Only the I/O registers below the stack pointer are reachable through
//! it: `0x20..0x5D`. Addresses outside that window (the CPU registers, SPL,
//! SPH, SREG and SRAM) read as zero and ignore writes, so a hand-made
//! [`Register`] cannot reach memory the program itself lives in.

use core::cell::Cell;
use core::ptr::{read_volatile, write_volatile};

use critical_section::Mutex;
use tickwork_hal::{Register, Registers};

static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// First data-space address of the I/O registers
pub const IO_START: u8 = 0x20;

/// End of the reachable I/O window; SPL, SPH and SREG start here
pub const IO_END: u8 = 0x5D;

/// Check whether `reg` lies in the window [`Mmio`] gives access to
pub const fn is_accessible(reg: Register) -> bool {
    reg.address() >= IO_START && reg.address() < IO_END
}

/// Handle to the memory-mapped register file
///
/// Read-modify-write helpers run inside a critical section, so an
/// interrupt handler touching another bit of the same register cannot
/// lose its update between the read and the write.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Take the register handle
    ///
    /// Returns `None` on every call after the first.
    pub fn take() -> Option<Self> {
        critical_section::with(|cs| {
            let taken = TAKEN.borrow(cs);
            if taken.get() {
                None
            } else {
                taken.set(true);
                Some(Self { _private: () })
            }
        })
    }

    /// Create a handle without checking ownership
    ///
    /// # Safety
    ///
    /// The caller must make sure no other handle is used while this one is
    /// alive, in particular not from interrupt context while a timer delay
    /// is running.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl Registers for Mmio {
    #[inline(always)]
    fn read(&mut self, reg: Register) -> u8 {
        if !is_accessible(reg) {
            return 0;
        }
        // SAFETY: the address was checked to be a memory-mapped I/O
        // register, which is always valid for a byte read and is not
        // memory the compiler owns.
        unsafe { read_volatile(reg.address() as usize as *const u8) }
    }

    #[inline(always)]
    fn write(&mut self, reg: Register, value: u8) {
        if !is_accessible(reg) {
            return;
        }
        // SAFETY: as in `read`. The window stops short of the stack pointer
        // and status register, so no write can move the stack or re-enable
        // interrupts inside a critical section.
        unsafe { write_volatile(reg.address() as usize as *mut u8, value) }
    }

    fn modify<F>(&mut self, reg: Register, f: F)
    where
        F: FnOnce(u8) -> u8,
    {
        critical_section::with(|_| {
            let value = self.read(reg);
            self.write(reg, f(value));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::map::{reg, PORTS, TIMER0};

    #[test]
    fn test_chip_map_is_accessible() {
        for (_, port) in PORTS.iter() {
            assert!(is_accessible(port.direction));
            assert!(is_accessible(port.output));
            assert!(is_accessible(port.input));
        }
        for reg in [TIMER0.control, TIMER0.counter, TIMER0.flags] {
            assert!(is_accessible(reg));
        }
        assert!(is_accessible(reg::TIMSK));
        assert!(is_accessible(reg::OCR0));
    }

    #[test]
    fn test_window_excludes_cpu_state_and_sram() {
        // r0-r31, SPL, SPH, SREG, first SRAM byte, top of the address range
        for address in [0x00, 0x1F, 0x5D, 0x5E, 0x5F, 0x60, 0x70, 0xFF] {
            assert!(!is_accessible(Register::new(address)), "{:#04x}", address);
        }
        assert!(is_accessible(Register::new(IO_START)));
        assert!(is_accessible(Register::new(IO_END - 1)));
    }

    #[test]
    fn test_out_of_window_access_is_ignored() {
        // Never dereferenced: every address here is rejected first
        let mut mmio = unsafe { Mmio::steal() };
        for address in [0x00, 0x5E, 0x70, 0xFF] {
            let reg = Register::new(address);
            mmio.write(reg, 0xA5);
            mmio.set_bit(reg, 3);
            assert_eq!(mmio.read(reg), 0);
            assert!(!mmio.read_bit(reg, 3));
        }
    }

    #[test]
    fn test_take_only_once() {
        let first = Mmio::take();
        assert!(first.is_some());
        assert!(Mmio::take().is_none());
        assert!(Mmio::take().is_none());
    }
}
