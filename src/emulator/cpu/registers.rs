use strum::IntoEnumIterator;

use crate::isa::{Register, REGISTER_COUNT, REGISTER_STRIDE};

const REGISTER_FILE_SIZE: usize = REGISTER_COUNT * REGISTER_STRIDE;

/// Dedicated storage for the named 16-bit registers, separate from main memory.
///
/// Each register lives at the fixed offset `code * REGISTER_STRIDE` and is stored high byte first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    data: [u8; REGISTER_FILE_SIZE],
}

impl Registers {
    /// Create a register file with the stack and frame pointers set to `stack_start` and every
    /// other register cleared.
    pub fn new(stack_start: u16) -> Self {
        let mut registers = Self {
            data: [0; REGISTER_FILE_SIZE],
        };
        registers.set(Register::Sp, stack_start);
        registers.set(Register::Fp, stack_start);
        registers
    }

    pub fn get(&self, register: Register) -> u16 {
        self.read_offset(register.offset())
    }

    pub fn set(&mut self, register: Register, value: u16) {
        self.write_offset(register.offset(), value);
    }

    /// Read the register at a byte offset produced by [`Register::offset`] or
    /// [`Register::clamped_offset`].
    pub(crate) fn read_offset(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.data[offset], self.data[offset + 1]])
    }

    pub(crate) fn write_offset(&mut self, offset: usize, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.data[offset] = high;
        self.data[offset + 1] = low;
    }

    /// All registers with their values, in register code order.
    pub fn iter(&self) -> impl Iterator<Item = (Register, u16)> + '_ {
        Register::iter().map(move |register| (register, self.get(register)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let registers = Registers::new(0xFFFE);
        for (register, value) in registers.iter() {
            match register {
                Register::Sp | Register::Fp => assert_eq!(value, 0xFFFE),
                _ => assert_eq!(value, 0),
            }
        }
    }

    #[test]
    fn test_registers_do_not_overlap() {
        let mut registers = Registers::new(0);
        for register in Register::iter() {
            registers.set(register, 0x1100 + register.code() as u16);
        }
        for register in Register::iter() {
            assert_eq!(registers.get(register), 0x1100 + register.code() as u16);
        }
    }

    #[test]
    fn test_offset_access() {
        let mut registers = Registers::new(0);
        registers.write_offset(Register::clamped_offset(2 + 12), 0xBEEF);
        assert_eq!(registers.get(Register::R1), 0xBEEF);
        assert_eq!(registers.read_offset(Register::Acc.offset()), 0);
    }
}
