use std::fmt;

use super::{AddressingMode, Mnemonic, Register, REGISTER_COUNT};

/// An operand value of a decoded instruction.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum Operand {
    Literal(u16),
    /// Raw register code as found in the instruction stream.
    Register(u8),
    Address(u16),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "${:04X}", value),
            Operand::Register(code) => {
                match Register::from_repr(*code % REGISTER_COUNT as u8) {
                    Some(register) => write!(f, "{}", register),
                    None => write!(f, "?{:02X}", code),
                }
            }
            Operand::Address(address) => write!(f, "#{:04X}", address),
        }
    }
}

/// A decoded instruction together with its operand values.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub addr_mode: AddressingMode,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic, addr_mode: AddressingMode, operands: Vec<Operand>) -> Self {
        Self {
            mnemonic,
            addr_mode,
            operands,
        }
    }

    /// Size of instruction opcode + operands in bytes
    pub fn size(&self) -> usize {
        1 + self.addr_mode.operand_size()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        for (ix, operand) in self.operands.iter().enumerate() {
            let separator = if ix == 0 { " " } else { ", " };
            write!(f, "{}{}", separator, operand)?;
        }
        Ok(())
    }
}
