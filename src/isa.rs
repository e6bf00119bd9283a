//! The instruction set shared by the assembler and the emulator.
//!
//! Both sides look up opcodes and register codes here and nowhere else, so the bytes written by
//! the assembler are exactly the bytes the CPU decodes.

pub mod addressing_mode;
pub mod instruction;
pub mod mnemonic;
pub mod opcode;
pub mod register;

pub use addressing_mode::{AddressingMode, OperandType};
pub use instruction::{Instruction, Operand};
pub use mnemonic::Mnemonic;
pub use opcode::{Opcode, OPCODE_MAPPING};
pub use register::{Register, GENERAL_PURPOSE, REGISTER_COUNT, REGISTER_STRIDE};
