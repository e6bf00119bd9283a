use lazy_static::lazy_static;
use std::collections::HashMap;

use super::{AddressingMode, Mnemonic};

/// Numeric opcodes understood by the CPU.
///
/// Any byte that is not one of these values halts the CPU.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, strum_macros::EnumIter, strum_macros::FromRepr)]
#[repr(u8)]
pub enum Opcode {
    MovLitReg = 0x10,
    MovRegReg = 0x11,
    MovRegMem = 0x12,
    MovMemReg = 0x13,
    AddRegReg = 0x14,
    JmpNotEq = 0x15,
    PshLit = 0x17,
    PshReg = 0x18,
    Pop = 0x1A,
    MovLitMem = 0x1B,
    CalLit = 0x5E,
    CalReg = 0x5F,
    Ret = 0x60,
    Hlt = 0xFF,
}

impl Opcode {
    /// Decode an opcode byte.
    pub fn decode(byte: u8) -> Option<Opcode> {
        Opcode::from_repr(byte)
    }

    pub const fn byte(self) -> u8 {
        self as u8
    }
}

/// A mapper between instructions and opcodes.
#[derive(Debug)]
pub struct OpcodeMapping {
    forward_map: HashMap<(Mnemonic, AddressingMode), Opcode>,
    reverse_map: HashMap<Opcode, (Mnemonic, AddressingMode)>,
}

impl OpcodeMapping {
    /// Find the opcode corresponding to the given instruction.
    pub fn find_opcode(&self, instruction: (Mnemonic, AddressingMode)) -> Option<Opcode> {
        self.forward_map.get(&instruction).copied()
    }

    /// Find the instruction corresponding to the given opcode.
    pub fn find_instruction(&self, opcode: Opcode) -> Option<(Mnemonic, AddressingMode)> {
        self.reverse_map.get(&opcode).copied()
    }

    /// Size of the encoded instruction, opcode included.
    pub fn instruction_size(&self, opcode: Opcode) -> Option<usize> {
        self.find_instruction(opcode)
            .map(|(_, addr_mode)| 1 + addr_mode.operand_size())
    }

    fn new() -> Self {
        let mut forward_map = HashMap::new();
        let mut reverse_map = HashMap::new();

        let mappings = vec![
            (Mnemonic::MOV, AddressingMode::LiteralRegister, Opcode::MovLitReg),
            (Mnemonic::MOV, AddressingMode::LiteralMemory, Opcode::MovLitMem),
            (Mnemonic::MOV, AddressingMode::RegisterRegister, Opcode::MovRegReg),
            (Mnemonic::MOV, AddressingMode::RegisterMemory, Opcode::MovRegMem),
            (Mnemonic::MOV, AddressingMode::MemoryRegister, Opcode::MovMemReg),
            (Mnemonic::ADD, AddressingMode::RegisterRegister, Opcode::AddRegReg),
            (Mnemonic::JNE, AddressingMode::LiteralMemory, Opcode::JmpNotEq),
            (Mnemonic::PSH, AddressingMode::Literal, Opcode::PshLit),
            (Mnemonic::PSH, AddressingMode::Register, Opcode::PshReg),
            (Mnemonic::POP, AddressingMode::Register, Opcode::Pop),
            (Mnemonic::CAL, AddressingMode::Literal, Opcode::CalLit),
            (Mnemonic::CAL, AddressingMode::Register, Opcode::CalReg),
            (Mnemonic::RET, AddressingMode::Implied, Opcode::Ret),
            (Mnemonic::HLT, AddressingMode::Implied, Opcode::Hlt),
        ];

        for (mnemonic, addr_mode, opcode) in mappings {
            forward_map.insert((mnemonic, addr_mode), opcode);
            reverse_map.insert(opcode, (mnemonic, addr_mode));
        }

        Self {
            forward_map,
            reverse_map,
        }
    }
}

lazy_static! {
    pub static ref OPCODE_MAPPING: OpcodeMapping = OpcodeMapping::new();
}
