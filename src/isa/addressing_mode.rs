/// Kind of a single encoded operand.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum OperandType {
    /// `$hhhh`, a 16-bit immediate value.
    Literal,
    /// `r1`, a register code stored in a single byte.
    Register,
    /// `#hhhh`, an absolute 16-bit memory address.
    Address,
}

impl OperandType {
    /// Width of the operand in the instruction stream, in bytes.
    pub const fn width(&self) -> usize {
        match self {
            OperandType::Literal | OperandType::Address => 2,
            OperandType::Register => 1,
        }
    }
}

/// Addressing mode of an instruction.
///
/// This is the shape of the operand list, i.e. which kinds of operands follow the opcode and in
/// which order they are encoded.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum AddressingMode {
    /// No operands
    Implied,
    /// `$lit`
    Literal,
    /// `reg`
    Register,
    /// `$lit, reg`
    LiteralRegister,
    /// `$lit, #addr`
    LiteralMemory,
    /// `reg, reg`
    RegisterRegister,
    /// `reg, #addr`
    RegisterMemory,
    /// `#addr, reg`
    MemoryRegister,
}

impl AddressingMode {
    /// The operands of the addressing mode in encoding order.
    pub const fn operands(&self) -> &'static [OperandType] {
        use OperandType::*;
        match self {
            AddressingMode::Implied => &[],
            AddressingMode::Literal => &[Literal],
            AddressingMode::Register => &[Register],
            AddressingMode::LiteralRegister => &[Literal, Register],
            AddressingMode::LiteralMemory => &[Literal, Address],
            AddressingMode::RegisterRegister => &[Register, Register],
            AddressingMode::RegisterMemory => &[Register, Address],
            AddressingMode::MemoryRegister => &[Address, Register],
        }
    }

    /// Find the addressing mode matching a list of operand kinds.
    pub fn from_operands(operands: &[OperandType]) -> Option<AddressingMode> {
        use OperandType::*;
        match operands {
            [] => Some(AddressingMode::Implied),
            [Literal] => Some(AddressingMode::Literal),
            [Register] => Some(AddressingMode::Register),
            [Literal, Register] => Some(AddressingMode::LiteralRegister),
            [Literal, Address] => Some(AddressingMode::LiteralMemory),
            [Register, Register] => Some(AddressingMode::RegisterRegister),
            [Register, Address] => Some(AddressingMode::RegisterMemory),
            [Address, Register] => Some(AddressingMode::MemoryRegister),
            _ => None,
        }
    }

    /// Total width of all operands in bytes.
    pub fn operand_size(&self) -> usize {
        self.operands().iter().map(OperandType::width).sum()
    }
}
