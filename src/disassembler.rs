use crate::isa::{Instruction, Opcode, Operand, OperandType, OPCODE_MAPPING};

/// Listing of disassembled programs.
pub mod listing;

fn decode_operand(input: &[u8], ix: usize, operand_type: OperandType) -> Option<Operand> {
    let byte = |ix: usize| input.get(ix).copied();
    let word = |ix: usize| Some(u16::from_be_bytes([byte(ix)?, byte(ix + 1)?]));

    match operand_type {
        OperandType::Literal => word(ix).map(Operand::Literal),
        OperandType::Register => byte(ix).map(Operand::Register),
        OperandType::Address => word(ix).map(Operand::Address),
    }
}

/// Decode the instruction at the start of `input`.
///
/// Returns `None` for opcodes the CPU halts on and for truncated instructions.
pub fn decode_instruction(input: &[u8]) -> Option<Instruction> {
    let opcode = Opcode::decode(*input.first()?)?;
    let (mnemonic, addr_mode) = OPCODE_MAPPING.find_instruction(opcode)?;

    let mut ix = 1;
    let mut operands = Vec::with_capacity(addr_mode.operands().len());
    for operand_type in addr_mode.operands() {
        operands.push(decode_operand(input, ix, *operand_type)?);
        ix += operand_type.width();
    }

    Some(Instruction::new(mnemonic, addr_mode, operands))
}

/// Disassemble a program into instructions and their offsets.
///
/// Stops at the first byte that does not start a valid instruction.
#[tracing::instrument(skip(input))]
pub fn disassemble_code(input: &[u8]) -> Vec<(usize, Instruction)> {
    let mut code = vec![];
    let mut curr_ix = 0;

    while curr_ix < input.len() {
        let Some(instruction) = decode_instruction(&input[curr_ix..]) else {
            break;
        };
        let size = instruction.size();
        code.push((curr_ix, instruction));
        curr_ix += size;
    }

    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{AddressingMode, Mnemonic, Register};

    use pretty_assertions::assert_eq;

    #[test]
    fn test_disassemble_code() {
        let input = vec![
            /* mov */ 0x10, 0x00, 0x01, 0x02, /* psh */ 0x18, 0x02,
            /* jne */ 0x15, 0x00, 0x05, 0x01, 0x00, /* ret */ 0x60,
        ];
        let expected = vec![
            (
                0,
                Instruction::new(
                    Mnemonic::MOV,
                    AddressingMode::LiteralRegister,
                    vec![Operand::Literal(0x0001), Operand::Register(Register::R1.code())],
                ),
            ),
            (
                4,
                Instruction::new(
                    Mnemonic::PSH,
                    AddressingMode::Register,
                    vec![Operand::Register(Register::R1.code())],
                ),
            ),
            (
                6,
                Instruction::new(
                    Mnemonic::JNE,
                    AddressingMode::LiteralMemory,
                    vec![Operand::Literal(0x0005), Operand::Address(0x0100)],
                ),
            ),
            (11, Instruction::new(Mnemonic::RET, AddressingMode::Implied, vec![])),
        ];

        assert_eq!(disassemble_code(&input), expected);
    }

    #[test]
    fn test_stops_at_invalid_code() {
        assert_eq!(disassemble_code(&[0x60, 0x00, 0x60]).len(), 1);
        // Truncated `mov $lit, reg`
        assert_eq!(decode_instruction(&[0x10, 0x00, 0x01]), None);
        assert_eq!(decode_instruction(&[]), None);
    }
}
