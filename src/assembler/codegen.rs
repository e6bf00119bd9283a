use std::str::FromStr;

use thiserror::Error;

use super::{
    lexer::{Lexer, SourcePosition, Token, TokenType},
    AssemblerError,
};
use crate::isa::{AddressingMode, Mnemonic, OperandType, Register, OPCODE_MAPPING};

/// Largest program that fits in the address space.
pub const MAX_PROGRAM_SIZE: usize = 0x10000;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum CompileError {
    #[error("Wrong type of parameters passed to {}", .0.to_string().to_uppercase())]
    WrongParameterTypes(Mnemonic),
    #[error("Unknown mnemonic '{0}' at {1}")]
    UnknownMnemonic(String, SourcePosition),
    #[error("Unknown register '{0}' at {1}")]
    UnknownRegister(String, SourcePosition),
    #[error("Invalid hex literal '{0}' at {1}, expected 1, 2 or 4 digits")]
    InvalidLiteral(String, SourcePosition),
    #[error("Unexpected token {0}")]
    UnexpectedToken(Token),
    #[error("Program too large: {0} bytes")]
    ProgramOverflow(usize),
}

/// Append-only byte buffer with an auto-incrementing write cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgramWriter {
    bytes: Vec<u8>,
}

impl ProgramWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the next byte to be written.
    pub fn cursor(&self) -> usize {
        self.bytes.len()
    }

    pub fn write(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Write a hex literal into a 16-bit operand slot, high byte first.
    ///
    /// Four digits are split into two bytes. One or two digits form a single byte which is
    /// preceded by a zero byte so the slot is always two bytes wide.
    pub fn write_hex(&mut self, token: &Token) -> Result<(), CompileError> {
        let digits = token.literal.as_str();
        let invalid = || CompileError::InvalidLiteral(digits.to_owned(), token.span.start);
        match digits.len() {
            4 => {
                let word = u16::from_str_radix(digits, 16).map_err(|_| invalid())?;
                let [high, low] = word.to_be_bytes();
                self.write(high);
                self.write(low);
            }
            1 | 2 => {
                let byte = u8::from_str_radix(digits, 16).map_err(|_| invalid())?;
                self.write(0x00);
                self.write(byte);
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }

    pub fn write_register(&mut self, token: &Token) -> Result<(), CompileError> {
        let register = Register::from_str(&token.literal).map_err(|_| {
            CompileError::UnknownRegister(token.literal.clone(), token.span.start)
        })?;
        self.write(register.code());
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn operand_type(token: &Token) -> Option<OperandType> {
    match token.token {
        TokenType::Hex => Some(OperandType::Literal),
        TokenType::Register => Some(OperandType::Register),
        TokenType::MemoryAddress => Some(OperandType::Address),
        TokenType::Instruction | TokenType::Eof => None,
    }
}

fn addressing_mode(operands: &[Token]) -> Option<AddressingMode> {
    let types = operands
        .iter()
        .map(operand_type)
        .collect::<Option<Vec<_>>>()?;
    AddressingMode::from_operands(&types)
}

/// Translates a token stream into machine code.
pub struct Encoder<'a, 'src> {
    lexer: &'a mut Lexer<'src>,
    writer: ProgramWriter,
}

impl<'a, 'src> Encoder<'a, 'src> {
    pub fn new(lexer: &'a mut Lexer<'src>) -> Self {
        Self {
            lexer,
            writer: ProgramWriter::new(),
        }
    }

    /// Bytes written so far.
    #[cfg(test)]
    fn written(&self) -> &[u8] {
        self.writer.bytes()
    }

    fn write_operands(
        &mut self,
        addr_mode: AddressingMode,
        operands: &[Token],
    ) -> Result<(), CompileError> {
        for (operand, operand_type) in operands.iter().zip(addr_mode.operands()) {
            match operand_type {
                OperandType::Literal | OperandType::Address => self.writer.write_hex(operand)?,
                OperandType::Register => self.writer.write_register(operand)?,
            }
        }
        Ok(())
    }

    /// Encode the operands following `mnemonic`.
    fn encode_instruction(&mut self, mnemonic: Mnemonic) -> Result<(), AssemblerError> {
        let start = self.writer.cursor();
        let mut operands = Vec::with_capacity(mnemonic.arity());
        for _ in 0..mnemonic.arity() {
            operands.push(self.lexer.next_token()?);
        }
        let addr_mode = addressing_mode(&operands);

        // `jne` only has a single form, and its opcode is emitted before the operands are checked.
        if mnemonic == Mnemonic::JNE {
            let jne = (Mnemonic::JNE, AddressingMode::LiteralMemory);
            if let Some(opcode) = OPCODE_MAPPING.find_opcode(jne) {
                self.writer.write(opcode.byte());
            }
        }

        let (addr_mode, opcode) = addr_mode
            .and_then(|addr_mode| {
                OPCODE_MAPPING
                    .find_opcode((mnemonic, addr_mode))
                    .map(|opcode| (addr_mode, opcode))
            })
            .ok_or(CompileError::WrongParameterTypes(mnemonic))?;

        if mnemonic != Mnemonic::JNE {
            self.writer.write(opcode.byte());
        }
        self.write_operands(addr_mode, &operands)?;

        tracing::debug!(
            "{:#06x}: {} {:?} -> {:02x?}",
            start,
            mnemonic,
            addr_mode,
            &self.writer.bytes()[start..]
        );

        Ok(())
    }

    /// Encode all remaining tokens.
    #[tracing::instrument(skip(self))]
    pub fn encode(&mut self) -> Result<(), AssemblerError> {
        while !self.lexer.is_eof()? {
            let token = self.lexer.next_token()?;
            match token.token {
                TokenType::Instruction => {
                    let mnemonic = Mnemonic::from_str(&token.literal).map_err(|_| {
                        CompileError::UnknownMnemonic(token.literal.clone(), token.span.start)
                    })?;
                    self.encode_instruction(mnemonic)?;
                }
                TokenType::Register => {
                    return Err(
                        CompileError::UnknownMnemonic(token.literal, token.span.start).into(),
                    )
                }
                _ => return Err(CompileError::UnexpectedToken(token).into()),
            }
        }

        if self.writer.cursor() > MAX_PROGRAM_SIZE {
            return Err(CompileError::ProgramOverflow(self.writer.cursor()).into());
        }

        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_bytes()
    }
}
