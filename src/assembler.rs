use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{
    disassembler::listing,
    emulator::memory::{Readable, Writeable},
    hexdump::hexdump,
};

/// Lexes code into tokens.
///
/// Converts a string into tokens. For example, the string `mov $0a, r1` would be converted into
/// the following tokens:
///
/// ```text
/// [
///     Token { token: TokenType::Instruction, literal: "mov", .. },
///     Token { token: TokenType::Hex, literal: "0a", .. },
///     Token { token: TokenType::Register, literal: "r1", .. },
///     Token { token: TokenType::Eof, literal: "", .. },
/// ]
/// ```
pub mod lexer;

/// Generates machine code from tokens.
pub mod codegen;

pub use codegen::CompileError;
pub use lexer::LexicalError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssemblerError {
    #[error("Lexical error: {0}")]
    Lexical(#[from] LexicalError),
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),
}

/// Utility function for generating machine code from an assembly program.
///
/// The returned bytes are meant to be placed at address `0x0000`.
#[tracing::instrument(skip(input))]
pub fn compile_code(input: &str) -> Result<Vec<u8>, AssemblerError> {
    let mut lexer = lexer::Lexer::new(input);
    let mut encoder = codegen::Encoder::new(&mut lexer);
    encoder.encode()?;
    let program = encoder.into_bytes();
    tracing::debug!("Assembled {} bytes", program.len());

    Ok(program)
}

/// Assemble a program and write it to `memory` starting at address `0x0000`.
///
/// Memory is only written once the whole program has been assembled, so a failing assembly
/// leaves it untouched. Returns the size of the program.
#[tracing::instrument(skip(input, memory))]
pub fn assemble_into<M>(input: &str, memory: &mut M) -> Result<usize, AssemblerError>
where
    M: Readable + Writeable,
{
    let program = compile_code(input)?;
    if program.len() > memory.size() {
        return Err(CompileError::ProgramOverflow(program.len()).into());
    }
    memory.load(0x0000, &program);

    Ok(program.len())
}

#[derive(Args, Debug)]
pub struct AssemblyArgs {
    #[clap(help = "Assembly source file")]
    pub input: PathBuf,
    #[clap(short, long, default_value = "a.bin")]
    #[clap(help = "Output binary file")]
    pub output: PathBuf,
    #[clap(long)]
    #[clap(help = "Print a hexdump of the assembled program")]
    pub hexdump: bool,
    #[clap(long)]
    #[clap(help = "Print a listing of the assembled program")]
    pub listing: bool,
}

/// Assemble the source file given in `args` into a binary file.
pub fn assemble(args: &AssemblyArgs) -> Result<()> {
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Unable to read file {}", args.input.display()))?;

    let bytes = compile_code(&source).with_context(|| "Compilation failed")?;

    if args.hexdump {
        println!("{}", hexdump(&bytes, 0x0000, 4, 16));
    }
    if args.listing {
        println!("{}", listing::generate(&bytes));
    }

    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Unable to write file {}", args.output.display()))?;
    eprintln!("Wrote {} bytes to {}", bytes.len(), args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::memory::Memory;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_assemble_into_memory() -> Result<(), AssemblerError> {
        let mut memory = Memory::new();
        let size = assemble_into("mov $1, r1\nmov r1, #0100", &mut memory)?;
        assert_eq!(size, 8);
        assert_eq!(
            &memory.data()[..size],
            &[0x10, 0x00, 0x01, 0x02, 0x12, 0x02, 0x01, 0x00]
        );
        Ok(())
    }

    #[test]
    fn test_failed_assembly_leaves_memory_untouched() {
        let tests = vec![
            "mov $1, r1\nfoo r1",
            "mov $1, r1\nmov r1 @ #0100",
            "mov $1, r1\njne r1, r2",
        ];
        for input in tests {
            let mut memory = Memory::new();
            assert!(assemble_into(input, &mut memory).is_err(), "{}", input);
            assert!(memory.data().iter().all(|byte| *byte == 0), "{}", input);
        }
    }

    #[test]
    fn test_program_must_fit_in_memory() {
        let mut memory = Memory::with_size(4).unwrap();
        assert_eq!(
            assemble_into("mov $1, r1\nhlt", &mut memory),
            Err(CompileError::ProgramOverflow(5).into())
        );
    }

    #[test]
    fn test_lexical_error_is_reported() {
        let error = compile_code("mov $1, r1 !").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Lexical error: Couldn't recognize character '!' at 1:12"
        );
    }
}
