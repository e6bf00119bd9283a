/// Transforms assembly code to machine code.
///
/// The steps are:
/// 1. **Lexing** - converting a string into tokens
/// 2. **Encoding** - converting tokens into machine code, one statement at a time
pub mod assembler;

/// Decodes machine code back into instructions.
pub mod disassembler;

/// 16-bit CPU emulator
pub mod emulator;

/// Hexdump utility
pub mod hexdump;

/// Chrome tracing support
pub mod instrumentation;

/// Instruction set shared by the assembler, the disassembler and the emulator.
pub mod isa;
