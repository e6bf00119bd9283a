/// Number of registers in the register file.
pub const REGISTER_COUNT: usize = 12;

/// Size of a single register in bytes.
pub const REGISTER_STRIDE: usize = 2;

/// A named 16-bit register.
///
/// The discriminant is the register code written by the assembler and decoded by the CPU.
#[derive(
    Debug,
    Hash,
    Eq,
    PartialEq,
    Clone,
    Copy,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::FromRepr,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Register {
    /// Instruction pointer
    Ip = 0,
    /// Accumulator
    Acc = 1,
    R1 = 2,
    R2 = 3,
    R3 = 4,
    R4 = 5,
    R5 = 6,
    R6 = 7,
    R7 = 8,
    R8 = 9,
    /// Stack pointer
    Sp = 10,
    /// Frame pointer
    Fp = 11,
}

/// General purpose registers in the order they are saved on a call.
pub const GENERAL_PURPOSE: [Register; 8] = [
    Register::R1,
    Register::R2,
    Register::R3,
    Register::R4,
    Register::R5,
    Register::R6,
    Register::R7,
    Register::R8,
];

impl Register {
    /// Code of the register in the instruction stream.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Byte offset of the register in the register file.
    pub const fn offset(self) -> usize {
        self as usize * REGISTER_STRIDE
    }

    /// Reduce an arbitrary encoded register byte to a register offset.
    ///
    /// Out of range codes wrap around instead of failing, so a malformed program addresses some
    /// register rather than memory outside the register file.
    pub const fn clamped_offset(code: u8) -> usize {
        (code as usize % REGISTER_COUNT) * REGISTER_STRIDE
    }
}
