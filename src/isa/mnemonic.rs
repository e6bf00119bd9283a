/// Mnemonic of an instruction.
///
/// This represents the operation that is performed by the instruction. Mnemonics are written in
/// lowercase in assembly source, but matched case-insensitively.
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
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mnemonic {
    MOV,
    ADD,
    JNE,
    PSH,
    POP,
    CAL,
    RET,
    HLT,
}

impl Mnemonic {
    /// Number of operands the mnemonic takes in assembly source.
    pub fn arity(&self) -> usize {
        match self {
            Mnemonic::MOV | Mnemonic::ADD | Mnemonic::JNE => 2,
            Mnemonic::PSH | Mnemonic::POP | Mnemonic::CAL => 1,
            Mnemonic::RET | Mnemonic::HLT => 0,
        }
    }
}
