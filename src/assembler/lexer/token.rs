use super::source_position::SourcePositionSpan;

/// TokenType defines the types of tokens that are found in source code.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenType {
    /// Instruction mnemonic, e.g. `mov`
    Instruction,
    /// Any other identifier, treated as a register name, e.g. `r1`
    Register,
    /// `$` Hex literal prefix including the hex digits
    Hex,
    /// `#` Memory address prefix including the hex digits
    MemoryAddress,
    /// Eof marks the end of file
    Eof,
}

impl Default for TokenType {
    fn default() -> Self {
        Self::Eof
    }
}

/// Token is a lexical unit of source code.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Token {
    /// Type of Token
    pub token: TokenType,
    /// Literal string of token without its prefix, e.g. `"mov"`, `"r1"`, `"0100"`
    pub literal: String,
    /// Where in the source the token was found
    pub span: SourcePositionSpan,
}

impl Token {
    pub fn new(token: TokenType, literal: &str, span: SourcePositionSpan) -> Self {
        Self {
            token,
            literal: literal.to_owned(),
            span,
        }
    }

    fn literal_str(&self) -> String {
        match self.token {
            TokenType::Instruction | TokenType::Register => self.literal.to_owned(),
            TokenType::Hex => "$".to_string() + &self.literal,
            TokenType::MemoryAddress => "#".to_string() + &self.literal,
            TokenType::Eof => "<eof>".to_owned(),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:?} '{}'",
            self.span,
            self.token,
            self.literal_str()
        )
    }
}
