use std::{iter::Peekable, str::Chars, str::FromStr};

use thiserror::Error;

use crate::isa::Mnemonic;

/// Source positions used for error reporting.
pub mod source_position;

/// Token definitions.
pub mod token;

pub use source_position::{SourcePosition, SourcePositionSpan};
pub use token::{Token, TokenType};

// Example code:
//
//   mov $0a, r1      ; r1 = 0x000a
//   mov $0001, r2
//   add r1, r2       ; acc = r1 + r2
//   mov acc, #0100
//   jne $000b, #0000 ; loop until acc is 0x000b

// '$' = hex literal, e.g. `$12` or `$1234`
// '#' = memory address, e.g. `#0100`
// ';' = comment, e.g. `; this is a comment`
// ',' = operand separator, skipped like whitespace

#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("Couldn't recognize character '{character}' at {position}")]
pub struct LexicalError {
    pub character: char,
    pub position: SourcePosition,
}

/// Lexer with a single token of lookahead.
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    position: SourcePosition,
    peeked: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
            position: SourcePosition::default(),
            peeked: None,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.next()?;
        self.position.advance(ch);
        Some(ch)
    }

    fn read_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek_char() {
            if !predicate(ch) {
                break;
            }
            text.push(ch);
            self.read_char();
        }
        text
    }

    fn skip_whitespace(&mut self) {
        self.read_while(|ch| ch.is_whitespace() || ch == ',');
    }

    fn skip_comment(&mut self) {
        self.read_while(|ch| ch != '\n');
    }

    fn read_hex(&mut self) -> String {
        // Skip the prefix
        self.read_char();
        self.read_while(|ch| ch.is_ascii_hexdigit())
    }

    /// Instruction mnemonic or register name
    fn read_identifier(&mut self) -> (TokenType, String) {
        let identifier = self.read_while(|ch| ch.is_ascii_alphanumeric());
        let token = if Mnemonic::from_str(&identifier).is_ok() {
            TokenType::Instruction
        } else {
            TokenType::Register
        };
        (token, identifier)
    }

    fn read_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            self.skip_whitespace();
            let start = self.position;

            let (token, literal) = match self.peek_char() {
                None => (TokenType::Eof, String::new()),
                Some(';') => {
                    self.skip_comment();
                    continue;
                }
                Some('$') => (TokenType::Hex, self.read_hex()),
                Some('#') => (TokenType::MemoryAddress, self.read_hex()),
                Some(ch) if ch.is_ascii_alphanumeric() => self.read_identifier(),
                Some(character) => {
                    return Err(LexicalError {
                        character,
                        position: start,
                    })
                }
            };

            let token = Token::new(token, &literal, SourcePositionSpan::new(start, self.position));
            tracing::trace!("Token {}", token);
            return Ok(token);
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&Token, LexicalError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.read_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Consume the next token. Returns [`TokenType::Eof`] tokens forever once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.read_token(),
        }
    }

    pub fn is_eof(&mut self) -> Result<bool, LexicalError> {
        Ok(self.peek_token()?.token == TokenType::Eof)
    }

    /// Lex the remaining input, the final [`TokenType::Eof`] token included.
    #[cfg(test)]
    fn tokenize(&mut self) -> Result<Vec<Token>, LexicalError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let eof = token.token == TokenType::Eof;
            tokens.push(token);
            if eof {
                return Ok(tokens);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn token_types(input: &str) -> Vec<(TokenType, String)> {
        Lexer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|token| (token.token, token.literal))
            .collect()
    }

    fn tt(token: TokenType, literal: &str) -> (TokenType, String) {
        (token, literal.to_string())
    }

    #[test]
    fn test_hex() {
        let tests = vec![
            ("$00", "00"),
            ("$1", "1"),
            ("$10", "10"),
            ("$ff", "ff"),
            ("$BEEF", "BEEF"),
        ];
        for (input, expected) in tests {
            let mut lexer = Lexer::new(input);
            let token = lexer.next_token().unwrap();
            assert_eq!(token.token, TokenType::Hex);
            assert_eq!(token.literal, expected);
        }
    }

    #[test]
    fn test_memory_address() {
        let mut lexer = Lexer::new("#0100");
        let token = lexer.next_token().unwrap();
        assert_eq!(token.token, TokenType::MemoryAddress);
        assert_eq!(token.literal, "0100");
    }

    #[test]
    fn test_identifiers() {
        let tests = vec![
            ("mov", TokenType::Instruction),
            ("MOV", TokenType::Instruction),
            ("hlt", TokenType::Instruction),
            ("r1", TokenType::Register),
            ("acc", TokenType::Register),
            ("bogus", TokenType::Register),
        ];
        for (input, expected) in tests {
            let mut lexer = Lexer::new(input);
            let token = lexer.next_token().unwrap();
            assert_eq!(token.token, expected, "{}", input);
            assert_eq!(token.literal, input);
        }
    }

    #[test]
    fn test_instruction() {
        assert_eq!(
            token_types("mov $0a, r1"),
            vec![
                tt(TokenType::Instruction, "mov"),
                tt(TokenType::Hex, "0a"),
                tt(TokenType::Register, "r1"),
                tt(TokenType::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_comment() {
        let input = "; this is a comment\nmov r1, #0100 ; Another one\n;; Last one";
        assert_eq!(
            token_types(input),
            vec![
                tt(TokenType::Instruction, "mov"),
                tt(TokenType::Register, "r1"),
                tt(TokenType::MemoryAddress, "0100"),
                tt(TokenType::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("psh $42\npop r1");
        assert_eq!(lexer.peek_token().unwrap().literal, "psh");
        assert_eq!(lexer.peek_token().unwrap().literal, "psh");
        assert_eq!(lexer.next_token().unwrap().literal, "psh");
        assert_eq!(lexer.next_token().unwrap().literal, "42");
        let pop = lexer.next_token().unwrap();
        assert_eq!(pop.span.start, SourcePosition::new(2, 1));
        assert_eq!(pop.span.end, SourcePosition::new(2, 4));
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("  \n\t");
        assert!(lexer.is_eof().unwrap());
        assert_eq!(lexer.next_token().unwrap().token, TokenType::Eof);
        assert_eq!(lexer.next_token().unwrap().token, TokenType::Eof);
    }

    #[test]
    fn test_unrecognized_character() {
        let tests = vec![
            ("mov $01, r1\n  add r1 @ r2", '@', SourcePosition::new(2, 10)),
            ("mov $01, r_1", '_', SourcePosition::new(1, 11)),
            ("mov $01, r1 !", '!', SourcePosition::new(1, 13)),
        ];
        for (input, character, position) in tests {
            let mut lexer = Lexer::new(input);
            let error = loop {
                match lexer.next_token() {
                    Ok(token) if token.token == TokenType::Eof => panic!("Expected an error"),
                    Ok(_) => continue,
                    Err(error) => break error,
                }
            };
            assert_eq!(error, LexicalError { character, position }, "{}", input);
        }
    }

    #[test]
    fn test_lexical_error_message() {
        let error = Lexer::new("add r1 @ r2").tokenize().unwrap_err();
        assert_eq!(error.to_string(), "Couldn't recognize character '@' at 1:8");
    }
}
