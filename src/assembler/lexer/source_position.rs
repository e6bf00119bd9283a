use std::fmt;

/// Line and column of a character in the source, both starting at 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Move past `ch`.
    pub fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SourcePositionSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourcePositionSpan {
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for SourcePositionSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut position = SourcePosition::default();
        for ch in "ab\nc".chars() {
            position.advance(ch);
        }
        assert_eq!(position, SourcePosition::new(2, 2));
        assert_eq!(position.to_string(), "2:2");
    }
}
