//! Positions within a source file

use std::fmt::{Debug, Formatter};

/// A `(line, column)` position within a source file. Both components start at 1.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, derive_more::Display)]
#[display(fmt = "({}, {})", line, column)]
pub struct Position {
    line: usize,
    column: usize,
}

impl Position {
    /// Creates a new position
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The line of this position
    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The column of this position
    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Gets the position directly after `c`, if `c` was read at this position.
    ///
    /// Reading past a newline moves to the first column of the next line.
    pub const fn advance(&self, c: char) -> Self {
        if c == '\n' {
            Self {
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Debug for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Something that has a position in the source
pub trait Positioned {
    fn position(&self) -> Position;
}

impl Positioned for Position {
    fn position(&self) -> Position {
        *self
    }
}

impl<P: Positioned> Positioned for Box<P> {
    fn position(&self) -> Position {
        (**self).position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_advance_over_newline() {
        let pos = Position::new(3, 7);
        assert_eq!(pos.advance('x'), Position::new(3, 8));
        assert_eq!(pos.advance('\n'), Position::new(4, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(12, 4).to_string(), "(12, 4)");
    }
}
