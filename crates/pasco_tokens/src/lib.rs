#![doc = include_str!("../README.md")]

use std::fmt::{Display, Formatter};

pub mod position;
pub mod token;

pub use position::{Position, Positioned};

/// An error with a location.
///
/// Displays as `(line, column) message`, or just the message when no position is known.
#[derive(Debug, thiserror::Error)]
pub struct PositionedError<E> {
    error: E,
    position: Option<Position>,
}

impl<E> PositionedError<E> {
    pub fn new(error: E, position: impl Into<Option<Position>>) -> Self {
        Self {
            error,
            position: position.into(),
        }
    }

    /// The kind of error that occurred
    pub fn kind(&self) -> &E {
        &self.error
    }

    /// Where the error occurred, if known
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Sets the position of this error if it has none yet
    pub fn or_at(self, position: Position) -> Self {
        Self {
            position: self.position.or(Some(position)),
            ..self
        }
    }

    /// Consumes this error, returning the kind
    pub fn into_kind(self) -> E {
        self.error
    }
}

impl<E> From<E> for PositionedError<E> {
    fn from(error: E) -> Self {
        Self::new(error, None)
    }
}

impl<E: Display> Display for PositionedError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{position} {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[derive(Debug, thiserror::Error)]
    #[error("Illegal character")]
    struct Illegal;

    #[test]
    fn test_display_with_position() {
        let error = PositionedError::new(Illegal, Position::new(4, 12));
        assert_eq!(error.to_string(), "(4, 12) Illegal character");
    }

    #[test]
    fn test_display_without_position() {
        let error = PositionedError::from(Illegal);
        assert_eq!(error.to_string(), "Illegal character");
        assert_eq!(
            error.or_at(Position::new(1, 2)).to_string(),
            "(1, 2) Illegal character"
        );
    }
}
