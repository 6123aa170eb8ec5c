use crate::lexer::LexingError;
use pasco_tokens::Position;
use std::fmt::{Display, Formatter};
use std::io;

/// Represents an error occurring during parsing
#[derive(Debug, thiserror::Error)]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub position: Option<Position>,
    /// The non-terminals being parsed when the error occurred, outermost first
    pub non_terminal_stack: Vec<&'static str>,
}

impl SyntaxError {
    /// Creates a new error
    pub fn new(
        kind: ErrorKind,
        position: impl Into<Option<Position>>,
        non_terminals: Vec<&'static str>,
    ) -> Self {
        Self {
            kind,
            position: position.into(),
            non_terminal_stack: non_terminals,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Where the error occurred. For scanning errors this is the start of the
    /// bad lexeme.
    pub fn position(&self) -> Option<Position> {
        match &self.kind {
            ErrorKind::Lex(lex) => lex.position().or(self.position),
            _ => self.position,
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, self.position) {
            (ErrorKind::Lex(lex), _) => write!(f, "{lex}"),
            (kind, Some(position)) => write!(f, "{position} {kind}"),
            (kind, None) => write!(f, "{kind}"),
        }
    }
}

impl From<io::Error> for SyntaxError {
    fn from(value: io::Error) -> Self {
        Self::new(ErrorKind::Io(value), None, vec![])
    }
}

impl From<LexingError> for SyntaxError {
    fn from(value: LexingError) -> Self {
        let position = value.position();
        Self::new(ErrorKind::Lex(value), position, vec![])
    }
}

/// [SyntaxError] kind
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Something specific was expected, like `')'` or `identifier`
    #[error("{0} expected")]
    ExpectedToken(String),
    #[error("assignment operator expected")]
    ExpectedAssignment,
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("attempting to continue parsing but parser was poisoned")]
    ParserPoisoned,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Lex(#[from] LexingError),
}

impl ErrorKind {
    pub fn expected_token(what: impl AsRef<str>) -> Self {
        Self::ExpectedToken(what.as_ref().to_string())
    }
}

pub type SyntaxResult<T = ()> = Result<T, SyntaxError>;
