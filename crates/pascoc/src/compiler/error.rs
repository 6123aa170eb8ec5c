//! Errors produced while checking a program

use itertools::Itertools as _;
use pasco_ast_parsing::lexer::LexingError;
use pasco_ast_parsing::parser::{ErrorKind, SyntaxError};
use pasco_tokens::{Position, PositionedError};
use pasco_types::{Primitive, ScopeError};
use std::io;
use thiserror::Error;

/// A semantic error, located at the offending node
pub type SemanticError = PositionedError<SemanticErrorKind>;

/// A type alias for results of the semantic pass
pub type SemanticResult<T = ()> = Result<T, SemanticError>;

/// The kind of semantic error
#[derive(Debug, Error)]
pub enum SemanticErrorKind {
    #[error("Identifier '{0}' is undeclared")]
    Undeclared(String),
    #[error("Identifier '{0}' is already declared")]
    AlreadyDeclared(String),
    #[error("Operator '{op}' is not applicable to {operands}")]
    OperatorNotApplicable { op: String, operands: String },
    #[error("Can not assign to an rvalue")]
    AssignToRvalue,
    #[error("Type mismatch: {expected} expected, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("{callee} expects {expected} argument(s), found {found}")]
    ArgumentCountMismatch {
        callee: String,
        expected: usize,
        found: usize,
    },
    #[error("{0} is not callable")]
    NotCallable(String),
    #[error("{0} is not a record")]
    NotARecord(String),
    #[error("{0} is not an array")]
    NotAnArray(String),
    #[error("Boolean expected, found {0}")]
    NotBoolean(String),
    #[error("Integer expected, found {0}")]
    NotInteger(String),
    #[error("no active scope")]
    NoScope,
}

impl SemanticErrorKind {
    /// A type mismatch where the expected side is one of several primitives
    pub fn expected_one_of(allowed: &[Primitive], found: impl ToString) -> Self {
        Self::TypeMismatch {
            expected: allowed.iter().map(|p| p.name()).join(" or "),
            found: found.to_string(),
        }
    }

    /// Attaches a position
    pub fn at(self, position: impl Into<Option<Position>>) -> SemanticError {
        SemanticError::new(self, position)
    }
}

impl From<ScopeError> for SemanticErrorKind {
    fn from(value: ScopeError) -> Self {
        match value {
            ScopeError::Undeclared(name) => Self::Undeclared(name),
            ScopeError::AlreadyDeclared(name) => Self::AlreadyDeclared(name),
            ScopeError::NoScope => Self::NoScope,
        }
    }
}

/// An error from any stage of pascoc
#[derive(Debug, Error)]
pub enum PascocError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Lex(#[from] LexingError),
    #[error(transparent)]
    Syntax(SyntaxError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

/// Scanning and reading failures met by the parser keep their own variant
impl From<SyntaxError> for PascocError {
    fn from(value: SyntaxError) -> Self {
        match value.kind {
            ErrorKind::Lex(e) => Self::Lex(e),
            ErrorKind::Io(e) => Self::Io(e),
            kind => Self::Syntax(SyntaxError { kind, ..value }),
        }
    }
}

impl PascocError {
    /// Where the error occurred, if known
    pub fn position(&self) -> Option<Position> {
        match self {
            PascocError::Io(_) => None,
            PascocError::Lex(e) => e.position(),
            PascocError::Syntax(e) => e.position(),
            PascocError::Semantic(e) => e.position(),
        }
    }
}

/// A type alias for general results in pascoc
pub type PascocResult<T> = Result<T, PascocError>;
