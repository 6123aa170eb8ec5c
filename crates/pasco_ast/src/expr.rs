//! Expressions

use crate::typed::{typed_enum, typed_struct, TypeInfo};
use pasco_tokens::token::{Token, TokenKind};
use pasco_tokens::{Position, Positioned};

/// A binary operation. The operator is either an operator token or one of the
/// keyword operators (`div`, `mod`, `and`, ...).
#[derive(Debug)]
pub struct ExprBinary {
    pub op: Token,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub info: TypeInfo,
}

impl ExprBinary {
    pub fn new(op: Token, left: Expr, right: Expr) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
            info: TypeInfo::default(),
        }
    }
}

/// A unary `+`, `-` or `not`
#[derive(Debug)]
pub struct ExprUnary {
    pub op: Token,
    pub operand: Box<Expr>,
    pub info: TypeInfo,
}

impl ExprUnary {
    pub fn new(op: Token, operand: Expr) -> Self {
        Self {
            op,
            operand: Box::new(operand),
            info: TypeInfo::default(),
        }
    }
}

/// An integer or real literal
#[derive(Debug)]
pub struct ExprNumber {
    pub token: Token,
    pub info: TypeInfo,
}

impl ExprNumber {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            info: TypeInfo::default(),
        }
    }

    /// Whether this literal is a real number
    pub fn is_real(&self) -> bool {
        matches!(self.token.kind(), TokenKind::Real(_))
    }

    /// The integer value, if this is an integer literal
    pub fn as_integer(&self) -> Option<i32> {
        match self.token.kind() {
            TokenKind::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

/// A string literal, already decoded by the lexer
#[derive(Debug)]
pub struct ExprString {
    pub token: Token,
    pub info: TypeInfo,
}

impl ExprString {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            info: TypeInfo::default(),
        }
    }

    pub fn value(&self) -> &str {
        match self.token.kind() {
            TokenKind::String(s) => s,
            _ => self.token.raw(),
        }
    }
}

/// `true` or `false`
#[derive(Debug)]
pub struct ExprBoolean {
    pub token: Token,
    pub info: TypeInfo,
}

impl ExprBoolean {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            info: TypeInfo::default(),
        }
    }

    pub fn value(&self) -> bool {
        self.token.is_keyword(pasco_tokens::token::Keyword::True)
    }
}

/// A reference to a name
#[derive(Debug)]
pub struct ExprVar {
    pub token: Token,
    pub info: TypeInfo,
}

impl ExprVar {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            info: TypeInfo::default(),
        }
    }

    /// The lower-cased name being referenced
    pub fn name(&self) -> &str {
        self.token.identifier().unwrap_or_else(|| self.token.raw())
    }
}

/// `record.field`
#[derive(Debug)]
pub struct ExprRecordAccess {
    pub record: Box<Expr>,
    pub field: ExprVar,
    pub info: TypeInfo,
}

impl ExprRecordAccess {
    pub fn new(record: Expr, field: ExprVar) -> Self {
        Self {
            record: Box::new(record),
            field,
            info: TypeInfo::default(),
        }
    }
}

/// `callee(args...)`
#[derive(Debug)]
pub struct ExprCall {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
    pub info: TypeInfo,
}

impl ExprCall {
    pub fn new(callee: Expr, args: Vec<Expr>) -> Self {
        Self {
            callee: Box::new(callee),
            args,
            info: TypeInfo::default(),
        }
    }
}

/// `array[index, ...]`
#[derive(Debug)]
pub struct ExprArrayAccess {
    pub array: Box<Expr>,
    pub indices: Vec<Expr>,
    pub info: TypeInfo,
}

impl ExprArrayAccess {
    pub fn new(array: Expr, indices: Vec<Expr>) -> Self {
        Self {
            array: Box::new(array),
            indices,
            info: TypeInfo::default(),
        }
    }
}

/// `first..last`, the index range of an array type
#[derive(Debug)]
pub struct Range {
    pub first: Expr,
    pub last: Expr,
    pub info: TypeInfo,
}

impl Range {
    pub fn new(first: Expr, last: Expr) -> Self {
        Self {
            first,
            last,
            info: TypeInfo::default(),
        }
    }
}

/// An expression
#[derive(Debug)]
pub enum Expr {
    Binary(ExprBinary),
    Unary(ExprUnary),
    Number(ExprNumber),
    String(ExprString),
    Boolean(ExprBoolean),
    Var(ExprVar),
    RecordAccess(ExprRecordAccess),
    Call(ExprCall),
    ArrayAccess(ExprArrayAccess),
}

typed_struct!(
    ExprBinary,
    ExprUnary,
    ExprNumber,
    ExprString,
    ExprBoolean,
    ExprVar,
    ExprRecordAccess,
    ExprCall,
    ExprArrayAccess,
    Range,
);

typed_enum!(Expr {
    Binary,
    Unary,
    Number,
    String,
    Boolean,
    Var,
    RecordAccess,
    Call,
    ArrayAccess,
});

impl Positioned for ExprBinary {
    fn position(&self) -> Position {
        self.op.position()
    }
}

impl Positioned for ExprUnary {
    fn position(&self) -> Position {
        self.op.position()
    }
}

impl Positioned for ExprNumber {
    fn position(&self) -> Position {
        self.token.position()
    }
}

impl Positioned for ExprString {
    fn position(&self) -> Position {
        self.token.position()
    }
}

impl Positioned for ExprBoolean {
    fn position(&self) -> Position {
        self.token.position()
    }
}

impl Positioned for ExprVar {
    fn position(&self) -> Position {
        self.token.position()
    }
}

impl Positioned for ExprRecordAccess {
    fn position(&self) -> Position {
        self.record.position()
    }
}

impl Positioned for ExprCall {
    fn position(&self) -> Position {
        self.callee.position()
    }
}

impl Positioned for ExprArrayAccess {
    fn position(&self) -> Position {
        self.array.position()
    }
}

impl Positioned for Range {
    fn position(&self) -> Position {
        self.first.position()
    }
}

impl Positioned for Expr {
    fn position(&self) -> Position {
        match self {
            Expr::Binary(e) => e.position(),
            Expr::Unary(e) => e.position(),
            Expr::Number(e) => e.position(),
            Expr::String(e) => e.position(),
            Expr::Boolean(e) => e.position(),
            Expr::Var(e) => e.position(),
            Expr::RecordAccess(e) => e.position(),
            Expr::Call(e) => e.position(),
            Expr::ArrayAccess(e) => e.position(),
        }
    }
}
