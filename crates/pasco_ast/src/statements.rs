//! Statements

use crate::expr::{Expr, ExprCall, ExprVar};
use pasco_tokens::token::{Keyword, Token};
use pasco_tokens::{Position, Positioned};

/// `begin stmts end`
#[derive(Debug)]
pub struct StmtCompound {
    pub begin: Token,
    pub stmts: Vec<Stmt>,
}

/// `target op value`, where `op` is `:=` or one of the compound assignments
#[derive(Debug)]
pub struct StmtAssign {
    pub op: Token,
    pub target: Expr,
    pub value: Expr,
}

/// A call to a user declared procedure or function used as a statement
#[derive(Debug)]
pub struct StmtCall {
    pub call: ExprCall,
}

/// The built in input/output procedures
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IoProcedure {
    Read,
    Readln,
    Write,
    Writeln,
}

impl IoProcedure {
    /// Gets the io procedure named by a keyword
    pub fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Read => Some(Self::Read),
            Keyword::Readln => Some(Self::Readln),
            Keyword::Write => Some(Self::Write),
            Keyword::Writeln => Some(Self::Writeln),
            _ => None,
        }
    }

    /// Whether this procedure stores into its arguments
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read | Self::Readln)
    }
}

/// A call to one of the io procedures
#[derive(Debug)]
pub struct StmtIoCall {
    pub callee: Token,
    pub procedure: IoProcedure,
    pub args: Vec<Expr>,
}

/// `if cond then stmt [else stmt]`
#[derive(Debug)]
pub struct StmtIf {
    pub keyword: Token,
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

/// `while cond do stmt`
#[derive(Debug)]
pub struct StmtWhile {
    pub keyword: Token,
    pub cond: Expr,
    pub body: Box<Stmt>,
}

/// Whether a `for` loop counts up or down
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ForDirection {
    To,
    Downto,
}

/// `for var := begin (to|downto) end do stmt`
#[derive(Debug)]
pub struct StmtFor {
    pub keyword: Token,
    pub var: ExprVar,
    pub begin: Expr,
    pub direction: ForDirection,
    pub end: Expr,
    pub body: Box<Stmt>,
}

/// A statement
#[derive(Debug)]
pub enum Stmt {
    Compound(StmtCompound),
    Assign(StmtAssign),
    Call(StmtCall),
    IoCall(StmtIoCall),
    If(StmtIf),
    While(StmtWhile),
    For(StmtFor),
}

impl Positioned for Stmt {
    fn position(&self) -> Position {
        match self {
            Stmt::Compound(s) => s.begin.position(),
            Stmt::Assign(s) => s.target.position(),
            Stmt::Call(s) => s.call.position(),
            Stmt::IoCall(s) => s.callee.position(),
            Stmt::If(s) => s.keyword.position(),
            Stmt::While(s) => s.keyword.position(),
            Stmt::For(s) => s.keyword.position(),
        }
    }
}
