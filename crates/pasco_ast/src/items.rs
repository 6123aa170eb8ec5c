//! Declarations, blocks and the program

use crate::expr::{Expr, ExprVar};
use crate::statements::StmtCompound;
use crate::types::TypeNode;
use pasco_tokens::token::Token;
use pasco_tokens::{Position, Positioned};
use pasco_types::ParamMode;

/// `name = type`
#[derive(Debug)]
pub struct DeclType {
    pub name: ExprVar,
    pub ty: TypeNode,
}

/// `a, b: type [= init]`
#[derive(Debug)]
pub struct DeclVar {
    pub names: Vec<ExprVar>,
    pub ty: TypeNode,
    pub init: Option<Expr>,
}

/// `name [: type] = value`
#[derive(Debug)]
pub struct DeclConst {
    pub name: ExprVar,
    pub ty: Option<TypeNode>,
    pub value: Expr,
}

/// `[const|var] a, b: type` inside of a parameter list
#[derive(Debug)]
pub struct Param {
    pub mode: ParamMode,
    pub names: Vec<ExprVar>,
    pub ty: TypeNode,
}

/// `procedure name(params); block;`
#[derive(Debug)]
pub struct DeclProcedure {
    pub keyword: Token,
    pub name: ExprVar,
    pub params: Vec<Param>,
    pub block: Block,
}

/// `function name(params): returns; block;`
#[derive(Debug)]
pub struct DeclFunction {
    pub procedure: DeclProcedure,
    pub returns: TypeNode,
}

/// A declaration
#[derive(Debug)]
pub enum Decl {
    Type(DeclType),
    Var(DeclVar),
    Const(DeclConst),
    Procedure(DeclProcedure),
    Function(DeclFunction),
}

impl Positioned for Decl {
    fn position(&self) -> Position {
        match self {
            Decl::Type(d) => d.name.position(),
            Decl::Var(d) => d
                .names
                .first()
                .map(|n| n.position())
                .unwrap_or_else(|| d.ty.position()),
            Decl::Const(d) => d.name.position(),
            Decl::Procedure(d) => d.keyword.position(),
            Decl::Function(d) => d.procedure.keyword.position(),
        }
    }
}

/// Declarations followed by a compound statement
#[derive(Debug)]
pub struct Block {
    pub decls: Vec<Decl>,
    pub body: StmtCompound,
}

/// `[program name;] block.`
#[derive(Debug)]
pub struct Program {
    pub name: Option<ExprVar>,
    pub block: Block,
}
