//! Renders a syntax tree as indented text.

use crate::expr::*;
use crate::items::*;
use crate::statements::*;
use crate::types::*;
use crate::*;
use pasco_tokens::token::TokenKind;
use pasco_types::ParamMode;
use std::fmt;
use std::fmt::{Display, Formatter, Write};

const INDENT: &str = "   ";

/// Writes one line per node, each child indented one level below its parent.
pub struct TreePrinter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> TreePrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    /// Gets back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, label: impl Display) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str(INDENT)?;
        }
        writeln!(self.out, "{label}")
    }

    fn nested<F>(&mut self, label: impl Display, children: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.line(label)?;
        self.depth += 1;
        let result = children(self);
        self.depth -= 1;
        result
    }
}

impl<W: Write> AstVisitor for TreePrinter<W> {
    type Err = fmt::Error;

    fn visit_program(&mut self, program: &Program) -> Result<(), Self::Err> {
        self.nested("program", |p| walk_program(p, program))
    }

    fn visit_block(&mut self, block: &Block) -> Result<(), Self::Err> {
        self.nested("block", |p| walk_block(p, block))
    }

    fn visit_decl_type(&mut self, decl: &DeclType) -> Result<(), Self::Err> {
        self.nested("type", |p| walk_decl_type(p, decl))
    }

    fn visit_decl_var(&mut self, decl: &DeclVar) -> Result<(), Self::Err> {
        self.nested("var", |p| walk_decl_var(p, decl))
    }

    fn visit_decl_const(&mut self, decl: &DeclConst) -> Result<(), Self::Err> {
        self.nested("const", |p| walk_decl_const(p, decl))
    }

    fn visit_param(&mut self, param: &Param) -> Result<(), Self::Err> {
        let label = match param.mode {
            ParamMode::Value => "param",
            ParamMode::Const => "const param",
            ParamMode::Var => "var param",
        };
        self.nested(label, |p| walk_param(p, param))
    }

    fn visit_decl_procedure(&mut self, decl: &DeclProcedure) -> Result<(), Self::Err> {
        self.nested("procedure", |p| walk_decl_procedure(p, decl))
    }

    fn visit_decl_function(&mut self, decl: &DeclFunction) -> Result<(), Self::Err> {
        self.nested("function", |p| walk_decl_function(p, decl))
    }

    fn visit_type_simple(&mut self, ty: &TypeSimple) -> Result<(), Self::Err> {
        self.line(ty.name.token.raw())
    }

    fn visit_type_array(&mut self, ty: &TypeArray) -> Result<(), Self::Err> {
        self.nested("array", |p| walk_type_array(p, ty))
    }

    fn visit_range(&mut self, range: &Range) -> Result<(), Self::Err> {
        self.nested("..", |p| walk_range(p, range))
    }

    fn visit_type_record(&mut self, ty: &TypeRecord) -> Result<(), Self::Err> {
        self.nested("record", |p| walk_type_record(p, ty))
    }

    fn visit_field(&mut self, field: &Field) -> Result<(), Self::Err> {
        self.nested("field", |p| walk_field(p, field))
    }

    fn visit_stmt_compound(&mut self, stmt: &StmtCompound) -> Result<(), Self::Err> {
        self.nested("begin", |p| walk_stmt_compound(p, stmt))
    }

    fn visit_stmt_assign(&mut self, stmt: &StmtAssign) -> Result<(), Self::Err> {
        self.nested(stmt.op.raw(), |p| walk_stmt_assign(p, stmt))
    }

    fn visit_stmt_io_call(&mut self, stmt: &StmtIoCall) -> Result<(), Self::Err> {
        self.nested(stmt.callee.raw(), |p| walk_stmt_io_call(p, stmt))
    }

    fn visit_stmt_if(&mut self, stmt: &StmtIf) -> Result<(), Self::Err> {
        self.nested("if", |p| walk_stmt_if(p, stmt))
    }

    fn visit_stmt_while(&mut self, stmt: &StmtWhile) -> Result<(), Self::Err> {
        self.nested("while", |p| walk_stmt_while(p, stmt))
    }

    fn visit_stmt_for(&mut self, stmt: &StmtFor) -> Result<(), Self::Err> {
        let label = match stmt.direction {
            ForDirection::To => "for to",
            ForDirection::Downto => "for downto",
        };
        self.nested(label, |p| walk_stmt_for(p, stmt))
    }

    fn visit_expr_binary(&mut self, expr: &ExprBinary) -> Result<(), Self::Err> {
        self.nested(expr.op.raw(), |p| walk_expr_binary(p, expr))
    }

    fn visit_expr_unary(&mut self, expr: &ExprUnary) -> Result<(), Self::Err> {
        self.nested(expr.op.raw(), |p| walk_expr_unary(p, expr))
    }

    fn visit_expr_number(&mut self, expr: &ExprNumber) -> Result<(), Self::Err> {
        match expr.token.kind() {
            TokenKind::Integer(i) => self.line(i),
            TokenKind::Real(r) => self.line(r),
            _ => self.line(expr.token.raw()),
        }
    }

    fn visit_expr_string(&mut self, expr: &ExprString) -> Result<(), Self::Err> {
        self.line(format_args!("'{}'", expr.value()))
    }

    fn visit_expr_boolean(&mut self, expr: &ExprBoolean) -> Result<(), Self::Err> {
        self.line(expr.value())
    }

    fn visit_expr_var(&mut self, expr: &ExprVar) -> Result<(), Self::Err> {
        self.line(expr.token.raw())
    }

    fn visit_expr_record_access(&mut self, expr: &ExprRecordAccess) -> Result<(), Self::Err> {
        self.nested(".", |p| walk_expr_record_access(p, expr))
    }

    fn visit_expr_call(&mut self, expr: &ExprCall) -> Result<(), Self::Err> {
        self.nested("()", |p| walk_expr_call(p, expr))
    }

    fn visit_expr_array_access(&mut self, expr: &ExprArrayAccess) -> Result<(), Self::Err> {
        self.nested("[]", |p| walk_expr_array_access(p, expr))
    }
}

/// Displays a whole program as a tree
pub struct Tree<'a>(&'a Program);

impl Display for Tree<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        TreePrinter::new(f).visit_program(self.0)
    }
}

impl Program {
    /// Gets a displayable, indented rendering of this program
    pub fn tree(&self) -> Tree<'_> {
        Tree(self)
    }
}
