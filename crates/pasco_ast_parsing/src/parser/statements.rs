//! Statements

use crate::parser::blocking::{BlockingParser, Parsable};
use crate::parser::expr::expression_list;
use crate::parser::{ErrorKind, SyntaxResult};
use pasco_ast::expr::{Expr, ExprVar};
use pasco_ast::statements::{
    ForDirection, IoProcedure, Stmt, StmtAssign, StmtCall, StmtCompound, StmtFor, StmtIf,
    StmtIoCall, StmtWhile,
};
use pasco_tokens::token::{Keyword, Operator, Separator, Token, TokenKind};
use std::io::Read;

impl Parsable for StmtCompound {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let begin = parser.expect_keyword(Keyword::Begin)?;
        let mut stmts = vec![];
        loop {
            if parser.consume_separator(Separator::Semicolon)?.is_some() {
                continue;
            }
            if parser.peek_keyword(Keyword::End)? {
                break;
            }
            stmts.push(parser.parse(Stmt::parse)?);
            if parser.consume_separator(Separator::Semicolon)?.is_none() {
                break;
            }
        }
        parser.expect_keyword(Keyword::End)?;
        Ok(StmtCompound { begin, stmts })
    }
}

impl Parsable for Stmt {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let keyword = match parser.peek()?.kind() {
            TokenKind::Keyword(keyword) => Some(*keyword),
            _ => None,
        };
        match keyword {
            Some(Keyword::Begin) => parser.parse(StmtCompound::parse).map(Stmt::Compound),
            Some(Keyword::If) => parser.parse(StmtIf::parse).map(Stmt::If),
            Some(Keyword::While) => parser.parse(StmtWhile::parse).map(Stmt::While),
            Some(Keyword::For) => parser.parse(StmtFor::parse).map(Stmt::For),
            Some(Keyword::Read | Keyword::Readln | Keyword::Write | Keyword::Writeln) => {
                parser.parse(StmtIoCall::parse).map(Stmt::IoCall)
            }
            _ => parser.parse(simple_statement),
        }
    }
}

fn is_assignment(token: &Token) -> bool {
    matches!(token.kind(), TokenKind::Operator(op) if op.is_assignment())
}

/// An assignment, or a call when the expression is a call and no assignment
/// operator follows
fn simple_statement<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Stmt> {
    let target = parser.parse(Expr::parse)?;
    if let Some(op) = parser.consume_if(is_assignment)? {
        let value = parser.parse(Expr::parse)?;
        return Ok(Stmt::Assign(StmtAssign { op, target, value }));
    }
    match target {
        Expr::Call(call) => Ok(Stmt::Call(StmtCall { call })),
        _ => Err(parser.error(ErrorKind::ExpectedAssignment)),
    }
}

impl Parsable for StmtIf {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let keyword = parser.expect_keyword(Keyword::If)?;
        let cond = parser.parse(Expr::parse)?;
        parser.expect_keyword(Keyword::Then)?;
        let then_branch = Box::new(parser.parse(Stmt::parse)?);
        let else_branch = match parser.consume_keyword(Keyword::Else)? {
            Some(_) => Some(Box::new(parser.parse(Stmt::parse)?)),
            None => None,
        };
        Ok(StmtIf {
            keyword,
            cond,
            then_branch,
            else_branch,
        })
    }
}

impl Parsable for StmtWhile {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let keyword = parser.expect_keyword(Keyword::While)?;
        let cond = parser.parse(Expr::parse)?;
        parser.expect_keyword(Keyword::Do)?;
        let body = Box::new(parser.parse(Stmt::parse)?);
        Ok(StmtWhile {
            keyword,
            cond,
            body,
        })
    }
}

impl Parsable for StmtFor {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let keyword = parser.expect_keyword(Keyword::For)?;
        let var = parser.parse(ExprVar::parse)?;
        parser.expect_operator(Operator::Assign)?;
        let begin = parser.parse(Expr::parse)?;
        let direction = if parser.consume_keyword(Keyword::To)?.is_some() {
            ForDirection::To
        } else if parser.consume_keyword(Keyword::Downto)?.is_some() {
            ForDirection::Downto
        } else {
            return Err(parser.error(ErrorKind::expected_token("'to' or 'downto'")));
        };
        let end = parser.parse(Expr::parse)?;
        parser.expect_keyword(Keyword::Do)?;
        let body = Box::new(parser.parse(Stmt::parse)?);
        Ok(StmtFor {
            keyword,
            var,
            begin,
            direction,
            end,
            body,
        })
    }
}

impl Parsable for StmtIoCall {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let callee = parser.consume()?;
        let procedure = match callee.kind() {
            TokenKind::Keyword(keyword) => IoProcedure::from_keyword(*keyword),
            _ => None,
        };
        let Some(procedure) = procedure else {
            return Err(parser.error(ErrorKind::expected_token("io procedure")));
        };
        let mut args = vec![];
        if parser.consume_separator(Separator::LParen)?.is_some() {
            if !parser.peek_separator(Separator::RParen)? {
                args = expression_list(parser)?;
            }
            parser.expect_separator(Separator::RParen)?;
        }
        Ok(StmtIoCall {
            callee,
            procedure,
            args,
        })
    }
}
