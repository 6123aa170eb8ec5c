//! Expressions, lowest precedence first:
//!
//! ```text
//! expression        := simple_expression (relational simple_expression)*
//! simple_expression := term (("+" | "-" | "or" | "xor") term)*
//! term              := simple_term (("*" | "/" | "div" | "mod" | "and" | "shr" | "shl") simple_term)*
//! simple_term       := ("+" | "-" | "not") simple_term | factor
//! factor            := number | string | "true" | "false" | "(" expression ")"
//!                    | identifier ("." identifier | "(" args ")" | "[" indices "]")*
//! ```

use crate::parser::blocking::{BlockingParser, Parsable};
use crate::parser::{ErrorKind, SyntaxResult};
use pasco_ast::expr::{
    Expr, ExprArrayAccess, ExprBinary, ExprBoolean, ExprCall, ExprNumber, ExprRecordAccess,
    ExprString, ExprUnary, ExprVar,
};
use pasco_tokens::token::{Keyword, Operator, Separator, Token, TokenKind};
use std::io::Read;

fn is_relational(token: &Token) -> bool {
    matches!(
        token.kind(),
        TokenKind::Operator(
            Operator::Equal
                | Operator::Unequal
                | Operator::Greater
                | Operator::GreaterEqual
                | Operator::Less
                | Operator::LessEqual
        ) | TokenKind::Keyword(Keyword::In)
    )
}

fn is_additive(token: &Token) -> bool {
    matches!(
        token.kind(),
        TokenKind::Operator(Operator::Add | Operator::Subtract)
            | TokenKind::Keyword(Keyword::Or | Keyword::Xor)
    )
}

fn is_multiplicative(token: &Token) -> bool {
    matches!(
        token.kind(),
        TokenKind::Operator(Operator::Multiply | Operator::Division)
            | TokenKind::Keyword(
                Keyword::Div | Keyword::Mod | Keyword::And | Keyword::Shr | Keyword::Shl
            )
    )
}

fn is_unary(token: &Token) -> bool {
    matches!(
        token.kind(),
        TokenKind::Operator(Operator::Add | Operator::Subtract) | TokenKind::Keyword(Keyword::Not)
    )
}

impl Parsable for Expr {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let mut left = parser.parse(simple_expression)?;
        while let Some(op) = parser.consume_if(is_relational)? {
            let right = parser.parse(simple_expression)?;
            left = Expr::Binary(ExprBinary::new(op, left, right));
        }
        Ok(left)
    }
}

fn simple_expression<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Expr> {
    let mut left = parser.parse(term)?;
    while let Some(op) = parser.consume_if(is_additive)? {
        let right = parser.parse(term)?;
        left = Expr::Binary(ExprBinary::new(op, left, right));
    }
    Ok(left)
}

fn term<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Expr> {
    let mut left = parser.parse(simple_term)?;
    while let Some(op) = parser.consume_if(is_multiplicative)? {
        let right = parser.parse(simple_term)?;
        left = Expr::Binary(ExprBinary::new(op, left, right));
    }
    Ok(left)
}

fn simple_term<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Expr> {
    match parser.consume_if(is_unary)? {
        Some(op) => {
            let operand = parser.parse(simple_term)?;
            Ok(Expr::Unary(ExprUnary::new(op, operand)))
        }
        None => parser.parse(factor),
    }
}

fn factor<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Expr> {
    let kind = parser.peek()?.kind().clone();
    match kind {
        TokenKind::Integer(_) | TokenKind::Real(_) => {
            Ok(Expr::Number(ExprNumber::new(parser.consume()?)))
        }
        TokenKind::String(_) => Ok(Expr::String(ExprString::new(parser.consume()?))),
        TokenKind::Keyword(Keyword::True | Keyword::False) => {
            Ok(Expr::Boolean(ExprBoolean::new(parser.consume()?)))
        }
        TokenKind::Identifier(_) => parser.parse(postfix_chain),
        TokenKind::Separator(Separator::LParen) => {
            parser.consume()?;
            let inner = parser.parse(Expr::parse)?;
            parser.expect_separator(Separator::RParen)?;
            Ok(inner)
        }
        _ => Err(parser.error(ErrorKind::expected_token("factor"))),
    }
}

/// A name followed by any number of `.field`, `(args)` and `[indices]`,
/// applied left to right
fn postfix_chain<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Expr> {
    let mut expr = Expr::Var(parser.parse(ExprVar::parse)?);
    loop {
        if parser.consume_separator(Separator::Period)?.is_some() {
            let field = parser.parse(ExprVar::parse)?;
            expr = Expr::RecordAccess(ExprRecordAccess::new(expr, field));
        } else if parser.consume_separator(Separator::LParen)?.is_some() {
            let args = if parser.peek_separator(Separator::RParen)? {
                vec![]
            } else {
                expression_list(parser)?
            };
            parser.expect_separator(Separator::RParen)?;
            expr = Expr::Call(ExprCall::new(expr, args));
        } else if parser.consume_separator(Separator::LBracket)?.is_some() {
            let indices = expression_list(parser)?;
            parser.expect_separator(Separator::RBracket)?;
            expr = Expr::ArrayAccess(ExprArrayAccess::new(expr, indices));
        } else {
            return Ok(expr);
        }
    }
}

/// One or more comma separated expressions
pub(crate) fn expression_list<R: Read>(
    parser: &mut BlockingParser<'_, R>,
) -> SyntaxResult<Vec<Expr>> {
    let mut exprs = vec![parser.parse(Expr::parse)?];
    while parser.consume_separator(Separator::Comma)?.is_some() {
        exprs.push(parser.parse(Expr::parse)?);
    }
    Ok(exprs)
}

impl Parsable for ExprVar {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        parser.expect_identifier().map(ExprVar::new)
    }
}
