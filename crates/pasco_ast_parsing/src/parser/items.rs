//! Programs, blocks and declarations

use crate::parser::blocking::{BlockingParser, Parsable};
use crate::parser::{ErrorKind, SyntaxResult};
use pasco_ast::expr::{Expr, ExprVar};
use pasco_ast::items::{
    Block, Decl, DeclConst, DeclFunction, DeclProcedure, DeclType, DeclVar, Param, Program,
};
use pasco_ast::statements::StmtCompound;
use pasco_ast::types::TypeNode;
use pasco_tokens::token::{Keyword, Operator, Separator, TokenKind};
use pasco_types::ParamMode;
use std::io::Read;

impl Parsable for Program {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let name = if parser.consume_keyword(Keyword::Program)?.is_some() {
            let name = parser.parse(ExprVar::parse)?;
            parser.expect_separator(Separator::Semicolon)?;
            Some(name)
        } else {
            None
        };
        let block = parser.parse(Block::parse)?;
        parser.expect_separator(Separator::Period)?;
        Ok(Program { name, block })
    }
}

impl Parsable for Block {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let mut decls = vec![];
        loop {
            let keyword = match parser.peek()?.kind() {
                TokenKind::Keyword(keyword) => *keyword,
                _ => break,
            };
            match keyword {
                Keyword::Const => section(parser, &mut decls, |p| {
                    p.parse(DeclConst::parse).map(Decl::Const)
                })?,
                Keyword::Var => section(parser, &mut decls, |p| {
                    p.parse(DeclVar::parse).map(Decl::Var)
                })?,
                Keyword::Type => section(parser, &mut decls, |p| {
                    p.parse(DeclType::parse).map(Decl::Type)
                })?,
                Keyword::Procedure => {
                    decls.push(Decl::Procedure(parser.parse(DeclProcedure::parse)?))
                }
                Keyword::Function => decls.push(Decl::Function(parser.parse(DeclFunction::parse)?)),
                _ => break,
            }
        }
        let body = parser.parse(StmtCompound::parse)?;
        Ok(Block { decls, body })
    }
}

/// A `const`, `var` or `type` keyword followed by one or more declarations,
/// continuing while the next token is an identifier
fn section<R, F>(
    parser: &mut BlockingParser<'_, R>,
    decls: &mut Vec<Decl>,
    mut declaration: F,
) -> SyntaxResult<()>
where
    R: Read,
    F: FnMut(&mut BlockingParser<'_, R>) -> SyntaxResult<Decl>,
{
    parser.consume()?;
    decls.push(declaration(parser)?);
    while parser.peek_identifier()? {
        decls.push(declaration(parser)?);
    }
    Ok(())
}

/// `name, name, ...`
pub(crate) fn identifier_list<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Vec<ExprVar>> {
    let mut names = vec![parser.parse(ExprVar::parse)?];
    while parser.consume_separator(Separator::Comma)?.is_some() {
        names.push(parser.parse(ExprVar::parse)?);
    }
    Ok(names)
}

impl Parsable for DeclConst {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let name = parser.parse(ExprVar::parse)?;
        let ty = match parser.consume_separator(Separator::Colon)? {
            Some(_) => Some(parser.parse(TypeNode::parse)?),
            None => None,
        };
        parser.expect_operator(Operator::Equal)?;
        let value = parser.parse(Expr::parse)?;
        parser.expect_separator(Separator::Semicolon)?;
        Ok(DeclConst { name, ty, value })
    }
}

impl Parsable for DeclVar {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let names = identifier_list(parser)?;
        parser.expect_separator(Separator::Colon)?;
        let ty = parser.parse(TypeNode::parse)?;
        let init = match parser.consume_if(|token| token.is_operator(Operator::Equal))? {
            Some(_) => Some(parser.parse(Expr::parse)?),
            None => None,
        };
        parser.expect_separator(Separator::Semicolon)?;
        Ok(DeclVar { names, ty, init })
    }
}

impl Parsable for DeclType {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let name = parser.parse(ExprVar::parse)?;
        parser.expect_operator(Operator::Equal)?;
        let ty = parser.parse(TypeNode::parse)?;
        parser.expect_separator(Separator::Semicolon)?;
        Ok(DeclType { name, ty })
    }
}

impl Parsable for Param {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let mode = if parser.consume_keyword(Keyword::Const)?.is_some() {
            ParamMode::Const
        } else if parser.consume_keyword(Keyword::Var)?.is_some() {
            ParamMode::Var
        } else {
            ParamMode::Value
        };
        let names = identifier_list(parser)?;
        parser.expect_separator(Separator::Colon)?;
        let ty = parser.parse(TypeNode::parse)?;
        Ok(Param { mode, names, ty })
    }
}

/// `( [param (; param)*] )`
fn parameter_list<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Vec<Param>> {
    parser.expect_separator(Separator::LParen)?;
    let mut params = vec![];
    if !parser.peek_separator(Separator::RParen)? {
        params.push(parser.parse(Param::parse)?);
        while parser.consume_separator(Separator::Semicolon)?.is_some() {
            params.push(parser.parse(Param::parse)?);
        }
    }
    parser.expect_separator(Separator::RParen)?;
    Ok(params)
}

impl Parsable for DeclProcedure {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let keyword = parser.expect_keyword(Keyword::Procedure)?;
        let name = parser.parse(ExprVar::parse)?;
        let params = parser.parse(parameter_list)?;
        parser.expect_separator(Separator::Semicolon)?;
        let block = parser.parse(Block::parse)?;
        parser.expect_separator(Separator::Semicolon)?;
        Ok(DeclProcedure {
            keyword,
            name,
            params,
            block,
        })
    }
}

impl Parsable for DeclFunction {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let keyword = parser.expect_keyword(Keyword::Function)?;
        let name = parser.parse(ExprVar::parse)?;
        let params = parser.parse(parameter_list)?;
        if parser.consume_separator(Separator::Colon)?.is_none() {
            return Err(parser.error(ErrorKind::expected_token("':' and a return type")));
        }
        let returns = parser.parse(TypeNode::parse)?;
        parser.expect_separator(Separator::Semicolon)?;
        let block = parser.parse(Block::parse)?;
        parser.expect_separator(Separator::Semicolon)?;
        Ok(DeclFunction {
            procedure: DeclProcedure {
                keyword,
                name,
                params,
                block,
            },
            returns,
        })
    }
}
