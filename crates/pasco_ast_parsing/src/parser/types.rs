//! Type expressions

use crate::parser::blocking::{BlockingParser, Parsable};
use crate::parser::items::identifier_list;
use crate::parser::{ErrorKind, SyntaxResult};
use pasco_ast::expr::{Expr, ExprVar, Range};
use pasco_ast::types::{Field, TypeArray, TypeNode, TypeRecord, TypeSimple};
use pasco_tokens::token::{Keyword, Separator, TokenKind};
use std::io::Read;

impl Parsable for TypeNode {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let kind = parser.peek()?.kind().clone();
        match kind {
            TokenKind::Identifier(_) => {
                let name = parser.parse(ExprVar::parse)?;
                Ok(TypeNode::Simple(TypeSimple::new(name)))
            }
            TokenKind::Keyword(Keyword::String) => {
                let name = parser.consume()?.into_identifier();
                Ok(TypeNode::Simple(TypeSimple::new(ExprVar::new(name))))
            }
            TokenKind::Keyword(Keyword::Array) => parser.parse(TypeArray::parse).map(TypeNode::Array),
            TokenKind::Keyword(Keyword::Record) => {
                parser.parse(TypeRecord::parse).map(TypeNode::Record)
            }
            _ => Err(parser.error(ErrorKind::expected_token("type"))),
        }
    }
}

impl Parsable for TypeArray {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let keyword = parser.expect_keyword(Keyword::Array)?;
        parser.expect_separator(Separator::LBracket)?;
        let mut ranges = vec![parser.parse(Range::parse)?];
        while parser.consume_separator(Separator::Comma)?.is_some() {
            ranges.push(parser.parse(Range::parse)?);
        }
        parser.expect_separator(Separator::RBracket)?;
        parser.expect_keyword(Keyword::Of)?;
        let element = parser.parse(TypeNode::parse)?;
        Ok(TypeArray::new(keyword, ranges, element))
    }
}

impl Parsable for Range {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let first = parser.parse(Expr::parse)?;
        parser.expect_separator(Separator::DoublePeriod)?;
        let last = parser.parse(Expr::parse)?;
        Ok(Range::new(first, last))
    }
}

impl Parsable for TypeRecord {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let keyword = parser.expect_keyword(Keyword::Record)?;
        let mut fields = vec![];
        while parser.peek_identifier()? {
            fields.push(parser.parse(Field::parse)?);
            if parser.consume_separator(Separator::Semicolon)?.is_none() {
                break;
            }
        }
        parser.expect_keyword(Keyword::End)?;
        Ok(TypeRecord::new(keyword, fields))
    }
}

impl Parsable for Field {
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self> {
        let names = identifier_list(parser)?;
        parser.expect_separator(Separator::Colon)?;
        let ty = parser.parse(TypeNode::parse)?;
        Ok(Field { names, ty })
    }
}
