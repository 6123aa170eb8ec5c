use crate::parser::blocking::BlockingParser;
use crate::parser::SyntaxResult;
use std::any::type_name;
use std::io::Read;

/// Parser for syntax tree items
pub trait Parser<R: Read, O> {
    /// The name of the non-terminal this parser recognizes
    fn non_terminal(&self) -> &'static str;
    fn parse(&mut self, parser: &mut BlockingParser<'_, R>) -> SyntaxResult<O>;
}

impl<R, O, F> Parser<R, O> for F
where
    R: Read,
    F: FnMut(&mut BlockingParser<'_, R>) -> SyntaxResult<O>,
{
    fn non_terminal(&self) -> &'static str {
        type_name::<F>()
    }

    fn parse(&mut self, parser: &mut BlockingParser<'_, R>) -> SyntaxResult<O> {
        (self)(parser)
    }
}

/// Parse a syntax tree part
pub trait Parsable: Sized {
    /// Attempt to parse some syntax tree part
    fn parse<R: Read>(parser: &mut BlockingParser<'_, R>) -> SyntaxResult<Self>;
}
