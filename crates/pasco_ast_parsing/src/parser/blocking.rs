//! blocking parser

use crate::lexer::Lexer;
pub use crate::parser::traits::{Parsable, Parser};
use crate::parser::{ErrorKind, SyntaxError, SyntaxResult};
use pasco_ast::items::Program;
use pasco_tokens::token::{Keyword, Operator, Separator, Token, TokenKind};
use pasco_tokens::{Position, Positioned};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::trace;

#[derive(Debug, Default)]
enum State {
    #[default]
    Uninit,
    Lookahead(Token),
    Eof,
    Poisoned,
}

/// Creates the syntax tree from a token stream.
///
/// Tokens are pulled from the lexer one at a time, with a single token of
/// lookahead. There is no backtracking and no error recovery, the first error
/// ends the parse.
///
/// # Examples
/// Create from an existing lexer
/// ```
/// # use std::path::Path;
/// # use pasco_ast_parsing::lexer::Lexer;
/// # use pasco_ast_parsing::parser::blocking::BlockingParser;
/// let lexer = Lexer::new(Path::new("test_path"), "begin end.".as_bytes());
/// let mut parser = BlockingParser::from(lexer);
/// let program = parser.parse_program().unwrap();
/// assert!(program.block.body.stmts.is_empty());
/// ```
#[derive(Debug)]
pub struct BlockingParser<'p, R: Read> {
    lexer: Lexer<'p, R>,
    state: State,
    last_position: Option<Position>,
    non_terminals: Vec<&'static str>,
}

impl<'p, R: Read> BlockingParser<'p, R> {
    /// Creates a new parser with a given lexer
    pub fn new(lexer: Lexer<'p, R>) -> Self {
        Self {
            lexer,
            state: State::default(),
            last_position: None,
            non_terminals: vec![],
        }
    }

    /// Parses a whole program, `[program name;] block .`
    pub fn parse_program(&mut self) -> SyntaxResult<Program> {
        self.parse(Program::parse)
    }

    fn next_token(&mut self) -> SyntaxResult<()> {
        match self.lexer.next() {
            None => self.state = State::Eof,
            Some(Ok(token)) => self.state = State::Lookahead(token),
            Some(Err(e)) => {
                self.state = State::Poisoned;
                let position = e.position();
                return Err(SyntaxError::new(
                    ErrorKind::Lex(e),
                    position,
                    self.non_terminals.clone(),
                ));
            }
        }
        Ok(())
    }

    /// peek the current lookahead
    pub(crate) fn peek(&mut self) -> SyntaxResult<&Token> {
        if matches!(self.state, State::Uninit) {
            self.next_token()?;
        }
        match &self.state {
            State::Lookahead(token) => Ok(token),
            State::Poisoned => Err(self.error(ErrorKind::ParserPoisoned)),
            State::Uninit | State::Eof => Err(self.error(ErrorKind::UnexpectedEof)),
        }
    }

    pub(crate) fn consume(&mut self) -> SyntaxResult<Token> {
        if matches!(self.state, State::Uninit) {
            self.next_token()?;
        }
        match std::mem::replace(&mut self.state, State::Poisoned) {
            State::Lookahead(token) => {
                trace!("consumed {token:?}");
                self.last_position = Some(token.position());
                self.next_token()?;
                Ok(token)
            }
            State::Poisoned => Err(self.error(ErrorKind::ParserPoisoned)),
            State::Uninit | State::Eof => {
                self.state = State::Eof;
                Err(self.error(ErrorKind::UnexpectedEof))
            }
        }
    }

    /// consumes if predicate matches
    pub(crate) fn consume_if<F>(&mut self, predicate: F) -> SyntaxResult<Option<Token>>
    where
        F: FnOnce(&Token) -> bool,
    {
        if predicate(self.peek()?) {
            self.consume().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Checks the lookahead without consuming it
    pub(crate) fn peek_is<F>(&mut self, predicate: F) -> SyntaxResult<bool>
    where
        F: FnOnce(&Token) -> bool,
    {
        Ok(predicate(self.peek()?))
    }

    pub(crate) fn peek_keyword(&mut self, keyword: Keyword) -> SyntaxResult<bool> {
        self.peek_is(|token| token.is_keyword(keyword))
    }

    pub(crate) fn peek_separator(&mut self, separator: Separator) -> SyntaxResult<bool> {
        self.peek_is(|token| token.is_separator(separator))
    }

    pub(crate) fn peek_identifier(&mut self) -> SyntaxResult<bool> {
        self.peek_is(|token| matches!(token.kind(), TokenKind::Identifier(_)))
    }

    pub(crate) fn consume_keyword(&mut self, keyword: Keyword) -> SyntaxResult<Option<Token>> {
        self.consume_if(|token| token.is_keyword(keyword))
    }

    pub(crate) fn consume_separator(&mut self, separator: Separator) -> SyntaxResult<Option<Token>> {
        self.consume_if(|token| token.is_separator(separator))
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> SyntaxResult<Token> {
        match self.consume_keyword(keyword)? {
            Some(token) => Ok(token),
            None => {
                let expected = format!("'{}'", keyword.to_string().to_lowercase());
                Err(self.error(ErrorKind::ExpectedToken(expected)))
            }
        }
    }

    pub(crate) fn expect_separator(&mut self, separator: Separator) -> SyntaxResult<Token> {
        match self.consume_separator(separator)? {
            Some(token) => Ok(token),
            None => {
                let expected = format!("'{}'", separator.as_str());
                Err(self.error(ErrorKind::ExpectedToken(expected)))
            }
        }
    }

    pub(crate) fn expect_operator(&mut self, operator: Operator) -> SyntaxResult<Token> {
        match self.consume_if(|token| token.is_operator(operator))? {
            Some(token) => Ok(token),
            None => {
                let expected = format!("'{}'", operator.as_str());
                Err(self.error(ErrorKind::ExpectedToken(expected)))
            }
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> SyntaxResult<Token> {
        match self.consume_if(|token| matches!(token.kind(), TokenKind::Identifier(_)))? {
            Some(token) => Ok(token),
            None => Err(self.error(ErrorKind::expected_token("identifier"))),
        }
    }

    /// Gets if this parser is at EOF
    pub fn eof(&self) -> bool {
        match &self.state {
            State::Lookahead(token) => token.is_eof(),
            State::Eof => true,
            _ => false,
        }
    }

    /// Fails unless only the end of input is left
    pub fn finish(&mut self) -> SyntaxResult<()> {
        if self.peek()?.is_eof() {
            Ok(())
        } else {
            Err(self.error(ErrorKind::expected_token("end of input")))
        }
    }

    /// Wrapper function for parsing an item
    #[inline]
    pub fn parse<O, P: Parser<R, O>>(&mut self, mut parser: P) -> SyntaxResult<O> {
        let non_terminal = parser.non_terminal();
        trace!("starting parsing {non_terminal}");
        self.non_terminals.push(non_terminal);
        let result = parser.parse(self);
        if result.is_ok() {
            self.non_terminals.pop();
            trace!("finished parsing {non_terminal}");
        }
        result
    }

    /// Creates an error at the lookahead token, or right after the last
    /// consumed token if there is no lookahead
    pub(crate) fn error(&self, kind: ErrorKind) -> SyntaxError {
        let position = match &self.state {
            State::Lookahead(token) => Some(token.position()),
            _ => self.last_position,
        };
        SyntaxError::new(kind, position, self.non_terminals.clone())
    }
}

impl<'p> BlockingParser<'p, File> {
    /// Creates a new parser for a given file
    pub fn with_file(path: &'p Path) -> SyntaxResult<Self> {
        let lexer = Lexer::read_path(path)?;
        Ok(Self::new(lexer))
    }
}

impl<'p, R: Read> From<Lexer<'p, R>> for BlockingParser<'p, R> {
    fn from(value: Lexer<'p, R>) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::test_parser;
    use std::io::Write as _;
    use tempfile::NamedTempFile;
    use test_log::test;

    #[test]
    fn test_create_parser_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "var x: real;").expect("could not write");
        let path = temp_file.path();
        let mut parser = BlockingParser::with_file(path).unwrap();
        let token = parser.peek().unwrap();
        assert_eq!(token.kind(), &TokenKind::Keyword(Keyword::Var));
        assert_eq!(token.position(), Position::new(1, 1));
    }

    #[test]
    fn test_consume() {
        test_parser("var x: real;", |parser, _| {
            let consumed_token = parser.consume().unwrap();
            assert!(consumed_token.is_keyword(Keyword::Var));
            let token = parser.peek().unwrap();
            assert_eq!(token.kind(), &TokenKind::Identifier("x".to_string()));
            assert_eq!(token.position(), Position::new(1, 5));
        });
    }

    #[test]
    fn test_consume_if() {
        test_parser("var x: real;", |parser, _| {
            assert!(parser
                .consume_if(|tok| tok.is_operator(Operator::MultiplyAssign))
                .unwrap()
                .is_none());
            assert!(parser
                .consume_if(|tok| tok.is_keyword(Keyword::Var))
                .unwrap()
                .is_some());
        });
    }

    #[test]
    fn test_consume_past_eof() {
        test_parser("", |parser, _| {
            assert!(!parser.eof());
            assert!(parser.peek().unwrap().is_eof());
            assert!(parser.eof());
            assert!(parser.consume().unwrap().is_eof());
            let err = parser.consume().unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::UnexpectedEof));
        });
    }

    #[test]
    fn test_finish() {
        test_parser("begin end. x", |parser, _| {
            parser.parse_program().unwrap();
            let err = parser.finish().unwrap_err();
            assert_eq!(err.to_string(), "(1, 12) end of input expected");
        });
        test_parser("begin end.", |parser, _| {
            parser.parse_program().unwrap();
            parser.finish().unwrap();
        });
    }

    #[test]
    fn test_lex_error_poisons() {
        test_parser("x ! y", |parser, _| {
            parser.consume().unwrap_err();
            let err = parser.peek().unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::ParserPoisoned));
        });
    }

    #[test]
    fn test_expected_token_message() {
        test_parser("x", |parser, _| {
            let err = parser.expect_separator(Separator::RParen).unwrap_err();
            assert_eq!(err.to_string(), "(1, 1) ')' expected");
        });
    }
}
