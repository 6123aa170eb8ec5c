//! Responsible with converting a [io::Read] obj into a token stream

use crate::lexer::char_stream::CharStream;
use pasco_tokens::token::{Keyword, Operator, Separator, Token, TokenKind};
use pasco_tokens::{Position, PositionedError};
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

mod char_stream;

/// Responsible with converting a [Read] obj into a token stream.
///
/// Tokens are scanned on demand. Iterating yields the end of input token
/// exactly once, and stops after it or after the first error.
#[derive(Debug)]
pub struct Lexer<'p, R> {
    path: &'p Path,
    chars: CharStream<R>,
    finished: bool,
}

impl<'p> Lexer<'p, File> {
    /// Creates a new lexer from a path
    pub fn read_path(path: &'p Path) -> io::Result<Self> {
        let reader = File::open(path)?;
        Ok(Self::new(path, reader))
    }
}

impl<'p, R: Read> Lexer<'p, R> {
    /// Creates a new lexer. The path is only used as a label.
    pub fn new(path: &'p Path, reader: R) -> Self {
        Self {
            path,
            chars: CharStream::new(reader),
            finished: false,
        }
    }

    /// The label of the source being scanned
    pub fn path(&self) -> &'p Path {
        self.path
    }

    /// Scans the next token. Returns the end of input token once the source is
    /// exhausted.
    pub fn next_token(&mut self) -> LexResult<Token> {
        self.skip_trivia()?;
        let start = self.chars.position();
        let Some(c) = self.chars.advance()? else {
            return Ok(Token::new(start, TokenKind::Eof, ""));
        };
        let token = match c {
            '=' => operator(start, Operator::Equal),
            '<' => self.compound(
                start,
                c,
                &[('>', Operator::Unequal), ('=', Operator::LessEqual)],
                Operator::Less,
            )?,
            '>' => self.compound(
                start,
                c,
                &[('=', Operator::GreaterEqual), ('<', Operator::SymDiff)],
                Operator::Greater,
            )?,
            '+' => self.compound(start, c, &[('=', Operator::AddAssign)], Operator::Add)?,
            '-' => self.compound(
                start,
                c,
                &[('=', Operator::SubtractAssign)],
                Operator::Subtract,
            )?,
            '*' => self.compound(
                start,
                c,
                &[('=', Operator::MultiplyAssign)],
                Operator::Multiply,
            )?,
            '/' => self.compound(
                start,
                c,
                &[('=', Operator::DivisionAssign)],
                Operator::Division,
            )?,
            '@' => operator(start, Operator::At),
            '^' => operator(start, Operator::Circumflex),
            ':' => {
                if self.chars.peek()? == Some('=') {
                    self.chars.advance()?;
                    operator(start, Operator::Assign)
                } else {
                    separator(start, Separator::Colon)
                }
            }
            '.' => {
                if self.chars.peek()? == Some('.') {
                    self.chars.advance()?;
                    separator(start, Separator::DoublePeriod)
                } else {
                    separator(start, Separator::Period)
                }
            }
            ',' => separator(start, Separator::Comma),
            ';' => separator(start, Separator::Semicolon),
            '(' => separator(start, Separator::LParen),
            ')' => separator(start, Separator::RParen),
            '[' => separator(start, Separator::LBracket),
            ']' => separator(start, Separator::RBracket),
            '\'' | '#' => self.scan_string(start, c)?,
            '$' => self.scan_radix(start, c, 16)?,
            '&' => self.scan_radix(start, c, 8)?,
            '%' => self.scan_radix(start, c, 2)?,
            '0'..='9' => self.scan_decimal(start, c)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(start, c)?,
            c => return Err(LexingError::new(LexErrorKind::UnexpectedCharacter(c), start)),
        };
        trace!("scanned {token:?}");
        Ok(token)
    }

    /// Skips whitespace and all three comment forms
    fn skip_trivia(&mut self) -> LexResult<()> {
        loop {
            let start = self.chars.position();
            match self.chars.peek()? {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.chars.advance()?;
                }
                Some('{') => {
                    self.chars.advance()?;
                    loop {
                        match self.chars.advance()? {
                            Some('}') => break,
                            Some(_) => {}
                            None => return Err(unterminated_comment(start)),
                        }
                    }
                }
                Some('(') => {
                    self.chars.advance()?;
                    if self.chars.peek()? != Some('*') {
                        self.chars.pushback();
                        return Ok(());
                    }
                    self.chars.advance()?;
                    loop {
                        match self.chars.advance()? {
                            Some('*') if self.chars.peek()? == Some(')') => {
                                self.chars.advance()?;
                                break;
                            }
                            Some(_) => {}
                            None => return Err(unterminated_comment(start)),
                        }
                    }
                }
                Some('/') => {
                    self.chars.advance()?;
                    if self.chars.peek()? != Some('/') {
                        self.chars.pushback();
                        return Ok(());
                    }
                    while !matches!(self.chars.advance()?, Some('\n') | None) {}
                }
                _ => return Ok(()),
            }
        }
    }

    /// An operator that may be followed by one more character to form a
    /// longer operator
    fn compound(
        &mut self,
        start: Position,
        first: char,
        longer: &[(char, Operator)],
        otherwise: Operator,
    ) -> LexResult<Token> {
        if let Some(next) = self.chars.peek()? {
            if let Some((_, op)) = longer.iter().find(|(c, _)| *c == next) {
                self.chars.advance()?;
                return Ok(Token::new(
                    start,
                    TokenKind::Operator(*op),
                    format!("{first}{next}"),
                ));
            }
        }
        Ok(operator(start, otherwise))
    }

    fn take_digits(&mut self, raw: &mut String, radix: u32) -> LexResult<()> {
        while let Some(c) = self.chars.peek()? {
            if !c.is_digit(radix) {
                break;
            }
            self.chars.advance()?;
            raw.push(c);
        }
        Ok(())
    }

    fn scan_decimal(&mut self, start: Position, first: char) -> LexResult<Token> {
        let mut raw = String::from(first);
        let mut real = false;
        self.take_digits(&mut raw, 10)?;

        if self.chars.peek()? == Some('.') {
            self.chars.advance()?;
            if self.chars.peek()? == Some('.') {
                // `1..5` is a range, not `1.` followed by `.5`
                self.chars.pushback();
            } else {
                raw.push('.');
                real = true;
                self.take_digits(&mut raw, 10)?;
            }
        }

        if let Some(e @ ('e' | 'E')) = self.chars.peek()? {
            self.chars.advance()?;
            raw.push(e);
            real = true;
            if let Some(sign @ ('+' | '-')) = self.chars.peek()? {
                self.chars.advance()?;
                raw.push(sign);
            }
            if !matches!(self.chars.peek()?, Some(c) if c.is_ascii_digit()) {
                return Err(LexingError::new(LexErrorKind::InvalidNumericLiteral, start));
            }
            self.take_digits(&mut raw, 10)?;
        }

        let kind = if real {
            TokenKind::Real(raw.parse::<f64>().unwrap_or(f64::INFINITY))
        } else {
            let value = raw
                .parse::<i32>()
                .map_err(|_| LexingError::new(LexErrorKind::IntegerOverflow, start))?;
            TokenKind::Integer(value)
        };
        Ok(Token::new(start, kind, raw))
    }

    /// `$` hex, `&` octal and `%` binary literals. These are integer only.
    fn scan_radix(&mut self, start: Position, prefix: char, radix: u32) -> LexResult<Token> {
        if !matches!(self.chars.peek()?, Some(c) if c.is_digit(radix)) {
            return Err(LexingError::new(
                LexErrorKind::UnexpectedCharacter(prefix),
                start,
            ));
        }
        let mut raw = String::from(prefix);
        self.take_digits(&mut raw, radix)?;

        if self.chars.peek()? == Some('.') {
            self.chars.advance()?;
            if self.chars.peek()? == Some('.') {
                self.chars.pushback();
            } else {
                return Err(LexingError::new(LexErrorKind::InvalidNumericLiteral, start));
            }
        }

        let value = i32::from_str_radix(&raw[prefix.len_utf8()..], radix)
            .map_err(|_| LexingError::new(LexErrorKind::IntegerOverflow, start))?;
        Ok(Token::new(start, TokenKind::Integer(value), raw))
    }

    fn scan_identifier(&mut self, start: Position, first: char) -> LexResult<Token> {
        let mut raw = String::from(first);
        while let Some(c) = self.chars.peek()? {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            self.chars.advance()?;
            raw.push(c);
        }
        let kind = match Keyword::from_str(&raw) {
            Ok(keyword) => TokenKind::Keyword(keyword),
            Err(_) => TokenKind::Identifier(raw.to_lowercase()),
        };
        Ok(Token::new(start, kind, raw))
    }

    /// Quoted runs and `#code` segments, chained together into one literal.
    ///
    /// A quoted run can only be continued by a `#code`, while a `#code` can be
    /// continued by either form.
    fn scan_string(&mut self, start: Position, first: char) -> LexResult<Token> {
        let mut raw = String::new();
        let mut value = String::new();
        let mut segment = Some(first);

        while let Some(opener) = segment {
            raw.push(opener);
            if opener == '\'' {
                loop {
                    match self.chars.advance()? {
                        Some('\'') => break,
                        Some('\n') | None => {
                            return Err(LexingError::new(LexErrorKind::UnterminatedString, start))
                        }
                        Some(c) => {
                            raw.push(c);
                            value.push(c);
                        }
                    }
                }
                raw.push('\'');
                segment = match self.chars.peek()? {
                    Some('#') => self.chars.advance()?,
                    _ => None,
                };
            } else {
                let code = self.scan_char_code(start, &mut raw)?;
                value.push(char::from(code));
                segment = match self.chars.peek()? {
                    Some('\'' | '#') => self.chars.advance()?,
                    _ => None,
                };
            }
        }

        Ok(Token::new(start, TokenKind::String(value), raw))
    }

    fn scan_char_code(&mut self, start: Position, raw: &mut String) -> LexResult<u8> {
        match self.chars.peek()? {
            Some(c) if c.is_ascii_digit() => {}
            other => {
                return Err(LexingError::new(
                    LexErrorKind::UnexpectedCharacter(other.unwrap_or('#')),
                    start,
                ))
            }
        }
        let mut code = 0_u32;
        while let Some(c) = self.chars.peek()? {
            let Some(digit) = c.to_digit(10) else {
                break;
            };
            self.chars.advance()?;
            raw.push(c);
            code = code.saturating_mul(10).saturating_add(digit);
        }
        u8::try_from(code).map_err(|_| LexingError::new(LexErrorKind::InvalidCharCode(code), start))
    }
}

fn operator(position: Position, op: Operator) -> Token {
    Token::new(position, TokenKind::Operator(op), op.as_str())
}

fn separator(position: Position, sep: Separator) -> Token {
    Token::new(position, TokenKind::Separator(sep), sep.as_str())
}

fn unterminated_comment(position: Position) -> LexingError {
    LexingError::new(LexErrorKind::UnterminatedComment, position)
}

impl<'p, R: Read> Iterator for Lexer<'p, R> {
    type Item = LexResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        self.finished = match &result {
            Ok(token) => token.is_eof(),
            Err(_) => true,
        };
        Some(result)
    }
}

pub type LexResult<T> = Result<T, LexingError>;

/// An error that occurred while scanning, positioned at the start of the
/// lexeme being scanned
pub type LexingError = PositionedError<LexErrorKind>;

#[derive(Debug, Error)]
pub enum LexErrorKind {
    #[error("Unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("Unterminated comment")]
    UnterminatedComment,
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Invalid character code #{0}")]
    InvalidCharCode(u32),
    #[error("Invalid numeric literal")]
    InvalidNumericLiteral,
    #[error("Integer overflow")]
    IntegerOverflow,
    #[error("Source is not valid UTF-8")]
    InvalidUtf8,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasco_tokens::Positioned;
    use test_log::test;

    fn lex(src: &str) -> LexResult<Vec<Token>> {
        Lexer::new(Path::new("test"), src.as_bytes()).collect()
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        match lex(src) {
            Ok(tokens) => tokens.into_iter().map(|t| t.kind().clone()).collect(),
            Err(e) => panic!("{src:?} failed to scan: {e}"),
        }
    }

    fn error(src: &str) -> LexingError {
        lex(src).expect_err("should not scan")
    }

    #[test]
    fn test_operators() {
        let scanned = lex("<> <= < >= >< > += + -= - *= * /= / := : = @ ^").unwrap();
        let raws = scanned.iter().map(|t| t.raw()).collect::<Vec<_>>();
        assert_eq!(
            raws,
            [
                "<>", "<=", "<", ">=", "><", ">", "+=", "+", "-=", "-", "*=", "*", "/=", "/", ":=",
                ":", "=", "@", "^", ""
            ]
        );
        assert_eq!(scanned[4].kind(), &TokenKind::Operator(Operator::SymDiff));
        assert_eq!(scanned[15].kind(), &TokenKind::Separator(Separator::Colon));
    }

    #[test]
    fn test_range_is_not_a_real() {
        assert_eq!(
            kinds("1..5"),
            [
                TokenKind::Integer(1),
                TokenKind::Separator(Separator::DoublePeriod),
                TokenKind::Integer(5),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("$A..%11"),
            [
                TokenKind::Integer(10),
                TokenKind::Separator(Separator::DoublePeriod),
                TokenKind::Integer(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_radix_literals() {
        assert_eq!(
            kinds("$ff &17 %101 42"),
            [
                TokenKind::Integer(255),
                TokenKind::Integer(15),
                TokenKind::Integer(5),
                TokenKind::Integer(42),
                TokenKind::Eof,
            ]
        );
        assert!(matches!(
            error("$g").kind(),
            LexErrorKind::UnexpectedCharacter('$')
        ));
        assert!(matches!(
            error("&8").kind(),
            LexErrorKind::UnexpectedCharacter('&')
        ));
        assert!(matches!(
            error("$1.5").kind(),
            LexErrorKind::InvalidNumericLiteral
        ));
    }

    #[test]
    fn test_reals() {
        assert_eq!(
            kinds("1.5 2e3 4.25E-2 5."),
            [
                TokenKind::Real(1.5),
                TokenKind::Real(2000.0),
                TokenKind::Real(0.0425),
                TokenKind::Real(5.0),
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("1e999")[0], TokenKind::Real(f64::INFINITY));
    }

    #[test]
    fn test_malformed_exponent() {
        let err = error("x := 12e+;");
        assert!(matches!(err.kind(), LexErrorKind::InvalidNumericLiteral));
        assert_eq!(err.position(), Some(Position::new(1, 6)));
    }

    #[test]
    fn test_integer_overflow() {
        assert_eq!(kinds("2147483647")[0], TokenKind::Integer(i32::MAX));
        assert!(matches!(
            error("2147483648").kind(),
            LexErrorKind::IntegerOverflow
        ));
        assert!(matches!(
            error("$100000000").kind(),
            LexErrorKind::IntegerOverflow
        ));
    }

    #[test]
    fn test_identifiers_and_keywords() {
        let tokens = lex("BeGiN MyVar _x1 end").unwrap();
        assert_eq!(tokens[0].kind(), &TokenKind::Keyword(Keyword::Begin));
        assert_eq!(tokens[0].raw(), "BeGiN");
        assert_eq!(
            tokens[1].kind(),
            &TokenKind::Identifier("myvar".to_string())
        );
        assert_eq!(tokens[1].raw(), "MyVar");
        assert_eq!(tokens[2].kind(), &TokenKind::Identifier("_x1".to_string()));
        assert_eq!(tokens[3].kind(), &TokenKind::Keyword(Keyword::End));
    }

    #[test]
    fn test_strings() {
        let tokens = lex("'A'#10'B' #65#66 'it''s'").unwrap();
        assert_eq!(tokens[0].kind(), &TokenKind::String("A\nB".to_string()));
        assert_eq!(tokens[0].raw(), "'A'#10'B'");
        assert_eq!(tokens[1].kind(), &TokenKind::String("AB".to_string()));
        assert_eq!(tokens[2].kind(), &TokenKind::String("it".to_string()));
        assert_eq!(tokens[3].kind(), &TokenKind::String("s".to_string()));
        assert_eq!(tokens[3].position(), Position::new(1, 22));
    }

    #[test]
    fn test_string_errors() {
        let err = error("x := 'abc\n'");
        assert!(matches!(err.kind(), LexErrorKind::UnterminatedString));
        assert_eq!(err.position(), Some(Position::new(1, 6)));
        assert!(matches!(
            error("'abc").kind(),
            LexErrorKind::UnterminatedString
        ));
        let err = error("  #256");
        assert!(matches!(err.kind(), LexErrorKind::InvalidCharCode(256)));
        assert_eq!(err.position(), Some(Position::new(1, 3)));
        assert!(matches!(
            error("#a").kind(),
            LexErrorKind::UnexpectedCharacter('a')
        ));
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = lex("{ one }\n(* two *) a // three\n(b)").unwrap();
        let raws = tokens.iter().map(|t| t.raw()).collect::<Vec<_>>();
        assert_eq!(raws, ["a", "(", "b", ")", ""]);
        assert_eq!(tokens[0].position(), Position::new(2, 11));
        assert_eq!(tokens[1].position(), Position::new(3, 1));
    }

    #[test]
    fn test_division_is_not_a_comment() {
        assert_eq!(
            kinds("a / b")[1],
            TokenKind::Operator(Operator::Division)
        );
    }

    #[test]
    fn test_unterminated_comments() {
        let err = error("a\n  { never closed");
        assert!(matches!(err.kind(), LexErrorKind::UnterminatedComment));
        assert_eq!(err.position(), Some(Position::new(2, 3)));
        assert!(matches!(
            error("(* *").kind(),
            LexErrorKind::UnterminatedComment
        ));
    }

    #[test]
    fn test_unexpected_character() {
        let err = error("a ! b");
        assert!(matches!(err.kind(), LexErrorKind::UnexpectedCharacter('!')));
        assert_eq!(err.to_string(), "(1, 3) Unexpected character '!'");
    }

    #[test]
    fn test_invalid_utf8_source() {
        let bytes: &[u8] = &[b'a', b' ', 0xC3, b'('];
        let mut lexer = Lexer::new(Path::new("test"), bytes);
        assert!(lexer.next().unwrap().is_ok());
        let err = lexer.next().unwrap().unwrap_err();
        assert!(matches!(err.kind(), LexErrorKind::InvalidUtf8));
        assert_eq!(err.position(), Some(Position::new(1, 3)));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_exponent_forms() {
        assert_eq!(
            kinds("1e2 1E+2 15e-1 1.5e1"),
            [
                TokenKind::Real(100.0),
                TokenKind::Real(100.0),
                TokenKind::Real(1.5),
                TokenKind::Real(15.0),
                TokenKind::Eof,
            ]
        );
        assert!(matches!(
            error("3e").kind(),
            LexErrorKind::InvalidNumericLiteral
        ));
    }

    #[test]
    fn test_eof_yielded_once() {
        let mut lexer = Lexer::new(Path::new("test"), "  ".as_bytes());
        let eof = lexer.next().unwrap().unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.position(), Position::new(1, 3));
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_token_dump() {
        let tokens = lex("x := 'a'").unwrap();
        let lines = tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                "1\t1\tIdentifier\tx\tx",
                "1\t3\tOperator\tASSIGN\t:=",
                "1\t6\tString\ta\t'a'",
                "1\t9\tEof",
            ]
        );
    }

    #[test]
    fn test_rescan_without_whitespace_matches() {
        let src = "if a<>b then x:=x+1 { c } else y := $f";
        let first = lex(src).unwrap();
        let joined = first.iter().map(|t| t.raw()).collect::<Vec<_>>().join(" ");
        let second = lex(&joined).unwrap();
        let first = first.iter().map(|t| t.kind()).collect::<Vec<_>>();
        let second = second.iter().map(|t| t.kind()).collect::<Vec<_>>();
        assert_eq!(first, second);
    }
}
