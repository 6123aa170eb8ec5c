//! A lexical token from a source file

use crate::position::{Position, Positioned};
use std::fmt::{Debug, Display, Formatter};

/// A lexical token from a source file
#[derive(Clone, PartialEq)]
pub struct Token {
    position: Position,
    kind: TokenKind,
    raw: String,
}

impl Token {
    /// Creates a new token
    pub fn new(position: Position, kind: TokenKind, raw: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            raw: raw.into(),
        }
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The exact slice of source text this token was scanned from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Checks if this is the end of input token
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Checks if this token is the given keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.kind, TokenKind::Keyword(k) if k == keyword)
    }

    /// Checks if this token is the given operator
    pub fn is_operator(&self, operator: Operator) -> bool {
        matches!(self.kind, TokenKind::Operator(o) if o == operator)
    }

    /// Checks if this token is the given separator
    pub fn is_separator(&self, separator: Separator) -> bool {
        matches!(self.kind, TokenKind::Separator(s) if s == separator)
    }

    /// Gets the identifier name if this is an identifier
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Converts a keyword token into an identifier token, keeping position and raw text.
    ///
    /// Used for keywords that are also allowed to name things, such as `string`.
    pub fn into_identifier(self) -> Self {
        match self.kind {
            TokenKind::Keyword(_) => Self {
                kind: TokenKind::Identifier(self.raw.to_lowercase()),
                ..self
            },
            _ => self,
        }
    }
}

impl Positioned for Token {
    fn position(&self) -> Position {
        self.position
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{:?}", self.kind, self.position)
    }
}

/// Renders the token the way the token dump expects it:
/// `line<TAB>column<TAB>kind[<TAB>value]<TAB>raw`, with the end of input only
/// showing its position and kind.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = (&self.kind).into();
        write!(
            f,
            "{}\t{}\t{}",
            self.position.line(),
            self.position.column(),
            name
        )?;
        match &self.kind {
            TokenKind::Eof => Ok(()),
            TokenKind::Identifier(v) | TokenKind::String(v) => write!(f, "\t{v}\t{}", self.raw),
            TokenKind::Integer(v) => write!(f, "\t{v}\t{}", self.raw),
            TokenKind::Real(v) => write!(f, "\t{v}\t{}", self.raw),
            TokenKind::Keyword(v) => write!(f, "\t{v}\t{}", self.raw),
            TokenKind::Operator(v) => write!(f, "\t{v}\t{}", self.raw),
            TokenKind::Separator(v) => write!(f, "\t{v}\t{}", self.raw),
        }
    }
}

/// The kind for this token, along with its decoded value
#[derive(Debug, Clone, PartialEq, strum::IntoStaticStr)]
pub enum TokenKind {
    /// End of input, will only appear at the end of a token stream
    Eof,
    /// A lower-cased identifier
    Identifier(String),
    Integer(i32),
    Real(f64),
    /// A decoded string literal
    String(String),
    Keyword(Keyword),
    Operator(Operator),
    Separator(Separator),
}

/// Reserved words. Matched case-insensitively against scanned identifiers.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Keyword {
    And,
    Array,
    Asm,
    Begin,
    Break,
    Case,
    Const,
    Constructor,
    Continue,
    Destructor,
    Div,
    Do,
    Downto,
    Else,
    End,
    False,
    For,
    Function,
    Goto,
    If,
    Implementation,
    In,
    Inline,
    Interface,
    Label,
    Mod,
    Nil,
    Not,
    Object,
    Of,
    On,
    Operator,
    Or,
    Packed,
    Procedure,
    Program,
    Record,
    Repeat,
    Set,
    Shl,
    Shr,
    String,
    Then,
    To,
    True,
    Type,
    Unit,
    Until,
    Uses,
    Var,
    While,
    With,
    Xor,
    As,
    Class,
    Constref,
    Dispose,
    Except,
    Exit,
    Exports,
    Finalization,
    Finally,
    Inherited,
    Initialization,
    Is,
    Library,
    New,
    Out,
    Property,
    Raise,
    #[strum(serialize = "SELF")]
    SelfKw,
    Threadvar,
    Try,
    Absolute,
    Abstract,
    Alias,
    Assembler,
    Cdecl,
    Cppdecl,
    Default,
    Export,
    External,
    Forward,
    Generic,
    Index,
    Local,
    Name,
    Nostackframe,
    Oldfpccall,
    Override,
    Pascal,
    Private,
    Protected,
    Public,
    Published,
    Read,
    Readln,
    Register,
    Reintroduce,
    Safecall,
    Softfloat,
    Specialize,
    Stdcall,
    Virtual,
    Write,
    Writeln,
}

/// Operator tags
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// `=`
    Equal,
    /// `<>`
    Unequal,
    /// `<=`
    LessEqual,
    /// `<`
    Less,
    /// `>=`
    GreaterEqual,
    /// `><`
    SymDiff,
    /// `>`
    Greater,
    /// `+=`
    AddAssign,
    /// `+`
    Add,
    /// `-=`
    SubtractAssign,
    /// `-`
    Subtract,
    /// `*=`
    MultiplyAssign,
    /// `*`
    Multiply,
    /// `/=`
    DivisionAssign,
    /// `/`
    Division,
    /// `@`
    At,
    /// `^`
    Circumflex,
    /// `:=`
    Assign,
}

impl Operator {
    /// The source spelling of this operator
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::Unequal => "<>",
            Operator::LessEqual => "<=",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::SymDiff => "><",
            Operator::Greater => ">",
            Operator::AddAssign => "+=",
            Operator::Add => "+",
            Operator::SubtractAssign => "-=",
            Operator::Subtract => "-",
            Operator::MultiplyAssign => "*=",
            Operator::Multiply => "*",
            Operator::DivisionAssign => "/=",
            Operator::Division => "/",
            Operator::At => "@",
            Operator::Circumflex => "^",
            Operator::Assign => ":=",
        }
    }

    /// Whether this operator is one of the assignment forms
    pub const fn is_assignment(&self) -> bool {
        matches!(
            self,
            Operator::Assign
                | Operator::AddAssign
                | Operator::SubtractAssign
                | Operator::MultiplyAssign
                | Operator::DivisionAssign
        )
    }
}

/// Separator tags
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Separator {
    /// `..`
    DoublePeriod,
    /// `.`
    Period,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
}

impl Separator {
    /// The source spelling of this separator
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::DoublePeriod => "..",
            Separator::Period => ".",
            Separator::Comma => ",",
            Separator::Semicolon => ";",
            Separator::Colon => ":",
            Separator::LParen => "(",
            Separator::RParen => ")",
            Separator::LBracket => "[",
            Separator::RBracket => "]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;
    use test_log::test;

    #[test]
    fn test_keyword_lookup_ignores_case() {
        assert_eq!(Keyword::from_str("begin"), Ok(Keyword::Begin));
        assert_eq!(Keyword::from_str("DownTo"), Ok(Keyword::Downto));
        assert_eq!(Keyword::from_str("self"), Ok(Keyword::SelfKw));
        assert_eq!(Keyword::from_str("writeLn"), Ok(Keyword::Writeln));
        assert!(Keyword::from_str("beginning").is_err());
    }

    #[test]
    fn test_every_keyword_parses_from_its_lowercase_spelling() {
        for keyword in Keyword::iter() {
            let spelling = keyword.to_string().to_lowercase();
            assert_eq!(Keyword::from_str(&spelling), Ok(keyword), "{spelling}");
        }
    }

    #[test]
    fn test_keyword_display() {
        assert_eq!(Keyword::Nostackframe.to_string(), "NOSTACKFRAME");
        assert_eq!(Keyword::SelfKw.to_string(), "SELF");
    }

    #[test]
    fn test_token_dump_format() {
        let token = Token::new(
            Position::new(2, 5),
            TokenKind::Identifier("counter".to_string()),
            "Counter",
        );
        assert_eq!(token.to_string(), "2\t5\tIdentifier\tcounter\tCounter");

        let token = Token::new(
            Position::new(1, 3),
            TokenKind::Separator(Separator::DoublePeriod),
            "..",
        );
        assert_eq!(token.to_string(), "1\t3\tSeparator\tDOUBLE_PERIOD\t..");

        let eof = Token::new(Position::new(9, 1), TokenKind::Eof, "");
        assert_eq!(eof.to_string(), "9\t1\tEof");
    }

    #[test]
    fn test_into_identifier() {
        let token = Token::new(
            Position::new(1, 1),
            TokenKind::Keyword(Keyword::String),
            "String",
        );
        let converted = token.into_identifier();
        assert_eq!(converted.identifier(), Some("string"));
        assert_eq!(converted.raw(), "String");
    }
}
