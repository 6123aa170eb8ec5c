//! Responsible with running the front end stages over a source

use crate::compiler::passes::type_check::SemanticAnalyzer;
use pasco_ast::items::Program;
use pasco_ast_parsing::lexer::Lexer;
use pasco_ast_parsing::parser::blocking::BlockingParser;
use pasco_tokens::token::Token;
use pasco_types::SymbolTableStack;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument};

pub mod error;
pub mod passes;

pub use error::*;

/// A program that passed semantic analysis
#[derive(Debug)]
pub struct Checked {
    /// The syntax tree, with every expression annotated with its type
    pub program: Program,
    /// The global scope and the program scope, with every declaration in them
    pub symbols: SymbolTableStack,
}

/// Runs the lexer, the parser and the semantic analyzer.
///
/// Must be configured using a [PascocBuilder].
#[derive(Debug)]
pub struct Pascoc {
    allow_trailing_input: bool,
}

impl Pascoc {
    /// Creates the default PascocBuilder
    #[inline]
    pub fn builder() -> PascocBuilder {
        PascocBuilder::new()
    }

    /// Scans a file into tokens, ending with the end of input token
    #[instrument(skip(self))]
    pub fn tokens(&self, path: &Path) -> PascocResult<Vec<Token>> {
        let lexer = Lexer::read_path(path)?;
        Self::collect_tokens(lexer)
    }

    /// Scans a reader into tokens. The label is used in diagnostics only.
    #[instrument(skip(self, reader))]
    pub fn tokens_reader<R: Read>(&self, label: &Path, reader: R) -> PascocResult<Vec<Token>> {
        Self::collect_tokens(Lexer::new(label, reader))
    }

    /// Parses a file into a syntax tree
    #[instrument(skip(self))]
    pub fn parse(&self, path: &Path) -> PascocResult<Program> {
        let file = File::open(path)?;
        self.parse_reader(path, file)
    }

    /// Parses a reader into a syntax tree
    #[instrument(skip(self, reader))]
    pub fn parse_reader<R: Read>(&self, label: &Path, reader: R) -> PascocResult<Program> {
        let mut parser = BlockingParser::new(Lexer::new(label, reader));
        let program = parser.parse_program()?;
        if !self.allow_trailing_input {
            parser.finish()?;
        }
        debug!("parsed {:?}", label);
        Ok(program)
    }

    /// Parses and checks a file
    #[instrument(skip(self))]
    pub fn check(&self, path: &Path) -> PascocResult<Checked> {
        let file = File::open(path)?;
        self.check_reader(path, file)
    }

    /// Parses and checks a reader
    #[instrument(skip(self, reader))]
    pub fn check_reader<R: Read>(&self, label: &Path, reader: R) -> PascocResult<Checked> {
        let mut program = self.parse_reader(label, reader)?;
        let symbols = SemanticAnalyzer::new().check(&mut program)?;
        Ok(Checked { program, symbols })
    }

    fn collect_tokens<R: Read>(lexer: Lexer<'_, R>) -> PascocResult<Vec<Token>> {
        let tokens = lexer.collect::<Result<Vec<_>, _>>()?;
        debug!("scanned {} tokens", tokens.len());
        Ok(tokens)
    }
}

/// Builder for creating a [Pascoc] instance.
#[derive(Debug)]
pub struct PascocBuilder {
    /// Whether text may follow the final `.` of a program
    pub allow_trailing_input: bool,
}

impl PascocBuilder {
    /// Creates a PascocBuilder with default settings
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether text may follow the final `.` of a program. Allowed by default.
    pub fn allow_trailing_input(mut self, allow: bool) -> Self {
        self.allow_trailing_input = allow;
        self
    }

    /// Builds a [Pascoc] instance from this builder
    pub fn build(self) -> Pascoc {
        Pascoc {
            allow_trailing_input: self.allow_trailing_input,
        }
    }
}

impl Default for PascocBuilder {
    fn default() -> Self {
        Self {
            allow_trailing_input: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasco_tokens::token::TokenKind;
    use test_log::test;

    fn label() -> &'static Path {
        Path::new("test.pas")
    }

    #[test]
    fn test_tokens_end_with_eof() {
        let pascoc = Pascoc::builder().build();
        let tokens = pascoc.tokens_reader(label(), "x := 1".as_bytes()).unwrap();
        assert_eq!(tokens.len(), 4);
        assert!(tokens.last().is_some_and(|t| t.is_eof()));
        assert_eq!(tokens[2].kind(), &TokenKind::Integer(1));
    }

    #[test]
    fn test_lex_error_from_tokens() {
        let pascoc = Pascoc::builder().build();
        let err = pascoc.tokens_reader(label(), "x ! y".as_bytes()).unwrap_err();
        assert!(matches!(err, PascocError::Lex(_)));
        assert_eq!(err.to_string(), "(1, 3) Unexpected character '!'");
    }

    #[test]
    fn test_trailing_input() {
        let src = "begin end. trailing";
        let lenient = Pascoc::builder().build();
        lenient.parse_reader(label(), src.as_bytes()).unwrap();
        let strict = Pascoc::builder().allow_trailing_input(false).build();
        let err = strict.parse_reader(label(), src.as_bytes()).unwrap_err();
        assert!(matches!(err, PascocError::Syntax(_)));
        assert_eq!(err.position(), Some(pasco_tokens::Position::new(1, 12)));
    }

    #[test]
    fn test_check_reader() {
        let pascoc = Pascoc::builder().build();
        let checked = pascoc
            .check_reader(label(), "var x: integer; begin x := 1 end.".as_bytes())
            .unwrap();
        assert_eq!(checked.symbols.depth(), 2);
        assert_eq!(checked.program.block.decls.len(), 1);
        let err = pascoc
            .check_reader(label(), "begin x := 1 end.".as_bytes())
            .unwrap_err();
        assert!(matches!(
            &err,
            PascocError::Semantic(e) if matches!(e.kind(), SemanticErrorKind::Undeclared(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let pascoc = Pascoc::builder().build();
        let err = pascoc.check(Path::new("/definitely/not/here.pas")).unwrap_err();
        assert!(matches!(err, PascocError::Io(_)));
    }
}
