#![doc = include_str!("../README.md")]

use crate::parser::blocking::BlockingParser;
use pasco_ast::items::Program;
use std::path::Path;

pub mod lexer;
pub mod parser;

/// Parses a path syntactically, performing no analysis.
pub fn syntactic_parse(path: &Path) -> Result<Program, parser::SyntaxError> {
    let mut parser = BlockingParser::with_file(path)?;
    parser.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;
    use test_log::test;

    #[test]
    fn test_parse_file_to_tree() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "begin x := 1 + 2 * 3 end.").expect("could not write");
        let program = syntactic_parse(temp_file.path()).unwrap();
        let expected = "\
program
   block
      begin
         :=
            x
            +
               1
               *
                  2
                  3
";
        assert_eq!(program.tree().to_string(), expected);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = syntactic_parse(Path::new("/definitely/not/here.pas")).unwrap_err();
        assert!(matches!(err.kind(), parser::ErrorKind::Io(_)));
    }
}
