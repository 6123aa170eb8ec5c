//! Recursive descent parsing of a token stream into a syntax tree

pub use error::*;

pub mod blocking;
mod error;
mod expr;
mod items;
mod statements;
pub mod traits;
mod types;

#[cfg(test)]
pub(crate) mod tests {
    use crate::lexer::Lexer;
    use crate::parser::blocking::BlockingParser;
    use std::fs::File;
    use std::io::Write as _;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Runs the callback against a parser reading `s` from a temporary file
    pub fn test_parser<F>(s: &str, callback: F)
    where
        F: FnOnce(&mut BlockingParser<File>, &Path),
    {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{}", s).expect("could not write");
        let path = temp_file.path();
        let mut parser = BlockingParser::with_file(path).unwrap();
        callback(&mut parser, path)
    }

    /// Creates a parser directly over a string
    pub fn str_parser(s: &str) -> BlockingParser<'static, &[u8]> {
        BlockingParser::new(Lexer::new(Path::new("test"), s.as_bytes()))
    }
}
