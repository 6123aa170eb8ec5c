//! the args for running pascoc

use pasco_cli_common::LoggingArgs;
use std::path::PathBuf;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Scans, parses and checks pascal-like programs")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// The source file to read
    #[clap(value_name = "source file", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Print the tokens of the source file, one per line
    #[clap(short = 't', long, conflicts_with_all = ["ast", "symbols"])]
    tokens: bool,
    /// Print the syntax tree of the source file
    #[clap(short = 'a', long, conflicts_with_all = ["tokens", "symbols"])]
    ast: bool,
    /// Check the source file and print its symbol table
    #[clap(short = 's', long, conflicts_with_all = ["tokens", "ast"])]
    symbols: bool,

    /// Reject any text after the final `.` of the program
    #[clap(long)]
    pub strict: bool,
}

/// What pascoc should print
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    Tokens,
    Ast,
    Symbols,
    Check,
}

impl Args {
    /// Gets the selected mode, [Mode::Check] if no mode flag was given
    pub fn mode(&self) -> Mode {
        if self.tokens {
            Mode::Tokens
        } else if self.ast {
            Mode::Ast
        } else if self.symbols {
            Mode::Symbols
        } else {
            Mode::Check
        }
    }

    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_args_parsing() {
        let test = "pascoc file.pas";
        let args = Args::try_parse_from(test.split(" ")).expect("could not parse test string");
        assert_eq!(args.file, Path::new("file.pas"));
        assert_eq!(args.mode(), Mode::Check);
        assert!(!args.strict);
    }

    #[test]
    fn test_mode_flags() {
        let args = Args::try_parse_from("pascoc -t file.pas".split(" ")).unwrap();
        assert_eq!(args.mode(), Mode::Tokens);
        let args = Args::try_parse_from("pascoc --ast file.pas".split(" ")).unwrap();
        assert_eq!(args.mode(), Mode::Ast);
        let args = Args::try_parse_from("pascoc file.pas -s --strict".split(" ")).unwrap();
        assert_eq!(args.mode(), Mode::Symbols);
        assert!(args.strict);
    }

    #[test]
    fn test_modes_conflict() {
        assert!(Args::try_parse_from("pascoc -t -a file.pas".split(" ")).is_err());
        assert!(Args::try_parse_from("pascoc --symbols --tokens file.pas".split(" ")).is_err());
    }

    #[test]
    fn test_file_required() {
        assert!(Args::try_parse_from(["pascoc", "-vv"]).is_err());
    }
}
