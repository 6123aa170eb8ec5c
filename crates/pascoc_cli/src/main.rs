use crate::args::{Args, Mode};
use clap::Parser;
use pascoc::{Pascoc, PascocResult};
use std::io;
use std::io::{stderr, stdout, Stderr, StderrLock, Stdout, StdoutLock, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::metadata::LevelFilter;
use tracing::{debug, trace, Level, Metadata};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry};

mod args;
mod report;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting pascoc with args: {args:?}");
    debug!("pascoc version: {}", env!("CARGO_PKG_VERSION"));

    let pascoc = Pascoc::builder()
        .allow_trailing_input(!args.strict)
        .build();

    let mut out = stdout().lock();
    match run(&pascoc, args.mode(), &args.file, &mut out) {
        Ok(()) => {
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            out.flush()?;
            eprintln!("{}", report::render(&args.file, &e));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run<W: Write>(pascoc: &Pascoc, mode: Mode, path: &Path, out: &mut W) -> PascocResult<()> {
    debug!("running {mode:?} on {path:?}");
    match mode {
        Mode::Tokens => {
            for token in pascoc.tokens(path)? {
                writeln!(out, "{token}")?;
            }
        }
        Mode::Ast => {
            let program = pascoc.parse(path)?;
            write!(out, "{}", program.tree())?;
        }
        Mode::Symbols => {
            let checked = pascoc.check(path)?;
            write!(out, "{}", checked.symbols.dump())?;
        }
        Mode::Check => {
            pascoc.check(path)?;
            writeln!(out, "ok")?;
        }
    }
    Ok(())
}

struct StdioWriter {
    stdout: Stdout,
    stderr: Stderr,
}

enum StdioLock<'a> {
    Stdout(StdoutLock<'a>),
    Stderr(StderrLock<'a>),
}

impl<'a> io::Write for StdioLock<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StdioLock::Stdout(stdout) => stdout.write(buf),
            StdioLock::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StdioLock::Stdout(stdout) => stdout.flush(),
            StdioLock::Stderr(stderr) => stderr.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for StdioWriter {
    type Writer = StdioLock<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        StdioLock::Stdout(self.stdout.lock())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        // levels compare by verbosity, so ERROR < WARN
        if meta.level() <= &Level::WARN {
            StdioLock::Stderr(self.stderr.lock())
        } else {
            StdioLock::Stdout(self.stdout.lock())
        }
    }
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(StdioWriter {
                    stdout: stdout(),
                    stderr: stderr(),
                })
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    // also installs the bridge for crates logging through `log`
    registry.try_init()?;

    Ok(())
}
