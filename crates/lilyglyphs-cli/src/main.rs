//! lilyglyphs CLI - build helper for the lilyglyphs LaTeX package
//!
//! This binary generates LaTeX commands for image glyphs: it writes LilyPond
//! sources from a definitions file, compiles missing preview images and
//! writes a stash document for manual review.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use lilyglyphs_cli::commands::{self, CompilerOptions};
use lilyglyphs_cli::workspace::Session;

/// lilyglyphs - image glyph command generator
#[derive(Parser)]
#[command(name = "lilyglyphs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level for diagnostic output (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct CompilerArgs {
    /// Path to the LilyPond executable (default: LILYPOND_PATH or PATH lookup)
    #[arg(long)]
    lilypond: Option<PathBuf>,

    /// Abort a single compilation after this many seconds (default: no limit)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl From<CompilerArgs> for CompilerOptions {
    fn from(args: CompilerArgs) -> Self {
        CompilerOptions {
            lilypond: args.lilypond,
            timeout_secs: args.timeout_secs,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate image glyph commands from a definitions file
    ImageCommands {
        /// Definitions file (relative to the current or the definitions/ directory)
        definitions: PathBuf,

        /// Output file name inside stash_new_commands/ (default: <definitions>.tex)
        #[arg(short, long)]
        output: Option<String>,

        /// Template kind for entries that do not name one
        #[arg(long, default_value = "image")]
        template: String,

        /// Stop at the first source that fails to compile
        #[arg(long)]
        fail_fast: bool,

        /// Write sources and the document without running LilyPond
        #[arg(long)]
        skip_compile: bool,

        #[command(flatten)]
        compiler: CompilerArgs,
    },

    /// Compile generated sources that have no preview image yet
    Compile {
        /// Stop at the first source that fails to compile
        #[arg(long)]
        fail_fast: bool,

        /// Output machine-readable JSON summary (no colored output)
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        compiler: CompilerArgs,
    },

    /// List generated sources without a preview image
    Status {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check LilyPond and the workspace layout
    Doctor {
        #[command(flatten)]
        compiler: CompilerArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let result = match cli.command {
        Commands::ImageCommands {
            definitions,
            output,
            template,
            fail_fast,
            skip_compile,
            compiler,
        } => Session::enter().and_then(|session| {
            let options = commands::image_commands::Options {
                definitions,
                output,
                template,
                fail_fast,
                skip_compile,
                compiler: compiler.into(),
            };
            commands::image_commands::run(&session, &options)
        }),
        Commands::Compile {
            fail_fast,
            json,
            compiler,
        } => Session::enter().and_then(|session| {
            commands::compile::run(&session, &compiler.into(), fail_fast, json)
        }),
        Commands::Status { json } => {
            Session::enter().and_then(|session| commands::status::run(&session, json))
        }
        Commands::Doctor { compiler } => commands::doctor::run(&compiler.into()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!(
                "{}: {}",
                colored::Colorize::red("error"),
                lilyglyphs_cli::describe_error(&e)
            );
            lilyglyphs_cli::exit_code_for(&e)
        }
    }
}

fn setup_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Warn,
    };

    env_logger::Builder::new().filter_level(level).init();
}
