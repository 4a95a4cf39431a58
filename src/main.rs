use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clap_stdin::FileOrStdin;
use log::{debug, info};

/// Compiler front end for the robot arm language
#[derive(Parser, Debug)]
#[command(name = "armc", version, about, long_about = None)]
struct Cli {
    /// Source file, or `-` to read from stdin
    #[arg(value_name = "FILE")]
    input: FileOrStdin,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Emit::Report)]
    emit: Emit,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Emit {
    /// Full human-readable report
    Report,
    /// Token table
    Tokens,
    /// Symbol table
    Symbols,
    /// Quadruple list
    Quads,
    /// Whole analysis as JSON
    Json,
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli);

    let source = cli.input.contents().context("failed to read input")?;
    debug!("read {} bytes", source.len());

    let analysis = armc::analyze(&source).context("internal compiler error")?;
    info!(
        "{} tokens, {} errors, {} warnings, {} quadruples",
        analysis.tokens.len(),
        analysis.errors.len(),
        analysis.warnings.len(),
        analysis.quadruples.len()
    );

    match cli.emit {
        Emit::Report => print!("{}", analysis.formatted_report()),
        Emit::Tokens => {
            for t in &analysis.tokens {
                println!("{t}");
            }
        }
        Emit::Symbols => {
            for s in analysis.symbol_table() {
                println!("{s}");
            }
        }
        Emit::Quads => {
            for (i, q) in analysis.quadruples().iter().enumerate() {
                println!("{i:>3}: {q}");
            }
        }
        Emit::Json => println!(
            "{}",
            serde_json::to_string_pretty(&analysis).context("failed to serialize analysis")?
        ),
    }

    if !matches!(cli.emit, Emit::Report | Emit::Json) {
        for e in &analysis.errors {
            eprintln!("{e}");
        }
        for w in &analysis.warnings {
            eprintln!("{w}");
        }
    }

    Ok(if analysis.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
