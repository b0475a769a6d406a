use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use tidy::params::split_patterns;
use tidy::report::{render_failure_text, render_text};
use tidy::{run, TidyParams, TimestampKind};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove files and directories matching age, size and name criteria",
    long_about = None
)]
struct Args {
    /// File or directory to tidy
    #[arg(required_unless_present = "params")]
    path: Option<PathBuf>,

    /// TOML file holding the parameter record; flags given here override it
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Minimum age, e.g. 3600, 30m, 2d, 4w (default 0: any age)
    #[arg(long)]
    age: Option<String>,

    /// Minimum file size, e.g. 512, 10k, 1m, 2g (default 0: any size)
    #[arg(long)]
    size: Option<String>,

    /// Basename glob patterns; repeat or separate with commas
    #[arg(long, short)]
    matches: Vec<String>,

    /// Timestamp that decides an entry's age
    #[arg(long, value_enum)]
    timestamp: Option<TimestampKind>,

    /// Descend into subdirectories
    #[arg(long, short)]
    recurse: bool,

    /// Also remove matching directories
    #[arg(long)]
    rmdirs: bool,

    /// Remove matching directories even when not empty
    #[arg(long, short)]
    force: bool,

    /// Skip entries that cannot be removed instead of failing
    #[arg(long, short)]
    silent: bool,

    /// Report what would be removed, but don't remove anything
    #[arg(long, alias = "dry-run")]
    check: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Show debug logging on stderr
    #[arg(long, short)]
    verbose: bool,

    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug"])]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn setup_logging(verbose: bool, log_level: &str) {
    let level = match (verbose, log_level) {
        (true, _) | (_, "debug") => log::LevelFilter::Debug,
        (_, "info") => log::LevelFilter::Info,
        (_, "error") => log::LevelFilter::Error,
        _ => log::LevelFilter::Warn,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

/// Merge the parameter file (if any) with the command line.
fn build_params(args: &Args) -> Result<TidyParams> {
    let mut params = match (&args.params, &args.path) {
        (Some(file), _) => TidyParams::from_toml_file(file)?,
        (None, Some(path)) => TidyParams::new(path),
        (None, None) => anyhow::bail!("A path to tidy is required"),
    };

    if let Some(path) = &args.path {
        params.path = path.clone();
    }
    if let Some(age) = &args.age {
        params.age = age.clone();
    }
    if let Some(size) = &args.size {
        params.size = size.clone();
    }
    if !args.matches.is_empty() {
        params.matches = Some(args.matches.iter().flat_map(|m| split_patterns(m)).collect());
    }
    if let Some(timestamp) = args.timestamp {
        params.timestamp = timestamp;
    }

    params.recurse |= args.recurse;
    params.rmdirs |= args.rmdirs;
    params.force |= args.force;
    params.silent |= args.silent;
    params.check_mode |= args.check;

    Ok(params)
}

fn execute(args: &Args) -> Result<ExitCode> {
    let params = build_params(args).context("Failed to build tidy parameters")?;
    let outcome = run(&params);

    let mut stdout = std::io::stdout().lock();
    let code = match (&outcome, args.format) {
        (Ok(report), Format::Json) => {
            serde_json::to_writer(&mut stdout, report).context("Failed to write report")?;
            writeln!(stdout)?;
            ExitCode::SUCCESS
        }
        (Ok(report), Format::Text) => {
            write!(stdout, "{}", render_text(report, params.check_mode))?;
            ExitCode::SUCCESS
        }
        (Err(failure), Format::Json) => {
            serde_json::to_writer(&mut stdout, &failure.record())
                .context("Failed to write failure record")?;
            writeln!(stdout)?;
            ExitCode::FAILURE
        }
        (Err(failure), Format::Text) => {
            write!(stdout, "{}", render_failure_text(failure))?;
            ExitCode::FAILURE
        }
    };

    Ok(code)
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose, &args.log_level);

    match execute(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(2)
        }
    }
}
