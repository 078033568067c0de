#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use std::env;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rankfill_core::ErrorCode;
use rankfill_core::RankfillConfig;
use rankfill_core::config::{CONFIG_FILE_NAME, load_config};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::output::{CliError, OutputMode, render_error, resolve_output_mode};

#[derive(Parser, Debug)]
#[command(
    name = "rankfill",
    author,
    version,
    about = "rankfill: infer rank ranges for partially ranked items",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (defaults to `rankfill.toml` in the working directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Run inference and print every item with its layer and range")]
    Infer(cmd::infer::InferArgs),

    #[command(about = "List candidate ranks per item and candidate items per rank")]
    Candidates(cmd::candidates::CandidatesArgs),

    #[command(about = "List unranked runs pinned between two ranked anchors")]
    Chains(cmd::chains::ChainsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    let config = resolve_config(cli.config.as_deref(), output)?;

    match cli.command {
        Commands::Infer(ref args) => cmd::infer::run_infer(args, output, &config),
        Commands::Candidates(ref args) => cmd::candidates::run_candidates(args, output, &config),
        Commands::Chains(ref args) => cmd::chains::run_chains(args, output, &config),
    }
}

/// Load the run configuration.
///
/// An explicit `--config` path must exist; the implicit `rankfill.toml` in
/// the working directory is optional.
fn resolve_config(explicit: Option<&Path>, output: OutputMode) -> anyhow::Result<RankfillConfig> {
    let code = ErrorCode::ConfigParseError;
    let loaded = match explicit {
        Some(path) if !path.exists() => {
            render_error(
                output,
                &CliError::with_details(
                    format!("config file not found: {}", path.display()),
                    "check the --config path",
                    code.code(),
                ),
            )?;
            anyhow::bail!("config file not found");
        }
        Some(path) => load_config(path),
        None => load_config(Path::new(CONFIG_FILE_NAME)),
    };

    match loaded {
        Ok(config) => Ok(config),
        Err(err) => {
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    code.hint().unwrap_or("check the config file"),
                    code.code(),
                ),
            )?;
            Err(err)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RANKFILL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "rankfill=debug,info"
        } else {
            "rankfill=info,warn"
        })
    });

    let format = env::var("RANKFILL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
