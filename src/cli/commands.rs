use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use super::logging::{init_logging, LogFormat};
use crate::config::resolve_config;
use crate::generator::{check_file, generate_file, WriteOptions};

/// Generate HTTP handlers and routers from annotated Rust declarations.
///
/// Reads INPUT, finds every method documented with the `apigen:api` marker
/// and writes the generated handlers to OUTPUT, replacing it atomically.
#[derive(Debug, Parser)]
#[command(name = "apigen", version, about, long_about = None)]
pub struct Cli {
    /// Rust source file declaring the annotated methods and parameter records
    pub input: PathBuf,

    /// File to write the generated handlers to
    pub output: PathBuf,

    /// Generator configuration file
    /// If not provided, `apigen.toml` next to INPUT is used when present
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Header carrying the credential for endpoints that require auth
    #[arg(long, env = "APIGEN_AUTH_HEADER")]
    pub auth_header: Option<String>,

    /// Expected credential value for endpoints that require auth
    #[arg(long, env = "APIGEN_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Run rustfmt on the output before publishing it
    #[arg(long, default_value_t = false)]
    pub fmt: bool,

    /// Do not write; exit with status 1 if OUTPUT is missing or out of date
    #[arg(long, default_value_t = false)]
    pub check: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// What a successful invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// OUTPUT was (re)written
    Generated,
    /// `--check`: OUTPUT matches what would be generated
    UpToDate,
    /// `--check`: OUTPUT is missing or differs
    Stale,
}

impl Outcome {
    /// Process exit status for this outcome.
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Generated | Self::UpToDate => ExitCode::SUCCESS,
            Self::Stale => ExitCode::FAILURE,
        }
    }
}

/// Parse the process arguments, set up logging and run.
///
/// Usage errors exit through clap (status 2). Generation failures are logged
/// and reported as status 1.
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_format, cli.verbose) {
        eprintln!("{e}");
    }
    match execute(&cli) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Generation failed");
            ExitCode::FAILURE
        }
    }
}

/// Run one parsed invocation.
pub fn execute(cli: &Cli) -> anyhow::Result<Outcome> {
    let config = resolve_config(cli.config.as_deref(), &cli.input)?
        .with_auth_overrides(cli.auth_header.as_deref(), cli.auth_token.as_deref());
    let options = WriteOptions { format: cli.fmt };

    if cli.check {
        if check_file(&cli.input, &cli.output, &config, &options)? {
            info!(output = %cli.output.display(), "Generated handlers are up to date");
            return Ok(Outcome::UpToDate);
        }
        error!(
            output = %cli.output.display(),
            "Generated handlers are missing or out of date; rerun without --check"
        );
        return Ok(Outcome::Stale);
    }

    generate_file(&cli.input, &cli.output, &config, &options)?;
    Ok(Outcome::Generated)
}
