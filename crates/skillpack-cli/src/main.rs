//! skillpack - validate a skill directory and package it as a `.skill`
//! archive.

use clap::Parser;
use skillpack_bundle::{package_skill, PackageError, PackageReport};
use skillpack_cli::config::{PackagerConfig, ENV_OUTPUT_DIR, ENV_SKILL_DIR};
use skillpack_cli::exit_codes::ExitCode;
use skillpack_cli::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use skillpack_cli::output::{
    result_json, write_banner, write_failure, write_success, HumanEmitter, JsonlEmitter,
    OutputFormat,
};
use std::io::Write;
use std::path::PathBuf;

/// Validate a skill directory and package it into a distributable .skill file
#[derive(Parser, Debug)]
#[command(name = "skillpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Skill directory to package [default: laravel-api next to the program]
    #[arg(env = ENV_SKILL_DIR)]
    skill_dir: Option<PathBuf>,

    /// Directory the .skill file is written to [default: current directory]
    #[arg(env = ENV_OUTPUT_DIR)]
    output_dir: Option<PathBuf>,

    /// Validate and list entries without writing an archive
    #[arg(long)]
    dry_run: bool,

    /// Leave a partially written archive on disk when packaging fails
    #[arg(long)]
    keep_partial: bool,

    /// Output format
    #[arg(long, short = 'f', default_value = "human")]
    format: OutputFormat,

    /// Log format on stderr (human, jsonl)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Prefix human log lines with a timestamp
    #[arg(long)]
    log_timestamps: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.verbose, cli.quiet),
        cli.log_format,
    )
    .with_timestamps(cli.log_timestamps);
    init_logging(&log_config);

    let config = PackagerConfig::resolve(
        cli.skill_dir.clone(),
        cli.output_dir.clone(),
        cli.keep_partial,
        cli.dry_run,
    );
    tracing::debug!(?config, format = %cli.format, "Resolved configuration");

    let exit_code = match cli.format {
        OutputFormat::Human => run_human(&config),
        OutputFormat::Json => run_json(&config),
    };
    exit_code.into()
}

fn run_human(config: &PackagerConfig) -> ExitCode {
    let mut stdout = std::io::stdout();
    let _ = write_banner(&mut stdout, config);

    let emitter = HumanEmitter::stdout();
    let result = package_skill(&config.skill_dir, &config.package_options(), &emitter);

    match result {
        Ok(report) => {
            let _ = write_success(&mut stdout, &report);
            ExitCode::Clean
        }
        Err(err) => {
            let _ = stdout.flush();
            let _ = write_failure(&mut std::io::stderr(), &err);
            ExitCode::from_error(&err)
        }
    }
}

fn run_json(config: &PackagerConfig) -> ExitCode {
    let emitter = JsonlEmitter::stderr();
    let result: Result<PackageReport, PackageError> =
        package_skill(&config.skill_dir, &config.package_options(), &emitter);

    let doc = result_json(&result);
    match serde_json::to_string_pretty(&doc) {
        Ok(text) => {
            if let Err(e) = writeln!(std::io::stdout(), "{text}") {
                tracing::warn!(error = %e, "Could not write result to stdout");
            }
        }
        Err(e) => eprintln!("Error: cannot serialize result: {e}"),
    }

    match &result {
        Ok(_) => ExitCode::Clean,
        Err(err) => ExitCode::from_error(err),
    }
}
