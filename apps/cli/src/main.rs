mod args;
mod commands;

use crate::args::{Cli, Command};
use crate::commands::Outcome;
use anyhow::{Context, Result};
use clap::Parser;
use formwork::domain::config::CliConfig;
use formwork::kernel::config::load_config;
use formwork_logger::{LevelFilter, Logger, parse_level};
use std::io::Write;
use std::process::ExitCode;

/// Exit status for configuration, I/O and definition errors; 1 means invalid input.
const OPERATIONAL_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            let _ = writeln!(std::io::stderr().lock(), "Error: {err:?}");
            ExitCode::from(OPERATIONAL_FAILURE)
        },
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cfg: CliConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let _log = init_logger(&cfg, cli.verbose)?;

    let (outcome, report) = match cli.command {
        Command::Validate { definition, model, input, sync } => {
            commands::validate(&definition, &model, &input, sync)?
        },
        Command::Inspect { definition } => (Outcome::Valid, commands::inspect(&definition)?),
    };

    let rendered = if cfg.output.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    writeln!(std::io::stdout().lock(), "{rendered}")?;

    Ok(match outcome {
        Outcome::Valid => ExitCode::SUCCESS,
        Outcome::Invalid => ExitCode::FAILURE,
    })
}

fn init_logger(cfg: &CliConfig, verbose: u8) -> Result<Logger> {
    let level = match verbose {
        0 => parse_level(&cfg.log.level)?,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let builder = Logger::builder().name(env!("CARGO_BIN_NAME")).console(cfg.log.console).level(level);
    let builder = match &cfg.log.env_filter {
        Some(filter) => builder.env_filter(filter),
        None => builder,
    };

    let logger = match &cfg.log.directory {
        Some(directory) => builder.path(directory).json(cfg.log.json).init(),
        None => builder.init(),
    };
    Ok(logger?)
}
