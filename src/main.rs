mod cli;
mod commands;
mod config;
mod resource;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::ProviderConfig;
use provider::Registry;
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config: ProviderConfig,
    pub registry: Registry,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    // Completions need neither config nor word lists
    if let Command::Completions { shell } = cli.command {
        generate(shell, &mut Cli::command(), "pet-provider", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let config = ProviderConfig::load(cli.config_file.as_deref())?;
    let generator = match resource::generator(config.seed) {
        Ok(generator) => generator,
        Err(e) => {
            ui::error(&format!("{e:#}"));
            return Ok(ExitCode::FAILURE);
        }
    };
    let registry = resource::registry(generator)?;
    log::debug!("Serving {} resource type(s)", registry.len());

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config,
        registry,
    };

    let ok = match cli.command {
        Command::Schema { json } => commands::schema::run(&ctx, json),
        Command::Validate(args) => commands::lifecycle::validate(&ctx, args),
        Command::Plan(args) => commands::lifecycle::plan(&ctx, args),
        Command::Apply(args) => commands::lifecycle::apply(&ctx, args),
        Command::Read(args) => commands::lifecycle::read(&ctx, args),
        Command::Import { type_name, id } => commands::lifecycle::import(&ctx, type_name, id),
        Command::Upgrade(args) => commands::lifecycle::upgrade(&ctx, args),
        Command::Batch { file, jobs } => commands::batch::run(&ctx, &file, jobs),
        Command::Completions { .. } => Ok(true),
    }?;

    Ok(commands::exit_code(ok))
}
