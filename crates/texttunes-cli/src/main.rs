//! CLI entry point.
//!
//! Loads `.env`, parses flags, composes the [`CliContext`] via bootstrap
//! and routes each subcommand to its handler.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use texttunes_cli::handlers::generate::GenerateArgs;
use texttunes_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let code = err
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

/// Log to stderr so command output stays clean. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli)?;

    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    // Commands that need no context
    match &command {
        Commands::Samples => return handlers::samples::execute(),
        Commands::FormatTime { seconds } => return handlers::format_time::execute(seconds),
        _ => {}
    }

    let mut ctx = bootstrap(config);

    match command {
        Commands::Voices { platform, json } => {
            handlers::voices::execute(&ctx, platform, json).await?;
        }
        Commands::Speak { input } => {
            handlers::speak::execute(&mut ctx, &input).await?;
        }
        Commands::Generate { input, out, play } => {
            let args = GenerateArgs { input, out, play };
            handlers::generate::execute(&mut ctx, args).await?;
        }
        Commands::Play { locator, seek } => {
            handlers::play::execute(&ctx, locator.as_deref(), seek).await?;
        }
        Commands::Download { locator, dir } => {
            handlers::download::execute(&ctx, locator.as_deref(), &dir).await?;
        }
        Commands::Samples | Commands::FormatTime { .. } => {}
    }

    Ok(())
}
