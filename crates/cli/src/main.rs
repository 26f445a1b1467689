//! promptsync CLI
//!
//! Main entry point for the promptsync command-line tool.
//! Pulls prompts from a hosted prompt hub, validates local prompt files and
//! publishes them back.

mod commands;

use clap::{Parser, Subcommand};
use commands::{PullCommand, PushCommand, ValidateCommand};
use promptsync_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;
use std::process::ExitCode;

/// promptsync - keep local prompt files in sync with a prompt hub
#[derive(Parser, Debug)]
#[command(name = "promptsync")]
#[command(about = "Pull, validate and publish prompts on a prompt hub", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PROMPTSYNC_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PROMPTSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pull a prompt from the hub into a local YAML draft
    Pull(PullCommand),

    /// Validate a local prompt and publish it to the hub
    Push(PushCommand),

    /// Check local prompt files against the quality rules
    Validate(ValidateCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    // Load base configuration from .env, config file and environment
    let config = AppConfig::load(cli.workspace, cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(cli.log_level, cli.verbose, cli.no_color);

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Endpoint: {}", config.endpoint);

    let command_name = match &cli.command {
        Commands::Pull(_) => "pull",
        Commands::Push(_) => "push",
        Commands::Validate(_) => "validate",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Pull(cmd) => cmd.execute(&config).await,
        Commands::Push(cmd) => cmd.execute(&config).await,
        Commands::Validate(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::debug!("Command failed: {}", e),
    }

    result
}
