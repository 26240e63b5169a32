//! opsdesk CLI - command-line client for the opsdesk web application.

mod commands;
mod output;

use clap::{Parser, Subcommand};

/// opsdesk CLI - sign in to opsdesk and inspect the local session.
#[derive(Parser)]
#[command(name = "opsdesk")]
#[command(about = "opsdesk client for authentication and session management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login,

    /// Sign out and clear the local session
    Logout,

    /// Show authentication status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    opsdesk_core::init_logging(&cli.log_level);

    match cli.command {
        Commands::Login => commands::login(&cli.format).await,
        Commands::Logout => commands::logout(&cli.format).await,
        Commands::Status => commands::status(&cli.format).await,
    }
}
