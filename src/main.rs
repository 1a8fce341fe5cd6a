//! prplease - PR title and description drafts
//!
//! Run `prplease generate <PR_URL>` to draft a pull request description,
//! or `prplease serve` to host the relay other clients can use.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use prplease::cli::commands::{Cli, Commands};
use prplease::cli::{config, generate, ping, serve};
use prplease::error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The relay logs requests by default; client commands stay quiet
    let default_level = match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {}", e.display_message());
        if e.is_retryable() {
            eprintln!("This is usually temporary. Run the command again.");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve(args) => serve::handle_serve(args).await,
        Commands::Generate(args) => generate::handle_generate(args).await,
        Commands::Ping(args) => ping::handle_ping(args).await,
        Commands::Config(args) => config::handle_config(args.command),
    }
}
