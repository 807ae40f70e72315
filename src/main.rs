mod cli;
mod commands;
mod mcp;

#[cfg(test)]
#[path = "pdf/fixtures.rs"]
mod fixtures;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use pdfsplit::LoadOptions;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Split {
            path,
            pages,
            output_dir,
            json,
            reject_encrypted,
        } => {
            let options = LoadOptions {
                ignore_encryption: !reject_encrypted,
            };
            commands::split::run(&path, &output_dir, pages.as_deref(), options, json)?;
        }
    }

    Ok(())
}

// Logs go to stderr: stdout carries --json output and the MCP stdio transport.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
