use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfsplit")]
#[command(about = "Split a PDF into one file per page, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Split PDF into individual pages
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Pages to extract (e.g., "1,3-5,8"); all pages if omitted
        #[arg(short, long)]
        pages: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Print a JSON report instead of a summary
        #[arg(long)]
        json: bool,

        /// Refuse documents that carry encryption metadata
        #[arg(long)]
        reject_encrypted: bool,
    },
}
