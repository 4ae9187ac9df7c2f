pub mod schema;
pub mod summarize;
pub mod sync;
mod util;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "notesmith",
    version,
    about = "Summarize raw text into dated Markdown notes and sync them over git"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize raw text into a Markdown note inside the notes repository
    Summarize {
        /// Path to input JSON. If omitted, read from stdin.
        #[arg(long)]
        input: Option<String>,
    },

    /// Pull, stage, commit, and push the notes repository
    Sync {
        /// Path to input JSON. If omitted, read from stdin.
        #[arg(long)]
        input: Option<String>,
    },

    /// Print JSON Schema for a wire type (self-documenting for agent runtimes)
    Schema {
        /// Schema name: summarize-input, summarize-output, sync-input, sync-result
        name: String,
    },
}
