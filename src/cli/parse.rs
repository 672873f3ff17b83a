//! CLI parse: clap types for slotdeck. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Slotdeck CLI - Assemble slide decks from weighted, quota-aware generators
#[derive(Parser)]
#[command(name = "slotdeck")]
#[command(about = "Assemble slide decks from weighted, quota-aware generators")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/ is read from here)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble a deck for a topic
    Assemble {
        /// Talk topic
        #[arg(long)]
        topic: String,

        /// Number of slides
        #[arg(long, default_value_t = 8)]
        slides: usize,

        /// Presenter name, used by title and introduction slides
        #[arg(long)]
        presenter: Option<String>,

        /// Schema name (built-in or configured)
        #[arg(long, default_value = "default")]
        schema: String,

        /// Fill slots speculatively in parallel rounds
        #[arg(long)]
        parallel: bool,

        /// Base seed for reproducible selection
        #[arg(long)]
        seed: Option<u64>,

        /// Related seeds to cycle through after the first slide (comma separated)
        #[arg(long, value_delimiter = ',')]
        seeds: Vec<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List available schemas and their tag limits
    Schemas {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
