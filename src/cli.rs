use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "playdeck")]
#[command(author, version, about = "Capability-gated media playback demo")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy the demo clip into the media library
    Stage {
        /// Re-copy even if the clip is already staged
        #[arg(long)]
        force: bool,
    },

    /// Play the staged demo clip, or an explicit file
    Play {
        /// File to play instead of the staged demo clip
        file: Option<PathBuf>,

        /// Hand the clip to an external player instead of the built-in one
        #[arg(long)]
        external: bool,
    },

    /// Request capabilities and print each outcome
    Caps {
        /// Capability names to request
        #[arg(required = true)]
        names: Vec<String>,

        /// Ask whether an explanation should be shown instead of prompting
        #[arg(long)]
        rationale: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check which external players are available
    CheckPlayers,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
