//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Detect, classify and launch installed PC games.
#[derive(Debug, Parser)]
#[command(name = "vrconvert", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List games installed through every detected launcher
    Scan {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify an install directory
    Classify {
        dir: PathBuf,

        /// Executable file name used by the name fallback
        #[arg(long)]
        exe: Option<String>,
    },

    /// Print the profile of a detected game
    Profile { launcher: String, game_id: String },

    /// Launch a detected game and wait for its process
    Launch {
        launcher: String,
        game_id: String,

        /// direct, protocol or via-launcher-app (defaults to the launcher's)
        #[arg(long)]
        method: Option<String>,
    },

    /// Attach to a running game
    Attach { launcher: String, game_id: String },

    /// Report whether a game is running
    Status { launcher: String, game_id: String },
}
