//! Game process orchestration.
//!
//! Starts a detected game directly, through its platform's URI protocol, or
//! by first starting the platform launcher, then resolves the game's process
//! by diffing the process table. Every wait is bounded by a
//! [`LaunchTimeouts`] budget and cancellable through a [`LaunchContext`].

pub mod orchestrator;
pub mod process;
pub mod spawner;
pub mod state;

use std::time::Duration;

// Re-export primary types.
pub use orchestrator::Orchestrator;
pub use process::{GameProcess, ProcessOrigin, ProcessTable, SysinfoProcessTable, image_matches};
pub use spawner::{Spawner, SystemSpawner};
pub use state::{LaunchContext, LaunchState, LaunchTimeouts};

/// Errors for launch and attach operations.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("no new '{image}' process within {}s", .waited.as_secs())]
    Timeout { image: String, waited: Duration },

    #[error("'{0}' is not running")]
    NotRunning(String),

    #[error("unknown launcher: {0}")]
    UnknownLauncher(String),

    #[error("unsupported launch method: {0}")]
    UnsupportedLaunchMethod(String),

    #[error("failed to start {target}: {source}")]
    Spawn {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("launch cancelled")]
    Cancelled,
}
