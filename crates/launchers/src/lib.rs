//! Launcher discovery: which distribution platforms are installed, where,
//! and which games their libraries contain.
//!
//! - **Registry** — the built-in [`LauncherInfo`] table
//! - **Paths** — resolve a launcher's install directory from the OS
//!   configuration hive, with filesystem fallbacks
//! - **Manifests** — per-strategy library parsers producing
//!   [`DetectedGame`](vrconvert_types::DetectedGame) records
//! - **Executable** — main-binary selection heuristic

pub mod epic;
pub mod executable;
pub mod keyvalue;
pub mod manifest;
pub mod paths;
#[cfg(target_os = "windows")]
pub mod paths_windows;
pub mod registry;
pub mod steam;

// Re-export primary types.
pub use executable::{DEFAULT_MIN_MAIN_EXECUTABLE_BYTES, find_main_executable};
pub use manifest::{ScanOptions, list_games};
pub use paths::{ConfigHive, NullHive, resolve_install_dir, system_hive};
#[cfg(target_os = "windows")]
pub use paths_windows::RegistryHive;
pub use registry::{LauncherInfo, default_launchers};

/// Errors for launcher library operations.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
