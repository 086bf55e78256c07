//! Listing-strategy dispatch.
//!
//! Every strategy has the same contract: given a launcher's install
//! directory, return the games it knows about. A strategy that cannot read
//! its library returns an empty list so one broken platform never aborts a
//! whole scan.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vrconvert_types::{DetectedGame, ListingStrategy};

use crate::executable::DEFAULT_MIN_MAIN_EXECUTABLE_BYTES;
use crate::registry::LauncherInfo;
use crate::{epic, steam};

/// Tunables for library scanning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Size above which a binary is taken to be the main game executable.
    pub min_main_executable_bytes: u64,
    /// Additional Steam-style library roots.
    pub extra_libraries: Vec<PathBuf>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            min_main_executable_bytes: DEFAULT_MIN_MAIN_EXECUTABLE_BYTES,
            extra_libraries: Vec::new(),
        }
    }
}

/// Lists the games installed through `launcher`.
pub fn list_games(
    launcher: &LauncherInfo,
    install_dir: &Path,
    options: &ScanOptions,
) -> Vec<DetectedGame> {
    match launcher.strategy {
        ListingStrategy::SteamLibrary => steam::list_steam_games(launcher, install_dir, options),
        ListingStrategy::EpicManifests => epic::list_epic_games(launcher, install_dir, options),
        ListingStrategy::GogGalaxy
        | ListingStrategy::XboxApp
        | ListingStrategy::Rockstar
        | ListingStrategy::EaDesktop
        | ListingStrategy::UbisoftConnect => {
            tracing::debug!(
                launcher = %launcher.name,
                strategy = %launcher.strategy,
                "library listing not supported for this launcher"
            );
            Vec::new()
        }
    }
}
