//! Epic Games Launcher manifests.
//!
//! The launcher's `AppDataPath` (e.g. `C:\ProgramData\Epic\EpicGamesLauncher\Data`)
//! holds one JSON `.item` file per installed game under `Manifests/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use vrconvert_types::DetectedGame;

use crate::LauncherError;
use crate::executable::find_main_executable;
use crate::manifest::ScanOptions;
use crate::registry::LauncherInfo;

/// Fields of an Epic `.item` manifest needed for detection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EpicManifest {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub install_location: String,
    #[serde(default)]
    pub launch_executable: String,
    #[serde(default, rename = "bIsIncompleteInstall")]
    pub is_incomplete_install: bool,
}

/// Parses a single `.item` manifest.
pub fn parse_epic_manifest(content: &str) -> Result<EpicManifest, LauncherError> {
    Ok(serde_json::from_str(content)?)
}

/// Lists the games described by `{app_data}/Manifests/*.item`.
pub fn list_epic_games(
    launcher: &LauncherInfo,
    app_data: &Path,
    options: &ScanOptions,
) -> Vec<DetectedGame> {
    let manifests_dir = app_data.join("Manifests");
    let entries = match fs::read_dir(&manifests_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(
                path = %manifests_dir.display(),
                error = %e,
                "cannot list Epic manifests"
            );
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("item"))
        })
        .collect();
    files.sort();

    let mut games = Vec::new();
    for path in files {
        match game_from_item(launcher, &path, options) {
            Ok(Some(game)) => games.push(game),
            Ok(None) => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping Epic manifest"),
        }
    }
    games
}

fn game_from_item(
    launcher: &LauncherInfo,
    path: &Path,
    options: &ScanOptions,
) -> Result<Option<DetectedGame>, LauncherError> {
    let content = fs::read_to_string(path)?;
    let manifest = parse_epic_manifest(&content)?;

    if manifest.app_name.is_empty()
        || manifest.display_name.is_empty()
        || manifest.install_location.is_empty()
    {
        return Err(LauncherError::Manifest(
            "missing AppName, DisplayName or InstallLocation".into(),
        ));
    }
    if manifest.is_incomplete_install {
        tracing::debug!(app = %manifest.app_name, "incomplete install, skipping");
        return Ok(None);
    }

    let install_path = PathBuf::from(&manifest.install_location);
    let declared = (!manifest.launch_executable.is_empty())
        .then(|| install_path.join(&manifest.launch_executable))
        .filter(|p| p.is_file());

    let Some(executable_path) = declared
        .or_else(|| find_main_executable(&install_path, options.min_main_executable_bytes))
    else {
        tracing::debug!(app = %manifest.app_name, "no executable found, skipping");
        return Ok(None);
    };

    Ok(Some(DetectedGame {
        game_id: manifest.app_name,
        game_name: manifest.display_name,
        install_path,
        executable_path,
        launcher_name: launcher.name.clone(),
        launch_method: launcher.launch_method,
        game_type: Default::default(),
    }))
}
