//! Built-in classification tables.
//!
//! The signature list is the extension point for new titles: append an entry
//! with the files every install has and the folders most installs have.

use serde::{Deserialize, Serialize};
use vrconvert_types::GameType;

/// Filesystem fingerprint of one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GameTypeSignature {
    pub game_type: GameType,
    /// Every pattern must match a file somewhere under the install path.
    pub required_files: Vec<String>,
    /// Reported in logs, never required.
    #[serde(default)]
    pub optional_files: Vec<String>,
    /// At least `max(1, len / 2)` must match a directory under the install path.
    #[serde(default)]
    pub folders: Vec<String>,
}

impl GameTypeSignature {
    /// Number of folder matches needed for acceptance.
    pub fn required_folder_matches(&self) -> usize {
        (self.folders.len() / 2).max(1)
    }
}

/// Executable-name fragment mapped to a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NameToken {
    pub token: String,
    pub game_type: GameType,
}

fn signature(
    game_type: GameType,
    required: &[&str],
    optional: &[&str],
    folders: &[&str],
) -> GameTypeSignature {
    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
    GameTypeSignature {
        game_type,
        required_files: owned(required),
        optional_files: owned(optional),
        folders: owned(folders),
    }
}

/// Returns the built-in signatures in priority order.
pub fn default_signatures() -> Vec<GameTypeSignature> {
    vec![
        signature(
            GameType::Gta5,
            &["GTA5.exe", "common.rpf", "x64*.rpf"],
            &["PlayGTAV.exe", "GTAVLauncher.exe", "update.rpf"],
            &["update", "x64"],
        ),
        signature(
            GameType::Gta4,
            &["GTAIV.exe"],
            &["LaunchGTAIV.exe"],
            &["pc", "common", "audio"],
        ),
        signature(
            GameType::Rdr2,
            &["RDR2.exe", "*.rpf"],
            &["PlayRDR2.exe"],
            &["x64", "update", "shaders"],
        ),
        signature(
            GameType::SpiderMan,
            &["Spider-Man.exe"],
            &["toc"],
            &["asset_archive"],
        ),
        signature(
            GameType::HogwartsLegacy,
            &["HogwartsLegacy.exe"],
            &[],
            &["Phoenix", "Engine"],
        ),
        signature(
            GameType::Cyberpunk2077,
            &["Cyberpunk2077.exe"],
            &["REDprelauncher.exe"],
            &["archive", "engine", "r6", "bin"],
        ),
        signature(
            GameType::Witcher3,
            &["witcher3.exe"],
            &[],
            &["content", "dlc", "bin"],
        ),
        signature(
            GameType::SkyrimSe,
            &["SkyrimSE.exe", "*.bsa"],
            &["SkyrimSELauncher.exe"],
            &["Data"],
        ),
        signature(
            GameType::Fallout4,
            &["Fallout4.exe", "*.ba2"],
            &["Fallout4Launcher.exe"],
            &["Data"],
        ),
    ]
}

/// Returns the built-in executable-name tokens, checked in order.
pub fn default_name_tokens() -> Vec<NameToken> {
    [
        ("gta5", GameType::Gta5),
        ("gtav", GameType::Gta5),
        ("gtaiv", GameType::Gta4),
        ("rdr2", GameType::Rdr2),
        ("spider-man", GameType::SpiderMan),
        ("spiderman", GameType::SpiderMan),
        ("hogwarts", GameType::HogwartsLegacy),
        ("cyberpunk", GameType::Cyberpunk2077),
        ("witcher3", GameType::Witcher3),
        ("skyrim", GameType::SkyrimSe),
        ("fallout4", GameType::Fallout4),
    ]
    .into_iter()
    .map(|(token, game_type)| NameToken {
        token: token.into(),
        game_type,
    })
    .collect()
}
