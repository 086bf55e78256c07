use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Product classification of an installed game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "gta5")]
    Gta5,
    #[serde(rename = "gta4")]
    Gta4,
    #[serde(rename = "rdr2")]
    Rdr2,
    #[serde(rename = "spider_man")]
    SpiderMan,
    #[serde(rename = "hogwarts_legacy")]
    HogwartsLegacy,
    #[serde(rename = "cyberpunk2077")]
    Cyberpunk2077,
    #[serde(rename = "witcher3")]
    Witcher3,
    #[serde(rename = "skyrim_se")]
    SkyrimSe,
    #[serde(rename = "fallout4")]
    Fallout4,
}

impl GameType {
    /// Returns `true` unless the type is [`GameType::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, GameType::Unknown)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Unknown => write!(f, "Unknown"),
            GameType::Gta5 => write!(f, "GTA5"),
            GameType::Gta4 => write!(f, "GTA4"),
            GameType::Rdr2 => write!(f, "RDR2"),
            GameType::SpiderMan => write!(f, "SpiderMan"),
            GameType::HogwartsLegacy => write!(f, "HogwartsLegacy"),
            GameType::Cyberpunk2077 => write!(f, "Cyberpunk2077"),
            GameType::Witcher3 => write!(f, "Witcher3"),
            GameType::SkyrimSe => write!(f, "SkyrimSE"),
            GameType::Fallout4 => write!(f, "Fallout4"),
        }
    }
}

/// Strategy used to start a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaunchMethod {
    /// Start the executable directly.
    #[default]
    #[serde(rename = "direct")]
    Direct,
    /// Invoke the platform URI scheme through the OS shell.
    #[serde(rename = "protocol")]
    Protocol,
    /// Make sure the platform client runs, then use the URI scheme.
    #[serde(rename = "via-launcher-app")]
    ViaLauncherApp,
}

impl fmt::Display for LaunchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchMethod::Direct => write!(f, "direct"),
            LaunchMethod::Protocol => write!(f, "protocol"),
            LaunchMethod::ViaLauncherApp => write!(f, "via-launcher-app"),
        }
    }
}

/// Errors produced while parsing model values from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported launch method: {0}")]
    UnsupportedLaunchMethod(String),
}

impl FromStr for LaunchMethod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(LaunchMethod::Direct),
            "protocol" => Ok(LaunchMethod::Protocol),
            "via-launcher-app" | "vialauncherapp" | "launcher" => Ok(LaunchMethod::ViaLauncherApp),
            _ => Err(ParseError::UnsupportedLaunchMethod(s.to_string())),
        }
    }
}

/// How a launcher's on-disk library is enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStrategy {
    /// `libraryfolders.vdf` + `appmanifest_*.acf` key-value files.
    #[serde(rename = "steam")]
    SteamLibrary,
    /// JSON `.item` manifests.
    #[serde(rename = "epic")]
    EpicManifests,
    #[serde(rename = "gog")]
    GogGalaxy,
    #[serde(rename = "xbox")]
    XboxApp,
    #[serde(rename = "rockstar")]
    Rockstar,
    #[serde(rename = "ea")]
    EaDesktop,
    #[serde(rename = "ubisoft")]
    UbisoftConnect,
}

impl fmt::Display for ListingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListingStrategy::SteamLibrary => "steam",
            ListingStrategy::EpicManifests => "epic",
            ListingStrategy::GogGalaxy => "gog",
            ListingStrategy::XboxApp => "xbox",
            ListingStrategy::Rockstar => "rockstar",
            ListingStrategy::EaDesktop => "ea",
            ListingStrategy::UbisoftConnect => "ubisoft",
        };
        f.write_str(s)
    }
}

/// Identity of a detected game: `(launcher name, platform-scoped id)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameKey {
    pub launcher_name: String,
    pub game_id: String,
}

impl GameKey {
    pub fn new(launcher_name: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            launcher_name: launcher_name.into(),
            game_id: game_id.into(),
        }
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.launcher_name, self.game_id)
    }
}

/// A game installation found in a launcher library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedGame {
    pub game_id: String,
    pub game_name: String,
    pub install_path: PathBuf,
    pub executable_path: PathBuf,
    pub launcher_name: String,
    pub launch_method: LaunchMethod,
    #[serde(default)]
    pub game_type: GameType,
}

impl DetectedGame {
    /// Returns the identity key of this game.
    pub fn key(&self) -> GameKey {
        GameKey::new(&self.launcher_name, &self.game_id)
    }

    /// Returns the executable's file name (e.g. `GTA5.exe`), or an empty
    /// string if the path has none.
    pub fn executable_name(&self) -> String {
        self.executable_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
