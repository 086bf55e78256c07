//! Built-in launcher table: hive keys, listing strategy, client process
//! and launch method for each supported platform.

use serde::{Deserialize, Serialize};
use vrconvert_types::{LaunchMethod, ListingStrategy};

/// Static description of a distribution platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LauncherInfo {
    /// Display name, also the scheme of the platform URI (lowercased).
    pub name: String,
    /// Hive keys probed in order, e.g. `HKLM\SOFTWARE\Valve\Steam`.
    #[serde(default)]
    pub hive_keys: Vec<String>,
    /// Value holding the install directory under each key.
    pub value_name: String,
    pub strategy: ListingStrategy,
    /// Image name of the platform client process.
    pub process_name: String,
    #[serde(default)]
    pub launch_method: LaunchMethod,
    /// Directories tried after the hive keys. A leading `~` expands to `$HOME`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback_dirs: Vec<String>,
}

impl LauncherInfo {
    /// Scheme used for `scheme://run/<id>` URIs.
    pub fn uri_scheme(&self) -> String {
        self.name.to_lowercase()
    }
}

fn launcher(
    name: &str,
    hive_keys: &[&str],
    value_name: &str,
    strategy: ListingStrategy,
    process_name: &str,
    launch_method: LaunchMethod,
    fallback_dirs: &[&str],
) -> LauncherInfo {
    LauncherInfo {
        name: name.into(),
        hive_keys: hive_keys.iter().map(|k| k.to_string()).collect(),
        value_name: value_name.into(),
        strategy,
        process_name: process_name.into(),
        launch_method,
        fallback_dirs: fallback_dirs.iter().map(|d| d.to_string()).collect(),
    }
}

/// Returns the built-in launcher table, in scan order.
pub fn default_launchers() -> Vec<LauncherInfo> {
    vec![
        launcher(
            "Steam",
            &[
                r"HKLM\SOFTWARE\WOW6432Node\Valve\Steam",
                r"HKLM\SOFTWARE\Valve\Steam",
            ],
            "InstallPath",
            ListingStrategy::SteamLibrary,
            "steam.exe",
            LaunchMethod::Protocol,
            &[
                "~/.steam/steam",
                "~/.local/share/Steam",
                "~/.var/app/com.valvesoftware.Steam/.steam/steam",
            ],
        ),
        launcher(
            "Epic",
            &[
                r"HKLM\SOFTWARE\WOW6432Node\Epic Games\EpicGamesLauncher",
                r"HKLM\SOFTWARE\Epic Games\EpicGamesLauncher",
            ],
            "AppDataPath",
            ListingStrategy::EpicManifests,
            "EpicGamesLauncher.exe",
            LaunchMethod::Direct,
            &[],
        ),
        launcher(
            "GOG",
            &[r"HKLM\SOFTWARE\WOW6432Node\GOG.com\GalaxyClient\paths"],
            "client",
            ListingStrategy::GogGalaxy,
            "GalaxyClient.exe",
            LaunchMethod::Direct,
            &[],
        ),
        launcher(
            "Xbox",
            &[r"HKLM\SOFTWARE\Microsoft\GamingServices"],
            "GameInstallPath",
            ListingStrategy::XboxApp,
            "XboxPcApp.exe",
            LaunchMethod::Direct,
            &[],
        ),
        launcher(
            "Rockstar",
            &[r"HKLM\SOFTWARE\WOW6432Node\Rockstar Games\Launcher"],
            "InstallFolder",
            ListingStrategy::Rockstar,
            "Launcher.exe",
            LaunchMethod::Direct,
            &[],
        ),
        launcher(
            "EA",
            &[r"HKLM\SOFTWARE\WOW6432Node\Electronic Arts\EA Desktop"],
            "InstallLocation",
            ListingStrategy::EaDesktop,
            "EADesktop.exe",
            LaunchMethod::Direct,
            &[],
        ),
        launcher(
            "Ubisoft",
            &[r"HKLM\SOFTWARE\WOW6432Node\Ubisoft\Launcher"],
            "InstallDir",
            ListingStrategy::UbisoftConnect,
            "upc.exe",
            LaunchMethod::Direct,
            &[],
        ),
    ]
}
