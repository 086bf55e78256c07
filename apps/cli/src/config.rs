//! CLI configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/vrconvert/config.toml`
//! - Windows: `%APPDATA%/vrconvert/config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vrconvert_launchers::{
    DEFAULT_MIN_MAIN_EXECUTABLE_BYTES, LauncherInfo, ScanOptions, default_launchers,
};
use vrconvert_orchestrator::LaunchTimeouts;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Additional Steam-style library roots.
    pub extra_libraries: Vec<PathBuf>,

    pub launch: LaunchConfig,

    pub scan: ScanConfig,

    /// Replaces the built-in launcher table when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launchers: Option<Vec<LauncherInfo>>,
}

/// Polling budgets for launches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub poll_interval_ms: u64,
    pub launcher_start_timeout_secs: u64,
    pub process_discovery_timeout_secs: u64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            launcher_start_timeout_secs: 10,
            process_discovery_timeout_secs: 30,
        }
    }
}

impl LaunchConfig {
    pub fn timeouts(&self) -> LaunchTimeouts {
        LaunchTimeouts {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            launcher_start_timeout: Duration::from_secs(self.launcher_start_timeout_secs),
            process_discovery_timeout: Duration::from_secs(self.process_discovery_timeout_secs),
        }
    }
}

/// Library scan tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub min_main_executable_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_main_executable_bytes: DEFAULT_MIN_MAIN_EXECUTABLE_BYTES,
        }
    }
}

impl Config {
    /// Loads configuration from `path` (or the platform default), creating
    /// a default file if none exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Writes the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Launcher table in effect: the configured one or the built-in default.
    pub fn launcher_table(&self) -> Vec<LauncherInfo> {
        self.launchers.clone().unwrap_or_else(default_launchers)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            min_main_executable_bytes: self.scan.min_main_executable_bytes,
            extra_libraries: self.extra_libraries.clone(),
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("vrconvert")
            .join("config.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("vrconvert").join("config.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/vrconvert/config.toml"))
    }
}
