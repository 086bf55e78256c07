//! Install directory resolution.
//!
//! A launcher is located by probing its hive keys in order and, failing
//! that, its filesystem fallbacks. A launcher that is not installed is an
//! expected outcome, so resolution returns `None` instead of an error.

use std::path::{Path, PathBuf};

use crate::registry::LauncherInfo;

/// Read-only access to the OS configuration hive (the registry on Windows).
pub trait ConfigHive {
    /// Returns the string value `value_name` under `key`, if both exist.
    fn read_string(&self, key: &str, value_name: &str) -> Option<String>;
}

/// Hive with no keys. Used on platforms without a registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHive;

impl ConfigHive for NullHive {
    fn read_string(&self, _key: &str, _value_name: &str) -> Option<String> {
        None
    }
}

impl<T: ConfigHive + ?Sized> ConfigHive for Box<T> {
    fn read_string(&self, key: &str, value_name: &str) -> Option<String> {
        (**self).read_string(key, value_name)
    }
}

/// Returns the hive of the running platform.
#[cfg(target_os = "windows")]
pub fn system_hive() -> Box<dyn ConfigHive + Send + Sync> {
    Box::new(crate::paths_windows::RegistryHive)
}

/// Returns the hive of the running platform.
#[cfg(not(target_os = "windows"))]
pub fn system_hive() -> Box<dyn ConfigHive + Send + Sync> {
    Box::new(NullHive)
}

/// Returns the first existing install directory for `launcher`.
pub fn resolve_install_dir(launcher: &LauncherInfo, hive: &dyn ConfigHive) -> Option<PathBuf> {
    for key in &launcher.hive_keys {
        let Some(value) = hive.read_string(key, &launcher.value_name) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let path = PathBuf::from(value);
        if path.is_dir() {
            tracing::debug!(
                launcher = %launcher.name,
                key,
                path = %path.display(),
                "install path from hive"
            );
            return Some(path);
        }
        tracing::debug!(
            launcher = %launcher.name,
            key,
            path = %path.display(),
            "hive path does not exist"
        );
    }

    for dir in &launcher.fallback_dirs {
        let Some(path) = expand_home(dir) else {
            continue;
        };
        if path.is_dir() {
            tracing::debug!(
                launcher = %launcher.name,
                path = %path.display(),
                "install path from fallback"
            );
            return Some(path);
        }
    }

    tracing::debug!(launcher = %launcher.name, "launcher not installed");
    None
}

/// Expands a leading `~` to `$HOME` (or `%USERPROFILE%`).
fn expand_home(dir: &str) -> Option<PathBuf> {
    let Some(rest) = dir.strip_prefix('~') else {
        return Some(PathBuf::from(dir));
    };
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    let rest = rest.trim_start_matches(['/', '\\']);
    Some(Path::new(&home).join(rest))
}
