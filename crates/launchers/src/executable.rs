//! Main executable selection for an install directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Binaries larger than this are assumed to be the game itself.
pub const DEFAULT_MIN_MAIN_EXECUTABLE_BYTES: u64 = 5 * 1024 * 1024;

/// Case-insensitive name fragments of helper binaries that are never the game.
const EXCLUDED_NAME_PARTS: &[&str] = &[
    "unins",
    "uninstall",
    "launcher",
    "setup",
    "redist",
    "dxsetup",
    "crashreport",
    "crashhandler",
    "crashpad",
    "errorreport",
    "bugreport",
];

/// Picks the most likely game binary under `install_path`.
///
/// Order of preference:
/// 1. the first non-helper `.exe` larger than `min_bytes`
/// 2. `game.exe`, `app.exe`, `<install dir name>.exe`
/// 3. the first `.exe` found at all
pub fn find_main_executable(install_path: &Path, min_bytes: u64) -> Option<PathBuf> {
    let executables = list_executables(install_path);

    if let Some((path, _)) = executables
        .iter()
        .find(|(path, size)| *size > min_bytes && !is_excluded(path))
    {
        return Some(path.clone());
    }

    let mut conventional = vec!["game.exe".to_string(), "app.exe".to_string()];
    if let Some(dir_name) = install_path.file_name() {
        conventional.push(format!("{}.exe", dir_name.to_string_lossy()));
    }
    for name in &conventional {
        if let Some((path, _)) = executables.iter().find(|(path, _)| {
            file_name(path).is_some_and(|n| n.eq_ignore_ascii_case(name))
        }) {
            return Some(path.clone());
        }
    }

    executables.into_iter().next().map(|(path, _)| path)
}

/// Lists `.exe` files under `root` with their sizes, in sorted walk order.
fn list_executables(root: &Path) -> Vec<(PathBuf, u64)> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
        })
        .filter_map(|entry| {
            let size = entry.metadata().ok()?.len();
            Some((entry.into_path(), size))
        })
        .collect()
}

fn is_excluded(path: &Path) -> bool {
    let Some(name) = file_name(path) else {
        return true;
    };
    let name = name.to_lowercase();
    EXCLUDED_NAME_PARTS.iter().any(|part| name.contains(part))
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sized(path: &Path, len: u64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let file = fs::File::create(path).unwrap();
        file.set_len(len).unwrap();
    }

    #[test]
    fn picks_large_binary_over_helpers() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write_sized(&dir.join("Main.exe"), 10 * 1024 * 1024);
        write_sized(&dir.join("unins000.exe"), 1024);
        write_sized(&dir.join("setup_redist.exe"), 2 * 1024);

        let exe = find_main_executable(dir, DEFAULT_MIN_MAIN_EXECUTABLE_BYTES);
        assert_eq!(exe, Some(dir.join("Main.exe")));
    }

    #[test]
    fn large_helper_is_still_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write_sized(&dir.join("AGame_Launcher.exe"), 20 * 1024 * 1024);
        write_sized(&dir.join("bin/x64/Game-Win64.exe"), 8 * 1024 * 1024);

        let exe = find_main_executable(dir, DEFAULT_MIN_MAIN_EXECUTABLE_BYTES);
        assert_eq!(exe, Some(dir.join("bin/x64/Game-Win64.exe")));
    }

    #[test]
    fn falls_back_to_conventional_names() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Portal");
        write_sized(&dir.join("a_tool.exe"), 100);
        write_sized(&dir.join("Portal.exe"), 100);

        let exe = find_main_executable(&dir, DEFAULT_MIN_MAIN_EXECUTABLE_BYTES);
        assert_eq!(exe, Some(dir.join("Portal.exe")));
    }

    #[test]
    fn game_exe_preferred_over_dir_name() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Thing");
        write_sized(&dir.join("Thing.exe"), 100);
        write_sized(&dir.join("sub/GAME.EXE"), 100);

        let exe = find_main_executable(&dir, DEFAULT_MIN_MAIN_EXECUTABLE_BYTES);
        assert_eq!(exe, Some(dir.join("sub/GAME.EXE")));
    }

    #[test]
    fn falls_back_to_first_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write_sized(&dir.join("b.exe"), 100);
        write_sized(&dir.join("a_uninstall.exe"), 100);

        let exe = find_main_executable(dir, DEFAULT_MIN_MAIN_EXECUTABLE_BYTES);
        assert_eq!(exe, Some(dir.join("a_uninstall.exe")));
    }

    #[test]
    fn no_executables_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("readme.txt"), "hi").unwrap();
        assert_eq!(
            find_main_executable(tmp.path(), DEFAULT_MIN_MAIN_EXECUTABLE_BYTES),
            None
        );
    }

    #[test]
    fn threshold_is_configurable() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write_sized(&dir.join("a.exe"), 10);
        write_sized(&dir.join("b.exe"), 2000);

        assert_eq!(find_main_executable(dir, 1000), Some(dir.join("b.exe")));
    }
}
