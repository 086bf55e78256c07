//! Steam library scanning.
//!
//! Layout:
//! - `{steam}/steamapps/libraryfolders.vdf` lists extra libraries via `"path"`
//! - `{library}/steamapps/appmanifest_<appid>.acf` describes one installed app
//! - `{library}/steamapps/common/<installdir>` holds the game files

use std::fs;
use std::path::{Path, PathBuf};

use vrconvert_types::DetectedGame;

use crate::LauncherError;
use crate::executable::find_main_executable;
use crate::keyvalue;
use crate::manifest::ScanOptions;
use crate::registry::LauncherInfo;

/// Descriptor locations relative to the Steam install directory.
const LIBRARY_FOLDERS_FILES: &[&str] = &[
    "steamapps/libraryfolders.vdf",
    "config/libraryfolders.vdf",
];

const APP_MANIFEST_PREFIX: &str = "appmanifest_";

/// Fields of an `appmanifest_*.acf` file needed for detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppManifest {
    pub app_id: String,
    pub name: String,
    pub install_dir: String,
}

/// Extracts `"path"` values from `libraryfolders.vdf` content, in file order.
pub fn parse_library_paths(content: &str) -> Vec<PathBuf> {
    keyvalue::values_of(content, "path")
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Parses an app manifest. Returns `None` if any required field is missing.
pub fn parse_app_manifest(content: &str) -> Option<AppManifest> {
    let app_id = keyvalue::value_of(content, "appid").filter(|v| !v.is_empty())?;
    let name = keyvalue::value_of(content, "name").filter(|v| !v.is_empty())?;
    let install_dir = keyvalue::value_of(content, "installdir").filter(|v| !v.is_empty())?;
    Some(AppManifest {
        app_id,
        name,
        install_dir,
    })
}

/// Library roots de-duplicated by the directory they resolve to.
///
/// The first spelling of a directory is kept, so a symlinked Steam dir and
/// the real path listed in `libraryfolders.vdf` count once.
#[derive(Debug, Default)]
struct LibrarySet {
    folders: Vec<PathBuf>,
    resolved: Vec<PathBuf>,
}

impl LibrarySet {
    /// Adds `path` unless it points at a directory already present.
    fn insert(&mut self, path: PathBuf) {
        let resolved = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if self.resolved.contains(&resolved) {
            tracing::debug!(path = %path.display(), "library already listed");
            return;
        }
        self.resolved.push(resolved);
        self.folders.push(path);
    }

    fn into_vec(self) -> Vec<PathBuf> {
        self.folders
    }
}

/// Returns every library root: the Steam directory itself, then each
/// existing `"path"` from the descriptor, without duplicates.
pub fn library_folders(steam_dir: &Path) -> Vec<PathBuf> {
    library_set(steam_dir).into_vec()
}

fn library_set(steam_dir: &Path) -> LibrarySet {
    let mut folders = LibrarySet::default();
    folders.insert(steam_dir.to_path_buf());

    let Some(descriptor) = LIBRARY_FOLDERS_FILES
        .iter()
        .map(|rel| steam_dir.join(rel))
        .find(|p| p.is_file())
    else {
        tracing::debug!(steam_dir = %steam_dir.display(), "no libraryfolders.vdf");
        return folders;
    };

    let content = match fs::read(&descriptor) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(
                path = %descriptor.display(),
                error = %e,
                "failed to read library descriptor"
            );
            return folders;
        }
    };

    for path in parse_library_paths(&content) {
        if !path.is_dir() {
            tracing::debug!(path = %path.display(), "library path does not exist");
            continue;
        }
        folders.insert(path);
    }

    folders
}

/// Lists the games of every Steam library reachable from `steam_dir`.
pub fn list_steam_games(
    launcher: &LauncherInfo,
    steam_dir: &Path,
    options: &ScanOptions,
) -> Vec<DetectedGame> {
    let mut set = library_set(steam_dir);
    for extra in &options.extra_libraries {
        if extra.is_dir() {
            set.insert(extra.clone());
        }
    }
    let libraries = set.into_vec();

    let mut games = Vec::new();
    for library in &libraries {
        let found = list_library_games(launcher, library, options);
        tracing::debug!(library = %library.display(), games = found.len(), "library scanned");
        games.extend(found);
    }
    games
}

/// Lists the games of a single library root.
pub fn list_library_games(
    launcher: &LauncherInfo,
    library: &Path,
    options: &ScanOptions,
) -> Vec<DetectedGame> {
    let steamapps = library.join("steamapps");
    let mut manifests = match manifest_files(&steamapps) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(path = %steamapps.display(), error = %e, "cannot list app manifests");
            return Vec::new();
        }
    };
    manifests.sort();

    let mut games = Vec::new();
    for path in manifests {
        match game_from_manifest(launcher, &steamapps, &path, options) {
            Ok(Some(game)) => games.push(game),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping app manifest");
            }
        }
    }
    games
}

fn manifest_files(steamapps: &Path) -> Result<Vec<PathBuf>, LauncherError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(steamapps)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(APP_MANIFEST_PREFIX) && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    Ok(files)
}

fn game_from_manifest(
    launcher: &LauncherInfo,
    steamapps: &Path,
    path: &Path,
    options: &ScanOptions,
) -> Result<Option<DetectedGame>, LauncherError> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);

    let Some(manifest) = parse_app_manifest(&content) else {
        return Err(LauncherError::Manifest(
            "missing appid, name or installdir".into(),
        ));
    };

    let install_path = steamapps.join("common").join(&manifest.install_dir);
    let Some(executable_path) =
        find_main_executable(&install_path, options.min_main_executable_bytes)
    else {
        tracing::debug!(
            app_id = %manifest.app_id,
            path = %install_path.display(),
            "no executable found, skipping"
        );
        return Ok(None);
    };

    Ok(Some(DetectedGame {
        game_id: manifest.app_id,
        game_name: manifest.name,
        install_path,
        executable_path,
        launcher_name: launcher.name.clone(),
        launch_method: launcher.launch_method,
        game_type: Default::default(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_launchers;
    use vrconvert_types::{GameType, LaunchMethod};

    fn steam() -> LauncherInfo {
        default_launchers().remove(0)
    }

    fn write_manifest(library: &Path, app_id: &str, name: &str, install_dir: &str) {
        let steamapps = library.join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        let content = format!(
            "\"AppState\"\n{{\n\t\"appid\"\t\t\"{app_id}\"\n\t\"Universe\"\t\t\"1\"\n\t\"name\"\t\t\"{name}\"\n\t\"StateFlags\"\t\t\"4\"\n\t\"installdir\"\t\t\"{install_dir}\"\n}}\n"
        );
        fs::write(steamapps.join(format!("appmanifest_{app_id}.acf")), content).unwrap();
    }

    fn write_game(library: &Path, install_dir: &str, exe: &str) {
        let dir = library.join("steamapps/common").join(install_dir);
        fs::create_dir_all(&dir).unwrap();
        let file = fs::File::create(dir.join(exe)).unwrap();
        file.set_len(6 * 1024 * 1024).unwrap();
    }

    #[test]
    fn parse_library_paths_in_file_order() {
        let content = r#"
"libraryfolders"
{
	"0"
	{
		"path"		"C:\\Program Files (x86)\\Steam"
		"label"		""
		"apps"
		{
			"228980"		"354606068"
		}
	}
	"1"
	{
		"path"		"D:\\SteamLibrary"
	}
	"2"
	{
		"path		"E:\\Broken
	}
}
"#;
        assert_eq!(
            parse_library_paths(content),
            vec![
                PathBuf::from(r"C:\Program Files (x86)\Steam"),
                PathBuf::from(r"D:\SteamLibrary"),
            ]
        );
    }

    #[test]
    fn library_folders_keeps_existing_paths_only() {
        let tmp = tempfile::tempdir().unwrap();
        let steam_dir = tmp.path().join("Steam");
        let lib_a = tmp.path().join("LibA");
        let lib_b = tmp.path().join("LibB");
        fs::create_dir_all(steam_dir.join("steamapps")).unwrap();
        fs::create_dir_all(&lib_a).unwrap();
        fs::create_dir_all(&lib_b).unwrap();

        let content = format!(
            "\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n\t\"1\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n\t\"2\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n\t\"3\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n}}\n",
            steam_dir.display(),
            lib_b.display(),
            tmp.path().join("missing").display(),
            lib_a.display(),
        );
        fs::write(steam_dir.join("steamapps/libraryfolders.vdf"), content).unwrap();

        assert_eq!(library_folders(&steam_dir), vec![steam_dir, lib_b, lib_a]);
    }

    #[test]
    fn library_folders_without_descriptor_is_install_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(library_folders(tmp.path()), vec![tmp.path().to_path_buf()]);
    }

    #[test]
    fn parse_manifest_fields() {
        let content = "\"AppState\"\n{\n\t\"appid\"\t\"271590\"\n\t\"name\"\t\"Grand Theft Auto V\"\n\t\"installdir\"\t\"Grand Theft Auto V\"\n}\n";
        assert_eq!(
            parse_app_manifest(content),
            Some(AppManifest {
                app_id: "271590".into(),
                name: "Grand Theft Auto V".into(),
                install_dir: "Grand Theft Auto V".into(),
            })
        );
    }

    #[test]
    fn parse_manifest_missing_field_is_none() {
        assert_eq!(parse_app_manifest("\"appid\" \"1\"\n\"name\" \"X\"\n"), None);
        assert_eq!(parse_app_manifest("\"appid\" \"1\"\n\"installdir\" \"X\"\n"), None);
        assert_eq!(parse_app_manifest("\"name\" \"X\"\n\"installdir\" \"X\"\n"), None);
    }

    #[test]
    fn lists_games_across_libraries() {
        let tmp = tempfile::tempdir().unwrap();
        let steam_dir = tmp.path().join("Steam");
        let lib = tmp.path().join("Lib");
        fs::create_dir_all(steam_dir.join("steamapps")).unwrap();
        fs::create_dir_all(&lib).unwrap();
        fs::write(
            steam_dir.join("steamapps/libraryfolders.vdf"),
            format!(
                "\"libraryfolders\"\n{{\n\t\"1\"\n\t{{\n\t\t\"path\"\t\"{}\"\n\t}}\n}}\n",
                lib.display()
            ),
        )
        .unwrap();

        write_manifest(&steam_dir, "271590", "Grand Theft Auto V", "Grand Theft Auto V");
        write_game(&steam_dir, "Grand Theft Auto V", "GTA5.exe");
        write_manifest(&lib, "1091500", "Cyberpunk 2077", "Cyberpunk 2077");
        write_game(&lib, "Cyberpunk 2077", "Cyberpunk2077.exe");

        let games = list_steam_games(&steam(), &steam_dir, &ScanOptions::default());
        assert_eq!(games.len(), 2);

        let gta = &games[0];
        assert_eq!(gta.game_id, "271590");
        assert_eq!(gta.game_name, "Grand Theft Auto V");
        assert_eq!(
            gta.install_path,
            steam_dir.join("steamapps/common/Grand Theft Auto V")
        );
        assert_eq!(gta.executable_path, gta.install_path.join("GTA5.exe"));
        assert_eq!(gta.launcher_name, "Steam");
        assert_eq!(gta.launch_method, LaunchMethod::Protocol);
        assert_eq!(gta.game_type, GameType::Unknown);

        assert_eq!(games[1].game_id, "1091500");
        assert_eq!(
            games[1].install_path,
            lib.join("steamapps/common/Cyberpunk 2077")
        );
    }

    #[test]
    fn skips_incomplete_manifest_and_missing_executable() {
        let tmp = tempfile::tempdir().unwrap();
        let lib = tmp.path();
        fs::create_dir_all(lib.join("steamapps")).unwrap();
        fs::write(
            lib.join("steamapps/appmanifest_1.acf"),
            "\"AppState\"\n{\n\t\"appid\"\t\"1\"\n\t\"name\"\t\"No Dir\"\n}\n",
        )
        .unwrap();
        write_manifest(lib, "2", "Not Downloaded", "Not Downloaded");
        write_manifest(lib, "3", "Installed", "Installed");
        write_game(lib, "Installed", "Installed.exe");

        let games = list_library_games(&steam(), lib, &ScanOptions::default());
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, "3");
    }

    #[test]
    fn extra_libraries_are_scanned() {
        let tmp = tempfile::tempdir().unwrap();
        let steam_dir = tmp.path().join("Steam");
        let extra = tmp.path().join("Extra");
        fs::create_dir_all(&steam_dir).unwrap();
        write_manifest(&extra, "10", "Extra Game", "Extra Game");
        write_game(&extra, "Extra Game", "eg.exe");

        let options = ScanOptions {
            extra_libraries: vec![extra.clone()],
            ..ScanOptions::default()
        };
        let games = list_steam_games(&steam(), &steam_dir, &options);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].install_path, extra.join("steamapps/common/Extra Game"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_steam_dir_is_one_library() {
        let tmp = tempfile::tempdir().unwrap();
        let real = tmp.path().join("share/Steam");
        let link = tmp.path().join("dot-steam");
        fs::create_dir_all(real.join("steamapps")).unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();
        fs::write(
            real.join("steamapps/libraryfolders.vdf"),
            format!(
                "\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\"{}\"\n\t}}\n}}\n",
                real.display()
            ),
        )
        .unwrap();
        write_manifest(&real, "271590", "Grand Theft Auto V", "Grand Theft Auto V");
        write_game(&real, "Grand Theft Auto V", "GTA5.exe");

        assert_eq!(library_folders(&link), vec![link.clone()]);

        let options = ScanOptions {
            extra_libraries: vec![real.clone()],
            ..ScanOptions::default()
        };
        let games = list_steam_games(&steam(), &link, &options);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, "271590");
    }
}
