//! Scan flow: launcher table → install dir → library listing → game table.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use vrconvert_classify::Classify;
use vrconvert_launchers::{
    ConfigHive, LauncherInfo, ScanOptions, list_games, resolve_install_dir,
};
use vrconvert_types::{DetectedGame, GameKey, GameProfile};

use crate::cache::ProfileCache;
use crate::error::DetectorError;
use crate::table::GameTable;

/// Outcome of scanning one launcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherScan {
    pub launcher_name: String,
    /// `None` when the launcher is not installed.
    pub install_dir: Option<PathBuf>,
    /// Games added to the table (duplicates excluded).
    pub games: usize,
}

/// Summary of a full scan, in launcher-table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub launchers: Vec<LauncherScan>,
}

impl ScanReport {
    pub fn total_games(&self) -> usize {
        self.launchers.iter().map(|l| l.games).sum()
    }

    /// Launchers whose install directory was resolved.
    pub fn installed(&self) -> impl Iterator<Item = &LauncherScan> {
        self.launchers.iter().filter(|l| l.install_dir.is_some())
    }
}

/// Detects games across an explicit launcher table and hands out profiles.
///
/// Owns the game table and profile cache; one scan or profile lookup runs
/// at a time through `&mut self`.
pub struct Detector<H, C> {
    launchers: Vec<LauncherInfo>,
    hive: H,
    options: ScanOptions,
    games: GameTable,
    profiles: ProfileCache<C>,
}

impl<H: ConfigHive, C: Classify> Detector<H, C> {
    pub fn new(launchers: Vec<LauncherInfo>, hive: H, classifier: C, options: ScanOptions) -> Self {
        Self {
            launchers,
            hive,
            options,
            games: GameTable::new(),
            profiles: ProfileCache::new(classifier),
        }
    }

    /// Replaces the game table with a fresh scan of every launcher.
    ///
    /// Missing launchers and unreadable libraries contribute zero games.
    /// Cached profiles survive rescans.
    pub fn scan(&mut self) -> ScanReport {
        self.games.clear();
        let mut report = ScanReport::default();

        for launcher in &self.launchers {
            let Some(install_dir) = resolve_install_dir(launcher, &self.hive) else {
                report.launchers.push(LauncherScan {
                    launcher_name: launcher.name.clone(),
                    install_dir: None,
                    games: 0,
                });
                continue;
            };

            let mut added = 0;
            for game in list_games(launcher, &install_dir, &self.options) {
                if self.games.insert(game) {
                    added += 1;
                }
            }

            tracing::info!(
                launcher = %launcher.name,
                path = %install_dir.display(),
                games = added,
                "launcher scanned"
            );
            report.launchers.push(LauncherScan {
                launcher_name: launcher.name.clone(),
                install_dir: Some(install_dir),
                games: added,
            });
        }

        tracing::info!(games = self.games.len(), "scan complete");
        report
    }

    /// Games from the last scan, ordered by key.
    pub fn games(&self) -> impl Iterator<Item = &DetectedGame> {
        self.games.iter()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn find(&self, key: &GameKey) -> Option<&DetectedGame> {
        self.games.get(key)
    }

    pub fn launchers(&self) -> &[LauncherInfo] {
        &self.launchers
    }

    /// Looks up a launcher by name, ignoring case.
    pub fn launcher(&self, name: &str) -> Option<&LauncherInfo> {
        self.launchers
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// Returns the profile of a detected game, classifying it on first access.
    ///
    /// The classified type is written back to the game table.
    pub fn get_or_create_profile(
        &mut self,
        key: &GameKey,
    ) -> Result<Arc<GameProfile>, DetectorError> {
        let game = self
            .games
            .get(key)
            .ok_or_else(|| DetectorError::UnknownGame(key.clone()))?;
        let profile = self.profiles.get_or_create(game);
        self.games.set_game_type(key, profile.game_type);
        Ok(profile)
    }

    /// Drops every cached profile.
    pub fn clear_profiles(&mut self) {
        self.profiles.clear();
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use vrconvert_classify::Classifier;
    use vrconvert_types::{GameType, LaunchMethod, ListingStrategy};

    #[derive(Default)]
    struct MapHive(HashMap<String, String>);

    impl ConfigHive for MapHive {
        fn read_string(&self, key: &str, _value_name: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    fn launcher(name: &str, key: &str, strategy: ListingStrategy) -> LauncherInfo {
        LauncherInfo {
            name: name.into(),
            hive_keys: vec![key.into()],
            value_name: "InstallPath".into(),
            strategy,
            process_name: format!("{name}.exe"),
            launch_method: LaunchMethod::Protocol,
            fallback_dirs: Vec::new(),
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn write_app(library: &Path, app_id: &str, name: &str, install_dir: &str) {
        let steamapps = library.join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        fs::write(
            steamapps.join(format!("appmanifest_{app_id}.acf")),
            format!(
                "\"AppState\"\n{{\n\t\"appid\"\t\t\"{app_id}\"\n\t\"name\"\t\t\"{name}\"\n\t\"installdir\"\t\t\"{install_dir}\"\n}}\n"
            ),
        )
        .unwrap();
    }

    /// Steam install with GTA V (full signature) and one unrelated game.
    fn steam_fixture(root: &Path) -> PathBuf {
        let steam = root.join("Steam");
        write_app(&steam, "271590", "Grand Theft Auto V", "Grand Theft Auto V");
        let gta = steam.join("steamapps/common/Grand Theft Auto V");
        touch(&gta.join("GTA5.exe"));
        touch(&gta.join("common.rpf"));
        touch(&gta.join("x64a.rpf"));
        fs::create_dir_all(gta.join("update")).unwrap();
        fs::create_dir_all(gta.join("x64")).unwrap();

        write_app(&steam, "620", "Portal 2", "Portal 2");
        touch(&steam.join("steamapps/common/Portal 2/portal2.exe"));
        steam
    }

    fn detector(root: &Path) -> Detector<MapHive, Classifier> {
        let steam = steam_fixture(root);
        let mut hive = MapHive::default();
        hive.0
            .insert(r"HKLM\Steam".into(), steam.to_string_lossy().into_owned());

        Detector::new(
            vec![
                launcher("Steam", r"HKLM\Steam", ListingStrategy::SteamLibrary),
                launcher("Epic", r"HKLM\Epic", ListingStrategy::EpicManifests),
            ],
            hive,
            Classifier::with_defaults().unwrap(),
            ScanOptions::default(),
        )
    }

    #[test]
    fn scan_lists_games_and_reports_missing_launchers() {
        let tmp = tempfile::tempdir().unwrap();
        let mut det = detector(tmp.path());

        let report = det.scan();
        assert_eq!(report.total_games(), 2);
        assert_eq!(report.launchers.len(), 2);
        assert_eq!(report.launchers[0].games, 2);
        assert!(report.launchers[1].install_dir.is_none());
        assert_eq!(report.installed().count(), 1);

        let ids: Vec<&str> = det.games().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, ["271590", "620"]);
        assert!(det.games().all(|g| g.game_type == GameType::Unknown));
    }

    #[test]
    fn profile_classifies_and_writes_back_type() {
        let tmp = tempfile::tempdir().unwrap();
        let mut det = detector(tmp.path());
        det.scan();

        let key = GameKey::new("Steam", "271590");
        let first = det.get_or_create_profile(&key).unwrap();
        let second = det.get_or_create_profile(&key).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.game_type, GameType::Gta5);
        assert_eq!(det.find(&key).unwrap().game_type, GameType::Gta5);
        assert_eq!(det.profile_count(), 1);

        let portal = det
            .get_or_create_profile(&GameKey::new("Steam", "620"))
            .unwrap();
        assert_eq!(portal.game_type, GameType::Unknown);
    }

    #[test]
    fn profiles_survive_rescan_until_cleared() {
        let tmp = tempfile::tempdir().unwrap();
        let mut det = detector(tmp.path());
        det.scan();
        let key = GameKey::new("Steam", "271590");
        let first = det.get_or_create_profile(&key).unwrap();

        det.scan();
        assert!(Arc::ptr_eq(&first, &det.get_or_create_profile(&key).unwrap()));

        det.clear_profiles();
        assert!(!Arc::ptr_eq(&first, &det.get_or_create_profile(&key).unwrap()));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut det = detector(tmp.path());
        det.scan();

        let err = det
            .get_or_create_profile(&GameKey::new("Epic", "nope"))
            .unwrap_err();
        assert!(matches!(err, DetectorError::UnknownGame(k) if k.game_id == "nope"));
    }

    #[test]
    fn duplicate_ids_across_libraries_keep_first() {
        let tmp = tempfile::tempdir().unwrap();
        let steam = steam_fixture(tmp.path());
        let extra = tmp.path().join("Extra");
        write_app(&extra, "620", "Portal 2 (copy)", "Portal 2");
        touch(&extra.join("steamapps/common/Portal 2/portal2.exe"));

        let mut hive = MapHive::default();
        hive.0
            .insert(r"HKLM\Steam".into(), steam.to_string_lossy().into_owned());
        let options = ScanOptions {
            extra_libraries: vec![extra],
            ..ScanOptions::default()
        };
        let mut det = Detector::new(
            vec![launcher("Steam", r"HKLM\Steam", ListingStrategy::SteamLibrary)],
            hive,
            Classifier::with_defaults().unwrap(),
            options,
        );

        let report = det.scan();
        assert_eq!(report.total_games(), 2);
        let portal = det.find(&GameKey::new("Steam", "620")).unwrap();
        assert_eq!(portal.game_name, "Portal 2");
    }

    #[test]
    fn launcher_lookup_ignores_case() {
        let tmp = tempfile::tempdir().unwrap();
        let det = detector(tmp.path());
        assert_eq!(det.launcher("steam").unwrap().name, "Steam");
        assert!(det.launcher("gog").is_none());
        assert_eq!(det.launchers().len(), 2);
    }
}
