//! Command execution.

use std::path::Path;

use anyhow::{Context, bail};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use vrconvert_classify::Classifier;
use vrconvert_detector::{Detector, LauncherScan};
use vrconvert_launchers::{ConfigHive, find_main_executable, system_hive};
use vrconvert_orchestrator::{LaunchContext, Orchestrator, SysinfoProcessTable, SystemSpawner};
use vrconvert_types::{DetectedGame, GameKey};

use crate::cli::Command;
use crate::config::Config;

type SystemDetector = Detector<Box<dyn ConfigHive + Send + Sync>, Classifier>;
type SystemOrchestrator = Orchestrator<SysinfoProcessTable, SystemSpawner>;

#[derive(Serialize)]
struct ScanOutput<'a> {
    launchers: &'a [LauncherScan],
    games: Vec<&'a DetectedGame>,
}

/// Runs one CLI command to completion.
pub async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    match command {
        Command::Scan { json } => scan(&config, json),
        Command::Classify { dir, exe } => classify(&config, &dir, exe.as_deref()),
        Command::Profile { launcher, game_id } => profile(&config, &launcher, &game_id),
        Command::Launch {
            launcher,
            game_id,
            method,
        } => launch(&config, &launcher, &game_id, method.as_deref()).await,
        Command::Attach { launcher, game_id } => attach(&config, &launcher, &game_id),
        Command::Status { launcher, game_id } => status(&config, &launcher, &game_id),
    }
}

fn detector(config: &Config) -> anyhow::Result<SystemDetector> {
    let classifier = Classifier::with_defaults()?;
    Ok(Detector::new(
        config.launcher_table(),
        system_hive(),
        classifier,
        config.scan_options(),
    ))
}

fn orchestrator(config: &Config) -> SystemOrchestrator {
    Orchestrator::new(
        config.launcher_table(),
        SysinfoProcessTable::new(),
        SystemSpawner,
    )
}

/// Scans every launcher and returns the detected record for one game.
fn find_game(
    detector: &mut SystemDetector,
    launcher: &str,
    game_id: &str,
) -> anyhow::Result<DetectedGame> {
    let name = detector
        .launcher(launcher)
        .map(|l| l.name.clone())
        .with_context(|| format!("unknown launcher '{launcher}'"))?;

    detector.scan();
    let key = GameKey::new(name, game_id);
    match detector.find(&key) {
        Some(game) => Ok(game.clone()),
        None => bail!("{key} not detected; run `vrconvert scan` to list games"),
    }
}

fn scan(config: &Config, json: bool) -> anyhow::Result<()> {
    let mut detector = detector(config)?;
    let report = detector.scan();

    if json {
        let output = ScanOutput {
            launchers: &report.launchers,
            games: detector.games().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for launcher in &report.launchers {
        match &launcher.install_dir {
            Some(dir) => println!(
                "{:<10} {} ({} games)",
                launcher.launcher_name,
                dir.display(),
                launcher.games
            ),
            None => println!("{:<10} not installed", launcher.launcher_name),
        }
    }
    if detector.game_count() > 0 {
        println!();
    }
    for game in detector.games() {
        println!(
            "{}\t{}\t{}",
            game.key(),
            game.game_name,
            game.executable_path.display()
        );
    }
    Ok(())
}

fn classify(config: &Config, dir: &Path, exe: Option<&str>) -> anyhow::Result<()> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let executable_name = match exe {
        Some(name) => name.to_string(),
        None => find_main_executable(dir, config.scan.min_main_executable_bytes)
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default(),
    };

    let classifier = Classifier::with_defaults()?;
    let game_type = classifier.classify_path(dir, &executable_name);
    println!("{game_type}");
    Ok(())
}

fn profile(config: &Config, launcher: &str, game_id: &str) -> anyhow::Result<()> {
    let mut detector = detector(config)?;
    let game = find_game(&mut detector, launcher, game_id)?;
    let profile = detector.get_or_create_profile(&game.key())?;
    println!("{}", serde_json::to_string_pretty(&*profile)?);
    Ok(())
}

async fn launch(
    config: &Config,
    launcher: &str,
    game_id: &str,
    method: Option<&str>,
) -> anyhow::Result<()> {
    let mut detector = detector(config)?;
    let game = find_game(&mut detector, launcher, game_id)?;
    let profile = detector.get_or_create_profile(&game.key())?;
    tracing::info!(
        game = %game.key(),
        game_type = %profile.game_type,
        graphics_api = ?profile.graphics_api,
        "profile ready"
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let orch = orchestrator(config);
    let mut states = orch.subscribe();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            tracing::info!(%state, "launch state");
        }
    });

    let ctx = LaunchContext::new(cancel, config.launch.timeouts());
    let process = match method {
        Some(method) => orch.launch_with_method(&game, method, &ctx).await?,
        None => orch.launch(&game, &ctx).await?,
    };

    println!(
        "{} running as pid {} ({})",
        game.key(),
        process.pid,
        process.image_name
    );
    Ok(())
}

fn attach(config: &Config, launcher: &str, game_id: &str) -> anyhow::Result<()> {
    let mut detector = detector(config)?;
    let game = find_game(&mut detector, launcher, game_id)?;

    let process = orchestrator(config).attach(&game)?;
    println!("{} attached to pid {}", game.key(), process.pid);
    Ok(())
}

fn status(config: &Config, launcher: &str, game_id: &str) -> anyhow::Result<()> {
    let mut detector = detector(config)?;
    let game = find_game(&mut detector, launcher, game_id)?;

    let running = orchestrator(config).is_running(&game);
    println!(
        "{}: {}",
        game.key(),
        if running { "running" } else { "not running" }
    );
    Ok(())
}
