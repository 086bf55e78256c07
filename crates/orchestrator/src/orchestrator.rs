//! Launch/attach state machine.
//!
//! `Idle → Launching → AwaitingProcess → Attached`, with `Failed` reachable
//! from every step. The current state is published on a watch channel.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use vrconvert_launchers::LauncherInfo;
use vrconvert_types::{DetectedGame, LaunchMethod};

use crate::LaunchError;
use crate::process::{GameProcess, ProcessOrigin, ProcessTable};
use crate::spawner::Spawner;
use crate::state::{LaunchContext, LaunchState};

/// Lower bound on the poll interval so a zero budget cannot spin.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Starts or attaches to game processes.
///
/// One launch at a time: the state channel describes the latest attempt.
pub struct Orchestrator<P, S> {
    launchers: Vec<LauncherInfo>,
    processes: P,
    spawner: S,
    state: watch::Sender<LaunchState>,
}

impl<P: ProcessTable, S: Spawner> Orchestrator<P, S> {
    pub fn new(launchers: Vec<LauncherInfo>, processes: P, spawner: S) -> Self {
        let (state, _) = watch::channel(LaunchState::Idle);
        Self {
            launchers,
            processes,
            spawner,
            state,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> LaunchState {
        *self.state.borrow()
    }

    /// Returns a receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LaunchState> {
        self.state.subscribe()
    }

    /// Launches `game` with its own launch method.
    pub async fn launch(
        &self,
        game: &DetectedGame,
        ctx: &LaunchContext,
    ) -> Result<GameProcess, LaunchError> {
        self.launch_as(game, game.launch_method, ctx).await
    }

    /// Launches `game` with a method given by name (`direct`, `protocol`,
    /// `via-launcher-app`).
    pub async fn launch_with_method(
        &self,
        game: &DetectedGame,
        method: &str,
        ctx: &LaunchContext,
    ) -> Result<GameProcess, LaunchError> {
        match LaunchMethod::from_str(method) {
            Ok(method) => self.launch_as(game, method, ctx).await,
            Err(_) => self.finish(
                game,
                Err(LaunchError::UnsupportedLaunchMethod(method.to_string())),
            ),
        }
    }

    /// Launches `game` with an explicit method.
    pub async fn launch_as(
        &self,
        game: &DetectedGame,
        method: LaunchMethod,
        ctx: &LaunchContext,
    ) -> Result<GameProcess, LaunchError> {
        if ctx.cancel.is_cancelled() {
            return self.finish(game, Err(LaunchError::Cancelled));
        }

        tracing::info!(game = %game.key(), method = %method, "launching game");
        self.set_state(LaunchState::Launching);

        let result = match method {
            LaunchMethod::Direct => self.launch_direct(game),
            LaunchMethod::Protocol => self.launch_protocol(game, ctx).await,
            LaunchMethod::ViaLauncherApp => self.launch_via_launcher(game, ctx).await,
        };
        self.finish(game, result)
    }

    /// Binds to the first running process of `game`'s executable.
    pub fn attach(&self, game: &DetectedGame) -> Result<GameProcess, LaunchError> {
        let image = game.executable_name();
        let result = match self.processes.pids_by_name(&image).first() {
            Some(&pid) => Ok(GameProcess {
                pid,
                image_name: image,
                origin: ProcessOrigin::Attached,
            }),
            None => Err(LaunchError::NotRunning(image)),
        };
        self.finish(game, result)
    }

    /// Returns `true` if any process runs `game`'s executable.
    pub fn is_running(&self, game: &DetectedGame) -> bool {
        self.processes.is_running(&game.executable_name())
    }

    fn launch_direct(&self, game: &DetectedGame) -> Result<GameProcess, LaunchError> {
        let working_dir = game
            .executable_path
            .parent()
            .unwrap_or(game.install_path.as_path());

        let pid = self
            .spawner
            .spawn_executable(&game.executable_path, working_dir)
            .map_err(|source| LaunchError::Spawn {
                target: game.executable_path.display().to_string(),
                source,
            })?;

        Ok(GameProcess {
            pid,
            image_name: game.executable_name(),
            origin: ProcessOrigin::Spawned,
        })
    }

    async fn launch_protocol(
        &self,
        game: &DetectedGame,
        ctx: &LaunchContext,
    ) -> Result<GameProcess, LaunchError> {
        let image = game.executable_name();
        let before = self.processes.pids_by_name(&image);

        let uri = self.protocol_uri(game);
        self.spawner
            .open_uri(&uri)
            .map_err(|source| LaunchError::Spawn {
                target: uri.clone(),
                source,
            })?;
        tracing::info!(uri = %uri, existing = before.len(), "protocol launch requested");

        self.discover(&image, &before, ctx).await
    }

    async fn launch_via_launcher(
        &self,
        game: &DetectedGame,
        ctx: &LaunchContext,
    ) -> Result<GameProcess, LaunchError> {
        let launcher = self
            .launcher_for(game)
            .ok_or_else(|| LaunchError::UnknownLauncher(game.launcher_name.clone()))?;
        let process_name = launcher.process_name.as_str();

        if self.processes.is_running(process_name) {
            tracing::debug!(launcher = %launcher.name, "launcher already running");
        } else {
            self.spawner
                .spawn_launcher(process_name)
                .map_err(|source| LaunchError::Spawn {
                    target: process_name.to_string(),
                    source,
                })?;

            let started = poll_until(ctx, ctx.timeouts.launcher_start_timeout, || {
                self.processes.is_running(process_name).then_some(())
            })
            .await?;

            if started.is_some() {
                tracing::info!(launcher = %launcher.name, "launcher started");
            } else {
                tracing::warn!(
                    launcher = %launcher.name,
                    process = process_name,
                    "launcher start not confirmed, continuing"
                );
            }
        }

        self.launch_protocol(game, ctx).await
    }

    /// Waits for a process of `image` whose id is not in `before`.
    async fn discover(
        &self,
        image: &str,
        before: &BTreeSet<u32>,
        ctx: &LaunchContext,
    ) -> Result<GameProcess, LaunchError> {
        self.set_state(LaunchState::AwaitingProcess);
        let budget = ctx.timeouts.process_discovery_timeout;

        let found = poll_until(ctx, budget, || {
            self.processes
                .pids_by_name(image)
                .difference(before)
                .next()
                .copied()
        })
        .await?;

        match found {
            Some(pid) => Ok(GameProcess {
                pid,
                image_name: image.to_string(),
                origin: ProcessOrigin::Discovered,
            }),
            None => Err(LaunchError::Timeout {
                image: image.to_string(),
                waited: budget,
            }),
        }
    }

    fn launcher_for(&self, game: &DetectedGame) -> Option<&LauncherInfo> {
        self.launchers
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(&game.launcher_name))
    }

    fn protocol_uri(&self, game: &DetectedGame) -> String {
        let scheme = self
            .launcher_for(game)
            .map(LauncherInfo::uri_scheme)
            .unwrap_or_else(|| game.launcher_name.to_lowercase());
        format!("{scheme}://run/{}", game.game_id)
    }

    fn finish(
        &self,
        game: &DetectedGame,
        result: Result<GameProcess, LaunchError>,
    ) -> Result<GameProcess, LaunchError> {
        match &result {
            Ok(process) => {
                tracing::info!(
                    game = %game.key(),
                    pid = process.pid,
                    origin = ?process.origin,
                    "game process attached"
                );
                self.set_state(LaunchState::Attached { pid: process.pid });
            }
            Err(e) => {
                tracing::warn!(game = %game.key(), error = %e, "launch failed");
                self.set_state(LaunchState::Failed);
            }
        }
        result
    }

    fn set_state(&self, state: LaunchState) {
        tracing::debug!(%state, "launch state");
        self.state.send_replace(state);
    }
}

/// Polls `probe` every `ctx.timeouts.poll_interval` until it yields a value
/// or `timeout` elapses. `Ok(None)` means the budget ran out.
///
/// A timeout too large to represent as an instant never expires; only
/// cancellation ends the wait then.
async fn poll_until<T>(
    ctx: &LaunchContext,
    timeout: Duration,
    mut probe: impl FnMut() -> Option<T>,
) -> Result<Option<T>, LaunchError> {
    let interval = ctx.timeouts.poll_interval.max(MIN_POLL_INTERVAL);
    let deadline = Instant::now().checked_add(timeout);

    while deadline.is_none_or(|d| Instant::now() < d) {
        if let Some(value) = probe() {
            return Ok(Some(value));
        }
        tokio::select! {
            _ = ctx.cancel.cancelled() => return Err(LaunchError::Cancelled),
            _ = tokio::time::sleep(interval) => {}
        }
    }
    Ok(None)
}
