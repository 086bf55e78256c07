//! Process start surface: by path, by URI, by launcher image name.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Starts processes on behalf of the orchestrator.
pub trait Spawner: Send + Sync {
    /// Starts `executable` in `working_dir` and returns its pid.
    fn spawn_executable(&self, executable: &Path, working_dir: &Path) -> io::Result<u32>;

    /// Hands `uri` to the OS shell.
    fn open_uri(&self, uri: &str) -> io::Result<()>;

    /// Starts a platform launcher by its image name (e.g. `steam.exe`).
    fn spawn_launcher(&self, process_name: &str) -> io::Result<()>;
}

impl<T: Spawner + ?Sized> Spawner for std::sync::Arc<T> {
    fn spawn_executable(&self, executable: &Path, working_dir: &Path) -> io::Result<u32> {
        (**self).spawn_executable(executable, working_dir)
    }

    fn open_uri(&self, uri: &str) -> io::Result<()> {
        (**self).open_uri(uri)
    }

    fn spawn_launcher(&self, process_name: &str) -> io::Result<()> {
        (**self).spawn_launcher(process_name)
    }
}

/// [`Spawner`] for the running OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn spawn_executable(&self, executable: &Path, working_dir: &Path) -> io::Result<u32> {
        let child = Command::new(executable)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(child.id())
    }

    fn open_uri(&self, uri: &str) -> io::Result<()> {
        open::that_detached(uri)
    }

    fn spawn_launcher(&self, process_name: &str) -> io::Result<()> {
        launcher_command(process_name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }
}

/// `start` resolves the image through App Paths and `PATH`.
#[cfg(target_os = "windows")]
fn launcher_command(process_name: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", process_name]);
    cmd
}

/// Native clients are lowercase and carry no `.exe` suffix.
#[cfg(not(target_os = "windows"))]
fn launcher_command(process_name: &str) -> Command {
    Command::new(native_launcher_name(process_name))
}

#[cfg(not(target_os = "windows"))]
fn native_launcher_name(process_name: &str) -> String {
    let lower = process_name.to_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

#[cfg(test)]
mod tests {
    #[cfg(not(target_os = "windows"))]
    #[test]
    fn native_name_drops_exe() {
        use super::native_launcher_name;
        assert_eq!(native_launcher_name("steam.exe"), "steam");
        assert_eq!(native_launcher_name("Steam"), "steam");
    }

    #[test]
    fn spawn_missing_executable_fails() {
        use super::*;
        let dir = std::env::temp_dir();
        let missing = dir.join("vrconvert-missing-binary-4242.exe");
        assert!(
            SystemSpawner
                .spawn_executable(&missing, &dir)
                .is_err()
        );
    }
}
