//! Process table access by image name.

use std::collections::BTreeSet;
use std::sync::Mutex;

use serde::Serialize;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

/// Linux truncates `comm` names to this many bytes.
const COMM_NAME_LEN: usize = 15;

/// Lookup of running processes by executable image name.
pub trait ProcessTable: Send + Sync {
    /// Returns the ids of every process whose image is `image` (e.g. `GTA5.exe`).
    fn pids_by_name(&self, image: &str) -> BTreeSet<u32>;

    fn is_running(&self, image: &str) -> bool {
        !self.pids_by_name(image).is_empty()
    }
}

impl<T: ProcessTable + ?Sized> ProcessTable for std::sync::Arc<T> {
    fn pids_by_name(&self, image: &str) -> BTreeSet<u32> {
        (**self).pids_by_name(image)
    }
}

/// How a [`GameProcess`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessOrigin {
    /// Started directly, pid returned by the OS.
    Spawned,
    /// Found by diffing the process table after a protocol launch.
    Discovered,
    /// Already running when attached.
    Attached,
}

/// Handle to a running game process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameProcess {
    pub pid: u32,
    pub image_name: String,
    pub origin: ProcessOrigin,
}

/// [`ProcessTable`] backed by `sysinfo`, refreshed on every lookup.
pub struct SysinfoProcessTable {
    system: Mutex<System>,
}

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn pids_by_name(&self, image: &str) -> BTreeSet<u32> {
        let mut system = match self.system.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );

        system
            .processes()
            .iter()
            .filter(|(_, process)| image_matches(&process.name().to_string_lossy(), image))
            .map(|(pid, _)| pid.as_u32())
            .collect()
    }
}

/// Compares a process name against an image name, ignoring case and a
/// missing `.exe` suffix. Names cut to the `comm` length match by prefix.
pub fn image_matches(process_name: &str, image: &str) -> bool {
    if process_name.is_empty() || image.is_empty() {
        return false;
    }
    if process_name.eq_ignore_ascii_case(image) {
        return true;
    }

    let stem = strip_exe(image);
    if process_name.eq_ignore_ascii_case(stem) || strip_exe(process_name).eq_ignore_ascii_case(stem)
    {
        return true;
    }

    process_name.len() == COMM_NAME_LEN
        && image.len() > COMM_NAME_LEN
        && image.is_char_boundary(COMM_NAME_LEN)
        && image[..COMM_NAME_LEN].eq_ignore_ascii_case(process_name)
}

fn strip_exe(name: &str) -> &str {
    let len = name.len();
    if len > 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".exe") {
        &name[..len - 4]
    } else {
        name
    }
}
