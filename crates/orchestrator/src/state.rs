use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Default interval between process-table polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default wait for a platform launcher to appear after starting it.
pub const DEFAULT_LAUNCHER_START_TIMEOUT: Duration = Duration::from_secs(10);

/// Default wait for a new game process after a protocol launch.
pub const DEFAULT_PROCESS_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Phase of the current launch or attach attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum LaunchState {
    #[default]
    Idle,
    Launching,
    AwaitingProcess,
    Attached {
        pid: u32,
    },
    Failed,
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Launching => f.write_str("launching"),
            Self::AwaitingProcess => f.write_str("awaiting process"),
            Self::Attached { pid } => write!(f, "attached (pid {pid})"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Polling budgets for one launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchTimeouts {
    pub poll_interval: Duration,
    pub launcher_start_timeout: Duration,
    pub process_discovery_timeout: Duration,
}

impl Default for LaunchTimeouts {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            launcher_start_timeout: DEFAULT_LAUNCHER_START_TIMEOUT,
            process_discovery_timeout: DEFAULT_PROCESS_DISCOVERY_TIMEOUT,
        }
    }
}

/// Caller-supplied cancellation and budgets for a launch.
#[derive(Debug, Clone, Default)]
pub struct LaunchContext {
    pub cancel: CancellationToken,
    pub timeouts: LaunchTimeouts,
}

impl LaunchContext {
    pub fn new(cancel: CancellationToken, timeouts: LaunchTimeouts) -> Self {
        Self { cancel, timeouts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budgets() {
        let t = LaunchTimeouts::default();
        assert_eq!(t.poll_interval, Duration::from_secs(1));
        assert_eq!(t.launcher_start_timeout, Duration::from_secs(10));
        assert_eq!(t.process_discovery_timeout, Duration::from_secs(30));
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_string(&LaunchState::Attached { pid: 42 }).unwrap();
        assert_eq!(json, r#"{"state":"attached","pid":42}"#);
        let json = serde_json::to_string(&LaunchState::AwaitingProcess).unwrap();
        assert_eq!(json, r#"{"state":"awaiting_process"}"#);
    }

    #[test]
    fn state_display() {
        assert_eq!(LaunchState::default().to_string(), "idle");
        assert_eq!(LaunchState::Attached { pid: 7 }.to_string(), "attached (pid 7)");
    }
}
