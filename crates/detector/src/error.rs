//! Error types for detection operations.

use vrconvert_types::GameKey;

/// Errors produced by the detector.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("game not detected: {0}")]
    UnknownGame(GameKey),
}
