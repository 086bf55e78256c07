//! Game type classification.
//!
//! An install directory is matched against an ordered list of
//! [`GameTypeSignature`]s (required files plus a share of expected folders).
//! When no signature is accepted, the executable's file name is checked for
//! known title tokens. Anything else is [`GameType::Unknown`].

pub mod classifier;
pub mod pattern;
pub mod signature;

use vrconvert_types::{DetectedGame, GameType};

// Re-export primary types.
pub use classifier::Classifier;
pub use pattern::Wildcard;
pub use signature::{GameTypeSignature, NameToken, default_name_tokens, default_signatures};

/// Anything that can assign a [`GameType`] to a detected game.
pub trait Classify {
    fn classify(&self, game: &DetectedGame) -> GameType;
}

impl<T: Classify + ?Sized> Classify for &T {
    fn classify(&self, game: &DetectedGame) -> GameType {
        (**self).classify(game)
    }
}

/// Errors building a classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
