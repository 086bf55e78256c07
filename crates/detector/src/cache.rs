use std::collections::HashMap;
use std::sync::Arc;

use vrconvert_classify::Classify;
use vrconvert_types::{DetectedGame, GameKey, GameProfile};

/// Memoized profiles keyed by [`GameKey`].
///
/// A key is classified at most once; later lookups return the same
/// [`Arc`] until [`clear`](Self::clear) is called.
pub struct ProfileCache<C> {
    classifier: C,
    profiles: HashMap<GameKey, Arc<GameProfile>>,
}

impl<C: Classify> ProfileCache<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            profiles: HashMap::new(),
        }
    }

    /// Returns the cached profile for `game`, classifying it on first access.
    pub fn get_or_create(&mut self, game: &DetectedGame) -> Arc<GameProfile> {
        let key = game.key();
        if let Some(profile) = self.profiles.get(&key) {
            return Arc::clone(profile);
        }

        let game_type = self.classifier.classify(game);
        let profile = Arc::new(GameProfile::new(game, game_type));
        tracing::info!(key = %key, %game_type, "profile created");
        self.profiles.insert(key, Arc::clone(&profile));
        profile
    }

    /// Returns a cached profile without creating one.
    pub fn get(&self, key: &GameKey) -> Option<Arc<GameProfile>> {
        self.profiles.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.profiles.clear();
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}
