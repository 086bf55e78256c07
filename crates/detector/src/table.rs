use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use vrconvert_types::{DetectedGame, GameKey, GameType};

/// Games found by one scan, unique by `(launcher, game id)`.
///
/// Single-writer: the owning [`Detector`](crate::Detector) is the only
/// mutator. Share it behind a lock if several tasks scan concurrently.
#[derive(Debug, Default)]
pub struct GameTable {
    games: BTreeMap<GameKey, DetectedGame>,
}

impl GameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `game` unless its key is taken. Returns `false` on a duplicate,
    /// in which case the first entry is kept.
    pub fn insert(&mut self, game: DetectedGame) -> bool {
        match self.games.entry(game.key()) {
            Entry::Occupied(existing) => {
                tracing::warn!(
                    key = %existing.key(),
                    kept = %existing.get().install_path.display(),
                    dropped = %game.install_path.display(),
                    "duplicate game id, keeping first"
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(game);
                true
            }
        }
    }

    pub fn get(&self, key: &GameKey) -> Option<&DetectedGame> {
        self.games.get(key)
    }

    /// Records the classified type of an existing entry.
    pub fn set_game_type(&mut self, key: &GameKey, game_type: GameType) {
        if let Some(game) = self.games.get_mut(key) {
            game.game_type = game_type;
        }
    }

    /// Iterates games ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &DetectedGame> {
        self.games.values()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn clear(&mut self) {
        self.games.clear();
    }
}
