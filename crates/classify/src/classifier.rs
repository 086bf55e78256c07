use std::path::Path;

use vrconvert_types::{DetectedGame, GameType};
use walkdir::WalkDir;

use crate::pattern::Wildcard;
use crate::signature::{GameTypeSignature, NameToken, default_name_tokens, default_signatures};
use crate::{Classify, ClassifyError};

struct CompiledSignature {
    game_type: GameType,
    required_files: Vec<Wildcard>,
    optional_files: Vec<Wildcard>,
    folders: Vec<Wildcard>,
    required_folder_matches: usize,
}

/// File and directory names found under an install path.
#[derive(Debug, Default)]
struct TreeListing {
    files: Vec<String>,
    dirs: Vec<String>,
}

impl TreeListing {
    fn read(root: &Path) -> Self {
        let mut listing = TreeListing::default();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().is_dir() {
                listing.dirs.push(name);
            } else if entry.file_type().is_file() {
                listing.files.push(name);
            }
        }
        listing
    }

    fn has_file(&self, pattern: &Wildcard) -> bool {
        self.files.iter().any(|f| pattern.matches(f))
    }

    fn has_dir(&self, pattern: &Wildcard) -> bool {
        self.dirs.iter().any(|d| pattern.matches(d))
    }
}

/// Two-stage classifier: filesystem signatures, then executable-name tokens.
pub struct Classifier {
    signatures: Vec<CompiledSignature>,
    name_tokens: Vec<NameToken>,
}

impl Classifier {
    /// Builds a classifier from signature and token tables.
    ///
    /// Tokens are matched lowercase against the lowercased executable name.
    pub fn new(
        signatures: &[GameTypeSignature],
        name_tokens: Vec<NameToken>,
    ) -> Result<Self, ClassifyError> {
        let compile = |patterns: &[String]| -> Result<Vec<Wildcard>, ClassifyError> {
            patterns.iter().map(|p| Wildcard::new(p)).collect()
        };

        let signatures = signatures
            .iter()
            .map(|sig| {
                Ok(CompiledSignature {
                    game_type: sig.game_type,
                    required_files: compile(&sig.required_files)?,
                    optional_files: compile(&sig.optional_files)?,
                    folders: compile(&sig.folders)?,
                    required_folder_matches: sig.required_folder_matches(),
                })
            })
            .collect::<Result<Vec<_>, ClassifyError>>()?;

        let name_tokens = name_tokens
            .into_iter()
            .map(|t| NameToken {
                token: t.token.to_lowercase(),
                game_type: t.game_type,
            })
            .collect();

        Ok(Self {
            signatures,
            name_tokens,
        })
    }

    /// Builds a classifier from the built-in tables.
    pub fn with_defaults() -> Result<Self, ClassifyError> {
        Self::new(&default_signatures(), default_name_tokens())
    }

    /// Classifies the install at `install_path` whose main binary is
    /// `executable_name`.
    pub fn classify_path(&self, install_path: &Path, executable_name: &str) -> GameType {
        if let Some(game_type) = self.match_signatures(install_path) {
            return game_type;
        }

        let game_type = self.match_name(executable_name);
        tracing::debug!(
            path = %install_path.display(),
            executable = executable_name,
            %game_type,
            "classified by executable name"
        );
        game_type
    }

    /// Returns the type of the first accepted signature, if any.
    pub fn match_signatures(&self, install_path: &Path) -> Option<GameType> {
        if self.signatures.is_empty() {
            return None;
        }
        let listing = TreeListing::read(install_path);

        for sig in &self.signatures {
            if !sig.required_files.iter().all(|p| listing.has_file(p)) {
                continue;
            }

            let folder_matches = sig.folders.iter().filter(|p| listing.has_dir(p)).count();
            if folder_matches < sig.required_folder_matches {
                tracing::debug!(
                    game_type = %sig.game_type,
                    folder_matches,
                    needed = sig.required_folder_matches,
                    "required files present but too few folders"
                );
                continue;
            }

            let optional_matches = sig
                .optional_files
                .iter()
                .filter(|p| listing.has_file(p))
                .count();
            tracing::debug!(
                path = %install_path.display(),
                game_type = %sig.game_type,
                folder_matches,
                optional_matches,
                "signature matched"
            );
            return Some(sig.game_type);
        }

        None
    }

    /// Maps an executable name to a type by substring tokens.
    pub fn match_name(&self, executable_name: &str) -> GameType {
        let name = executable_name.to_lowercase();
        self.name_tokens
            .iter()
            .find(|t| name.contains(&t.token))
            .map(|t| t.game_type)
            .unwrap_or(GameType::Unknown)
    }
}

impl Classify for Classifier {
    fn classify(&self, game: &DetectedGame) -> GameType {
        self.classify_path(&game.install_path, &game.executable_name())
    }
}
