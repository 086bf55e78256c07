pub mod game;
pub mod profile;

// Re-export primary types for convenience.
pub use game::{DetectedGame, GameKey, GameType, LaunchMethod, ListingStrategy, ParseError};
pub use profile::{
    CameraSettings, GameProfile, GraphicsApi, InputSettings, MovementSettings, RenderSettings,
    UiSettings,
};
