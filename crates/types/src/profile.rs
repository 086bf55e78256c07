use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::game::{DetectedGame, GameKey, GameType};

/// Rendering API the game is built on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphicsApi {
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "dx11")]
    DirectX11,
    #[serde(rename = "dx12")]
    DirectX12,
    #[serde(rename = "vulkan")]
    Vulkan,
}

impl GraphicsApi {
    /// Default API for a known title.
    pub fn for_game_type(game_type: GameType) -> Self {
        match game_type {
            GameType::Gta5 | GameType::Witcher3 | GameType::SkyrimSe | GameType::Fallout4 => {
                GraphicsApi::DirectX11
            }
            GameType::SpiderMan | GameType::HogwartsLegacy | GameType::Cyberpunk2077 => {
                GraphicsApi::DirectX12
            }
            GameType::Rdr2 => GraphicsApi::Vulkan,
            GameType::Gta4 | GameType::Unknown => GraphicsApi::Unknown,
        }
    }
}

/// Stereo rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    /// Per-eye resolution multiplier.
    pub resolution_scale: f32,
    pub refresh_rate_hz: u32,
    /// Horizontal field of view override in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov_override: Option<f32>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution_scale: 1.0,
            refresh_rate_hz: 90,
            fov_override: None,
        }
    }
}

/// Controller input parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSettings {
    pub thumbstick_deadzone: f32,
    pub snap_turning: bool,
    pub snap_turn_degrees: f32,
    pub left_handed: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            thumbstick_deadzone: 0.15,
            snap_turning: true,
            snap_turn_degrees: 30.0,
            left_handed: false,
        }
    }
}

/// Camera placement relative to the player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSettings {
    /// Offset `[x, y, z]` in metres applied in third-person mode.
    pub third_person_offset: [f32; 3],
    pub start_in_first_person: bool,
}

impl CameraSettings {
    /// Camera defaults tuned per title.
    pub fn for_game_type(game_type: GameType) -> Self {
        let third_person_offset = match game_type {
            GameType::Gta5 => [0.0, 1.6, -0.5],
            GameType::SpiderMan => [0.0, 1.7, -0.8],
            GameType::HogwartsLegacy => [0.0, 1.6, -0.6],
            _ => [0.0, 1.7, -0.5],
        };
        Self {
            third_person_offset,
            start_in_first_person: false,
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::for_game_type(GameType::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementSettings {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub head_directed_movement: bool,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            walk_speed: 1.4,
            sprint_speed: 4.0,
            head_directed_movement: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettings {
    /// Distance of the floating HUD plane in metres.
    pub hud_distance: f32,
    pub hud_scale: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            hud_distance: 1.5,
            hud_scale: 1.0,
        }
    }
}

/// Cached per-game projection handed to the VR subsystems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameProfile {
    pub launcher_name: String,
    pub game_id: String,
    pub game_name: String,
    pub install_path: PathBuf,
    pub executable_path: PathBuf,
    pub game_type: GameType,
    pub graphics_api: GraphicsApi,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

impl GameProfile {
    /// Builds a profile with default settings for the given classification.
    pub fn new(game: &DetectedGame, game_type: GameType) -> Self {
        Self {
            launcher_name: game.launcher_name.clone(),
            game_id: game.game_id.clone(),
            game_name: game.game_name.clone(),
            install_path: game.install_path.clone(),
            executable_path: game.executable_path.clone(),
            game_type,
            graphics_api: GraphicsApi::for_game_type(game_type),
            render: RenderSettings::default(),
            input: InputSettings::default(),
            camera: CameraSettings::for_game_type(game_type),
            movement: MovementSettings::default(),
            ui: UiSettings::default(),
        }
    }

    pub fn key(&self) -> GameKey {
        GameKey::new(&self.launcher_name, &self.game_id)
    }
}
