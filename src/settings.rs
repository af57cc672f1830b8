//! Game settings and tuning
//!
//! Every constant the game variants disagree on lives here so a single
//! simulation can reproduce any of them. Loaded from JSON; missing fields
//! fall back to defaults.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Precision of the player-vs-enemy test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionMode {
    /// Axis-aligned bounding boxes only
    BoundingBox,
    /// Bounding boxes, then per-pixel opacity inside the overlap
    #[default]
    PixelExact,
}

impl CollisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionMode::BoundingBox => "BoundingBox",
            CollisionMode::PixelExact => "PixelExact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "box" | "boundingbox" | "bounding-box" => Some(CollisionMode::BoundingBox),
            "pixel" | "pixelexact" | "pixel-exact" => Some(CollisionMode::PixelExact),
            _ => None,
        }
    }
}

/// What happens to the level counter when restarting after a game over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RestartPolicy {
    /// Replay the level that was lost
    #[default]
    KeepLevel,
    /// Start over from level 1
    ResetToFirst,
}

impl RestartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::KeepLevel => "KeepLevel",
            RestartPolicy::ResetToFirst => "ResetToFirst",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keep" | "keeplevel" | "keep-level" => Some(RestartPolicy::KeepLevel),
            "reset" | "resettofirst" | "reset-to-first" => Some(RestartPolicy::ResetToFirst),
            _ => None,
        }
    }
}

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub target_fps: u32,
    /// Frame times above this are clamped before stepping (seconds)
    pub max_frame_time: f32,

    // === Player ===
    /// Horizontal speed (pixels/s)
    pub player_speed: f32,
    pub player_bottom_margin: f32,

    // === Bullets ===
    /// Ring pool size; firing overwrites the oldest slot
    pub bullet_capacity: usize,
    /// Upward speed (pixels/s)
    pub bullet_speed: f32,
    pub bullet_size: Vec2,

    // === Enemies ===
    pub enemy_count: usize,
    pub enemy_rows: usize,
    pub enemy_spacing: Vec2,
    pub enemy_top_offset: f32,
    pub enemy_side_margin: f32,
    pub base_health: f32,
    pub health_level_modifier: f32,
    pub base_h_speed: f32,
    pub h_speed_level_modifier: f32,
    /// Multiplier applied to horizontal speed on every hit
    pub knockback_factor: f32,
    /// Added to vertical speed on every hit (pixels/s)
    pub knockback_fall: f32,

    // === Policies ===
    pub collision_mode: CollisionMode,
    pub restart_policy: RestartPolicy,
    /// Honour skip-level / force-game-over / test-level inputs
    pub debug_keys: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            target_fps: TARGET_FPS,
            max_frame_time: MAX_FRAME_TIME,

            player_speed: PLAYER_SPEED,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,

            bullet_capacity: MAX_BULLETS,
            bullet_speed: BULLET_SPEED,
            bullet_size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),

            enemy_count: NUM_ENEMIES,
            enemy_rows: NUM_ROWS,
            enemy_spacing: Vec2::new(ENEMY_SPACING_X, ENEMY_SPACING_Y),
            enemy_top_offset: ENEMY_TOP_OFFSET,
            enemy_side_margin: ENEMY_SIDE_MARGIN,
            base_health: BASE_HEALTH,
            health_level_modifier: HEALTH_LEVEL_MODIFIER,
            base_h_speed: BASE_H_SPEED,
            h_speed_level_modifier: H_SPEED_LEVEL_MODIFIER,
            knockback_factor: KNOCKBACK_FACTOR,
            knockback_fall: KNOCKBACK_FALL,

            collision_mode: CollisionMode::PixelExact,
            restart_policy: RestartPolicy::KeepLevel,
            debug_keys: true,

            master_volume: MASTER_VOLUME,
        }
    }
}

impl GameSettings {
    /// Screen dimensions as a vector
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Enemies per row of the roster grid
    pub fn enemies_per_row(&self) -> usize {
        self.enemy_count / self.enemy_rows.max(1)
    }

    /// Fixed frame time for the configured frame rate
    pub fn frame_time(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: GameSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the simulation cannot lay out or step
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.target_fps == 0 {
            return Err(SettingsError::Invalid("target_fps must be non-zero".into()));
        }
        if self.bullet_capacity == 0 {
            return Err(SettingsError::Invalid("bullet_capacity must be non-zero".into()));
        }
        if self.enemy_count == 0 || self.enemy_rows == 0 {
            return Err(SettingsError::Invalid(
                "enemy_count and enemy_rows must be non-zero".into(),
            ));
        }
        if self.enemy_count % self.enemy_rows != 0 {
            return Err(SettingsError::Invalid(format!(
                "enemy_count {} does not fill {} rows evenly",
                self.enemy_count, self.enemy_rows
            )));
        }
        if self.knockback_factor < 1.0 {
            return Err(SettingsError::Invalid(format!(
                "knockback_factor must be >= 1, got {}",
                self.knockback_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.master_volume) {
            return Err(SettingsError::Invalid(format!(
                "master_volume must be within 0..=1, got {}",
                self.master_volume
            )));
        }
        Ok(())
    }
}

/// Failure to load settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "failed to parse settings: {e}"),
            Self::Invalid(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
