//! Ghost Raid - a small 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (movement, collisions, level flow)
//! - `settings`: Data-driven game tuning
//! - `assets`: Sprite masks and sound files, loaded once at startup
//! - `input`: Key queries resolved into per-tick commands
//! - `audio`: Sound cue dispatch
//! - `view`: Read-only render contract
//! - `autopilot`: Scripted player for headless runs

pub mod assets;
pub mod audio;
pub mod autopilot;
pub mod input;
pub mod settings;
pub mod sim;
pub mod view;

pub use assets::AssetRegistry;
pub use settings::{CollisionMode, GameSettings, RestartPolicy};

/// Game configuration defaults
pub mod consts {
    /// Window dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Frame pacing target
    pub const TARGET_FPS: u32 = 30;
    /// Longest frame the simulation will integrate in one step (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 150.0;
    /// Gap between the player sprite and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Bullet pool
    pub const MAX_BULLETS: usize = 5;
    pub const BULLET_SPEED: f32 = 300.0;
    pub const BULLET_WIDTH: f32 = 2.0;
    pub const BULLET_HEIGHT: f32 = 12.0;

    /// Enemy roster layout
    pub const NUM_ENEMIES: usize = 15;
    pub const NUM_ROWS: usize = 3;
    pub const ENEMY_SPACING_X: f32 = 20.0;
    pub const ENEMY_SPACING_Y: f32 = 20.0;
    pub const ENEMY_TOP_OFFSET: f32 = 100.0;
    /// Distance from the screen edge where enemies turn around
    pub const ENEMY_SIDE_MARGIN: f32 = 30.0;

    /// Enemy difficulty curve
    pub const BASE_HEALTH: f32 = 3.0;
    pub const HEALTH_LEVEL_MODIFIER: f32 = 0.4;
    pub const BASE_H_SPEED: f32 = 100.0;
    pub const H_SPEED_LEVEL_MODIFIER: f32 = 0.4;

    /// Hit response: horizontal speed multiplier and added fall speed
    pub const KNOCKBACK_FACTOR: f32 = 1.05;
    pub const KNOCKBACK_FALL: f32 = 10.0;

    pub const MASTER_VOLUME: f32 = 0.5;

    /// Sprite size used when no texture files are available
    pub const PLACEHOLDER_SPRITE_SIZE: u32 = 40;
}
