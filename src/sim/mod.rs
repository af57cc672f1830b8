//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering,
//! audio, and platform dependencies:
//! - Time only arrives as the `dt` passed to `tick`
//! - Input only arrives as a `TickInput`
//! - Stable iteration order (roster and bullet slot index)

pub mod collision;
pub mod level;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{Rect, bullet_hits_enemy, pixel_overlap, player_hits_enemy};
pub use level::{game_over, next_level, restart, scaled_h_speed, scaled_health};
pub use sprite::{Facing, SpriteMask, SpritePair, SpriteSet};
pub use state::{Bullet, BulletPool, Enemy, GameEvent, GamePhase, Player, World};
pub use tick::{TickInput, clamp_frame_time, tick};
