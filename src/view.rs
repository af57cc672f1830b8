//! Read-only render contract
//!
//! Everything a renderer needs to draw a frame, derived from the world
//! without touching it. Facing and tint are computed here, never stored.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Enemy, Facing, GamePhase, Rect, World};

/// RGBA colour multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Tint {
    pub const WHITE: Tint = Tint::rgb(255, 255, 255);
    pub const GRAY: Tint = Tint::rgb(130, 130, 130);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Health tint: white at full health, shading to red as health drops
pub fn enemy_tint(enemy: &Enemy) -> Tint {
    if enemy.max_health <= 0.0 {
        return Tint::WHITE;
    }
    let lost = 1.0 - enemy.health / enemy.max_health;
    let channel = |v: f32| v.clamp(0.0, 255.0) as u8;
    Tint::rgb(
        channel(255.0 - 25.0 * lost),
        channel(255.0 - 255.0 * lost),
        channel(255.0 - 255.0 * lost),
    )
}

/// One sprite to draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteView {
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub tint: Tint,
}

/// A frame's worth of drawable state
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub frame: u64,
    pub level: u32,
    pub phase: GamePhase,
    pub player: SpriteView,
    /// Live enemies only
    pub enemies: Vec<SpriteView>,
    /// Live bullets only
    pub bullets: Vec<Rect>,
}

/// Copy the drawable parts of the world
pub fn build_snapshot(world: &World) -> RenderSnapshot {
    let enemy_size = world.enemy_size();

    let enemies = world
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| SpriteView {
            pos: e.pos,
            size: enemy_size,
            facing: e.facing(),
            tint: enemy_tint(e),
        })
        .collect();

    let bullets = world
        .bullets
        .iter_alive()
        .map(|b| Rect::new(b.pos, b.size))
        .collect();

    RenderSnapshot {
        frame: world.frame,
        level: world.level,
        phase: world.phase,
        player: SpriteView {
            pos: world.player.pos,
            size: world.player_size(),
            facing: world.player.facing(),
            tint: Tint::GRAY,
        },
        enemies,
        bullets,
    }
}
