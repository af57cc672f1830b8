//! Collision detection
//!
//! Bullets are points tested against enemy rectangles. Player and enemy are
//! both rectangles; in pixel-exact mode an overlap only counts where both
//! sprites are opaque at the same screen pixel.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::sprite::{SpriteMask, SpriteSet};
use super::state::{Bullet, Enemy, Player};
use crate::settings::CollisionMode;

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x < self.right()
            && point.y >= self.pos.y
            && point.y < self.bottom()
    }

    /// Shared region of two rectangles, if it has positive area
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.pos.x.max(other.pos.x);
        let top = self.pos.y.max(other.pos.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Rect::new(
                Vec2::new(left, top),
                Vec2::new(right - left, bottom - top),
            ))
        } else {
            None
        }
    }
}

/// Is the bullet's position inside the enemy's sprite bounds?
#[inline]
pub fn bullet_hits_enemy(bullet: &Bullet, enemy: &Enemy, enemy_size: Vec2) -> bool {
    Rect::new(enemy.pos, enemy_size).contains_point(bullet.pos)
}

/// Player-vs-enemy test
///
/// Boxes first; in `PixelExact` mode the overlap is then scanned for a
/// pixel opaque in both sprites, each in the pose it is drawn in.
pub fn player_hits_enemy(
    player: &Player,
    enemy: &Enemy,
    sprites: &SpriteSet,
    mode: CollisionMode,
) -> bool {
    let player_rect = Rect::new(player.pos, sprites.player.size());
    let enemy_rect = Rect::new(enemy.pos, sprites.enemy.size());

    let Some(overlap) = player_rect.intersection(&enemy_rect) else {
        return false;
    };

    match mode {
        CollisionMode::BoundingBox => true,
        CollisionMode::PixelExact => pixel_overlap(
            &overlap,
            player.pos,
            sprites.player.pose(player.facing()),
            enemy.pos,
            sprites.enemy.pose(enemy.facing()),
        ),
    }
}

/// Scan `region` for a screen pixel opaque in both sprites
///
/// Each sprite is sampled relative to its own origin; samples outside a
/// sprite read as transparent. Cost is O(region area).
pub fn pixel_overlap(
    region: &Rect,
    a_pos: Vec2,
    a: &SpriteMask,
    b_pos: Vec2,
    b: &SpriteMask,
) -> bool {
    let start_x = region.pos.x.floor() as i32;
    let start_y = region.pos.y.floor() as i32;
    let cols = region.size.x.ceil() as i32;
    let rows = region.size.y.ceil() as i32;

    let a_origin = (a_pos.x.floor() as i32, a_pos.y.floor() as i32);
    let b_origin = (b_pos.x.floor() as i32, b_pos.y.floor() as i32);

    for dy in 0..rows {
        let sy = start_y + dy;
        for dx in 0..cols {
            let sx = start_x + dx;
            if a.is_opaque_at(sx - a_origin.0, sy - a_origin.1)
                && b.is_opaque_at(sx - b_origin.0, sy - b_origin.1)
            {
                return true;
            }
        }
    }
    false
}
