//! World state and core simulation types
//!
//! One `World` holds every entity for the lifetime of the process. Entity
//! storage is sized once from the settings and never reallocated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level;
use super::sprite::{Facing, SpriteSet};
use crate::settings::GameSettings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart input
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the sprite
    pub pos: Vec2,
    /// Horizontal speed (pixels/s)
    pub speed: f32,
    /// Movement intent, recomputed from input every tick
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Player {
    pub fn new(speed: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            speed,
            moving_left: false,
            moving_right: false,
        }
    }

    /// Pose the sprite is drawn (and pixel-tested) in
    pub fn facing(&self) -> Facing {
        if self.moving_left {
            Facing::Flipped
        } else {
            Facing::Normal
        }
    }

    /// Clear movement intent
    pub fn stop(&mut self) {
        self.moving_left = false;
        self.moving_right = false;
    }
}

/// A ghost in the enemy roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Top-left corner of the sprite
    pub pos: Vec2,
    /// Signed horizontal speed; the sign is the direction of travel
    pub h_speed: f32,
    /// Downward speed, only non-zero after being hit
    pub v_speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
}

impl Enemy {
    /// A dead placeholder; rosters are filled by `level::generate_roster`
    pub fn dormant() -> Self {
        Self {
            pos: Vec2::ZERO,
            h_speed: 0.0,
            v_speed: 0.0,
            health: 0.0,
            max_health: 0.0,
            dead: true,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Ghost sprites face left; moving right shows the mirrored pose
    pub fn facing(&self) -> Facing {
        if self.h_speed > 0.0 {
            Facing::Flipped
        } else {
            Facing::Normal
        }
    }

    /// Apply one bullet hit. Returns true if this hit killed the enemy.
    pub fn take_hit(&mut self, knockback_factor: f32, knockback_fall: f32) -> bool {
        self.health -= 1.0;
        self.h_speed *= knockback_factor;
        self.v_speed += knockback_fall;
        if self.health <= 0.0 {
            self.dead = true;
        }
        self.dead
    }
}

/// A player bullet
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bullet {
    /// Collision point (and top-left of the drawn rectangle)
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            alive: false,
        }
    }
}

/// Fixed-size ring of bullets
///
/// Firing always claims the slot under the cursor, even if that bullet is
/// still in flight. The oldest shot is sacrificed; firing never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletPool {
    slots: Vec<Bullet>,
    cursor: usize,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Bullet::default(); capacity.max(1)],
            cursor: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot the next shot will claim
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Launch a bullet, returning the slot it took
    pub fn fire(&mut self, pos: Vec2, size: Vec2) -> usize {
        let slot = self.cursor;
        self.slots[slot] = Bullet {
            pos,
            size,
            alive: true,
        };
        self.cursor = (self.cursor + 1) % self.slots.len();
        slot
    }

    /// Whether the next shot would land in an empty slot instead of
    /// overwriting a bullet still in flight
    pub fn next_slot_free(&self) -> bool {
        self.slots.get(self.cursor).is_none_or(|b| !b.alive)
    }

    pub fn slots(&self) -> &[Bullet] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Bullet] {
        &mut self.slots
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = &Bullet> {
        self.slots.iter().filter(|b| b.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.iter_alive().count()
    }

    /// Mark every slot free. The cursor keeps its place in the ring.
    pub fn clear(&mut self) {
        for bullet in &mut self.slots {
            bullet.alive = false;
        }
    }
}

/// Things that happened during a tick, for audio and other observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired into the given pool slot
    Shot { slot: usize },
    /// Enemy took a hit and survived
    EnemyHit { index: usize },
    EnemyKilled { index: usize },
    /// Enemy fell past the bottom edge
    EnemyBreached { index: usize },
    /// Every enemy died; `level` is the level just entered
    LevelCleared { level: u32 },
    GameOver,
    /// Run restarted at `level`
    Restarted { level: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: GameSettings,
    /// Sprite masks, read-only after construction
    pub sprites: SpriteSet,
    pub player: Player,
    /// Fixed roster, regenerated in place every level
    pub enemies: Vec<Enemy>,
    pub bullets: BulletPool,
    /// Current level (1-based)
    pub level: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub frame: u64,
    events: Vec<GameEvent>,
}

impl World {
    /// Build the world and lay out level 1
    pub fn new(settings: GameSettings, sprites: SpriteSet) -> Self {
        let mut world = Self {
            player: Player::new(settings.player_speed),
            enemies: vec![Enemy::dormant(); settings.enemy_count],
            bullets: BulletPool::new(settings.bullet_capacity),
            settings,
            sprites,
            level: 1,
            phase: GamePhase::Playing,
            frame: 0,
            events: Vec::new(),
        };
        level::reset_level(&mut world);
        world
    }

    /// Screen dimensions
    #[inline]
    pub fn screen(&self) -> Vec2 {
        self.settings.screen_size()
    }

    #[inline]
    pub fn player_size(&self) -> Vec2 {
        self.sprites.player.size()
    }

    #[inline]
    pub fn enemy_size(&self) -> Vec2 {
        self.sprites.enemy.size()
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Events recorded by the most recent tick
    ///
    /// `tick` clears the queue before it runs, so callers that want every
    /// event must read or drain it after each frame.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
