//! Level progression and run state
//!
//! Rosters are rebuilt wholesale at the start of every level, including
//! level 1 and every restart. Difficulty scales linearly with the level.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, World};
use crate::settings::{GameSettings, RestartPolicy};

/// Enemy health for a level: `base + base * modifier * level`
pub fn scaled_health(settings: &GameSettings, level: u32) -> f32 {
    scale(settings.base_health, settings.health_level_modifier, level)
}

/// Enemy horizontal speed for a level: `base + base * modifier * level`
pub fn scaled_h_speed(settings: &GameSettings, level: u32) -> f32 {
    scale(settings.base_h_speed, settings.h_speed_level_modifier, level)
}

#[inline]
fn scale(base: f32, modifier: f32, level: u32) -> f32 {
    base + base * modifier * level as f32
}

/// Top-left position of roster slot `index` on the centred grid
pub fn grid_position(settings: &GameSettings, enemy_size: Vec2, index: usize) -> Vec2 {
    let cols = settings.enemies_per_row().max(1);
    let row = (index / cols) as f32;
    let col = (index % cols) as f32;
    let spacing = settings.enemy_spacing;

    let grid_width = cols as f32 * enemy_size.x + cols as f32 * spacing.x;
    let x_offset = ((settings.screen_width - grid_width) / 2.0).trunc();

    Vec2::new(
        enemy_size.x * col + col * spacing.x + x_offset,
        enemy_size.y * row + row * spacing.y + settings.enemy_top_offset,
    )
}

/// Refill the roster in place with fresh enemies for the current level
pub fn generate_roster(world: &mut World) {
    let health = scaled_health(&world.settings, world.level);
    let h_speed = scaled_h_speed(&world.settings, world.level);
    let enemy_size = world.enemy_size();

    log::info!(
        "Level {}: health={}, h_speed={}",
        world.level,
        health,
        h_speed
    );

    for (i, enemy) in world.enemies.iter_mut().enumerate() {
        enemy.pos = grid_position(&world.settings, enemy_size, i);
        enemy.h_speed = h_speed;
        enemy.v_speed = 0.0;
        enemy.health = health;
        enemy.max_health = health;
        enemy.dead = false;
    }
}

/// Centre the player on the bottom edge and clear its movement
pub fn place_player(world: &mut World) {
    let size = world.player_size();
    let screen = world.screen();
    world.player.pos = Vec2::new(
        screen.x / 2.0 - size.x / 2.0,
        screen.y - (world.settings.player_bottom_margin + size.y),
    );
    world.player.stop();
}

/// Start the current level afresh
pub fn reset_level(world: &mut World) {
    generate_roster(world);
    place_player(world);
    world.bullets.clear();
    world.phase = GamePhase::Playing;
}

/// End the run. Freezes falling enemies and the player.
///
/// Safe to call repeatedly; only the first call records an event.
pub fn game_over(world: &mut World) {
    if world.phase == GamePhase::Playing {
        log::info!("Game over on level {}", world.level);
        world.push_event(GameEvent::GameOver);
    }
    world.phase = GamePhase::GameOver;

    for enemy in &mut world.enemies {
        enemy.v_speed = 0.0;
    }
    world.player.stop();
}

/// Advance to the next level and rebuild the roster
pub fn next_level(world: &mut World) {
    world.level += 1;
    reset_level(world);
}

/// Advance when the whole roster is dead. Returns true if the level ended.
pub fn check_level_end(world: &mut World) -> bool {
    if world.enemies.iter().any(|e| e.is_alive()) {
        return false;
    }
    next_level(world);
    log::info!("Level cleared, entering level {}", world.level);
    let level = world.level;
    world.push_event(GameEvent::LevelCleared { level });
    true
}

/// Start a new run after a game over, honouring the restart policy
pub fn restart(world: &mut World) {
    if world.settings.restart_policy == RestartPolicy::ResetToFirst {
        world.level = 1;
    }
    reset_level(world);
    log::info!("Restarted at level {}", world.level);
    let level = world.level;
    world.push_event(GameEvent::Restarted { level });
}

/// Debug arena: a single slow ghost level with the player
pub fn test_level(world: &mut World) {
    for enemy in &mut world.enemies {
        enemy.dead = true;
    }
    let player_pos = world.player.pos;
    if let Some(enemy) = world.enemies.first_mut() {
        enemy.dead = false;
        enemy.v_speed = 0.0;
        enemy.h_speed = -10.0;
        enemy.pos = Vec2::new(player_pos.x - 200.0, player_pos.y);
    }
    log::debug!("Test level armed");
}
