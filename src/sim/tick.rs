//! Per-frame simulation step
//!
//! Runs once per rendered frame, in a fixed order: input, enemies, player,
//! bullets, collisions, level end. Collisions see end-of-frame positions,
//! so fast bullets can tunnel through thin enemies.

use glam::Vec2;

use super::collision::{bullet_hits_enemy, player_hits_enemy};
use super::level;
use super::state::{GameEvent, GamePhase, World};

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held movement keys
    pub move_left: bool,
    pub move_right: bool,
    /// Fire (edge-triggered)
    pub fire: bool,
    /// Restart after game over (held)
    pub restart: bool,
    /// Skip to next level (debug)
    pub skip_level: bool,
    /// End the run immediately (debug)
    pub force_game_over: bool,
    /// Replace the roster with a single test enemy (debug)
    pub test_level: bool,
}

/// Clamp a measured frame time to what one step may integrate
#[inline]
pub fn clamp_frame_time(dt: f32, max_frame_time: f32) -> f32 {
    dt.clamp(0.0, max_frame_time)
}

/// Advance the world by one frame of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    world.frame += 1;
    world.clear_events();

    handle_input(world, input);

    let breached = update_enemies(world, dt);
    update_player(world, dt);
    update_bullets(world, dt);
    detect_collisions(world);

    // A ghost that got through loses the run even if it was the last one
    if !breached {
        level::check_level_end(world);
    }
}

fn handle_input(world: &mut World, input: &TickInput) {
    match world.phase {
        GamePhase::Playing => handle_player_input(world, input),
        GamePhase::GameOver => {
            if input.restart {
                level::restart(world);
            }
        }
    }
}

fn handle_player_input(world: &mut World, input: &TickInput) {
    world.player.moving_left = input.move_left;
    world.player.moving_right = input.move_right;

    if input.fire {
        shoot(world);
    }

    if !world.settings.debug_keys {
        return;
    }
    if input.force_game_over {
        level::game_over(world);
    }
    if input.skip_level {
        level::next_level(world);
    }
    if input.test_level {
        level::test_level(world);
    }
}

/// Fire a bullet from the top centre of the player sprite
pub fn shoot(world: &mut World) {
    let pos = world.player.pos + Vec2::new(world.player_size().x / 2.0, 0.0);
    let slot = world.bullets.fire(pos, world.settings.bullet_size);
    log::debug!("Shot into slot {}", slot);
    world.push_event(GameEvent::Shot { slot });
}

/// Move live enemies, bounce them off the side margins, and end the run if
/// one falls past the bottom edge. Returns true if any enemy got through.
pub fn update_enemies(world: &mut World, dt: f32) -> bool {
    let screen = world.screen();
    let margin = world.settings.enemy_side_margin;
    let right_limit = screen.x - (margin + world.enemy_size().x);

    let mut breached = Vec::new();
    for (i, enemy) in world.enemies.iter_mut().enumerate() {
        if enemy.dead {
            continue;
        }
        enemy.pos.x += enemy.h_speed * dt;
        enemy.pos.y += enemy.v_speed * dt;

        if enemy.pos.x <= margin {
            enemy.h_speed = -enemy.h_speed;
        }
        if enemy.pos.x >= right_limit {
            enemy.h_speed = -enemy.h_speed;
        }

        if enemy.pos.y >= screen.y {
            enemy.dead = true;
            breached.push(i);
        }
    }

    let any = !breached.is_empty();
    for index in breached {
        log::debug!("Enemy {} reached the bottom", index);
        world.push_event(GameEvent::EnemyBreached { index });
        level::game_over(world);
    }
    any
}

/// Move the player along its movement intent. Opposite intents cancel.
pub fn update_player(world: &mut World, dt: f32) {
    let player = &mut world.player;
    if player.moving_left {
        player.pos.x -= player.speed * dt;
    }
    if player.moving_right {
        player.pos.x += player.speed * dt;
    }
}

/// Move live bullets upward and free any that reach the top edge
pub fn update_bullets(world: &mut World, dt: f32) {
    let speed = world.settings.bullet_speed;
    for bullet in world.bullets.slots_mut() {
        if !bullet.alive {
            continue;
        }
        bullet.pos.y -= speed * dt;
        if bullet.pos.y <= 0.0 {
            bullet.alive = false;
        }
    }
}

/// Resolve bullet-vs-enemy hits, then player-vs-enemy contact
pub fn detect_collisions(world: &mut World) {
    let enemy_size = world.enemy_size();
    let knockback = world.settings.knockback_factor;
    let fall = world.settings.knockback_fall;

    let mut events = Vec::new();
    {
        let World {
            bullets, enemies, ..
        } = world;
        for bullet in bullets.slots_mut() {
            for (index, enemy) in enemies.iter_mut().enumerate() {
                if enemy.dead || !bullet.alive {
                    continue;
                }
                if bullet_hits_enemy(bullet, enemy, enemy_size) {
                    bullet.alive = false;
                    if enemy.take_hit(knockback, fall) {
                        events.push(GameEvent::EnemyKilled { index });
                    } else {
                        events.push(GameEvent::EnemyHit { index });
                    }
                }
            }
        }
    }
    for event in events {
        log::debug!("{:?}", event);
        world.push_event(event);
    }

    let mode = world.settings.collision_mode;
    let touched = world
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .any(|e| player_hits_enemy(&world.player, e, &world.sprites, mode));
    if touched {
        level::game_over(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{CollisionMode, GameSettings};
    use crate::sim::sprite::SpriteSet;
    use crate::sim::state::Enemy;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 30.0;

    fn world() -> World {
        World::new(GameSettings::default(), SpriteSet::placeholder())
    }

    /// World with a single live enemy at `pos`, the rest of the roster dead
    fn lone_enemy_world(pos: Vec2, h_speed: f32, health: f32) -> World {
        let mut world = world();
        for enemy in &mut world.enemies {
            enemy.dead = true;
        }
        world.enemies[0] = Enemy {
            pos,
            h_speed,
            v_speed: 0.0,
            health,
            max_health: health,
            dead: false,
        };
        world
    }

    #[test]
    fn test_fire_spawns_bullet_at_player_centre() {
        let mut world = world();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.0);

        let bullet = world.bullets.slots()[0];
        assert!(bullet.alive);
        assert_eq!(bullet.pos.x, world.player.pos.x + world.player_size().x / 2.0);
        assert_eq!(bullet.pos.y, world.player.pos.y);
        assert_eq!(world.events(), &[GameEvent::Shot { slot: 0 }]);
    }

    #[test]
    fn test_player_moves_and_cancels() {
        let mut world = world();
        let start = world.player.pos.x;

        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut world, &left, 0.1);
        assert!((world.player.pos.x - (start - 15.0)).abs() < 1e-4);

        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        let before = world.player.pos.x;
        tick(&mut world, &both, 0.1);
        assert!((world.player.pos.x - before).abs() < 1e-4);

        // Intent is not accumulated
        tick(&mut world, &TickInput::default(), 0.1);
        assert!(!world.player.moving_left);
        assert!((world.player.pos.x - before).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_at_left_margin() {
        let mut world = lone_enemy_world(Vec2::new(31.0, 100.0), -100.0, 3.0);
        update_enemies(&mut world, 0.05);
        assert!(world.enemies[0].pos.x <= 30.0);
        assert_eq!(world.enemies[0].h_speed, 100.0);
    }

    #[test]
    fn test_bounce_at_right_margin() {
        let width = world().enemy_size().x;
        let limit = 800.0 - (30.0 + width);
        let mut world = lone_enemy_world(Vec2::new(limit - 1.0, 100.0), 100.0, 3.0);
        update_enemies(&mut world, 0.05);
        assert_eq!(world.enemies[0].h_speed, -100.0);
    }

    #[test]
    fn test_bullet_despawns_at_top() {
        let mut world = world();
        world.bullets.fire(Vec2::new(100.0, 5.0), Vec2::new(2.0, 12.0));
        update_bullets(&mut world, 0.1);
        assert!(!world.bullets.slots()[0].alive);

        let parked = world.bullets.slots()[0].pos;
        for _ in 0..5 {
            update_bullets(&mut world, 0.1);
            assert!(!world.bullets.slots()[0].alive);
        }
        assert_eq!(world.bullets.slots()[0].pos, parked);
    }

    #[test]
    fn test_bullet_kills_last_hit_point_enemy() {
        let mut world = lone_enemy_world(Vec2::new(300.0, 200.0), -100.0, 1.0);
        world.bullets.fire(Vec2::new(310.0, 210.0), Vec2::new(2.0, 12.0));
        detect_collisions(&mut world);

        assert!(world.enemies[0].dead);
        assert!(!world.bullets.slots()[0].alive);
        assert!(world.events().contains(&GameEvent::EnemyKilled { index: 0 }));
    }

    #[test]
    fn test_non_lethal_hit_applies_knockback() {
        let mut world = lone_enemy_world(Vec2::new(300.0, 200.0), -100.0, 3.0);
        world.bullets.fire(Vec2::new(310.0, 210.0), Vec2::new(2.0, 12.0));
        detect_collisions(&mut world);

        let enemy = &world.enemies[0];
        assert!(!enemy.dead);
        assert_eq!(enemy.health, 2.0);
        assert!((enemy.h_speed - -105.0).abs() < 1e-3);
        assert_eq!(enemy.v_speed, 10.0);
        assert!(!world.bullets.slots()[0].alive);
    }

    #[test]
    fn test_dead_enemy_is_not_hit_again() {
        let mut world = lone_enemy_world(Vec2::new(300.0, 200.0), -100.0, 1.0);
        world.enemies[1] = world.enemies[0].clone();
        world.enemies[1].dead = true;
        world.enemies[0].dead = true;
        world.bullets.fire(Vec2::new(310.0, 210.0), Vec2::new(2.0, 12.0));
        detect_collisions(&mut world);

        assert!(world.bullets.slots()[0].alive);
        assert_eq!(world.enemies[0].health, 1.0);
        assert!(world.events().is_empty());
    }

    #[test]
    fn test_one_bullet_hits_one_enemy() {
        // Two stacked enemies under the same point; the bullet is spent on the first
        let mut world = lone_enemy_world(Vec2::new(300.0, 200.0), -100.0, 3.0);
        world.enemies[1] = world.enemies[0].clone();
        world.bullets.fire(Vec2::new(310.0, 210.0), Vec2::new(2.0, 12.0));
        detect_collisions(&mut world);

        assert_eq!(world.enemies[0].health, 2.0);
        assert_eq!(world.enemies[1].health, 3.0);
    }

    #[test]
    fn test_enemy_reaching_bottom_ends_run() {
        let mut world = lone_enemy_world(Vec2::new(300.0, 599.0), -10.0, 3.0);
        world.enemies[0].v_speed = 60.0;
        world.enemies[1] = world.enemies[0].clone();
        world.enemies[1].pos.y = 100.0;
        world.enemies[1].v_speed = 20.0;

        update_enemies(&mut world, 0.1);

        assert!(world.enemies[0].dead);
        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(world.enemies[1].v_speed, 0.0);
        assert!(world.events().contains(&GameEvent::EnemyBreached { index: 0 }));
    }

    #[test]
    fn test_last_enemy_breaching_is_not_a_level_win() {
        let mut world = lone_enemy_world(Vec2::new(300.0, 599.0), 0.0, 3.0);
        world.enemies[0].v_speed = 60.0;

        tick(&mut world, &TickInput::default(), 0.1);

        assert_eq!(world.phase, GamePhase::GameOver);
        assert_eq!(world.level, 1);
        assert_eq!(
            world.events(),
            &[GameEvent::EnemyBreached { index: 0 }, GameEvent::GameOver]
        );
    }

    #[test]
    fn test_events_cover_only_the_latest_tick() {
        let mut world = world();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &fire, DT);
        tick(&mut world, &TickInput::default(), DT);
        assert!(world.events().is_empty());

        tick(&mut world, &fire, DT);
        assert_eq!(world.events(), &[GameEvent::Shot { slot: 1 }]);
    }

    #[test]
    fn test_player_contact_ends_run() {
        let mut world = world();
        let player_pos = world.player.pos;
        world.enemies[0].pos = player_pos;
        world.enemies[0].h_speed = 0.0;

        detect_collisions(&mut world);
        assert_eq!(world.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_dead_enemy_on_player_is_harmless() {
        let mut world = world();
        world.enemies[0].pos = world.player.pos;
        world.enemies[0].dead = true;

        detect_collisions(&mut world);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_freezes_player() {
        let mut world = world();
        let moving = TickInput {
            move_right: true,
            force_game_over: true,
            ..Default::default()
        };
        tick(&mut world, &moving, DT);
        assert_eq!(world.phase, GamePhase::GameOver);

        let x = world.player.pos.x;
        tick(&mut world, &moving, DT);
        tick(&mut world, &moving, DT);
        assert_eq!(world.player.pos.x, x);
    }

    #[test]
    fn test_fire_ignored_during_game_over() {
        let mut world = world();
        level::game_over(&mut world);
        world.drain_events();

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &fire, DT);
        assert_eq!(world.bullets.alive_count(), 0);
        assert!(!world.events().iter().any(|e| matches!(e, GameEvent::Shot { .. })));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut world = world();
        level::game_over(&mut world);
        world.enemies[4].dead = true;

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut world, &restart, 0.0);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.alive_enemies(), 15);
        assert_eq!(world.level, 1);
    }

    #[test]
    fn test_clearing_roster_advances_level() {
        let mut world = lone_enemy_world(Vec2::new(300.0, 200.0), 0.0, 1.0);
        world.bullets.fire(Vec2::new(310.0, 215.0), Vec2::new(2.0, 12.0));
        tick(&mut world, &TickInput::default(), DT);

        assert_eq!(world.level, 2);
        assert_eq!(world.alive_enemies(), 15);
        assert!(world.events().contains(&GameEvent::LevelCleared { level: 2 }));
    }

    #[test]
    fn test_debug_keys_can_be_disabled() {
        let settings = GameSettings {
            debug_keys: false,
            ..Default::default()
        };
        let mut world = World::new(settings, SpriteSet::placeholder());
        let input = TickInput {
            skip_level: true,
            force_game_over: true,
            test_level: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.0);
        assert_eq!(world.level, 1);
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.alive_enemies(), 15);
    }

    #[test]
    fn test_skip_level() {
        let mut world = world();
        let input = TickInput {
            skip_level: true,
            ..Default::default()
        };
        tick(&mut world, &input, 0.0);
        assert_eq!(world.level, 2);
    }

    #[test]
    fn test_box_mode_reports_more_contacts() {
        use crate::sim::sprite::{SpriteMask, SpritePair};

        // Ring-shaped sprites: opaque border, transparent interior
        let ring = |size: u32| {
            SpriteMask::from_fn(size, size, move |x, y| {
                if x == 0 || y == 0 || x == size - 1 || y == size - 1 { 255 } else { 0 }
            })
        };
        let sprites = SpriteSet::new(
            SpritePair::new(ring(40)),
            SpritePair::new(SpriteMask::opaque(4, 4)),
        );

        for (mode, expected) in [
            (CollisionMode::BoundingBox, GamePhase::GameOver),
            (CollisionMode::PixelExact, GamePhase::Playing),
        ] {
            let settings = GameSettings {
                collision_mode: mode,
                ..Default::default()
            };
            let mut world = World::new(settings, sprites.clone());
            // Small ghost entirely inside the player's hollow centre
            world.enemies[0].pos = world.player.pos + Vec2::new(18.0, 18.0);
            detect_collisions(&mut world);
            assert_eq!(world.phase, expected, "{:?}", mode);
        }
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            TickInput {
                move_left: true,
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                move_right: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
        ];

        let mut a = world();
        let mut b = world();
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input, DT);
                tick(&mut b, input, DT);
            }
        }

        assert_eq!(a.frame, b.frame);
        assert_eq!(a.player.pos, b.player.pos);
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.dead, eb.dead);
        }
    }

    proptest! {
        #[test]
        fn prop_left_margin_flips_direction(x in -50.0f32..30.0, speed in 1.0f32..300.0) {
            let mut world = lone_enemy_world(Vec2::new(x, 100.0), -speed, 3.0);
            update_enemies(&mut world, 0.0);
            prop_assert_eq!(world.enemies[0].h_speed, speed);
        }

        #[test]
        fn prop_right_margin_flips_direction(offset in 0.0f32..80.0, speed in 1.0f32..300.0) {
            let limit = 800.0 - (30.0 + world().enemy_size().x);
            let mut world = lone_enemy_world(Vec2::new(limit + offset, 100.0), speed, 3.0);
            update_enemies(&mut world, 0.0);
            prop_assert_eq!(world.enemies[0].h_speed, -speed);
        }

        #[test]
        fn prop_dead_bullets_stay_dead(y in -100.0f32..5.0, steps in 1usize..20) {
            let mut world = world();
            world.bullets.fire(Vec2::new(10.0, y.max(0.5)), Vec2::new(2.0, 12.0));
            update_bullets(&mut world, 0.1);
            prop_assert!(!world.bullets.slots()[0].alive);
            for _ in 0..steps {
                update_bullets(&mut world, 0.1);
                prop_assert!(!world.bullets.slots()[0].alive);
            }
        }
    }
}
