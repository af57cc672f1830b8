//! Scripted player for headless runs and demos
//!
//! Lines up under the lowest live ghost and fires at a steady cadence.
//! Restarts automatically after a game over unless told not to.

use crate::sim::{GamePhase, TickInput, World};

/// Horizontal slack before the autopilot starts moving (pixels)
const AIM_DEADZONE: f32 = 4.0;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Frames between shots
    pub fire_interval: u32,
    /// Hold restart while the run is over
    pub auto_restart: bool,
    frames_since_shot: u32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(6, true)
    }
}

impl Autopilot {
    pub fn new(fire_interval: u32, auto_restart: bool) -> Self {
        Self {
            fire_interval: fire_interval.max(1),
            auto_restart,
            frames_since_shot: 0,
        }
    }

    /// Decide this frame's input from the current world
    pub fn next_input(&mut self, world: &World) -> TickInput {
        if world.phase == GamePhase::GameOver {
            self.frames_since_shot = 0;
            return TickInput {
                restart: self.auto_restart,
                ..Default::default()
            };
        }

        let mut input = TickInput::default();

        let enemy_width = world.enemy_size().x;
        let target = world
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        if let Some(enemy) = target {
            let muzzle = world.player.pos.x + world.player_size().x / 2.0;
            // Lead by the distance the ghost covers while the bullet climbs; bounces ignored
            let climb = world.player.pos.y - enemy.pos.y;
            let flight = (climb / world.settings.bullet_speed).max(0.0);
            let aim = enemy.pos.x + enemy_width / 2.0 + enemy.h_speed * flight;
            let error = aim - muzzle;

            if error < -AIM_DEADZONE {
                input.move_left = true;
            } else if error > AIM_DEADZONE {
                input.move_right = true;
            }

            self.frames_since_shot += 1;
            // Never recycle a bullet that is still climbing
            let ready =
                self.frames_since_shot >= self.fire_interval && world.bullets.next_slot_free();
            if error.abs() < enemy_width / 2.0 && ready {
                input.fire = true;
                self.frames_since_shot = 0;
            }
        }

        input
    }
}
