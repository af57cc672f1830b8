//! Keyboard input
//!
//! The windowing layer owns the keyboard; the game only asks two questions
//! per key: is it held, and was it pressed this frame.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Space,
    X,
    S,
    T,
}

/// Keyboard state for the current frame
pub trait InputSource {
    /// Key is down right now
    fn is_held(&self, key: Key) -> bool;
    /// Key went down since the previous frame
    fn was_pressed(&self, key: Key) -> bool;
}

/// Map keyboard state to tick commands
///
/// Movement and restart follow held keys; fire and the debug actions fire
/// once per press.
pub fn resolve(source: &impl InputSource) -> TickInput {
    TickInput {
        move_left: source.is_held(Key::Left),
        move_right: source.is_held(Key::Right),
        fire: source.was_pressed(Key::Up),
        restart: source.is_held(Key::Space),
        force_game_over: source.was_pressed(Key::X),
        skip_level: source.was_pressed(Key::S),
        test_level: source.was_pressed(Key::T),
    }
}

/// Snapshot of held and freshly pressed keys
#[derive(Debug, Clone, Default)]
pub struct FrameKeys {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
}

impl FrameKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key is down and was already down last frame
    pub fn hold(mut self, key: Key) -> Self {
        self.held.insert(key);
        self
    }

    /// Key went down this frame (and is therefore also held)
    pub fn press(mut self, key: Key) -> Self {
        self.held.insert(key);
        self.pressed.insert(key);
        self
    }

    /// Advance to the next frame: presses become plain holds
    pub fn next_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
        self.pressed.remove(&key);
    }
}

impl InputSource for FrameKeys {
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}
