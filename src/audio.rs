//! Sound cue dispatch
//!
//! Audio output belongs to the platform. The game turns simulation events
//! into fire-and-forget cues and hands them to a backend.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player fires a bullet
    Shoot,
}

impl SoundEffect {
    /// Asset file the platform should play
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "pewpew.ogg",
        }
    }

    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot { .. } => Some(SoundEffect::Shoot),
            _ => None,
        }
    }
}

/// Something that can play a sound at a given volume
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend that only logs cues, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend {
    played: u64,
}

impl LogBackend {
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played += 1;
        log::debug!("play {} at volume {:.2}", effect.file_name(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B, master_volume: f32) -> Self {
        Self {
            backend,
            master_volume: master_volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect; silent when muted or at zero volume
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }

    /// Play the cue for every event that has one
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
