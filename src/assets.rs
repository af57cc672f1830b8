//! Asset registry
//!
//! Loads every sprite and sound once at startup. Each texture is decoded,
//! mirrored, and reduced to the alpha masks the simulation collides with.
//! Nothing is loaded lazily and nothing changes after construction.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops;

use crate::audio::SoundEffect;
use crate::sim::{SpriteMask, SpritePair, SpriteSet};

/// Player sprite file
pub const PLAYER_TEXTURE: &str = "player.png";
/// Enemy sprite file
pub const ENEMY_TEXTURE: &str = "ghost.png";

/// Failure to load a required asset
#[derive(Debug)]
pub enum AssetError {
    Image {
        name: String,
        source: image::ImageError,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image { name, source } => write!(f, "failed to load texture {name}: {source}"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image { source, .. } => Some(source),
        }
    }
}

/// Sprites and sound files, loaded once
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    sprites: SpriteSet,
    sounds: HashMap<SoundEffect, PathBuf>,
}

impl AssetRegistry {
    /// Load all assets from a directory
    ///
    /// Textures are required. A missing sound only disables that cue.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, AssetError> {
        let dir = dir.as_ref();
        let player = load_texture(dir, PLAYER_TEXTURE)?;
        let enemy = load_texture(dir, ENEMY_TEXTURE)?;

        let mut sounds = HashMap::new();
        let effect = SoundEffect::Shoot;
        let path = dir.join(effect.file_name());
        if path.is_file() {
            sounds.insert(effect, path);
        } else {
            log::warn!("Sound {} not found, cue disabled", path.display());
        }

        log::info!(
            "Loaded assets from {} (player {}x{}, enemy {}x{})",
            dir.display(),
            player.normal.width(),
            player.normal.height(),
            enemy.normal.width(),
            enemy.normal.height()
        );

        Ok(Self {
            sprites: SpriteSet::new(player, enemy),
            sounds,
        })
    }

    /// Build from already-decoded images
    pub fn from_images(player: &RgbaImage, enemy: &RgbaImage) -> Self {
        Self {
            sprites: SpriteSet::new(sprite_pair(player), sprite_pair(enemy)),
            sounds: HashMap::new(),
        }
    }

    /// Opaque square sprites and no sounds
    pub fn placeholder() -> Self {
        Self {
            sprites: SpriteSet::placeholder(),
            sounds: HashMap::new(),
        }
    }

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }

    /// Resolved path of a sound, if it was found
    pub fn sound_path(&self, effect: SoundEffect) -> Option<&Path> {
        self.sounds.get(&effect).map(PathBuf::as_path)
    }
}

fn load_texture(dir: &Path, name: &str) -> Result<SpritePair, AssetError> {
    let image = image::open(dir.join(name))
        .map_err(|source| AssetError::Image {
            name: name.to_string(),
            source,
        })?
        .to_rgba8();
    Ok(sprite_pair(&image))
}

/// Normal mask plus a mask of the horizontally flipped image
fn sprite_pair(image: &RgbaImage) -> SpritePair {
    let flipped = imageops::flip_horizontal(image);
    SpritePair::from_parts(alpha_mask(image), alpha_mask(&flipped))
}

/// Alpha channel of an RGBA image
pub fn alpha_mask(image: &RgbaImage) -> SpriteMask {
    let alpha = image.pixels().map(|p| p.0[3]).collect();
    SpriteMask::from_alpha(image.width(), image.height(), alpha)
}
