//! Sprite opacity masks
//!
//! The simulation never sees textures. It needs sprite bounds for every
//! collision test and per-pixel alpha for the pixel-exact player test.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PLACEHOLDER_SPRITE_SIZE;

/// Which way a sprite is drawn. Always derived from entity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Normal,
    /// Mirrored horizontally
    Flipped,
}

/// Alpha channel of a sprite, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl SpriteMask {
    /// Build a mask from raw alpha values; short input is padded with transparent pixels
    pub fn from_alpha(width: u32, height: u32, mut alpha: Vec<u8>) -> Self {
        alpha.resize(width as usize * height as usize, 0);
        Self {
            width,
            height,
            alpha,
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Self {
        let mut alpha = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                alpha.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            alpha,
        }
    }

    /// Fully opaque rectangle
    pub fn opaque(width: u32, height: u32) -> Self {
        Self::from_alpha(width, height, vec![u8::MAX; width as usize * height as usize])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bounds in pixels as a vector
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Alpha at local pixel coordinates; anything outside the sprite is transparent
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.alpha[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    pub fn is_opaque_at(&self, x: i32, y: i32) -> bool {
        self.alpha_at(x, y) != 0
    }

    /// Mirror image around the vertical axis
    pub fn flipped_horizontal(&self) -> Self {
        let w = self.width as usize;
        let mut alpha = Vec::with_capacity(self.alpha.len());
        for row in self.alpha.chunks(w.max(1)) {
            alpha.extend(row.iter().rev());
        }
        Self {
            width: self.width,
            height: self.height,
            alpha,
        }
    }
}

/// Normal and mirrored masks of one sprite
#[derive(Debug, Clone)]
pub struct SpritePair {
    pub normal: Arc<SpriteMask>,
    pub flipped: Arc<SpriteMask>,
}

impl SpritePair {
    /// Pair a mask with its computed mirror image
    pub fn new(mask: SpriteMask) -> Self {
        let flipped = mask.flipped_horizontal();
        Self::from_parts(mask, flipped)
    }

    pub fn from_parts(normal: SpriteMask, flipped: SpriteMask) -> Self {
        Self {
            normal: Arc::new(normal),
            flipped: Arc::new(flipped),
        }
    }

    /// Mask for the given pose
    pub fn pose(&self, facing: Facing) -> &SpriteMask {
        match facing {
            Facing::Normal => &self.normal,
            Facing::Flipped => &self.flipped,
        }
    }

    /// Collision bounds (both poses share them)
    pub fn size(&self) -> Vec2 {
        self.normal.size()
    }
}

/// Every sprite the simulation needs
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub player: SpritePair,
    pub enemy: SpritePair,
}

impl SpriteSet {
    pub fn new(player: SpritePair, enemy: SpritePair) -> Self {
        Self { player, enemy }
    }

    /// Opaque squares, for running without texture files
    pub fn placeholder() -> Self {
        let size = PLACEHOLDER_SPRITE_SIZE;
        Self {
            player: SpritePair::new(SpriteMask::opaque(size, size)),
            enemy: SpritePair::new(SpriteMask::opaque(size, size)),
        }
    }
}
