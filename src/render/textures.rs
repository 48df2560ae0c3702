//! Square textures, the tile-id texture table and procedural fallbacks.
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::grid::Tile;
use crate::render::color::Color;
use crate::{RenderError, RenderResult};

/// Immutable square pixmap sampled by integer texel coordinates.
#[derive(Clone, PartialEq)]
pub struct Texture {
    size: u32,
    px: Vec<Color>,
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture").field("size", &self.size).finish_non_exhaustive()
    }
}

impl Texture {
    pub fn new(size: u32, px: Vec<Color>) -> RenderResult<Self> {
        if size == 0 {
            return Err(RenderError::InvalidTexture("texture size must be positive".to_string()));
        }
        if px.len() != (size * size) as usize {
            return Err(RenderError::InvalidTexture(format!(
                "{size}x{size} texture needs {} texels, got {}",
                size * size,
                px.len()
            )));
        }
        Ok(Self { size, px })
    }

    /// Texture whose texel `(x, y)` is `f(x, y)`. `size` is raised to 1.
    pub fn from_fn(size: u32, f: impl Fn(u32, u32) -> Color) -> Self {
        let size = size.max(1);
        let px = (0..size * size).map(|i| f(i % size, i / size)).collect();
        Self { size, px }
    }

    pub fn solid(size: u32, color: Color) -> Self {
        Self::from_fn(size, |_, _| color)
    }

    /// Loads a square PNG.
    pub fn from_image_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let (w, h) = img.dimensions();
        if w != h {
            return Err(RenderError::InvalidTexture(format!(
                "{} is {w}x{h}, textures must be square",
                path.display()
            )));
        }
        debug!("loaded {w}x{h} texture from {}", path.display());
        let px = img.pixels().map(|p| Color::from(p.0)).collect();
        Self::new(w, px)
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Texel at `(x, y)`; coordinates wrap.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> Color {
        let xi = (x % self.size) as usize;
        let yi = (y % self.size) as usize;
        self.px[yi * self.size as usize + xi]
    }
}

/// Wall textures indexed by tile id. Id `0` is open floor and has no texture;
/// ids `1..=len` map to the stored textures in order.
#[derive(Clone, Debug)]
pub struct WallTextures {
    textures: Vec<Arc<Texture>>,
}

impl WallTextures {
    /// Tile id substituted for ids without a texture.
    pub const FALLBACK_TILE: Tile = 1;

    pub fn new(textures: Vec<Arc<Texture>>) -> RenderResult<Self> {
        if textures.is_empty() {
            return Err(RenderError::MissingTexture { kind: "wall", index: Self::FALLBACK_TILE as usize });
        }
        Ok(Self { textures })
    }

    /// Number of real wall textures (the highest valid tile id).
    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    #[inline]
    pub fn has_texture(&self, tile: Tile) -> bool {
        tile != 0 && (tile as usize) <= self.textures.len()
    }

    /// Texture for `tile`, clamping ids without a texture to
    /// [`Self::FALLBACK_TILE`].
    #[inline]
    pub fn for_tile(&self, tile: Tile) -> &Texture {
        let id = if self.has_texture(tile) { tile } else { Self::FALLBACK_TILE };
        &self.textures[id as usize - 1]
    }
}

/// Procedural textures used by the demo scene and as scene-file sources.
pub mod procedural {
    use super::*;

    /// Base colour with lighter 8-texel squares.
    pub fn checker(size: u32, base: Color) -> Texture {
        let cell = (size / 8).max(1);
        let light = base.mix(Color::WHITE, 48);
        Texture::from_fn(size, |x, y| if ((x / cell) + (y / cell)) % 2 == 0 { light } else { base })
    }

    /// Running-bond bricks separated by mortar lines.
    pub fn brick(size: u32, brick: Color, mortar: Color) -> Texture {
        let course = (size / 4).max(2);
        let brick_w = (size / 2).max(2);
        Texture::from_fn(size, |x, y| {
            let row = y / course;
            let shift = if row % 2 == 0 { 0 } else { brick_w / 2 };
            let in_joint = y % course == 0 || (x + shift) % brick_w == 0;
            if in_joint {
                mortar
            } else {
                // Slight per-brick tint so the wall does not look flat.
                let id = row.wrapping_mul(31) ^ ((x + shift) / brick_w).wrapping_mul(17);
                brick.mix(Color::BLACK, (id % 5 * 10) as u8)
            }
        })
    }

    /// Per-texel brightness noise around `base`, reproducible from `seed`.
    pub fn noise(size: u32, base: Color, seed: u64) -> Texture {
        let mut rng = StdRng::seed_from_u64(seed);
        let size = size.max(1);
        let px = (0..size * size)
            .map(|_| base.scaled(rng.gen_range(0.7..=1.15)))
            .collect();
        Texture { size, px }
    }

    /// Vertical stripes alternating between two colours.
    pub fn stripes(size: u32, a: Color, b: Color) -> Texture {
        let band = (size / 8).max(1);
        Texture::from_fn(size, |x, _| if (x / band) % 2 == 0 { a } else { b })
    }

    /// Glowing disc on a pure black (transparent) background.
    pub fn orb(size: u32, color: Color) -> Texture {
        let c = size as f32 * 0.5;
        let r = size as f32 * 0.35;
        Texture::from_fn(size, |x, y| {
            let dx = x as f32 + 0.5 - c;
            let dy = y as f32 + 0.5 - c;
            let d = (dx * dx + dy * dy).sqrt();
            if d > r {
                return Color::BLACK;
            }
            let t = (1.0 - d / r).clamp(0.0, 1.0);
            let lit = color.mix(Color::WHITE, (t * 200.0) as u8);
            // Keep the disc distinguishable from the transparent key.
            lit.additive(Color::rgb(1, 1, 1))
        })
    }
}
