use std::sync::Arc;

use glam::DVec2;

use crate::render::textures::Texture;

/// Billboard in world space. Textures are shared between sprites.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub pos: DVec2,
    pub texture: Arc<Texture>,
}

impl Sprite {
    pub fn new(pos: DVec2, texture: Arc<Texture>) -> Self {
        Self { pos, texture }
    }

    /// Sprite centred in grid cell `(x, y)`.
    pub fn at_cell(x: usize, y: usize, texture: Arc<Texture>) -> Self {
        Self::new(DVec2::new(x as f64 + 0.5, y as f64 + 0.5), texture)
    }

    /// Squared distance to `point`; enough for ordering.
    #[inline]
    pub fn distance_sq(&self, point: DVec2) -> f64 {
        self.pos.distance_squared(point)
    }
}
