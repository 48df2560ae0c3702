//! World state handed to the renderer each frame.
use std::sync::Arc;

use log::{info, warn};

use crate::core::grid::GridMap;
use crate::core::sprite::Sprite;
use crate::render::textures::{Texture, WallTextures};

/// Grid, wall textures and sprites for one map.
///
/// The sprite list only grows; a sprite's texture may be swapped (e.g. after a
/// hitscan hit) but sprites are never removed while a map is loaded.
#[derive(Clone, Debug)]
pub struct Scene {
    pub grid: GridMap,
    pub walls: WallTextures,
    sprites: Vec<Sprite>,
}

impl Scene {
    pub fn new(grid: GridMap, walls: WallTextures) -> Self {
        if !grid.is_sealed() {
            warn!(
                "{}x{} grid is not enclosed by walls; rays leaving it render as background",
                grid.width(),
                grid.height()
            );
        }
        for id in grid.tile_ids() {
            if id != 0 && !walls.has_texture(id) {
                warn!("tile id {id} has no wall texture, drawing it with tile 1's texture");
            }
        }
        info!(
            "scene ready: {}x{} grid, {} wall textures",
            grid.width(),
            grid.height(),
            walls.len()
        );
        Self { grid, walls, sprites: Vec::new() }
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> usize {
        self.sprites.push(sprite);
        self.sprites.len() - 1
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.add_sprite(sprite);
        self
    }

    #[inline]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Replaces the texture of sprite `index`. Returns `false` if there is no
    /// such sprite.
    pub fn set_sprite_texture(&mut self, index: usize, texture: Arc<Texture>) -> bool {
        match self.sprites.get_mut(index) {
            Some(sprite) => {
                sprite.texture = texture;
                true
            }
            None => false,
        }
    }
}
