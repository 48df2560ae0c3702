//! # Scene configuration
//!
//! JSON scene description: tile grid, texture sources, sprite placements,
//! camera pose and render settings. Everything is validated by
//! [`SceneConfig::build`] so missing textures or bad poses surface before the
//! first frame.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::DVec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::core::camera::{Camera, DEFAULT_PLANE_LENGTH};
use crate::core::grid::{GridMap, Tile};
use crate::core::process_events::MotionConfig;
use crate::core::scene::Scene;
use crate::core::sprite::Sprite;
use crate::render::color::Color;
use crate::render::render3d::RenderSettings;
use crate::render::textures::{Texture, WallTextures, procedural};
use crate::{RenderError, RenderResult};

fn default_texture_size() -> u32 {
    64
}

fn default_plane_length() -> f64 {
    DEFAULT_PLANE_LENGTH
}

/// Where a texture comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureSource {
    Checker { base: Color },
    Brick { brick: Color, mortar: Color },
    Noise { base: Color, seed: u64 },
    Stripes { a: Color, b: Color },
    Orb { color: Color },
    /// Square PNG, relative to the scene file.
    File { path: PathBuf },
}

impl TextureSource {
    /// Loads or generates the texture. Procedural sources use `size`.
    pub fn load(&self, size: u32, base_dir: &Path) -> RenderResult<Texture> {
        Ok(match self {
            Self::Checker { base } => procedural::checker(size, *base),
            Self::Brick { brick, mortar } => procedural::brick(size, *brick, *mortar),
            Self::Noise { base, seed } => procedural::noise(size, *base, *seed),
            Self::Stripes { a, b } => procedural::stripes(size, *a, *b),
            Self::Orb { color } => procedural::orb(size, *color),
            Self::File { path } => Texture::from_image_file(base_dir.join(path))?,
        })
    }
}

/// Sprite in grid cell `cell = [x, y]` using sprite texture `texture`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpritePlacement {
    pub cell: [usize; 2],
    pub texture: usize,
}

/// Initial camera pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: DVec2,
    pub direction: DVec2,
    /// Camera plane length; 0.66 is about a 66° field of view.
    #[serde(default = "default_plane_length")]
    pub plane_length: f64,
}

/// Complete scene file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Tile rows, `grid[y][x]`.
    pub grid: Vec<Vec<Tile>>,
    /// Texture for tile id `i + 1`.
    pub wall_textures: Vec<TextureSource>,
    #[serde(default)]
    pub sprite_textures: Vec<TextureSource>,
    #[serde(default)]
    pub sprites: Vec<SpritePlacement>,
    /// Tile id drawn as a door set back to the middle of its cell.
    #[serde(default)]
    pub door_tile: Option<Tile>,
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub motion: MotionConfig,
    /// Edge length of procedural textures.
    #[serde(default = "default_texture_size")]
    pub texture_size: u32,
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> RenderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the configuration and loads every texture. File textures
    /// resolve relative to `base_dir`.
    pub fn build(&self, base_dir: &Path) -> RenderResult<(Scene, Camera, RenderSettings)> {
        self.render.validate()?;
        if self.texture_size == 0 {
            return Err(RenderError::InvalidTexture("texture_size must be positive".to_string()));
        }

        let grid = GridMap::from_rows(&self.grid)?.with_door_tile(self.door_tile);

        let walls = self
            .wall_textures
            .iter()
            .map(|src| src.load(self.texture_size, base_dir).map(Arc::new))
            .collect::<RenderResult<Vec<_>>>()?;
        let walls = WallTextures::new(walls)?;

        let sprite_textures = self
            .sprite_textures
            .iter()
            .map(|src| src.load(self.texture_size, base_dir).map(Arc::new))
            .collect::<RenderResult<Vec<_>>>()?;

        let camera = Camera::new(self.camera.position, self.camera.direction, self.camera.plane_length)?;
        if !grid.is_open_at(camera.pos) {
            return Err(RenderError::InvalidCamera(format!(
                "camera at {} is inside a wall or outside the grid",
                camera.pos
            )));
        }

        let mut scene = Scene::new(grid, walls);
        for placement in &self.sprites {
            let texture = sprite_textures
                .get(placement.texture)
                .cloned()
                .ok_or(RenderError::MissingTexture { kind: "sprite", index: placement.texture })?;
            let [x, y] = placement.cell;
            if x >= scene.grid.width() || y >= scene.grid.height() {
                return Err(RenderError::InvalidGrid(format!(
                    "sprite cell ({x}, {y}) is outside the {}x{} grid",
                    scene.grid.width(),
                    scene.grid.height()
                )));
            }
            scene.add_sprite(Sprite::at_cell(x, y, texture));
        }
        info!(
            "built scene with {} sprites, camera at {}",
            scene.sprites().len(),
            camera.pos
        );
        Ok((scene, camera, self.render))
    }

    /// Built-in 24x24 level with pillars, an inner room and a few sprites.
    pub fn demo() -> Self {
        const W: usize = 24;
        const H: usize = 24;
        let mut grid = vec![vec![0; W]; H];
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, tile) in row.iter_mut().enumerate() {
                if x == 0 || y == 0 || x == W - 1 || y == H - 1 {
                    *tile = 1;
                }
            }
        }
        // Inner room with a doorway on its west side.
        for i in 14..=20 {
            grid[6][i] = 2;
            grid[12][i] = 2;
        }
        for row in grid.iter_mut().take(12).skip(6) {
            row[20] = 2;
        }
        for (y, row) in grid.iter_mut().enumerate().take(12).skip(6) {
            if y != 9 {
                row[14] = 2;
            }
        }
        // Pillars.
        for &(x, y) in &[(5, 5), (5, 9), (9, 5), (9, 9), (5, 16), (9, 16)] {
            grid[y][x] = 3;
        }
        // Striped wall segment and a noisy block.
        for row in grid.iter_mut().take(21).skip(17) {
            row[17] = 4;
        }
        grid[19][12] = 5;
        // Door in the inner room's south wall.
        grid[12][17] = 6;

        Self {
            grid,
            wall_textures: vec![
                TextureSource::Brick { brick: Color::rgb(150, 60, 40), mortar: Color::rgb(90, 90, 90) },
                TextureSource::Checker { base: Color::rgb(40, 70, 140) },
                TextureSource::Noise { base: Color::rgb(130, 130, 120), seed: 7 },
                TextureSource::Stripes { a: Color::rgb(200, 180, 40), b: Color::rgb(60, 50, 20) },
                TextureSource::Noise { base: Color::rgb(60, 120, 60), seed: 42 },
                TextureSource::Stripes { a: Color::rgb(120, 80, 40), b: Color::rgb(90, 60, 30) },
            ],
            sprite_textures: vec![
                TextureSource::Orb { color: Color::rgb(255, 220, 60) },
                TextureSource::Orb { color: Color::rgb(80, 200, 255) },
            ],
            sprites: vec![
                SpritePlacement { cell: [7, 7], texture: 0 },
                SpritePlacement { cell: [17, 9], texture: 1 },
                SpritePlacement { cell: [3, 12], texture: 0 },
                SpritePlacement { cell: [12, 15], texture: 1 },
                SpritePlacement { cell: [20, 20], texture: 0 },
            ],
            door_tile: Some(6),
            camera: CameraConfig {
                position: DVec2::new(2.5, 2.5),
                direction: DVec2::new(1.0, 0.6),
                plane_length: DEFAULT_PLANE_LENGTH,
            },
            render: RenderSettings::default(),
            motion: MotionConfig::default(),
            texture_size: default_texture_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_builds() {
        let (scene, camera, settings) = SceneConfig::demo().build(Path::new(".")).unwrap();
        assert!(scene.grid.is_sealed());
        assert_eq!(scene.sprites().len(), 5);
        assert_eq!(scene.walls.len(), 6);
        assert!(scene.grid.is_door(glam::IVec2::new(17, 12)));
        assert!(scene.grid.is_open_at(camera.pos));
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn json_round_trip_keeps_config() {
        let demo = SceneConfig::demo();
        let back = SceneConfig::from_json_str(&demo.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, demo);
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let json = r#"{
            "grid": [[1,1,1],[1,0,1],[1,1,1]],
            "wall_textures": [{"kind": "checker", "base": {"r": 10, "g": 20, "b": 30}}],
            "camera": {"position": [1.5, 1.5], "direction": [0.0, 1.0]}
        }"#;
        let cfg = SceneConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.texture_size, 64);
        assert_eq!(cfg.camera.plane_length, DEFAULT_PLANE_LENGTH);
        let (scene, _, settings) = cfg.build(Path::new(".")).unwrap();
        assert_eq!(scene.grid.width(), 3);
        assert_eq!(settings.render_height, 480);
    }

    #[test]
    fn door_tile_reaches_the_grid() {
        let json = r#"{
            "grid": [[1,1,1,1],[1,0,9,1],[1,1,1,1]],
            "wall_textures": [{"kind": "checker", "base": {"r": 10, "g": 20, "b": 30}}],
            "door_tile": 9,
            "camera": {"position": [1.5, 1.5], "direction": [1.0, 0.0]}
        }"#;
        let (scene, _, _) = SceneConfig::from_json_str(json).unwrap().build(Path::new(".")).unwrap();
        assert_eq!(scene.grid.door_tile(), Some(9));
        assert!(scene.grid.is_door(glam::IVec2::new(2, 1)));
    }

    #[test]
    fn unknown_sprite_texture_is_reported() {
        let mut cfg = SceneConfig::demo();
        cfg.sprites.push(SpritePlacement { cell: [2, 2], texture: 9 });
        assert!(matches!(
            cfg.build(Path::new(".")),
            Err(RenderError::MissingTexture { kind: "sprite", index: 9 })
        ));
    }

    #[test]
    fn camera_inside_wall_is_rejected() {
        let mut cfg = SceneConfig::demo();
        cfg.camera.position = DVec2::new(0.5, 0.5);
        assert!(matches!(cfg.build(Path::new(".")), Err(RenderError::InvalidCamera(_))));
    }

    #[test]
    fn missing_texture_file_fails_before_rendering() {
        let mut cfg = SceneConfig::demo();
        cfg.wall_textures[0] = TextureSource::File { path: PathBuf::from("no/such/wall.png") };
        assert!(cfg.build(Path::new(".")).is_err());
    }

    #[test]
    fn no_wall_textures_is_an_error() {
        let mut cfg = SceneConfig::demo();
        cfg.wall_textures.clear();
        assert!(matches!(cfg.build(Path::new(".")), Err(RenderError::MissingTexture { kind: "wall", .. })));
    }
}
