//! Frame renderer: ceiling/floor fill, textured wall columns, then sprites.
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::core::camera::Camera;
use crate::core::scene::Scene;
use crate::render::casters::cast_column;
use crate::render::color::Color;
use crate::render::depth::DepthBuffer;
use crate::render::framebuffer::PixelWriter;
use crate::render::sprites::render_sprites;
use crate::render::walls::draw_wall_column;
use crate::{RenderError, RenderResult};

const CEILING: Color = Color::rgb(0, 0, 0);
const FLOOR: Color = Color::rgb(0x12, 0x12, 0x12);

/// Output size and shading options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Columns per frame; one ray each.
    pub screen_width: u32,
    /// Rows of the 3D view.
    pub render_height: u32,
    pub ceiling: Color,
    pub floor: Color,
    /// Halve the brightness of faces hit across a horizontal grid line.
    pub side_shading: bool,
    /// Walls fade to black at this distance when set.
    pub fade_distance: Option<f64>,
    /// Sprite texels of this colour are not drawn.
    pub transparent_key: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            screen_width: 640,
            render_height: 480,
            ceiling: CEILING,
            floor: FLOOR,
            side_shading: true,
            fade_distance: None,
            transparent_key: Color::BLACK,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> RenderResult<()> {
        if self.screen_width == 0 || self.render_height == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "render size must be positive, got {}x{}",
                self.screen_width, self.render_height
            )));
        }
        if let Some(fade) = self.fade_distance {
            if !(fade.is_finite() && fade > 0.0) {
                return Err(RenderError::InvalidSettings(format!(
                    "fade distance must be positive, got {fade}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Columns whose ray hit a wall.
    pub columns_hit: u32,
    /// Sprites with at least one visible column.
    pub sprites_drawn: usize,
}

/// Owns the depth buffer between frames and runs the two render passes.
#[derive(Clone, Debug)]
pub struct Renderer {
    settings: RenderSettings,
    depth: DepthBuffer,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> RenderResult<Self> {
        settings.validate()?;
        debug!(
            "renderer {}x{} (side shading: {}, fade: {:?})",
            settings.screen_width, settings.render_height, settings.side_shading, settings.fade_distance
        );
        Ok(Self { depth: DepthBuffer::new(settings.screen_width as usize), settings })
    }

    #[inline]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Depth buffer as left by the last frame.
    #[inline]
    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Renders one frame. The wall pass fills every column and the depth
    /// buffer before the sprite pass reads it.
    pub fn render<W: PixelWriter>(&mut self, fb: &mut W, scene: &Scene, camera: &Camera) -> FrameStats {
        let columns_hit = render_walls(fb, scene, camera, &self.settings, &mut self.depth);
        let sprites_drawn = render_sprites(fb, camera, scene.sprites(), &self.depth, &self.settings);
        let stats = FrameStats { columns_hit, sprites_drawn };
        trace!("frame: {stats:?}");
        stats
    }
}

/// Clears the view to ceiling/floor, casts one ray per column and records
/// each column's wall distance. Returns the number of columns that hit a wall.
pub fn render_walls<W: PixelWriter>(
    fb: &mut W,
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    depth: &mut DepthBuffer,
) -> u32 {
    let width = settings.screen_width.min(fb.width());
    let half = settings.render_height / 2;
    fb.fill_rows(0, half, settings.ceiling);
    fb.fill_rows(half, settings.render_height, settings.floor);

    depth.reset(settings.screen_width as usize);
    let mut hits = 0;
    for x in 0..width {
        let Some(hit) = cast_column(camera, x, settings.screen_width, &scene.grid) else {
            continue;
        };
        depth.set(x as usize, hit.perp_dist);
        draw_wall_column(fb, x, &hit, camera.pos, scene.walls.for_tile(hit.tile), settings);
        hits += 1;
    }
    hits
}
