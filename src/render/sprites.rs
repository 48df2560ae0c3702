//! Sprite compositing (billboards, far-to-near, occluded per column).
//!
//! Exposes:
//! - `sprite_draw_order`: painter's order, farthest sprite first
//! - `project_sprite`: camera-space transform and screen rectangle
//! - `draw_sprite`: one billboard against the depth buffer
//! - `render_sprites`: sort and draw a whole sprite list
use glam::DVec2;

use crate::core::camera::Camera;
use crate::core::sprite::Sprite;
use crate::render::depth::DepthBuffer;
use crate::render::framebuffer::PixelWriter;
use crate::render::render3d::RenderSettings;
use crate::render::textures::Texture;

/// Bound on projected coordinates so the rectangle maths cannot overflow.
const SCREEN_LIMIT: i64 = 1 << 30;

/// Screen-space footprint of a sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteProjection {
    /// Lateral offset (x) and depth along the view axis (y).
    pub transform: DVec2,
    /// Centre column; may lie off screen.
    pub screen_x: i64,
    /// Side length of the square billboard in pixels.
    pub size: i64,
}

impl SpriteProjection {
    #[inline]
    pub fn depth(&self) -> f64 {
        self.transform.y
    }

    #[inline]
    pub fn left(&self) -> i64 {
        self.screen_x - self.size / 2
    }
}

/// Indices of `sprites`, farthest from the camera first.
///
/// Squared distances are sorted ascending with a stable sort and then read
/// back to front.
pub fn sprite_draw_order(camera: &Camera, sprites: &[Sprite]) -> Vec<usize> {
    let mut by_dist: Vec<(f64, usize)> = sprites
        .iter()
        .enumerate()
        .map(|(i, s)| (s.distance_sq(camera.pos), i))
        .collect();
    by_dist.sort_by(|a, b| a.0.total_cmp(&b.0));
    by_dist.into_iter().rev().map(|(_, i)| i).collect()
}

/// `pos` in camera space: inverse of the `[plane | dir]` basis applied to the
/// offset from the camera. `None` for a degenerate basis.
pub fn camera_space(camera: &Camera, pos: DVec2) -> Option<DVec2> {
    let (dir, plane) = (camera.dir(), camera.plane());
    let det = plane.x * dir.y - dir.x * plane.y;
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inv_det = 1.0 / det;
    let rel = pos - camera.pos;
    let t = DVec2::new(
        inv_det * (dir.y * rel.x - dir.x * rel.y),
        inv_det * (-plane.y * rel.x + plane.x * rel.y),
    );
    t.is_finite().then_some(t)
}

/// Projects a sprite at `pos`. `None` when it is at or behind the camera
/// plane, or too small to cover a pixel.
pub fn project_sprite(camera: &Camera, pos: DVec2, screen_width: u32, render_height: u32) -> Option<SpriteProjection> {
    let transform = camera_space(camera, pos)?;
    if transform.y <= 0.0 {
        return None;
    }
    let half_w = (screen_width / 2) as f64;
    let screen_x = (half_w * (1.0 + transform.x / transform.y)) as i64;
    let size = (render_height as f64 / transform.y).abs() as i64;
    if size <= 0 {
        return None;
    }
    Some(SpriteProjection {
        transform,
        screen_x: screen_x.clamp(-SCREEN_LIMIT, SCREEN_LIMIT),
        size: size.min(SCREEN_LIMIT),
    })
}

/// Draws one projected sprite. A column is only touched when the sprite is
/// strictly nearer than the wall recorded in `depth`; texels matching the
/// transparent key are skipped. Returns the number of columns drawn.
pub fn draw_sprite<W: PixelWriter>(
    fb: &mut W,
    proj: &SpriteProjection,
    texture: &Texture,
    depth: &DepthBuffer,
    settings: &RenderSettings,
) -> u32 {
    let screen_w = settings.screen_width.min(fb.width()) as i64;
    let render_h = settings.render_height.min(fb.height()) as i64;
    let tex_size = texture.size() as i64;

    let left = proj.left();
    let top = settings.render_height as i64 / 2 - proj.size / 2;
    let (x0, x1) = (left.max(0), (left + proj.size).min(screen_w));
    let (y0, y1) = (top.max(0), (top + proj.size).min(render_h));

    let mut columns = 0;
    for stripe in x0..x1 {
        if proj.depth() >= depth.get(stripe as usize) {
            continue;
        }
        let tex_x = ((stripe - left) * tex_size / proj.size).min(tex_size - 1) as u32;
        for y in y0..y1 {
            let tex_y = ((y - top) * tex_size / proj.size).min(tex_size - 1) as u32;
            let color = texture.sample(tex_x, tex_y);
            if color.same_rgb(settings.transparent_key) {
                continue;
            }
            fb.set_pixel(stripe as u32, y as u32, color);
        }
        columns += 1;
    }
    columns
}

/// Composites every sprite over the wall pass, farthest first, so nearer
/// sprites overwrite farther ones. Returns how many sprites had at least one
/// visible column.
pub fn render_sprites<W: PixelWriter>(
    fb: &mut W,
    camera: &Camera,
    sprites: &[Sprite],
    depth: &DepthBuffer,
    settings: &RenderSettings,
) -> usize {
    let mut drawn = 0;
    for index in sprite_draw_order(camera, sprites) {
        let sprite = &sprites[index];
        let Some(proj) = project_sprite(camera, sprite.pos, settings.screen_width, settings.render_height) else {
            continue;
        };
        if draw_sprite(fb, &proj, &sprite.texture, depth, settings) > 0 {
            drawn += 1;
        }
    }
    drawn
}
