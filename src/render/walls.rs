//! Wall texturing: maps a column hit to texel coordinates and paints the
//! stretched, shaded wall slice.
use glam::DVec2;

use crate::render::casters::{Hit, Side};
use crate::render::color::Color;
use crate::render::framebuffer::PixelWriter;
use crate::render::render3d::RenderSettings;
use crate::render::textures::Texture;

/// Distances below this are treated as this, keeping projections finite when
/// the camera stands exactly on a wall face.
const MIN_PERP_DIST: f64 = 1e-4;

/// Fraction in `[0, 1)` across the wall face where the ray landed.
#[inline]
pub fn wall_x(hit: &Hit, camera_pos: DVec2) -> f64 {
    let dist = hit.perp_dist.max(0.0);
    let along = match hit.side {
        Side::X => camera_pos.y + dist * hit.ray_dir.y,
        Side::Y => camera_pos.x + dist * hit.ray_dir.x,
    };
    along - along.floor()
}

/// Texture column for a wall coordinate; always in `[0, size)`, whatever the
/// magnitude of `wall_x`.
#[inline]
pub fn texture_column(wall_x: f64, size: u32) -> u32 {
    if !wall_x.is_finite() || size == 0 {
        return 0;
    }
    let frac = wall_x - wall_x.floor();
    ((frac * size as f64).floor() as i64).rem_euclid(size as i64) as u32
}

/// On-screen height in pixels of a wall at `perp_dist`.
#[inline]
pub fn line_height(render_height: u32, perp_dist: f64) -> i64 {
    let dist = if perp_dist.is_finite() { perp_dist.max(MIN_PERP_DIST) } else { f64::MAX };
    (render_height as f64 / dist) as i64
}

/// Applies side darkening and distance fade.
#[inline]
pub fn shade(color: Color, side: Side, perp_dist: f64, settings: &RenderSettings) -> Color {
    let mut c = color;
    if settings.side_shading && side == Side::Y {
        c = c.halved();
    }
    if let Some(fade) = settings.fade_distance.filter(|f| *f > 0.0) {
        c = c.scaled(1.0 - perp_dist / fade);
    }
    c
}

/// Paints the wall slice for `hit` into column `screen_x`. Returns the
/// number of rows written.
pub fn draw_wall_column<W: PixelWriter>(
    fb: &mut W,
    screen_x: u32,
    hit: &Hit,
    camera_pos: DVec2,
    texture: &Texture,
    settings: &RenderSettings,
) -> u32 {
    let render_height = settings.render_height.min(fb.height());
    let line_h = line_height(settings.render_height, hit.perp_dist);
    if line_h <= 0 {
        return 0;
    }
    let size = texture.size();
    let tex_x = texture_column(wall_x(hit, camera_pos), size);
    let vertical_scale = line_h as f64 / size as f64;

    let top = settings.render_height as i64 / 2 - line_h / 2;
    let start = top.max(0);
    let end = (top + line_h).min(render_height as i64);
    for y in start..end {
        let offset = (y - top) as f64;
        let tex_y = ((offset / vertical_scale).floor() as u32).min(size - 1);
        let color = shade(texture.sample(tex_x, tex_y), hit.side, hit.perp_dist, settings);
        fb.set_pixel(screen_x, y as u32, color);
    }
    (end - start).max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::Framebuffer;
    use glam::IVec2;

    fn hit(side: Side, perp_dist: f64, ray_dir: DVec2) -> Hit {
        Hit { tile: 1, side, perp_dist, ray_dir, cell: IVec2::ZERO }
    }

    #[test]
    fn texture_column_wraps_large_coordinates() {
        assert_eq!(texture_column(5.25, 64), 16);
        assert_eq!(texture_column(-0.25, 64), 48);
        assert_eq!(texture_column(1e12 + 0.5, 64), 32);
        assert_eq!(texture_column(f64::NAN, 64), 0);
    }

    #[test]
    fn wall_x_uses_cross_axis() {
        let pos = DVec2::new(2.5, 3.25);
        assert!((wall_x(&hit(Side::X, 2.0, DVec2::new(1.0, 0.25)), pos) - 0.75).abs() < 1e-12);
        assert!((wall_x(&hit(Side::Y, 2.0, DVec2::new(0.25, 1.0)), pos) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn doubling_distance_halves_height() {
        assert_eq!(line_height(480, 2.0), 240);
        assert_eq!(line_height(480, 4.0), 120);
        assert!(line_height(480, 0.0) > 1_000_000);
        assert_eq!(line_height(480, f64::INFINITY), 0);
    }

    #[test]
    fn y_side_is_darker() {
        let settings = RenderSettings::default();
        let c = Color::rgb(200, 100, 50);
        assert_eq!(shade(c, Side::X, 1.0, &settings), c);
        assert_eq!(shade(c, Side::Y, 1.0, &settings), Color::rgb(100, 50, 25));
    }

    #[test]
    fn fade_clamps_at_black() {
        let settings = RenderSettings { fade_distance: Some(10.0), ..RenderSettings::default() };
        assert_eq!(shade(Color::WHITE, Side::X, 25.0, &settings), Color::BLACK);
        assert_eq!(shade(Color::rgb(200, 200, 200), Side::X, 5.0, &settings), Color::rgb(100, 100, 100));
    }

    #[test]
    fn near_wall_fills_whole_column_with_texture_rows_in_order() {
        let settings = RenderSettings { screen_width: 1, render_height: 8, ..RenderSettings::default() };
        let mut fb = Framebuffer::new(1, 8);
        let tex = Texture::from_fn(4, |_, y| Color::rgb(10 * (y as u8 + 1), 0, 0));
        let h = hit(Side::X, 0.5, DVec2::X);
        // Line height 16 centred on an 8-row screen: rows 4..12 of the slice.
        assert_eq!(draw_wall_column(&mut fb, 0, &h, DVec2::new(0.5, 0.5), &tex, &settings), 8);
        let reds: Vec<u8> = fb.column(0).iter().map(|c| c.r).collect();
        assert_eq!(reds, vec![20, 20, 20, 20, 30, 30, 30, 30]);
    }

    #[test]
    fn far_wall_is_centred() {
        let settings = RenderSettings { screen_width: 1, render_height: 8, ..RenderSettings::default() };
        let mut fb = Framebuffer::new(1, 8);
        let tex = Texture::solid(4, Color::WHITE);
        let h = hit(Side::X, 4.0, DVec2::X);
        assert_eq!(draw_wall_column(&mut fb, 0, &h, DVec2::ZERO, &tex, &settings), 2);
        let col = fb.column(0);
        assert_eq!(col[3], Color::WHITE);
        assert_eq!(col[4], Color::WHITE);
        assert_eq!(col[2], Color::BLACK);
        assert_eq!(col[5], Color::BLACK);
    }
}
