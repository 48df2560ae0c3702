use glam::DVec2;

use crate::{RenderError, RenderResult};

/// Plane length giving the classic ~66° horizontal field of view.
pub const DEFAULT_PLANE_LENGTH: f64 = 0.66;

/// Viewer pose: position in grid units, facing direction and camera plane.
///
/// `plane` is always perpendicular to `dir` and points to the right-hand edge
/// of the screen; its length relative to `dir` sets the field of view. The two
/// vectors only ever change together through [`Camera::rotate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: DVec2,
    dir: DVec2,
    plane: DVec2,
}

impl Camera {
    /// Camera at `pos` looking along `dir` (normalised) with a plane of
    /// `plane_length`.
    pub fn new(pos: DVec2, dir: DVec2, plane_length: f64) -> RenderResult<Self> {
        if !pos.is_finite() {
            return Err(RenderError::InvalidCamera(format!("position {pos} is not finite")));
        }
        let dir = dir.try_normalize().ok_or_else(|| {
            RenderError::InvalidCamera(format!("direction {dir} has no length"))
        })?;
        if !(plane_length.is_finite() && plane_length > 0.0) {
            return Err(RenderError::InvalidCamera(format!(
                "plane length must be positive, got {plane_length}"
            )));
        }
        Ok(Self { pos, dir, plane: dir.perp() * plane_length })
    }

    /// Camera with a horizontal field of view given in degrees.
    pub fn with_fov_degrees(pos: DVec2, dir: DVec2, fov_deg: f64) -> RenderResult<Self> {
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            return Err(RenderError::InvalidCamera(format!(
                "field of view must be in (0, 180) degrees, got {fov_deg}"
            )));
        }
        Self::new(pos, dir, (fov_deg.to_radians() * 0.5).tan())
    }

    #[inline]
    pub fn dir(&self) -> DVec2 {
        self.dir
    }

    #[inline]
    pub fn plane(&self) -> DVec2 {
        self.plane
    }

    /// Horizontal field of view in radians.
    pub fn fov(&self) -> f64 {
        2.0 * (self.plane.length() / self.dir.length()).atan()
    }

    /// Rotates direction and plane together. Positive angles turn toward the
    /// plane side (to the right on screen).
    pub fn rotate(&mut self, angle: f64) {
        let (s, c) = angle.sin_cos();
        let rot = |v: DVec2| DVec2::new(v.x * c - v.y * s, v.x * s + v.y * c);
        self.dir = rot(self.dir);
        self.plane = rot(self.plane);
    }

    /// Unit vector pointing to the right of the facing direction.
    #[inline]
    pub fn right(&self) -> DVec2 {
        self.dir.perp().normalize_or_zero()
    }

    /// Ray direction for `screen_x` of a `screen_width`-column screen.
    #[inline]
    pub fn ray_dir(&self, screen_x: u32, screen_width: u32) -> DVec2 {
        let camera_x = 2.0 * screen_x as f64 / screen_width as f64 - 1.0;
        self.dir + self.plane * camera_x
    }
}
