//! Camera motion: walking, strafing and turning with per-axis wall sliding.
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::core::camera::Camera;
use crate::core::grid::GridMap;

/// Movement speeds, in grid cells and radians per second, and the delay
/// between shots in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub move_speed: f64,
    pub rot_speed: f64,
    pub fire_cooldown: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self { move_speed: 5.4, rot_speed: 1.8, fire_cooldown: 0.5 }
    }
}

/// Locks the fire action for a while after each shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FireCooldown {
    cooldown: f64,
    remaining: f64,
}

impl FireCooldown {
    /// Starts ready to fire. Negative or NaN cooldowns mean no delay.
    pub fn new(cooldown: f64) -> Self {
        Self { cooldown: cooldown.max(0.0), remaining: 0.0 }
    }

    pub fn tick(&mut self, dt: f64) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Takes the shot if the trigger is unlocked and restarts the delay.
    pub fn try_fire(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.remaining = self.cooldown;
        true
    }
}

/// Held controls for one tick. Opposing controls cancel out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionInput {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl MotionInput {
    fn axis(neg: bool, pos: bool) -> f64 {
        match (neg, pos) {
            (false, true) => 1.0,
            (true, false) => -1.0,
            _ => 0.0,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        Self::axis(self.backward, self.forward) != 0.0 || Self::axis(self.strafe_left, self.strafe_right) != 0.0
    }
}

/// Moves the camera by `delta`, one axis at a time.
///
/// X is tried first against the current row, then Y against the (possibly
/// updated) column, so blocked motion along one axis still lets the other
/// axis slide along the wall.
pub fn try_move(camera: &mut Camera, grid: &GridMap, delta: DVec2) {
    let next_x = DVec2::new(camera.pos.x + delta.x, camera.pos.y);
    if grid.is_open_at(next_x) {
        camera.pos.x = next_x.x;
    }
    let next_y = DVec2::new(camera.pos.x, camera.pos.y + delta.y);
    if grid.is_open_at(next_y) {
        camera.pos.y = next_y.y;
    }
}

/// Applies one tick of input scaled by `dt` seconds. Turning happens before
/// moving so the step follows the new heading.
pub fn apply_motion(camera: &mut Camera, grid: &GridMap, input: &MotionInput, config: &MotionConfig, dt: f64) {
    let turn = MotionInput::axis(input.turn_left, input.turn_right);
    if turn != 0.0 {
        camera.rotate(turn * config.rot_speed * dt);
    }

    if !input.is_moving() {
        return;
    }
    let fwd = MotionInput::axis(input.backward, input.forward);
    let strafe = MotionInput::axis(input.strafe_left, input.strafe_right);
    let wish = camera.dir() * fwd + camera.right() * strafe;
    let delta = wish.normalize_or_zero() * config.move_speed * dt;
    try_move(camera, grid, delta);
}
