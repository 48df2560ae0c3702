//! Grid ray traversal (DDA), per-column wall casting and hitscan.
use glam::{DVec2, IVec2};

use crate::core::camera::Camera;
use crate::core::grid::{GridMap, Tile, cell_of};
use crate::core::sprite::Sprite;
use crate::render::sprites::camera_space;

/// Delta distance used for an axis the ray never crosses.
const NO_CROSSING: f64 = 1e30;

/// Grid-line axis crossed by the last step of a ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Stepped along x, i.e. crossed a vertical grid line.
    X = 0,
    /// Stepped along y, i.e. crossed a horizontal grid line.
    Y = 1,
}

/// Wall hit for one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub tile: Tile,
    pub side: Side,
    /// Distance projected on the camera's forward axis.
    pub perp_dist: f64,
    pub ray_dir: DVec2,
    pub cell: IVec2,
}

/// Incremental traversal of the cells a ray passes through.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub dir: DVec2,
    pub cell: IVec2,
    side_dist: DVec2,
    delta_dist: DVec2,
    step: IVec2,
}

impl Ray {
    pub fn new(origin: DVec2, dir: DVec2) -> Self {
        let cell = cell_of(origin);
        let delta = |d: f64| if d == 0.0 { NO_CROSSING } else { (1.0 / d).abs() };
        let delta_dist = DVec2::new(delta(dir.x), delta(dir.y));

        let (step_x, side_x) = if dir.x < 0.0 {
            (-1, (origin.x - cell.x as f64) * delta_dist.x)
        } else {
            (1, (cell.x as f64 + 1.0 - origin.x) * delta_dist.x)
        };
        let (step_y, side_y) = if dir.y < 0.0 {
            (-1, (origin.y - cell.y as f64) * delta_dist.y)
        } else {
            (1, (cell.y as f64 + 1.0 - origin.y) * delta_dist.y)
        };

        Self {
            dir,
            cell,
            side_dist: DVec2::new(side_x, side_y),
            delta_dist,
            step: IVec2::new(step_x, step_y),
        }
    }

    /// Moves into the next cell. Y is taken only when strictly closer, so
    /// ties step along X.
    #[inline]
    pub fn advance(&mut self) -> Side {
        if self.side_dist.y < self.side_dist.x {
            self.side_dist.y += self.delta_dist.y;
            self.cell.y += self.step.y;
            Side::Y
        } else {
            self.side_dist.x += self.delta_dist.x;
            self.cell.x += self.step.x;
            Side::X
        }
    }

    /// Perpendicular distance to the grid line crossed by the last step.
    #[inline]
    pub fn perp_dist(&self, side: Side) -> f64 {
        match side {
            Side::X => self.side_dist.x - self.delta_dist.x,
            Side::Y => self.side_dist.y - self.delta_dist.y,
        }
    }

    /// Distance to a door face in the current cell.
    ///
    /// A lone door sits half a cell behind the grid line the ray crossed; a
    /// door backed by another door is drawn flush. `None` when the ray leaves
    /// the cell through its other axis before reaching the recessed face.
    fn door_dist(&self, grid: &GridMap, side: Side) -> Option<f64> {
        let (beyond, crossed, half, other) = match side {
            Side::X => (
                self.cell + IVec2::new(self.step.x, 0),
                self.side_dist.x,
                self.delta_dist.x * 0.5,
                self.side_dist.y,
            ),
            Side::Y => (
                self.cell + IVec2::new(0, self.step.y),
                self.side_dist.y,
                self.delta_dist.y * 0.5,
                self.side_dist.x,
            ),
        };
        if grid.is_door(beyond) {
            return Some(self.perp_dist(side));
        }
        let recessed = crossed - half;
        (recessed <= other).then_some(recessed)
    }
}

/// Hit for the solid `tile` the ray just entered, or `None` if it slips past
/// a recessed door.
fn solid_hit(grid: &GridMap, ray: &Ray, tile: Tile, side: Side) -> Option<Hit> {
    let perp_dist = if grid.is_door(ray.cell) { ray.door_dist(grid, side)? } else { ray.perp_dist(side) };
    Some(Hit { tile, side, perp_dist, ray_dir: ray.dir, cell: ray.cell })
}

/// Steps `ray` until it hits a solid cell. Leaving the grid or exceeding
/// `grid.max_traversal_steps()` counts as no hit.
fn trace(grid: &GridMap, mut ray: Ray) -> Option<Hit> {
    for _ in 0..grid.max_traversal_steps() {
        let side = ray.advance();
        let tile = grid.get(ray.cell)?;
        if tile == 0 {
            continue;
        }
        if let Some(hit) = solid_hit(grid, &ray, tile, side) {
            return Some(hit);
        }
    }
    None
}

/// Casts the ray for `screen_x` and returns the first wall it hits.
pub fn cast_column(camera: &Camera, screen_x: u32, screen_width: u32, grid: &GridMap) -> Option<Hit> {
    trace(grid, Ray::new(camera.pos, camera.ray_dir(screen_x, screen_width)))
}

/// First thing on the camera's line of fire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitscanTarget {
    /// Index into the sprite slice.
    Sprite(usize),
    Wall(Hit),
    Nothing,
}

/// Sprite in `cell` nearest the camera, among those accepted by `keep`.
fn nearest_in_cell(
    camera: &Camera,
    sprites: &[Sprite],
    cell: IVec2,
    keep: impl Fn(&Sprite) -> bool,
) -> Option<usize> {
    sprites
        .iter()
        .enumerate()
        .filter(|(_, s)| cell_of(s.pos) == cell && keep(s))
        .min_by(|(_, a), (_, b)| a.distance_sq(camera.pos).total_cmp(&b.distance_sq(camera.pos)))
        .map(|(i, _)| i)
}

/// Walks the grid along the facing direction and reports the first sprite
/// whose cell is entered before a wall. When several sprites share that cell
/// the one nearest the camera wins. In the camera's own cell only sprites in
/// front of the camera count.
pub fn hitscan(camera: &Camera, grid: &GridMap, sprites: &[Sprite]) -> HitscanTarget {
    let mut ray = Ray::new(camera.pos, camera.dir());
    let ahead = |s: &Sprite| camera_space(camera, s.pos).is_some_and(|t| t.y > 0.0);
    if let Some(index) = nearest_in_cell(camera, sprites, ray.cell, ahead) {
        return HitscanTarget::Sprite(index);
    }
    for _ in 0..grid.max_traversal_steps() {
        let side = ray.advance();
        let Some(tile) = grid.get(ray.cell) else {
            return HitscanTarget::Nothing;
        };
        if let Some(index) = nearest_in_cell(camera, sprites, ray.cell, |_| true) {
            return HitscanTarget::Sprite(index);
        }
        if tile != 0 {
            if let Some(hit) = solid_hit(grid, &ray, tile, side) {
                return HitscanTarget::Wall(hit);
            }
        }
    }
    HitscanTarget::Nothing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::color::Color;
    use crate::render::textures::Texture;
    use std::sync::Arc;

    fn camera(x: f64, y: f64, dir: DVec2) -> Camera {
        Camera::new(DVec2::new(x, y), dir, 0.66).unwrap()
    }

    #[test]
    fn axis_ray_has_no_fisheye() {
        let grid = GridMap::room(10, 10).unwrap();
        let cam = camera(3.5, 4.5, DVec2::X);
        let hit = cast_column(&cam, 320, 640, &grid).unwrap();
        assert_eq!(hit.cell, IVec2::new(9, 4));
        assert!((hit.perp_dist - 5.5).abs() < 1e-12);
    }

    #[test]
    fn side_tracks_crossed_axis() {
        let grid = GridMap::room(10, 10).unwrap();
        assert_eq!(cast_column(&camera(4.5, 4.5, DVec2::X), 4, 8, &grid).unwrap().side, Side::X);
        assert_eq!(cast_column(&camera(4.5, 4.5, DVec2::Y), 4, 8, &grid).unwrap().side, Side::Y);
        assert_eq!(cast_column(&camera(4.5, 4.5, -DVec2::Y), 4, 8, &grid).unwrap().side, Side::Y);
    }

    #[test]
    fn edge_columns_are_projected_not_euclidean() {
        let grid = GridMap::room(20, 40).unwrap();
        let cam = camera(5.5, 20.5, DVec2::X);
        // Flat wall at x = 19: every column sees the same perpendicular distance.
        for x in [0, 100, 320, 500, 639] {
            let hit = cast_column(&cam, x, 640, &grid).unwrap();
            assert_eq!(hit.side, Side::X);
            assert!((hit.perp_dist - 13.5).abs() < 1e-9, "column {x}: {}", hit.perp_dist);
        }
    }

    #[test]
    fn diagonal_tie_steps_x_first() {
        let mut ray = Ray::new(DVec2::new(0.5, 0.5), DVec2::new(1.0, 1.0));
        assert_eq!(ray.advance(), Side::X);
        assert_eq!(ray.advance(), Side::Y);
    }

    #[test]
    fn open_map_gives_no_hit() {
        let grid = GridMap::new(4, 4, vec![0; 16]).unwrap();
        assert!(cast_column(&camera(1.5, 1.5, DVec2::X), 2, 4, &grid).is_none());
    }

    #[test]
    fn hitscan_prefers_sprite_in_front_of_wall() {
        let grid = GridMap::room(10, 10).unwrap();
        let tex = Arc::new(Texture::solid(4, Color::WHITE));
        let sprites = vec![Sprite::at_cell(6, 2, tex.clone()), Sprite::at_cell(5, 4, tex)];
        let cam = camera(2.5, 4.5, DVec2::X);
        assert_eq!(hitscan(&cam, &grid, &sprites), HitscanTarget::Sprite(1));

        let behind = camera(7.5, 4.5, DVec2::X);
        assert!(matches!(hitscan(&behind, &grid, &sprites), HitscanTarget::Wall(Hit { tile: 1, .. })));
    }

    #[test]
    fn lone_door_is_recessed_half_a_cell() {
        let grid = GridMap::room(10, 10).unwrap().with_tile(6, 4, 9);
        let cam = camera(3.5, 4.5, DVec2::X);
        let flush = cast_column(&cam, 4, 8, &grid).unwrap();
        assert!((flush.perp_dist - 2.5).abs() < 1e-12);

        let grid = grid.with_door_tile(Some(9));
        let hit = cast_column(&cam, 4, 8, &grid).unwrap();
        assert_eq!((hit.tile, hit.cell), (9, IVec2::new(6, 4)));
        assert!((hit.perp_dist - 3.0).abs() < 1e-12, "door at {}", hit.perp_dist);
    }

    #[test]
    fn double_door_is_drawn_flush() {
        let grid = GridMap::room(10, 10).unwrap().with_tile(6, 4, 9).with_tile(7, 4, 9).with_door_tile(Some(9));
        let hit = cast_column(&camera(3.5, 4.5, DVec2::X), 4, 8, &grid).unwrap();
        assert!((hit.perp_dist - 2.5).abs() < 1e-12);
    }

    #[test]
    fn steep_ray_slips_past_recessed_door() {
        let grid = GridMap::room(10, 10).unwrap().with_tile(6, 4, 9).with_door_tile(Some(9));
        let shallow = trace(&grid, Ray::new(DVec2::new(5.5, 4.5), DVec2::new(1.0, 0.2))).unwrap();
        assert_eq!(shallow.cell, IVec2::new(6, 4));
        assert!((shallow.perp_dist - 1.0).abs() < 1e-12);

        // Leaves the door cell through y = 5 before reaching x = 6.5.
        let steep = trace(&grid, Ray::new(DVec2::new(5.5, 4.5), DVec2::new(1.0, 0.8))).unwrap();
        assert_ne!(steep.cell, IVec2::new(6, 4));
        assert_eq!(steep.tile, 1);
    }

    #[test]
    fn hitscan_sees_sprite_in_own_cell() {
        let grid = GridMap::room(10, 10).unwrap();
        let tex = Arc::new(Texture::solid(4, Color::WHITE));
        let cam = camera(2.1, 2.5, DVec2::X);

        let ahead = vec![Sprite::new(DVec2::new(2.8, 2.5), tex.clone())];
        assert_eq!(hitscan(&cam, &grid, &ahead), HitscanTarget::Sprite(0));

        let behind = vec![Sprite::new(DVec2::new(2.05, 2.5), tex)];
        assert!(matches!(hitscan(&cam, &grid, &behind), HitscanTarget::Wall(Hit { tile: 1, .. })));
    }

    #[test]
    fn hitscan_stops_at_recessed_door() {
        let grid = GridMap::room(10, 10).unwrap().with_tile(6, 4, 9).with_door_tile(Some(9));
        match hitscan(&camera(3.5, 4.5, DVec2::X), &grid, &[]) {
            HitscanTarget::Wall(hit) => assert!((hit.perp_dist - 3.0).abs() < 1e-12),
            other => panic!("expected the door, got {other:?}"),
        }
    }
}
