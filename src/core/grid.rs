//! Tile grid: row-major tile ids, `0` is open floor, anything else is a wall.
use glam::{DVec2, IVec2};
use log::debug;

use crate::{RenderError, RenderResult};

/// Tile identifier. `0` is empty, a positive id selects a wall texture.
pub type Tile = u32;

/// Tile id used to pad ragged rows and to seal generated rooms.
pub const DEFAULT_WALL: Tile = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    /// Tile id drawn as a door, recessed to the middle of its cell.
    door_tile: Option<Tile>,
}

impl GridMap {
    pub fn new(width: usize, height: usize, tiles: Vec<Tile>) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidGrid(format!(
                "grid must be at least 1x1, got {width}x{height}"
            )));
        }
        if tiles.len() != width * height {
            return Err(RenderError::InvalidGrid(format!(
                "expected {} tiles for {width}x{height}, got {}",
                width * height,
                tiles.len()
            )));
        }
        Ok(Self { width, height, tiles, door_tile: None })
    }

    /// Builds a grid from rows (`rows[y][x]`). Short rows are padded with
    /// [`DEFAULT_WALL`] so every row has the width of the longest one.
    pub fn from_rows(rows: &[Vec<Tile>]) -> RenderResult<Self> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(RenderError::InvalidGrid("grid has no tiles".to_string()));
        }
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.len() < width {
                debug!("padding grid row {y} from {} to {width} tiles", row.len());
            }
            tiles.extend_from_slice(row);
            tiles.extend(std::iter::repeat_n(DEFAULT_WALL, width - row.len()));
        }
        Self::new(width, rows.len(), tiles)
    }

    /// Empty room of the given size enclosed by [`DEFAULT_WALL`] tiles.
    pub fn room(width: usize, height: usize) -> RenderResult<Self> {
        let mut tiles = vec![0; width * height];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    tiles[y * width + x] = DEFAULT_WALL;
                }
            }
        }
        Self::new(width, height, tiles)
    }

    /// Returns the grid with one tile replaced. Out-of-range cells are ignored.
    pub fn with_tile(mut self, x: usize, y: usize, tile: Tile) -> Self {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = tile;
        }
        self
    }

    /// Marks `tile` as the door tile. `Some(0)` is ignored since open floor
    /// can never be hit.
    pub fn with_door_tile(mut self, tile: Option<Tile>) -> Self {
        self.door_tile = tile.filter(|&t| t != 0);
        self
    }

    #[inline]
    pub fn door_tile(&self) -> Option<Tile> {
        self.door_tile
    }

    /// Whether `cell` holds the door tile. Cells outside the grid are not doors.
    #[inline]
    pub fn is_door(&self, cell: IVec2) -> bool {
        self.door_tile.is_some_and(|door| self.get(cell) == Some(door))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    /// Tile at `cell`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, cell: IVec2) -> Option<Tile> {
        if self.contains(cell) {
            Some(self.tiles[cell.y as usize * self.width + cell.x as usize])
        } else {
            None
        }
    }

    /// Cells outside the grid count as solid.
    #[inline]
    pub fn is_solid(&self, cell: IVec2) -> bool {
        self.get(cell).is_none_or(|t| t != 0)
    }

    /// Whether a world-space point lies in an open cell.
    #[inline]
    pub fn is_open_at(&self, pos: DVec2) -> bool {
        !self.is_solid(cell_of(pos))
    }

    /// Whether every border cell is solid, so no ray can leave the grid.
    pub fn is_sealed(&self) -> bool {
        let (w, h) = (self.width as i32, self.height as i32);
        let top_bottom = (0..w).all(|x| self.is_solid(IVec2::new(x, 0)) && self.is_solid(IVec2::new(x, h - 1)));
        let sides = (0..h).all(|y| self.is_solid(IVec2::new(0, y)) && self.is_solid(IVec2::new(w - 1, y)));
        top_bottom && sides
    }

    /// Distinct tile ids present in the grid, ascending.
    pub fn tile_ids(&self) -> Vec<Tile> {
        let mut ids = self.tiles.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Upper bound on DDA steps for any ray that starts inside the grid.
    #[inline]
    pub fn max_traversal_steps(&self) -> usize {
        self.width + self.height
    }
}

/// Grid cell containing a world-space point.
#[inline]
pub fn cell_of(pos: DVec2) -> IVec2 {
    IVec2::new(pos.x.floor() as i32, pos.y.floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_is_sealed_and_hollow() {
        let grid = GridMap::room(5, 4).unwrap();
        assert!(grid.is_sealed());
        assert_eq!(grid.get(IVec2::new(2, 2)), Some(0));
        assert_eq!(grid.get(IVec2::new(4, 3)), Some(DEFAULT_WALL));
    }

    #[test]
    fn outside_cells_are_solid() {
        let grid = GridMap::room(3, 3).unwrap();
        assert_eq!(grid.get(IVec2::new(-1, 0)), None);
        assert!(grid.is_solid(IVec2::new(3, 1)));
        assert!(grid.is_open_at(DVec2::new(1.5, 1.5)));
    }

    #[test]
    fn ragged_rows_are_padded_with_walls() {
        let grid = GridMap::from_rows(&[vec![1, 1, 1], vec![1, 0], vec![1, 1, 1]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.get(IVec2::new(2, 1)), Some(DEFAULT_WALL));
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(GridMap::from_rows(&[]), Err(RenderError::InvalidGrid(_))));
        assert!(GridMap::new(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn door_tile_is_opt_in() {
        let grid = GridMap::room(5, 5).unwrap().with_tile(2, 2, 9);
        assert!(!grid.is_door(IVec2::new(2, 2)));

        let grid = grid.with_door_tile(Some(9));
        assert!(grid.is_door(IVec2::new(2, 2)));
        assert!(!grid.is_door(IVec2::new(0, 0)));
        assert!(!grid.is_door(IVec2::new(-1, 2)));
        assert_eq!(grid.clone().with_door_tile(Some(0)).door_tile(), None);
    }

    #[test]
    fn open_border_is_not_sealed() {
        let grid = GridMap::room(4, 4).unwrap().with_tile(0, 2, 0);
        assert!(!grid.is_sealed());
    }
}
