//! Core world types (grid, camera, sprites) and camera motion.
//!
//! Re-exports:
//! - `grid`: Tile grid and passability
//! - `camera`: Camera pose and rotation
//! - `sprite`: Sprite placement
//! - `scene`: Per-frame world state handed to the renderer
//! - `process_events`: Movement and turning with wall sliding

pub mod camera;
pub mod grid;
pub mod process_events;
pub mod scene;
pub mod sprite;
