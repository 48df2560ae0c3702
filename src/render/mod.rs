//! Rendering: software framebuffer, textures and the raycasting passes.
//!
//! Re-exports:
//! - `color`: RGBA colour and channel operations
//! - `framebuffer`: CPU framebuffer and the `PixelWriter` sink trait
//! - `textures`: Square textures, wall texture table, procedural textures
//! - `casters`: DDA ray traversal, column casting and hitscan
//! - `walls`: Wall texture mapping and shading
//! - `depth`: Per-column depth buffer
//! - `sprites`: Sprite projection and compositing (sorted, occluded)
//! - `render3d`: Frame renderer tying the passes together

pub mod casters;
pub mod color;
pub mod depth;
pub mod framebuffer;
pub mod render3d;
pub mod sprites;
pub mod textures;
pub mod walls;
