//! # Raycast Renderer
//!
//! Grid-based raycasting renderer. Given a tile grid, a camera and a set of
//! wall/sprite textures, it projects the scene into a pixel buffer once per
//! frame.
//!
//! ## Frame pipeline
//!
//! - **Wall pass**: one DDA ray per screen column ([`cast_column`]), textured
//!   and shaded into the column, perpendicular distance stored in the
//!   [`DepthBuffer`].
//! - **Sprite pass**: sprites sorted far-to-near and drawn column by column,
//!   occluded against the depth buffer ([`render_sprites`]).
//!
//! Windowing, input and asset decoding stay outside the core: pixels leave
//! through the [`PixelWriter`] trait and the camera is moved by
//! [`core::process_events`].

pub mod config;
pub mod core;
pub mod render;

pub use config::{CameraConfig, SceneConfig, SpritePlacement, TextureSource};
pub use core::camera::Camera;
pub use core::grid::{GridMap, Tile};
pub use core::process_events::{FireCooldown, MotionConfig, MotionInput, apply_motion};
pub use core::scene::Scene;
pub use core::sprite::Sprite;
pub use render::casters::{Hit, HitscanTarget, Side, cast_column, hitscan};
pub use render::color::Color;
pub use render::depth::DepthBuffer;
pub use render::framebuffer::{Framebuffer, PixelWriter};
pub use render::render3d::{FrameStats, RenderSettings, Renderer};
pub use render::sprites::render_sprites;
pub use render::textures::{Texture, WallTextures};

/// Errors raised while building a scene or its resources.
///
/// Everything here surfaces before the first frame; rendering itself never
/// fails.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene file could not be parsed
    #[error("Scene file error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Tile grid is empty or ragged
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Texture data is unusable
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    /// A placement refers to a texture that was never loaded
    #[error("Missing {kind} texture {index}")]
    MissingTexture { kind: &'static str, index: usize },

    /// Camera pose is degenerate or outside the grid
    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    /// Render dimensions are unusable
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),
}

/// Result type used throughout the crate.
pub type RenderResult<T> = Result<T, RenderError>;
