//! Error types for geometry generation, texture loading and GPU setup.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected primitive configuration.
///
/// Raised before any vertex is generated, so a failed build never leaves
/// partially stitched geometry behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("sphere needs at least 2 rings, got {0}")]
    TooFewRings(u32),

    #[error("{shape} needs at least 3 segments per {axis}, got {count}")]
    TooFewSegments {
        shape: &'static str,
        axis: &'static str,
        count: u32,
    },

    #[error("{shape} with {first}x{second} segments needs more than u32::MAX vertices or indices")]
    TooLarge {
        shape: &'static str,
        first: u32,
        second: u32,
    },

    #[error("torus {which} radius must be positive and finite, got {value}")]
    InvalidRadius { which: &'static str, value: f32 },

    #[error("torus main radius {main} must exceed tube radius {tube}")]
    SelfIntersectingTorus { main: f32, tube: f32 },
}

/// Failure to turn an image file into a GPU texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture {path} has zero size ({width}x{height})")]
    Empty {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

/// Failure while creating the GPU context or loading the scene onto it.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("pipeline '{0}' failed to build: {1}")]
    Pipeline(String, String),

    #[error("failed to acquire the next frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Scene description that refers to something it does not contain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("object '{object}' uses texture {index}, but the scene has {available}")]
    UnknownTexture {
        object: String,
        index: usize,
        available: usize,
    },
}
