// src/lib.rs
//! Tabletop
//!
//! A fixed 3D table scene rendered with wgpu and winit. Every mesh is built
//! procedurally: spheres and tori from their parametric surfaces, the rest
//! from small hardcoded vertex tables.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod wgpu_utils;

pub use app::TabletopApp;
pub use config::AppConfig;
