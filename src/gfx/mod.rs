//! # Graphics Module
//!
//! Everything between the scene description and the pixels: procedural
//! geometry, the fly camera, GPU resources and the render engine.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - sphere, torus and hardcoded primitive meshes
//! - **Camera System** ([`camera`]) - yaw/pitch fly camera with keyboard and mouse control
//! - **Scene Management** ([`scene`]) - scene objects, transforms and GPU mesh handles
//! - **Resource Management** ([`resources`]) - textures and global uniforms
//! - **Rendering Pipeline** ([`rendering`]) - textured Phong and flat light pipelines
//!
//! ## Usage
//!
//! ```no_run
//! use tabletop::gfx::{geometry::build_sphere, geometry::SphereConfig};
//!
//! let sphere = build_sphere(SphereConfig::new(15, 16)).unwrap();
//! assert_eq!(sphere.vertex_count(), 242);
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::fly_camera::FlyCamera;
pub use rendering::render_engine::RenderEngine;
