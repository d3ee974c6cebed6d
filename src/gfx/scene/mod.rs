//! # Scene Management Module
//!
//! The data-driven description of what gets drawn: a list of
//! [`SceneObject`]s, each naming a shared mesh, an optional texture, a
//! transform and the pipeline that shades it.
//!
//! ## Key Components
//!
//! - [`Scene`] - objects, texture list and the camera
//! - [`SceneObject`] - one drawable with its [`Transform`] and [`Shading`]
//! - [`GpuMesh`] - owning handle to a mesh's vertex and index buffers
//! - [`Vertex3D`] - interleaved position, normal and texture coordinates
//!
//! ## Usage
//!
//! ```no_run
//! use tabletop::config::CameraConfig;
//! use tabletop::gfx::camera::camera_utils::CameraManager;
//! use tabletop::gfx::scene::Scene;
//!
//! let scene = Scene::table(CameraManager::from_config(&CameraConfig::default(), 2.0));
//! assert!(scene.validate().is_ok());
//! ```

pub mod mesh;
pub mod object;
pub mod scene;
pub mod vertex;

pub use mesh::{DrawMesh, GpuMesh, MeshState};
pub use object::{ObjectGpuResources, ObjectUniform, SceneObject, Shading, Transform};
pub use scene::{MeshKind, Scene};
pub use vertex::Vertex3D;
