//! Glint Core - Scene model for the glint ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: `TriangleMesh` with per-vertex normals and mesh transforms
//! - **Scene model**: `Material`, `Light`, `SceneObject`, `Scene`
//! - **Loading**: OFF/NOFF meshes, procedural primitives and JSON scene
//!   descriptions
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_scene;
//!
//! let loaded = load_scene("scenes/glass.json")?;
//! println!("Loaded {} objects, {} triangles",
//!     loaded.scene.object_count(),
//!     loaded.scene.total_triangle_count());
//! ```

pub mod description;
pub mod mesh;
pub mod off;
pub mod primitives;
pub mod scene;

// Re-export commonly used types
pub use description::{
    load_scene, CameraDescription, DescriptionError, LoadedScene, MeshSource, ObjectDescription,
    SceneDescription,
};
pub use mesh::{Bounds, MeshError, MeshResult, TriangleMesh};
pub use off::{load_off, parse_off, OffError, OffResult};
pub use scene::{Color, Light, Material, ObjectId, Scene, SceneObject, TextureId};
