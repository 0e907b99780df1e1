//! JSON scene descriptions.
//!
//! A description names the camera, the light and a list of objects. Each
//! object is built from an OFF file or a procedural primitive, optionally
//! fitted into a bounding box, rotated and moved, and paired with its
//! material:
//!
//! ```json
//! {
//!   "camera": { "position": [0, 2, 10], "target": [0, 0, 0], "fov": 65 },
//!   "light": { "position": [0, 8, 4] },
//!   "max_depth": 4,
//!   "objects": [
//!     { "mesh": { "quad": { "size": 12 } }, "translate": [0, -1, 0] },
//!     {
//!       "mesh": { "off": "meshes/bunny.off" },
//!       "scale_to": 2.0,
//!       "rotate": [0, 45, 0],
//!       "material": { "diffuse": [0.8, 0.2, 0.2], "reflectiveness": [0.3, 0.3, 0.3] }
//!     }
//!   ]
//! }
//! ```
//!
//! Relative OFF paths are resolved against the directory of the description.

use std::path::{Path, PathBuf};

use glint_math::{Camera, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::TriangleMesh;
use crate::off::{load_off, OffError};
use crate::primitives;
use crate::scene::{Light, Material, Scene};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum DescriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load mesh {path}: {source}")]
    Off {
        path: PathBuf,
        #[source]
        source: OffError,
    },
}

/// Result type for scene description loading.
pub type DescriptionResult<T> = Result<T, DescriptionError>;

fn default_up() -> Vec3 {
    Vec3::Y
}

fn default_fov() -> f32 {
    65.0
}

fn default_near() -> f32 {
    1.0
}

fn default_far() -> f32 {
    1000.0
}

/// Perspective camera parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub position: Vec3,
    pub target: Vec3,
    #[serde(default = "default_up")]
    pub up: Vec3,
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: default_up(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl CameraDescription {
    /// Build the camera; the aspect ratio is set by the renderer.
    pub fn to_camera(&self) -> Camera {
        Camera::new(self.position, self.target, 1.0)
            .with_up(self.up)
            .with_fov_degrees(self.fov)
            .with_clip(self.near, self.far)
    }
}

/// Where an object's triangles come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshSource {
    /// OFF or NOFF file
    Off(PathBuf),
    Triangle { points: [Vec3; 3] },
    Quad { size: f32 },
    Cube { size: f32 },
    Sphere {
        radius: f32,
        #[serde(default = "default_stacks")]
        stacks: u32,
        #[serde(default = "default_slices")]
        slices: u32,
    },
}

fn default_stacks() -> u32 {
    16
}

fn default_slices() -> u32 {
    32
}

impl MeshSource {
    fn build(&self, base_dir: &Path) -> DescriptionResult<TriangleMesh> {
        let mesh = match self {
            MeshSource::Off(path) => {
                let path = base_dir.join(path);
                load_off(&path).map_err(|source| DescriptionError::Off { path, source })?
            }
            MeshSource::Triangle { points } => primitives::triangle(points[0], points[1], points[2]),
            MeshSource::Quad { size } => primitives::quad(*size),
            MeshSource::Cube { size } => primitives::cube(*size),
            MeshSource::Sphere {
                radius,
                stacks,
                slices,
            } => primitives::uv_sphere(*radius, *stacks, *slices),
        };
        Ok(mesh)
    }
}

/// One scene object: mesh source, placement and material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub mesh: MeshSource,

    /// Center at the origin and scale so the longest bounding box side has
    /// this length
    #[serde(default)]
    pub scale_to: Option<f32>,

    /// Euler angles in degrees, applied X then Y then Z
    #[serde(default)]
    pub rotate: Option<Vec3>,

    #[serde(default)]
    pub translate: Option<Vec3>,

    #[serde(default)]
    pub material: Material,
}

impl ObjectDescription {
    /// Build and place the mesh.
    pub fn build_mesh(&self, base_dir: &Path) -> DescriptionResult<TriangleMesh> {
        let mut mesh = self.mesh.build(base_dir)?;

        if let Some(length) = self.scale_to {
            mesh.translate_to_center(Vec3::ZERO);
            mesh.scale_to_length(length);
        }
        if let Some(angles) = self.rotate {
            mesh.rotate_x(angles.x);
            mesh.rotate_y(angles.y);
            mesh.rotate_z(angles.z);
        }
        if let Some(offset) = self.translate {
            mesh.translate(offset);
        }

        Ok(mesh)
    }
}

/// Complete scene description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDescription,

    #[serde(default)]
    pub light: Light,

    /// Recursion budget suggested by the scene
    #[serde(default)]
    pub max_depth: Option<u32>,

    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

/// A scene ready to render.
#[derive(Clone, Debug)]
pub struct LoadedScene {
    pub scene: Scene,
    pub camera: Camera,
    pub max_depth: Option<u32>,
}

impl SceneDescription {
    /// Parse a description from JSON text.
    pub fn from_json(content: &str) -> DescriptionResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build every object, resolving relative mesh paths against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> DescriptionResult<LoadedScene> {
        let mut scene = Scene::new(self.light.clone());

        for object in &self.objects {
            let mesh = object.build_mesh(base_dir)?;
            scene.add(mesh, object.material.clone());
        }

        log::info!(
            "Scene: {} objects, {} triangles",
            scene.object_count(),
            scene.total_triangle_count()
        );

        Ok(LoadedScene {
            scene,
            camera: self.camera.to_camera(),
            max_depth: self.max_depth,
        })
    }
}

/// Load a JSON scene description and build its scene.
pub fn load_scene<P: AsRef<Path>>(path: P) -> DescriptionResult<LoadedScene> {
    let path = path.as_ref();
    log::info!("Loading scene description: {}", path.display());

    let content = std::fs::read_to_string(path)?;
    let description = SceneDescription::from_json(&content)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    description.build(base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_description() {
        let json = r#"{
            "camera": { "position": [0, 2, 10], "target": [0, 0, 0], "fov": 45 },
            "light": { "position": [0, 8, 4], "ambient": [0.1, 0.1, 0.1] },
            "max_depth": 3,
            "objects": [
                { "mesh": { "quad": { "size": 12 } }, "translate": [0, -1, 0] },
                {
                    "mesh": { "sphere": { "radius": 1.0 } },
                    "material": { "opacity": [0.2, 0.2, 0.2], "refractive_index": 1.5 }
                }
            ]
        }"#;

        let description = SceneDescription::from_json(json).unwrap();

        assert_eq!(description.camera.fov, 45.0);
        assert_eq!(description.camera.up, Vec3::Y);
        assert_eq!(description.light.diffuse, Vec3::ONE);
        assert_eq!(description.max_depth, Some(3));
        assert_eq!(description.objects.len(), 2);
        assert_eq!(
            description.objects[1].mesh,
            MeshSource::Sphere {
                radius: 1.0,
                stacks: 16,
                slices: 32
            }
        );
        assert!(description.objects[1].material.is_transparent());
    }

    #[test]
    fn test_build_places_objects() {
        let json = r#"{
            "objects": [
                { "mesh": { "cube": { "size": 1 } }, "scale_to": 4, "translate": [0, 5, 0] },
                { "mesh": { "triangle": { "points": [[0,0,0],[1,0,0],[0,1,0]] } } }
            ]
        }"#;

        let loaded = SceneDescription::from_json(json)
            .unwrap()
            .build(Path::new("."))
            .unwrap();

        assert_eq!(loaded.scene.object_count(), 2);
        assert_eq!(loaded.scene.total_triangle_count(), 13);

        let cube = &loaded.scene.objects()[0];
        let bounds = cube.mesh().bounds();
        assert!((bounds.longest_side() - 4.0).abs() < 0.001);
        assert!((bounds.center() - Vec3::new(0.0, 5.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_rotation_order() {
        let object = ObjectDescription {
            mesh: MeshSource::Triangle {
                points: [Vec3::ZERO, Vec3::X, Vec3::Y],
            },
            scale_to: None,
            rotate: Some(Vec3::new(90.0, 0.0, 90.0)),
            translate: None,
            material: Material::default(),
        };

        let mesh = object.build_mesh(Path::new(".")).unwrap();
        // +Z --rotX(90)--> -Y --rotZ(90)--> +X
        assert!((mesh.normals()[0] - Vec3::X).length() < 0.001);
    }

    #[test]
    fn test_unknown_primitive_is_rejected() {
        let result = SceneDescription::from_json(r#"{ "objects": [ { "mesh": { "torus": {} } } ] }"#);
        assert!(matches!(result, Err(DescriptionError::Json(_))));
    }

    #[test]
    fn test_missing_off_file_names_path() {
        let json = r#"{ "objects": [ { "mesh": { "off": "missing.off" } } ] }"#;
        let result = SceneDescription::from_json(json)
            .unwrap()
            .build(Path::new("/nonexistent"));

        match result {
            Err(DescriptionError::Off { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/missing.off"));
            }
            other => panic!("unexpected result: {:?}", other.map(|l| l.scene.object_count())),
        }
    }

    #[test]
    fn test_load_sample_scene() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenes/glass.json");
        let loaded = load_scene(path).unwrap();

        assert_eq!(loaded.scene.object_count(), 4);
        assert_eq!(loaded.max_depth, Some(4));

        // The pyramid comes from an OFF file; its 2 unit base already fits
        // the requested length and rotating about Y keeps its height
        let pyramid = loaded.scene.objects()[2].mesh();
        assert_eq!(pyramid.triangle_count(), 6);
        assert!((pyramid.bounds().size().y - 1.5).abs() < 0.001);
        assert!(loaded.scene.objects()[1].material().is_transparent());
    }

    #[test]
    fn test_camera_from_description() {
        let camera = CameraDescription::default().to_camera();
        assert!((camera.fov_y - 65.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.far, 1000.0);
    }
}
