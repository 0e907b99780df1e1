//! Scene model types for glint.
//!
//! A scene is an ordered list of objects, each owning its triangle mesh and
//! its material, plus a single point light. The scene is assembled up front
//! and is read-only while a frame renders, so it can be shared across worker
//! threads by reference.

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::mesh::TriangleMesh;

/// Linear RGB color (channels nominally in [0, 1], not clamped).
pub type Color = Vec3;

/// Handle of a texture owned by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Stable identifier of a scene object.
///
/// Assigned when the object is added and never reused for the lifetime of
/// the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Phong material with reflection and transmission weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient coefficient (RGB)
    pub ambient: Color,

    /// Diffuse coefficient (RGB)
    pub diffuse: Color,

    /// Specular coefficient (RGB)
    pub specular: Color,

    /// Phong exponent
    pub shininess: f32,

    /// Weight of the reflected ray per channel (0 = no reflection)
    pub reflectiveness: Color,

    /// Opacity per channel (1 = fully opaque)
    ///
    /// The transmitted contribution is weighted by this value as well.
    pub opacity: Color,

    /// Refractive index of the solid's interior (1 = air)
    pub refractive_index: f32,

    /// Optional texture used by the presentation layer
    #[serde(skip)]
    pub texture: Option<TextureId>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::ZERO,
            shininess: 0.8 * 128.0,
            reflectiveness: Vec3::ZERO,
            opacity: Vec3::ONE,
            refractive_index: 1.0,
            texture: None,
        }
    }
}

impl Material {
    /// Create an opaque, non-reflective material from its Phong coefficients.
    pub fn new(ambient: Color, diffuse: Color, specular: Color) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            ..Default::default()
        }
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_reflectiveness(mut self, reflectiveness: Color) -> Self {
        self.reflectiveness = reflectiveness;
        self
    }

    pub fn with_opacity(mut self, opacity: Color) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_refractive_index(mut self, refractive_index: f32) -> Self {
        self.refractive_index = refractive_index;
        self
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Check if any channel reflects.
    pub fn is_reflective(&self) -> bool {
        self.reflectiveness.cmpne(Vec3::ZERO).any()
    }

    /// Check if any channel lets light through.
    pub fn is_transparent(&self) -> bool {
        self.opacity.cmpne(Vec3::ONE).any()
    }
}

/// Single point light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 8.0),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
        }
    }
}

impl Light {
    /// Create a white light at `position` with the default intensities.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// A mesh together with the material it is shaded with.
#[derive(Clone, Debug)]
pub struct SceneObject {
    id: ObjectId,
    mesh: TriangleMesh,
    material: Material,
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

/// Objects and the light of a frame.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,

    /// The scene's point light
    pub light: Light,
}

impl Scene {
    /// Create an empty scene lit by `light`.
    pub fn new(light: Light) -> Self {
        Self {
            objects: Vec::new(),
            light,
        }
    }

    /// Add a mesh with its material and return the new object's ID.
    pub fn add(&mut self, mesh: TriangleMesh, material: Material) -> ObjectId {
        debug_assert!(mesh.validate().is_ok(), "invalid mesh added to scene");

        let id = ObjectId(self.objects.len());
        log::debug!(
            "Added object {} ({} vertices, {} triangles)",
            id.0,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        self.objects.push(SceneObject { id, mesh, material });
        id
    }

    /// Get an object by ID.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    /// All objects in insertion order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Get object count.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get total triangle count across all objects.
    pub fn total_triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangle_count()).sum()
    }
}
