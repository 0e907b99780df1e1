//! Triangle mesh geometry for the glint scene model.
//!
//! A `TriangleMesh` is the only geometry the ray tracer understands: vertex
//! positions, one normal per vertex and index triples. Meshes can be built
//! programmatically, loaded from OFF files, and transformed in place while a
//! scene is being assembled. During rendering they are read-only.

use glint_math::{Mat3, Mat4, Vec3};
use thiserror::Error;

/// Errors reported when a mesh violates its invariants.
#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("normal count ({normals}) does not match vertex count ({vertices})")]
    NormalCountMismatch { vertices: usize, normals: usize },

    #[error("triangle {triangle} references vertex {index}, but the mesh has {vertices} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertices: usize,
    },
}

/// Result type for mesh validation.
pub type MeshResult<T> = Result<T, MeshError>;

/// Axis-aligned bounds of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Bounds that contain nothing.
    pub const EMPTY: Bounds = Bounds {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Compute bounds from positions.
    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |bounds, p| Bounds {
            min: bounds.min.min(*p),
            max: bounds.max.max(*p),
        })
    }

    /// Check whether the bounds contain any point.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the longest box side.
    pub fn longest_side(&self) -> f32 {
        self.size().max_element()
    }
}

/// A mesh of triangles with smooth per-vertex normals.
///
/// Invariants (checked by [`TriangleMesh::validate`]): the normal array has the
/// same length as the position array, and every triangle index addresses a
/// vertex.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bounds: Bounds,
}

impl TriangleMesh {
    /// Create a mesh and compute area-weighted vertex normals.
    ///
    /// Triangles referencing a vertex past the end of `positions` are dropped.
    pub fn new(positions: Vec<Vec3>, mut triangles: Vec<[u32; 3]>) -> Self {
        let vertex_count = positions.len();
        let before = triangles.len();
        triangles.retain(|tri| tri.iter().all(|&i| (i as usize) < vertex_count));
        if triangles.len() < before {
            log::warn!(
                "Dropped {} triangles with invalid indices, vertex count: {}",
                before - triangles.len(),
                vertex_count
            );
        }

        let bounds = Bounds::from_points(&positions);
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            triangles,
            bounds,
        };
        mesh.compute_normals();
        mesh
    }

    /// Create a mesh with explicit per-vertex normals.
    ///
    /// The normals are normalized; the result is validated.
    pub fn with_normals(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    ) -> MeshResult<Self> {
        let bounds = Bounds::from_points(&positions);
        let mesh = Self {
            positions,
            normals: normals.into_iter().map(|n| n.normalize_or_zero()).collect(),
            triangles,
            bounds,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Assemble a mesh whose invariants hold by construction.
    pub(crate) fn from_parts(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        let bounds = Bounds::from_points(&positions);
        let mesh = Self {
            positions,
            normals,
            triangles,
            bounds,
        };
        debug_assert!(mesh.validate().is_ok());
        mesh
    }

    /// Recompute smooth vertex normals.
    ///
    /// Every vertex accumulates the unnormalized cross products of its
    /// adjacent faces, so larger faces weigh more. Vertices without any valid
    /// face get +Y.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for tri in &self.triangles {
            let [i0, i1, i2] = tri.map(|i| i as usize);
            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = normals;
    }

    /// Check the mesh invariants.
    pub fn validate(&self) -> MeshResult<()> {
        if self.normals.len() != self.positions.len() {
            return Err(MeshError::NormalCountMismatch {
                vertices: self.positions.len(),
                normals: self.normals.len(),
            });
        }

        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= self.positions.len()) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertices: self.positions.len(),
                });
            }
        }

        Ok(())
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Vertex normals (same length as positions).
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Triangle index triples.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Axis-aligned bounds of the vertex positions.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Corner positions of triangle `index`.
    #[inline]
    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        self.triangles[index].map(|i| self.positions[i as usize])
    }

    /// Corner normals of triangle `index`.
    #[inline]
    pub fn triangle_normals(&self, index: usize) -> [Vec3; 3] {
        self.triangles[index].map(|i| self.normals[i as usize])
    }

    /// Transform positions as points and normals with the inverse transpose.
    pub fn apply_matrix(&mut self, matrix: Mat4) {
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();

        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        for n in &mut self.normals {
            *n = (normal_matrix * *n).normalize_or_zero();
        }

        self.bounds = Bounds::from_points(&self.positions);
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.apply_matrix(Mat4::from_translation(offset));
    }

    /// Scale uniformly about the origin.
    pub fn scale(&mut self, factor: f32) {
        self.apply_matrix(Mat4::from_scale(Vec3::splat(factor)));
    }

    /// Rotate about the X axis by `degrees`.
    pub fn rotate_x(&mut self, degrees: f32) {
        self.apply_matrix(Mat4::from_rotation_x(degrees.to_radians()));
    }

    /// Rotate about the Y axis by `degrees`.
    pub fn rotate_y(&mut self, degrees: f32) {
        self.apply_matrix(Mat4::from_rotation_y(degrees.to_radians()));
    }

    /// Rotate about the Z axis by `degrees`.
    pub fn rotate_z(&mut self, degrees: f32) {
        self.apply_matrix(Mat4::from_rotation_z(degrees.to_radians()));
    }

    /// Move the mesh so its bounding box is centered on `center`.
    pub fn translate_to_center(&mut self, center: Vec3) {
        if self.bounds.is_empty() {
            return;
        }
        self.translate(center - self.bounds.center());
    }

    /// Scale so that the longest bounding box side equals `length`.
    pub fn scale_to_length(&mut self, length: f32) {
        let longest = self.bounds.longest_side();
        if self.bounds.is_empty() || longest <= 0.0 {
            log::debug!("Cannot scale a degenerate mesh to length {}", length);
            return;
        }
        self.scale(length / longest);
    }

    /// Negate every vertex normal.
    pub fn flip_normals(&mut self) {
        for n in &mut self.normals {
            *n = -*n;
        }
    }
}
