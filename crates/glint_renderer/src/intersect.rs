//! Brute-force ray/scene intersection.
//!
//! Every query tests every triangle of every object it covers. There is no
//! acceleration structure; cost is linear in the triangle count.

use glint_core::{ObjectId, Scene, TriangleMesh};
use glint_math::{Interval, Ray, Vec3};

use crate::stats::RenderStats;

/// Lower bound on `t` for shadow rays, so a surface does not shadow itself.
pub const SHADOW_EPSILON: f32 = 1e-4;

/// Nearest surface hit of a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Ray parameter of the hit
    pub t: f32,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
    /// Index of the hit triangle within its mesh
    pub triangle: usize,
    /// Object the triangle belongs to
    pub object: ObjectId,
}

impl HitRecord {
    /// Weight of the first vertex.
    #[inline]
    pub fn w(&self) -> f32 {
        1.0 - self.u - self.v
    }

    /// Barycentric hit point and interpolated unit normal on `mesh`.
    ///
    /// A degenerate normal comes back as the zero vector.
    pub fn surface(&self, mesh: &TriangleMesh) -> (Vec3, Vec3) {
        let [p0, p1, p2] = mesh.triangle(self.triangle);
        let [n0, n1, n2] = mesh.triangle_normals(self.triangle);
        let w = self.w();

        let point = w * p0 + self.u * p1 + self.v * p2;
        let normal = (w * n0 + self.u * n1 + self.v * n2).normalize_or_zero();
        (point, normal)
    }
}

/// Exit of a ray travelling inside a closed mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediumExit {
    pub t: f32,
    pub triangle: usize,
    /// Exit point on the boundary
    pub point: Vec3,
    /// Interpolated normal pointing back into the medium
    pub normal: Vec3,
}

/// Find the nearest hit with `0 < t < t_max` across all objects.
pub fn intersect_nearest(
    scene: &Scene,
    ray: &Ray,
    t_max: f32,
    stats: &RenderStats,
) -> Option<HitRecord> {
    let mut closest: Option<HitRecord> = None;
    let mut closest_t = t_max;
    let mut tests = 0u64;

    for object in scene.objects() {
        let mesh = object.mesh();
        for triangle in 0..mesh.triangle_count() {
            let [p0, p1, p2] = mesh.triangle(triangle);
            tests += 1;

            if let Some(hit) = ray.intersect_triangle(p0, p1, p2) {
                if hit.t > 0.0 && hit.t < closest_t {
                    closest_t = hit.t;
                    closest = Some(HitRecord {
                        t: hit.t,
                        u: hit.u,
                        v: hit.v,
                        triangle,
                        object: object.id(),
                    });
                }
            }
        }
    }

    stats.add_intersection_tests(tests);
    closest
}

/// Check whether the light at `light_distance` along `light_direction` is
/// unobstructed from `point`.
///
/// Stops at the first occluder.
pub fn is_visible(
    scene: &Scene,
    point: Vec3,
    light_direction: Vec3,
    light_distance: f32,
    stats: &RenderStats,
) -> bool {
    let ray = Ray::new(point, light_direction);
    let range = Interval::new(SHADOW_EPSILON, light_distance);
    let mut tests = 0u64;

    let occluded = scene.objects().iter().any(|object| {
        let mesh = object.mesh();
        (0..mesh.triangle_count()).any(|triangle| {
            let [p0, p1, p2] = mesh.triangle(triangle);
            tests += 1;
            ray.intersect_triangle(p0, p1, p2)
                .is_some_and(|hit| range.surrounds(hit.t))
        })
    });

    stats.add_intersection_tests(tests);
    !occluded
}

/// Find where a ray travelling inside `mesh` leaves it.
///
/// Triangles are tested with reversed winding and the normals are negated,
/// so the returned normal faces the inside. `None` means the mesh is not
/// closed around the ray origin.
pub fn intersect_medium_exit(
    mesh: &TriangleMesh,
    ray: &Ray,
    t_max: f32,
    stats: &RenderStats,
) -> Option<MediumExit> {
    let positions = mesh.positions();
    let normals = mesh.normals();

    let mut closest = None;
    let mut closest_t = t_max;

    for (triangle, &[i0, i1, i2]) in mesh.triangles().iter().enumerate() {
        let (p0, p1, p2) = (
            positions[i0 as usize],
            positions[i2 as usize],
            positions[i1 as usize],
        );

        if let Some(hit) = ray.intersect_triangle(p0, p1, p2) {
            if hit.t > 0.0 && hit.t < closest_t {
                closest_t = hit.t;
                closest = Some((triangle, hit));
            }
        }
    }

    stats.add_intersection_tests(mesh.triangle_count() as u64);

    closest.map(|(triangle, hit)| {
        let [i0, i1, i2] = mesh.triangles()[triangle].map(|i| i as usize);
        let (p0, p1, p2) = (positions[i0], positions[i2], positions[i1]);
        let (n0, n1, n2) = (-normals[i0], -normals[i2], -normals[i1]);
        let w = hit.w();

        MediumExit {
            t: hit.t,
            triangle,
            point: w * p0 + hit.u * p1 + hit.v * p2,
            normal: (w * n0 + hit.u * n1 + hit.v * n2).normalize_or_zero(),
        }
    })
}
