use crate::Vec3;

/// Determinant threshold below which a ray counts as parallel to a triangle.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray in 3D space with an origin and a unit-length direction.
///
/// Rays are created fresh for every primary, reflected, refracted and shadow
/// ray and are never mutated afterwards. The direction is expected to be
/// normalized by the caller; use [`Ray::through`] to build one from two points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Result of a ray/triangle test: ray parameter and barycentric coordinates.
///
/// The hit point is `w*p0 + u*p1 + v*p2` with `w = 1 - u - v`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl TriangleHit {
    /// Weight of the first vertex.
    #[inline]
    pub fn w(&self) -> f32 {
        1.0 - self.u - self.v
    }
}

impl Ray {
    /// Create a new ray from an origin and an already normalized direction.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray starting at `origin` and pointing towards `point`.
    ///
    /// A degenerate pair (identical points) yields a zero direction, which
    /// never reports a triangle hit.
    pub fn through(origin: Vec3, point: Vec3) -> Self {
        Self::new(origin, (point - origin).normalize_or_zero())
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray with its origin pushed `epsilon` along the direction.
    ///
    /// Secondary rays start slightly off the surface they leave so the
    /// surface does not immediately intersect itself.
    #[inline]
    pub fn nudged(&self, epsilon: f32) -> Self {
        Self::new(self.at(epsilon), self.direction)
    }

    /// Determinant based line/triangle intersection (Möller-Trumbore).
    ///
    /// Returns the line parameter and barycentric coordinates when the
    /// supporting line crosses the triangle. The parameter may be negative
    /// (hit behind the origin); callers filter on the range they accept.
    pub fn intersect_triangle(&self, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<TriangleHit> {
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let t_vec = self.origin - p0;

        let p = self.direction.cross(e2);
        let q = t_vec.cross(e1);

        let det = p.dot(e1);

        // Ray is parallel to triangle
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / det;

        let u = f * p.dot(t_vec);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let v = f * q.dot(self.direction);
        if !(0.0..=1.0).contains(&v) || u + v > 1.0 {
            return None;
        }

        let t = f * q.dot(e2);

        Some(TriangleHit { t, u, v })
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}
