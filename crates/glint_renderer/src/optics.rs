//! Reflection and refraction directions.
//!
//! Refraction uses one convention everywhere: `eta` is the refractive index
//! of the medium the ray enters divided by the index of the medium it
//! leaves, and the normal faces the side the ray comes from. Entering a
//! solid from air passes `eta = index`, leaving it passes `eta = 1 / index`.
//!
//! Formulas after "Ray Tracing from the Ground Up" (Suffern).

use glint_math::Vec3;

/// Mirror `direction` about the plane with unit normal `normal`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}

/// `cos_t²` of the transmitted ray; negative under total internal reflection.
#[inline]
fn cos_transmitted_squared(cos_i: f32, eta: f32) -> f32 {
    1.0 - (1.0 - cos_i * cos_i) / (eta * eta)
}

/// Check whether a ray hitting an interface at `cos_i` (cosine between the
/// reversed ray and the normal) is totally reflected.
#[inline]
pub fn is_total_internal_reflection(cos_i: f32, eta: f32) -> bool {
    cos_transmitted_squared(cos_i, eta) < 0.0
}

/// Refract the unit `direction` through an interface with unit `normal`
/// facing the incoming ray.
///
/// Returns `None` under total internal reflection.
pub fn refract(direction: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -normal.dot(direction);
    let radicand = cos_transmitted_squared(cos_i, eta);
    if radicand < 0.0 {
        return None;
    }

    let cos_t = radicand.sqrt();
    let transmitted = direction / eta + (cos_i / eta - cos_t) * normal;
    Some(transmitted.normalize_or_zero())
}
