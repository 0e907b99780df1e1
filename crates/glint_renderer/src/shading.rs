//! Local illumination: ambient plus Phong diffuse and specular.

use glint_core::{Color, Light, Material};
use glint_math::Vec3;

/// Elementwise product of light and material ambient terms.
#[inline]
pub fn ambient(light: &Light, material: &Material) -> Color {
    light.ambient * material.ambient
}

/// Diffuse and specular contribution of the light at a visible point.
///
/// `to_light` and `normal` are unit vectors, `view_direction` is the
/// direction of the incoming ray. With `clamp` set, negative cosines are
/// clamped to zero; otherwise the raw dot products are used.
pub fn direct(
    light: &Light,
    material: &Material,
    to_light: Vec3,
    normal: Vec3,
    view_direction: Vec3,
    clamp: bool,
) -> Color {
    let half = (to_light - view_direction).normalize_or_zero();

    let mut l_dot_n = to_light.dot(normal);
    let mut h_dot_n = half.dot(normal);
    if clamp {
        l_dot_n = l_dot_n.max(0.0);
        h_dot_n = h_dot_n.max(0.0);
    }

    light.diffuse * material.diffuse * l_dot_n
        + light.specular * material.specular * h_dot_n.powf(material.shininess)
}
