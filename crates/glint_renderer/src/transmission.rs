//! Walking a refracted ray through the inside of a closed mesh.
//!
//! Each time the walk reaches the boundary, the part of the ray that can
//! leave the solid is emitted as an exit ray, and the internally reflected
//! part keeps bouncing until the recursion budget runs out.

use glint_core::TriangleMesh;
use glint_math::{Ray, Vec3};

use crate::intersect::intersect_medium_exit;
use crate::optics::{is_total_internal_reflection, reflect, refract};
use crate::stats::RenderStats;

/// Offset along the direction applied to every secondary ray origin.
pub const RAY_OFFSET: f32 = 1e-4;

/// A ray that left the medium, tagged with the budget it left with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitRay {
    pub ray: Ray,
    pub remaining: u32,
}

/// Trace `direction` from `entry` through the solid bounded by `mesh`.
///
/// `direction` is the already refracted direction inside the solid. Every
/// boundary hit that is not totally reflected emits an [`ExitRay`]; while
/// `max_recursions > 0` the walk continues along the internal reflection.
/// A missing boundary (open mesh) ends the walk; it is counted in `stats`
/// and logged once per render.
pub fn trace_in_medium(
    mesh: &TriangleMesh,
    entry: Vec3,
    direction: Vec3,
    max_recursions: u32,
    refractive_index: f32,
    t_max: f32,
    stats: &RenderStats,
) -> Vec<ExitRay> {
    stats.record_transmission_trace();

    let mut exits = Vec::new();
    walk(
        mesh,
        entry,
        direction,
        max_recursions,
        refractive_index,
        t_max,
        stats,
        &mut exits,
    );
    exits
}

#[allow(clippy::too_many_arguments)]
fn walk(
    mesh: &TriangleMesh,
    origin: Vec3,
    direction: Vec3,
    max_recursions: u32,
    refractive_index: f32,
    t_max: f32,
    stats: &RenderStats,
    exits: &mut Vec<ExitRay>,
) {
    let ray = Ray::new(origin, direction).nudged(RAY_OFFSET);

    let Some(exit) = intersect_medium_exit(mesh, &ray, t_max, stats) else {
        if stats.record_missing_exit() {
            log::warn!(
                "Ray inside a transparent mesh found no exit at {:?}; the mesh is probably not closed",
                ray.origin
            );
        }
        return;
    };

    let cos_i = -direction.dot(exit.normal);
    let eta = 1.0 / refractive_index;

    if !is_total_internal_reflection(cos_i, eta) {
        if let Some(outgoing) = refract(direction, exit.normal, eta) {
            exits.push(ExitRay {
                ray: Ray::new(exit.point, outgoing).nudged(RAY_OFFSET),
                remaining: max_recursions,
            });
        }
    } else {
        log::trace!("Total internal reflection at {:?}", exit.point);
    }

    if max_recursions > 0 {
        let reflected = reflect(direction, exit.normal);
        walk(
            mesh,
            exit.point,
            reflected,
            max_recursions - 1,
            refractive_index,
            t_max,
            stats,
            exits,
        );
    }
}
