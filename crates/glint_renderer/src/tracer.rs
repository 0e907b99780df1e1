//! Recursive ray caster.
//!
//! `cast` finds the nearest surface, shades it locally and, while budget
//! remains, recurses into the reflected ray and into the rays leaving a
//! transparent solid. Every recursive call gets a strictly smaller budget,
//! so a cast with budget `n` nests at most `n + 1` levels deep.

use glint_core::{Color, Scene, TriangleMesh};
use glint_math::{Ray, Vec3};

use crate::intersect::{intersect_nearest, is_visible};
use crate::optics::{reflect, refract};
use crate::renderer::RenderConfig;
use crate::shading;
use crate::stats::RenderStats;
use crate::transmission::{trace_in_medium, RAY_OFFSET};

/// Casts rays against a read-only scene.
///
/// Cheap to copy; one tracer is shared by every worker thread of a render.
#[derive(Clone, Copy)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
    stats: &'a RenderStats,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig, stats: &'a RenderStats) -> Self {
        Self {
            scene,
            config,
            stats,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    /// Color seen along `ray` with `budget` reflection/refraction levels.
    pub fn cast(&self, ray: &Ray, budget: u32) -> Color {
        self.cast_nested(ray, budget, 1)
    }

    fn cast_nested(&self, ray: &Ray, budget: u32, nesting: u32) -> Color {
        self.stats.record_cast(nesting);

        let Some(hit) = intersect_nearest(self.scene, ray, self.config.far_distance, self.stats)
        else {
            return self.config.background;
        };
        self.stats.record_hit();

        // Hit records only name objects of this scene
        let Some(object) = self.scene.object(hit.object) else {
            return self.config.background;
        };
        let mesh = object.mesh();
        let material = object.material();
        let light = &self.scene.light;

        let (point, normal) = hit.surface(mesh);

        let mut color = shading::ambient(light, material);

        if budget > 0 {
            if material.is_reflective() {
                let direction = reflect(ray.direction, normal);
                let reflected = Ray::new(point, direction).nudged(RAY_OFFSET);
                color += material.reflectiveness
                    * self.cast_nested(&reflected, budget - 1, nesting + 1);
            }

            if material.is_transparent() {
                color += material.opacity
                    * self.transmitted(ray, mesh, point, normal, material.refractive_index, budget, nesting);
            }
        }

        let to_light = light.position - point;
        let light_distance = to_light.length();
        let to_light = to_light.normalize_or_zero();

        if is_visible(self.scene, point, to_light, light_distance, self.stats) {
            color += shading::direct(
                light,
                material,
                to_light,
                normal,
                ray.direction,
                self.config.clamp_lighting,
            );
        }

        color
    }

    /// Sum of the colors seen along every ray leaving the solid.
    #[allow(clippy::too_many_arguments)]
    fn transmitted(
        &self,
        ray: &Ray,
        mesh: &TriangleMesh,
        point: Vec3,
        normal: Vec3,
        refractive_index: f32,
        budget: u32,
        nesting: u32,
    ) -> Color {
        debug_assert!(budget > 0);

        // Refraction expects the normal on the incoming side
        let facing = if normal.dot(ray.direction) > 0.0 {
            -normal
        } else {
            normal
        };

        let Some(inside) = refract(ray.direction, facing, refractive_index) else {
            return Color::ZERO;
        };

        let exits = trace_in_medium(
            mesh,
            point,
            inside,
            budget - 1,
            refractive_index,
            self.config.far_distance,
            self.stats,
        );
        if exits.is_empty() {
            log::debug!("No ray leaves the transparent object hit at {:?}", point);
        }

        exits
            .iter()
            .filter(|exit| exit.remaining > 0)
            .map(|exit| self.cast_nested(&exit.ray, exit.remaining - 1, nesting + 1))
            .fold(Color::ZERO, |sum, c| sum + c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{primitives, Light, Material};

    const EPS: f32 = 1e-5;

    fn dark_light() -> Light {
        Light {
            position: Vec3::new(0.0, 0.0, 5.0),
            ambient: Vec3::new(0.5, 0.25, 1.0),
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
        }
    }

    fn floor_scene(material: Material, light: Light) -> Scene {
        let mut scene = Scene::new(light);
        let mut floor = primitives::quad(4.0);
        floor.rotate_x(90.0);
        scene.add(floor, material);
        scene
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = floor_scene(Material::default(), Light::default());
        let config = RenderConfig::default();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
        for budget in 0..4 {
            assert_eq!(tracer.cast(&ray, budget), Color::ZERO);
        }
        assert_eq!(stats.snapshot().hits, 0);
    }

    #[test]
    fn test_unlit_opaque_is_ambient_only() {
        let material = Material::new(Vec3::new(0.2, 0.4, 0.6), Vec3::ONE, Vec3::ONE);
        let scene = floor_scene(material, dark_light());
        let config = RenderConfig::default();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);

        let ray = Ray::new(Vec3::new(0.1, 0.2, 3.0), Vec3::NEG_Z);
        for budget in 0..4 {
            let color = tracer.cast(&ray, budget);
            assert!((color - Vec3::new(0.1, 0.1, 0.6)).length() < EPS);
        }
    }

    #[test]
    fn test_overhead_light() {
        // Floor rotated to face +Z, light straight above the hit point
        let material = Material::new(Vec3::splat(0.1), Vec3::splat(0.5), Vec3::splat(0.3));
        let scene = floor_scene(material.clone(), Light::default());
        let config = RenderConfig::default();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let color = tracer.cast(&ray, 2);

        // L.N = 1 and H = N, so diffuse and specular are at full strength
        let expected = 0.2 * material.ambient + material.diffuse + material.specular;
        assert!((color - expected).length() < 1e-4);
    }

    #[test]
    fn test_budget_zero_skips_reflection() {
        let material = Material::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO)
            .with_reflectiveness(Vec3::ONE);
        let mut scene = floor_scene(material, dark_light());
        let mut mirror = primitives::quad(4.0);
        mirror.rotate_x(-90.0);
        mirror.translate(Vec3::new(0.0, 0.0, 5.0));
        scene.add(mirror, Material::new(Vec3::ONE, Vec3::ZERO, Vec3::ZERO));

        let config = RenderConfig::default();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);

        assert_eq!(tracer.cast(&ray, 0), Color::ZERO);
        // One bounce sees the ambient of the second quad
        let bounced = tracer.cast(&ray, 1);
        assert!((bounced - Vec3::new(0.5, 0.25, 1.0)).length() < EPS);
    }

    #[test]
    fn test_opaque_never_traces_transmission() {
        let scene = floor_scene(Material::default(), Light::default());
        let config = RenderConfig::default();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);

        tracer.cast(&Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z), 5);
        assert_eq!(stats.snapshot().transmission_traces, 0);
    }
}
