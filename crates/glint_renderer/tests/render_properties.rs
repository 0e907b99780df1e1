//! End-to-end properties of the ray tracer on small procedural scenes.

use glint_core::{primitives, Light, Material, Scene};
use glint_math::{Camera, Ray, Vec3};
use glint_renderer::{
    intersect_nearest, render_image, render_image_with, trace_in_medium, Color, RenderConfig,
    RenderStats, Tracer,
};

const EPS: f32 = 1e-5;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Light that only contributes its ambient term.
fn ambient_light(ambient: Vec3) -> Light {
    Light {
        position: Vec3::new(0.0, 0.0, 20.0),
        ambient,
        diffuse: Vec3::ZERO,
        specular: Vec3::ZERO,
    }
}

/// Wall facing +Z at `z`.
fn wall(z: f32, size: f32) -> glint_core::TriangleMesh {
    let mut mesh = primitives::quad(size);
    mesh.rotate_x(90.0);
    mesh.translate(Vec3::new(0.0, 0.0, z));
    mesh
}

/// Reflective floor, a glass shell and a denser core inside it.
fn nested_spheres_scene() -> Scene {
    let mut scene = Scene::new(Light::at(Vec3::new(2.0, 6.0, 6.0)));

    let mut floor = primitives::quad(20.0);
    floor.translate(Vec3::new(0.0, -2.5, 0.0));
    scene.add(
        floor,
        Material::new(Vec3::splat(0.2), Vec3::splat(0.6), Vec3::splat(0.2))
            .with_reflectiveness(Vec3::splat(0.3)),
    );

    scene.add(
        primitives::uv_sphere(2.0, 8, 12),
        Material::new(Vec3::splat(0.05), Vec3::splat(0.1), Vec3::ONE)
            .with_reflectiveness(Vec3::splat(0.2))
            .with_opacity(Vec3::splat(0.6))
            .with_refractive_index(1.3),
    );

    scene.add(
        primitives::uv_sphere(1.0, 6, 10),
        Material::new(Vec3::new(0.3, 0.1, 0.1), Vec3::new(0.8, 0.2, 0.2), Vec3::ONE)
            .with_opacity(Vec3::new(0.5, 0.8, 0.8))
            .with_refractive_index(1.5),
    );

    scene.add(
        wall(-6.0, 20.0),
        Material::new(Vec3::new(0.2, 0.2, 0.5), Vec3::new(0.2, 0.2, 0.8), Vec3::ZERO),
    );

    scene
}

fn nested_spheres_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 1.0, 9.0), Vec3::ZERO, 1.0)
}

#[test]
fn test_nearest_hit_matches_closed_form() {
    let mut scene = Scene::default();
    scene.add(
        primitives::triangle(
            Vec3::new(-1.0, -1.0, -4.0),
            Vec3::new(3.0, -1.0, -4.0),
            Vec3::new(-1.0, 3.0, -4.0),
        ),
        Material::default(),
    );
    let stats = RenderStats::new();

    let origin = Vec3::new(0.0, 0.5, 1.0);
    let ray = Ray::through(origin, Vec3::new(0.0, 0.5, -4.0));
    let hit = intersect_nearest(&scene, &ray, 1000.0, &stats).unwrap();

    // Hit point (0, 0.5, -4): u = (x + 1) / 4, v = (y + 1) / 4
    assert!((hit.t - 5.0).abs() < EPS);
    assert!((hit.u - 0.25).abs() < EPS);
    assert!((hit.v - 0.375).abs() < EPS);
}

#[test]
fn test_missing_rays_are_black_for_any_budget() {
    let scene = nested_spheres_scene();
    let config = RenderConfig::default();
    let stats = RenderStats::new();
    let tracer = Tracer::new(&scene, &config, &stats);

    // Straight up, away from every object
    let ray = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::Y);
    for budget in 0..6 {
        assert_eq!(tracer.cast(&ray, budget), Color::ZERO);
    }
}

#[test]
fn test_unlit_opaque_surface_is_exactly_ambient() {
    let light = ambient_light(Vec3::new(0.4, 0.6, 0.8));
    let material = Material::new(Vec3::new(0.5, 0.5, 0.25), Vec3::ONE, Vec3::ONE);
    let expected = light.ambient * material.ambient;

    let mut scene = Scene::new(light);
    scene.add(wall(0.0, 4.0), material);
    let config = RenderConfig::default();
    let stats = RenderStats::new();
    let tracer = Tracer::new(&scene, &config, &stats);

    let ray = Ray::new(Vec3::new(0.3, -0.2, 5.0), Vec3::NEG_Z);
    for budget in 0..5 {
        assert_eq!(tracer.cast(&ray, budget), expected);
    }
}

#[test]
fn test_overhead_light_on_unit_triangle() {
    let material = Material::new(Vec3::splat(0.1), Vec3::new(0.9, 0.5, 0.1), Vec3::splat(0.25));
    let light = Light {
        position: Vec3::new(0.0, 0.0, 5.0),
        ambient: Vec3::splat(0.2),
        diffuse: Vec3::splat(0.8),
        specular: Vec3::splat(0.6),
    };

    // Upward facing triangle at z = 0 with its centroid on the z axis
    let mut scene = Scene::new(light.clone());
    scene.add(
        primitives::triangle(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(2.0, -1.0, 0.0),
            Vec3::new(-1.0, 2.0, 0.0),
        ),
        material.clone(),
    );
    let config = RenderConfig::default();
    let stats = RenderStats::new();
    let tracer = Tracer::new(&scene, &config, &stats);

    let color = tracer.cast(&Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z), 3);

    // L.N = 1; V = L, so H = N and H.N = 1 as well
    let expected = light.ambient * material.ambient
        + light.diffuse * material.diffuse
        + light.specular * material.specular;
    assert!((color - expected).length() < 1e-4);
}

#[test]
fn test_occluded_point_is_ambient_only() {
    let light = Light {
        position: Vec3::new(0.0, 5.0, 0.0),
        ambient: Vec3::splat(0.1),
        diffuse: Vec3::ONE,
        specular: Vec3::ONE,
    };
    let floor_material = Material::default();
    let expected = light.ambient * floor_material.ambient;

    let mut scene = Scene::new(light);
    scene.add(primitives::quad(10.0), floor_material);

    let config = RenderConfig::default();
    // From the side, below the blocker, down to (0.1, 0, 0.05) on the floor
    let ray = Ray::through(Vec3::new(3.0, 1.0, 0.05), Vec3::new(0.1, 0.0, 0.05));

    let lit = {
        let stats = RenderStats::new();
        Tracer::new(&scene, &config, &stats).cast(&ray, 2)
    };
    assert!(lit.x > expected.x + 0.1);

    let mut blocker = primitives::quad(2.0);
    blocker.translate(Vec3::new(0.0, 2.0, 0.0));
    scene.add(blocker, Material::default());

    let stats = RenderStats::new();
    let shadowed = Tracer::new(&scene, &config, &stats).cast(&ray, 2);
    assert_eq!(shadowed, expected);
}

#[test]
fn test_render_is_idempotent() {
    init_logging();
    let scene = nested_spheres_scene();
    let camera = nested_spheres_camera();

    let first = render_image(&scene, &camera, 24, 16, 3);
    let second = render_image(&scene, &camera, 24, 16, 3);

    assert_eq!(first, second);
}

#[test]
fn test_nesting_is_bounded_by_depth() {
    init_logging();
    let scene = nested_spheres_scene();
    let camera = nested_spheres_camera();

    for max_depth in 0..4 {
        let config = RenderConfig {
            max_depth,
            bucket_size: 8,
            ..Default::default()
        };
        let stats = RenderStats::new();
        render_image_with(&scene, &camera, 20, 16, &config, &stats);

        let snapshot = stats.snapshot();
        assert!(
            snapshot.deepest_nesting <= max_depth + 1,
            "depth {} nested {} levels",
            max_depth,
            snapshot.deepest_nesting
        );
        if max_depth > 0 {
            assert!(snapshot.deepest_nesting >= 2);
            assert!(snapshot.transmission_traces > 0);
        }
    }
}

#[test]
fn test_opaque_scene_never_traces_transmission() {
    let mut scene = Scene::new(Light::at(Vec3::new(0.0, 5.0, 5.0)));
    scene.add(
        primitives::cube(2.0),
        Material::default().with_reflectiveness(Vec3::splat(0.5)),
    );
    scene.add(wall(-3.0, 10.0), Material::default());

    let config = RenderConfig {
        max_depth: 5,
        ..Default::default()
    };
    let stats = RenderStats::new();
    let camera = Camera::new(Vec3::new(3.0, 2.0, 6.0), Vec3::ZERO, 1.0);
    render_image_with(&scene, &camera, 16, 16, &config, &stats);

    let snapshot = stats.snapshot();
    assert!(snapshot.hits > 0);
    assert_eq!(snapshot.transmission_traces, 0);
}

#[test]
fn test_half_opaque_sphere_shows_wall_behind() {
    let light = ambient_light(Vec3::ONE);
    let wall_ambient = Vec3::new(1.0, 0.5, 0.25);

    let mut scene = Scene::new(light);
    scene.add(
        primitives::uv_sphere(1.0, 12, 16),
        Material::new(Vec3::ZERO, Vec3::ZERO, Vec3::ZERO).with_opacity(Vec3::splat(0.5)),
    );
    scene.add(wall(-5.0, 10.0), Material::new(wall_ambient, Vec3::ZERO, Vec3::ZERO));

    let config = RenderConfig::default();
    let stats = RenderStats::new();
    let tracer = Tracer::new(&scene, &config, &stats);

    // Index 1 keeps the direction; the back exit reaches the wall, the
    // internally reflected exit leaves towards the camera and sees nothing
    let ray = Ray::new(Vec3::new(0.013, 0.021, 10.0), Vec3::NEG_Z);
    let color = tracer.cast(&ray, 3);

    assert!((color - 0.5 * wall_ambient).length() < 1e-4);
    assert_eq!(stats.snapshot().transmission_traces, 1);
}

#[test]
fn test_total_internal_reflection_emits_no_exit() {
    let cube = primitives::cube(2.0);
    let stats = RenderStats::new();
    // Meets the +X face at about 42 degrees, past the 30 degree critical
    // angle of index 2
    let direction = Vec3::new(1.0, 0.0, 0.9).normalize();

    let exits = trace_in_medium(&cube, Vec3::ZERO, direction, 0, 2.0, 1000.0, &stats);
    assert!(exits.is_empty());

    // The same ray at index 1.2 (critical angle about 56 degrees) leaves
    let exits = trace_in_medium(&cube, Vec3::ZERO, direction, 0, 1.2, 1000.0, &stats);
    assert_eq!(exits.len(), 1);
    assert!(exits[0].ray.direction.x > 0.0);
}

#[test]
fn test_config_from_json() {
    let config: RenderConfig =
        serde_json::from_str(r#"{ "max_depth": 2, "clamp_lighting": false }"#).unwrap();

    assert_eq!(config.max_depth, 2);
    assert!(!config.clamp_lighting);
    assert_eq!(config.bucket_size, 64);
    assert_eq!(config.far_distance, 1000.0);
}
