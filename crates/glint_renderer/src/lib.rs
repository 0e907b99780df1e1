//! Glint Renderer - recursive CPU ray tracing.
//!
//! A Whitted-style ray tracer over triangle meshes: brute-force nearest-hit
//! queries, ambient + Phong shading with shadow rays, mirror reflection and
//! refraction through closed transparent solids. Pixels are rendered in
//! parallel buckets with rayon.

mod bucket;
mod intersect;
mod optics;
mod renderer;
mod shading;
mod stats;
mod tracer;
mod transmission;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use intersect::{
    intersect_medium_exit, intersect_nearest, is_visible, HitRecord, MediumExit, SHADOW_EPSILON,
};
pub use optics::{is_total_internal_reflection, reflect, refract};
pub use renderer::{color_to_rgb8, render_image, render_image_with, ImageBuffer, RenderConfig};
pub use shading::{ambient, direct};
pub use stats::{RenderStats, StatsSnapshot};
pub use tracer::Tracer;
pub use transmission::{trace_in_medium, ExitRay, RAY_OFFSET};

/// Re-export the color type from glint_core
pub use glint_core::Color;
