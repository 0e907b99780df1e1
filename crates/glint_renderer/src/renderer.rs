//! Image assembly.
//!
//! The image is split into buckets that rayon renders in parallel, center
//! buckets first. Each worker writes only its own bucket; the buckets are
//! stitched into the final buffer after every one of them has finished, so
//! a caller never sees a partially written image.

use std::time::Instant;

use glint_core::{Color, Scene};
use glint_math::{Camera, Interval};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::stats::RenderStats;
use crate::tracer::Tracer;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Recursion budget for reflection and refraction
    pub max_depth: u32,
    /// Color of rays that hit nothing
    pub background: Color,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Clamp negative lighting cosines to zero
    pub clamp_lighting: bool,
    /// Largest ray parameter considered a hit
    pub far_distance: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            background: Color::ZERO,
            bucket_size: DEFAULT_BUCKET_SIZE,
            clamp_lighting: true,
            far_distance: 1000.0,
        }
    }
}

/// Convert a linear color to 8-bit RGB.
///
/// Channels are scaled by 255 and clamped to [0, 255]; no gamma is applied.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let range = Interval::new(0.0, 255.0);
    [
        range.clamp(255.0 * color.x) as u8,
        range.clamp(255.0 * color.y) as u8,
        range.clamp(255.0 * color.z) as u8,
    ]
}

/// Rendered pixels, row-major with the top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (row, line) in result.pixels.chunks(bucket.width as usize).enumerate() {
            let start = ((bucket.y + row as u32) * self.width + bucket.x) as usize;
            self.pixels[start..start + line.len()].copy_from_slice(line);
        }
    }

    /// Convert to packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb8(*c)).collect()
    }

    /// Convert to RGBA bytes (for display).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            let [r, g, b] = color_to_rgb8(*color);
            bytes.extend_from_slice(&[r, g, b, 255]);
        }
        bytes
    }
}

/// Render `scene` as seen by `camera` with the default configuration and
/// the given recursion budget.
pub fn render_image(
    scene: &Scene,
    camera: &Camera,
    width: u32,
    height: u32,
    max_depth: u32,
) -> ImageBuffer {
    let config = RenderConfig {
        max_depth,
        ..Default::default()
    };
    let stats = RenderStats::new();
    render_image_with(scene, camera, width, height, &config, &stats)
}

/// Render with an explicit configuration, collecting diagnostics in `stats`.
///
/// The camera's aspect ratio is replaced by `width / height`.
pub fn render_image_with(
    scene: &Scene,
    camera: &Camera,
    width: u32,
    height: u32,
    config: &RenderConfig,
    stats: &RenderStats,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(width, height);
    if width == 0 || height == 0 {
        return image;
    }

    let mut camera = *camera;
    camera.set_aspect(width as f32 / height as f32);

    let buckets = generate_buckets(width, height, config.bucket_size.max(1));
    log::info!(
        "Rendering {}x{} at depth {}: {} objects, {} triangles, {} buckets on {} threads",
        width,
        height,
        config.max_depth,
        scene.object_count(),
        scene.total_triangle_count(),
        buckets.len(),
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let tracer = Tracer::new(scene, config, stats);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, &camera, &tracer, width, height))
        .collect();

    for result in &results {
        image.write_bucket(result);
    }

    let snapshot = stats.snapshot();
    log::info!(
        "Finished in {} ms: {} intersection tests, {} hits, {} casts, {} transmission traces, {} missing exits, deepest nesting {}",
        start.elapsed().as_millis(),
        snapshot.intersection_tests,
        snapshot.hits,
        snapshot.casts,
        snapshot.transmission_traces,
        snapshot.missing_exits,
        snapshot.deepest_nesting
    );

    image
}
