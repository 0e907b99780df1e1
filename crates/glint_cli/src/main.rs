// Render a JSON scene description and print a terminal preview.
// Run with: cargo run --release --bin glint -- <scene.json> [width] [height] [max_depth]

use anyhow::{bail, Context, Result};
use glint_core::load_scene;
use glint_math::Vec3;
use glint_renderer::{render_image_with, ImageBuffer, RenderConfig, RenderStats};

const DEFAULT_WIDTH: u32 = 160;
const DEFAULT_HEIGHT: u32 = 90;

/// Characters from dark to bright.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Widest preview printed to the terminal.
const PREVIEW_COLUMNS: u32 = 80;

struct Args {
    scene: String,
    width: u32,
    height: u32,
    max_depth: Option<u32>,
}

fn parse_args() -> Result<Args> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        bail!(
            "Usage: {} <scene.json> [width] [height] [max_depth]",
            args.first().map(String::as_str).unwrap_or("glint")
        );
    }

    let number = |index: usize, name: &str| -> Result<Option<u32>> {
        args.get(index)
            .map(|value| {
                value
                    .parse::<u32>()
                    .with_context(|| format!("Invalid {}: '{}'", name, value))
            })
            .transpose()
    };

    Ok(Args {
        scene: args[1].clone(),
        width: number(2, "width")?.unwrap_or(DEFAULT_WIDTH),
        height: number(3, "height")?.unwrap_or(DEFAULT_HEIGHT),
        max_depth: number(4, "max_depth")?,
    })
}

/// Print the image as ASCII art, two image rows per text line.
fn print_preview(image: &ImageBuffer) {
    let step = image.width.div_ceil(PREVIEW_COLUMNS).max(1);
    let weights = Vec3::new(0.2126, 0.7152, 0.0722);

    for y in (0..image.height).step_by(2 * step as usize) {
        let line: String = (0..image.width)
            .step_by(step as usize)
            .map(|x| {
                let luminance = image.get(x, y).dot(weights).clamp(0.0, 1.0);
                let index = (luminance * (RAMP.len() - 1) as f32).round() as usize;
                RAMP[index] as char
            })
            .collect();
        println!("{}", line);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = parse_args()?;
    log::info!("Starting glint");

    let loaded = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene))?;

    let config = RenderConfig {
        max_depth: args
            .max_depth
            .or(loaded.max_depth)
            .unwrap_or(RenderConfig::default().max_depth),
        ..Default::default()
    };

    let stats = RenderStats::new();
    let image = render_image_with(
        &loaded.scene,
        &loaded.camera,
        args.width,
        args.height,
        &config,
        &stats,
    );

    let snapshot = stats.snapshot();
    log::info!(
        "tests: {}, hits: {}, casts: {}",
        snapshot.intersection_tests,
        snapshot.hits,
        snapshot.casts
    );

    print_preview(&image);

    Ok(())
}
