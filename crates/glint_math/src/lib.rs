// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod camera;
mod interval;
mod ray;

pub use camera::Camera;
pub use interval::Interval;
pub use ray::{Ray, TriangleHit, PARALLEL_EPSILON};
