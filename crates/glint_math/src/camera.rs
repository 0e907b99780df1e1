use glam::{Mat4, Vec3};

use crate::Ray;

/// Perspective camera shared by the rasterized preview and the ray tracer.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 65.0_f32.to_radians(),
            aspect,
            near: 1.0,
            far: 1000.0,
        }
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov_degrees(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y.to_radians();
        self
    }

    /// Set the near and far clip planes.
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Set the up direction.
    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix (camera → clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio (e.g., on window resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Map the center of pixel (px, py) back to world space.
    ///
    /// `depth` is the normalized device depth: 0 is the near plane and 1 the
    /// far plane. Pixel rows run top to bottom.
    pub fn unproject(&self, px: u32, py: u32, depth: f32, width: u32, height: u32) -> Vec3 {
        let ndc_x = (px as f32 + 0.5) / width as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (py as f32 + 0.5) / height as f32 * 2.0;

        let inverse = self.view_projection_matrix().inverse();
        inverse.project_point3(Vec3::new(ndc_x, ndc_y, depth))
    }

    /// Primary ray through pixel (px, py), running from the near plane
    /// towards the far plane.
    pub fn primary_ray(&self, px: u32, py: u32, width: u32, height: u32) -> Ray {
        let eye = self.unproject(px, py, 0.0, width, height);
        let end = self.unproject(px, py, 1.0, width, height);
        Ray::through(eye, end)
    }
}
