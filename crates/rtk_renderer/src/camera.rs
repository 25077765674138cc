//! Pinhole camera for ray generation.

use crate::Ray;
use rtk_math::{Point3, Vec3};

/// Pinhole camera mapping normalised image coordinates to primary rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Point3,
    look_at: Point3,
    vup: Vec3,

    // Lens settings
    vfov: f64,         // Vertical field of view in degrees
    aspect_ratio: f64, // Viewport width / height
    focus_dist: f64,   // Distance from camera to the image plane

    // Cached computed values (set by initialize())
    origin: Point3,
    lower_left_corner: Point3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Create a camera at the origin looking down -Z with a 90° field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
            focus_dist: 1.0,
            origin: Point3::ZERO,
            lower_left_corner: Point3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.focus_dist = focus_dist;
        self
    }

    /// Set viewport aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Reposition the camera and recompute the viewport.
    pub fn update(
        &mut self,
        look_from: Point3,
        look_at: Point3,
        vup: Vec3,
        vfov: f64,
        aspect_ratio: f64,
        focus_dist: f64,
    ) {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.vfov = vfov;
        self.aspect_ratio = aspect_ratio;
        self.focus_dist = focus_dist;
        self.initialize();
    }

    /// Recompute the viewport (call after the builder methods).
    pub fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        self.origin = self.look_from;
        self.horizontal = self.focus_dist * viewport_width * u;
        self.vertical = self.focus_dist * viewport_height * v;
        self.lower_left_corner =
            self.origin - self.horizontal / 2.0 - self.vertical / 2.0 - self.focus_dist * w;
    }

    /// Ray through viewport coordinates `(s, t)` in `[0, 1]`, `t = 0` at the bottom.
    pub fn get_ray(&self, s: f64, t: f64) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin,
        )
    }

    pub fn look_from(&self) -> Point3 {
        self.look_from
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let mut camera = Camera::new()
            .with_position(Point3::new(0.0, 0.0, 50.0), Point3::ZERO, Vec3::Y)
            .with_lens(40.0, 1.0);
        camera.initialize();

        let ray = camera.get_ray(0.5, 0.5);
        assert_eq!(ray.origin(), Point3::new(0.0, 0.0, 50.0));
        assert!((ray.direction().normalize() - Vec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_corners_follow_basis() {
        let camera = Camera::new();

        // 90° fov, unit focus distance: viewport spans [-1, 1]
        let bottom_left = camera.get_ray(0.0, 0.0).direction();
        let top_right = camera.get_ray(1.0, 1.0).direction();
        assert!((bottom_left - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-12);
        assert!((top_right - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_update_recomputes_viewport() {
        let mut camera = Camera::new();
        camera.update(
            Point3::new(278.0, 200.0, -800.0),
            Point3::new(277.5, 277.5, 276.0),
            Vec3::Y,
            50.0,
            2.0,
            1.0,
        );

        assert_eq!(camera.look_from(), Point3::new(278.0, 200.0, -800.0));
        assert_eq!(camera.aspect_ratio(), 2.0);

        let left = camera.get_ray(0.0, 0.5).direction();
        let right = camera.get_ray(1.0, 0.5).direction();
        let up = camera.get_ray(0.5, 1.0).direction();
        let down = camera.get_ray(0.5, 0.0).direction();
        // Horizontal extent is twice the vertical one
        assert!(((right - left).length() / (up - down).length() - 2.0).abs() < 1e-9);
    }
}
