//! Point lights.

use rtk_math::{Color, Point3, Vec3};
use serde::{Deserialize, Serialize};

/// Positional light with polynomial distance falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Point3,
    pub color: Color,
    /// Constant, linear and quadratic coefficients `(a, b, c)`
    pub attenuation: Vec3,
}

impl Light {
    /// White light with no falloff.
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            color: Color::ONE,
            attenuation: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_attenuation(mut self, a: f64, b: f64, c: f64) -> Self {
        self.attenuation = Vec3::new(a, b, c);
        self
    }

    /// Radiance arriving over the offset `to_light`, i.e. `color / (a + b·d + c·d²)`.
    pub fn intensity(&self, to_light: Vec3) -> Color {
        let d2 = to_light.length_squared();
        let d = d2.sqrt();
        let falloff = self.attenuation.x + self.attenuation.y * d + self.attenuation.z * d2;
        self.color / falloff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_attenuation() {
        let light = Light::new(Point3::ZERO).with_color(Color::new(0.5, 1.0, 2.0));
        assert_eq!(light.intensity(Vec3::new(0.0, 30.0, 0.0)), Color::new(0.5, 1.0, 2.0));
    }

    #[test]
    fn test_polynomial_falloff() {
        let light = Light::new(Point3::ZERO).with_attenuation(1.0, 0.5, 0.25);
        // d = 2 -> 1 + 1 + 1
        let i = light.intensity(Vec3::new(0.0, 0.0, 2.0));
        assert!((i - Color::splat(1.0 / 3.0)).length() < 1e-12);
    }
}
