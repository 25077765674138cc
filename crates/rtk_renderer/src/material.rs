//! Reflectance records stored in the scene's material table.

use rtk_math::Color;
use serde::{Deserialize, Serialize};

/// Index into [`crate::Scene::materials`].
pub type MaterialId = usize;

/// Phong-style reflectance coefficients.
///
/// Only `diffuse` and `reflective` take part in shading. The remaining terms
/// are carried so scenes can describe them, but are never summed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub reflective: Color,
    /// Specular exponent
    pub spec_k: f64,
    pub emissive: Color,
    pub refractive: Color,
}

impl Material {
    /// Purely diffuse surface.
    pub fn diffuse(color: Color) -> Self {
        Self {
            diffuse: color,
            ..Self::default()
        }
    }

    /// Perfect mirror tinted by `color`, with no diffuse response.
    pub fn mirror(color: Color) -> Self {
        Self {
            reflective: color,
            ..Self::default()
        }
    }

    /// Set the mirror reflection coefficient.
    pub fn with_reflective(mut self, reflective: Color) -> Self {
        self.reflective = reflective;
        self
    }

    /// Set the specular colour and exponent.
    pub fn with_specular(mut self, specular: Color, spec_k: f64) -> Self {
        self.specular = specular;
        self.spec_k = spec_k;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            reflective: Color::ZERO,
            spec_k: 1.0,
            emissive: Color::ZERO,
            refractive: Color::ZERO,
        }
    }
}
