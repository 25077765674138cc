//! Triangle with per-vertex normals for smooth shading.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray, Triangle,
};
use rtk_math::{Aabb, Interval, Point3, Vec3};

/// A flat triangle whose shading normal is interpolated from vertex normals.
///
/// The hit point and `t` come from the flat intersection; only the normal
/// is replaced.
#[derive(Debug, Clone)]
pub struct SmoothTriangle {
    triangle: Triangle,
    n_a: Vec3,
    n_b: Vec3,
    n_c: Vec3,
}

impl SmoothTriangle {
    pub fn new(a: Point3, b: Point3, c: Point3, n_a: Vec3, n_b: Vec3, n_c: Vec3) -> Self {
        Self {
            triangle: Triangle::new(a, b, c),
            n_a,
            n_b,
            n_c,
        }
    }

    /// Attach a material table entry.
    pub fn with_material(mut self, id: MaterialId) -> Self {
        self.triangle = self.triangle.with_material(id);
        self
    }

    /// Interpolated normal for surface coordinates `(u, v)`.
    pub fn normal_at(&self, u: f64, v: f64) -> Vec3 {
        let k_a = 1.0 - u - v;
        (k_a * self.n_a + u * self.n_b + v * self.n_c).normalize_or_zero()
    }
}

impl Hittable for SmoothTriangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut rec = self.triangle.hit(ray, ray_t)?;
        let normal = self.normal_at(rec.u, rec.v);
        if normal != Vec3::ZERO {
            rec.normal = normal;
        }
        Some(rec)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.triangle.bounding_box()
    }
}
