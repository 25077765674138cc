//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use rtk_math::{Aabb, Interval, Point3, Vec3};
use std::f64::consts::PI;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material_id: Option<MaterialId>,
}

impl Sphere {
    /// Create a new sphere with no material.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material_id: None,
        }
    }

    /// Attach a material table entry.
    pub fn with_material(mut self, id: MaterialId) -> Self {
        self.material_id = Some(id);
        self
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        if self.radius <= 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        let (u, v) = Self::get_sphere_uv(outward_normal);

        Some(HitRecord {
            p,
            normal: outward_normal,
            t: root,
            u,
            v,
            material_id: self.material_id,
            front_face: ray.direction().dot(outward_normal) < 0.0,
        })
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        Some(Aabb::from_points(self.center - rvec, self.center + rvec))
    }
}
