//! Flat triangle primitive.
//!
//! Intersects the supporting plane first, then runs a same-side test against
//! all three edges. Surface coordinates are barycentric: the hit is
//! `a + u·(b - a) + v·(c - a)`.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use rtk_math::{Aabb, Interval, Point3};

/// Unnormalised normals shorter than this mark a degenerate triangle.
const DEGENERATE_NORMAL: f64 = 1e-4;
/// Rays this close to parallel with the plane are rejected.
const GRAZING_COSINE: f64 = 1e-4;

/// A triangle with a single geometric normal.
#[derive(Debug, Clone)]
pub struct Triangle {
    a: Point3,
    b: Point3,
    c: Point3,
    material_id: Option<MaterialId>,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            a,
            b,
            c,
            material_id: None,
        }
    }

    /// Attach a material table entry.
    pub fn with_material(mut self, id: MaterialId) -> Self {
        self.material_id = Some(id);
        self
    }

    pub fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }

    /// Centroid of the three vertices.
    pub fn centroid(&self) -> Point3 {
        (self.a + self.b + self.c) / 3.0
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let ab = self.b - self.a;
        let bc = self.c - self.b;
        let ca = self.a - self.c;

        let normal = ab.cross(ca);
        let normal_len = normal.length();
        if normal_len < DEGENERATE_NORMAL {
            return None;
        }
        let normal = normal / normal_len;

        let den = normal.dot(ray.direction());
        if den.abs() < GRAZING_COSINE {
            return None;
        }

        let t = normal.dot(self.a - ray.origin()) / den;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let a_to_hit = p - self.a;
        let c_to_hit = p - self.c;

        // Inside when the hit lies on the same side of every edge
        let side_ab = normal.cross(ab).dot(a_to_hit) >= 0.0;
        let side_bc = normal.cross(bc).dot(c_to_hit) >= 0.0;
        let side_ca = normal.cross(ca).dot(a_to_hit) >= 0.0;
        if side_ab != side_bc || side_ab != side_ca {
            return None;
        }

        // Signed sub-triangle areas over the full area
        let ac = -ca;
        let area = ab.cross(ac);
        let area_sq = area.length_squared();
        let u = area.dot(a_to_hit.cross(ac)) / area_sq;
        let v = area.dot(ab.cross(a_to_hit)) / area_sq;

        Some(HitRecord {
            p,
            normal,
            t,
            u,
            v,
            material_id: self.material_id,
            front_face: den < 0.0,
        })
    }

    fn bounding_box(&self) -> Option<Aabb> {
        Some(Aabb::enclosing(&self.vertices()))
    }
}
