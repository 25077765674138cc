//! Hittable trait and HitRecord for ray-object intersection.

use crate::{MaterialId, Ray};
use rtk_math::{Aabb, Interval, Point3, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Point3,
    /// Unit surface normal at the intersection
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Surface coordinates
    pub u: f64,
    pub v: f64,
    /// Index into the scene's material table, if the surface has one
    pub material_id: Option<MaterialId>,
    /// Whether the ray arrived against the normal
    pub front_face: bool,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection with `t` strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;

    /// Bounds of the object, or `None` if it cannot be bounded.
    fn bounding_box(&self) -> Option<Aabb>;
}

/// An unordered aggregate of owned surfaces, tested exhaustively.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Box<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Box<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Extend<Box<dyn Hittable>> for HittableList {
    fn extend<I: IntoIterator<Item = Box<dyn Hittable>>>(&mut self, iter: I) {
        self.objects.extend(iter);
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Option<Aabb> {
        let mut boxes = self.objects.iter().map(|o| o.bounding_box());
        let first = boxes.next()??;
        boxes.try_fold(first, |acc, b| Some(Aabb::surrounding(&acc, &b?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;

    #[test]
    fn test_list_returns_closest_hit() {
        let mut list = HittableList::new();
        list.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0).with_material(1)));
        list.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0).with_material(0)));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = list.hit(&ray, Interval::after(0.001)).unwrap();

        assert!((rec.t - 3.0).abs() < 1e-9);
        assert_eq!(rec.material_id, Some(0));
    }

    #[test]
    fn test_list_respects_interval() {
        let mut list = HittableList::new();
        list.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0)));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(list.hit(&ray, Interval::new(0.001, 5.0)).is_none());
    }

    #[test]
    fn test_empty_list() {
        let list = HittableList::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(list.is_empty());
        assert!(list.hit(&ray, Interval::UNIVERSE).is_none());
        assert!(list.bounding_box().is_none());
    }

    #[test]
    fn test_list_bounding_box() {
        let list = HittableList::from(vec![
            Box::new(Sphere::new(Vec3::ZERO, 1.0)) as Box<dyn Hittable>,
            Box::new(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0)),
        ]);

        let bbox = list.bounding_box().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(bbox.min(), Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(6.0, 1.0, 1.0));
    }
}
