// Re-export glam for convenience
pub use glam;

// rtk math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Double-precision 3-vector used for directions.
pub type Vec3 = glam::DVec3;
/// Points share the vector representation.
pub type Point3 = glam::DVec3;
/// Linear RGB radiance. Components are unbounded.
pub type Color = glam::DVec3;

/// Mirror `d` about the unit normal `n`: `d - 2·dot(d, n)·n`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_reflect_flips_normal_component() {
        let normals = [
            Vec3::Y,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(-0.3, 0.2, 0.9).normalize(),
        ];
        let dirs = [
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(2.0, 3.0, -1.5),
        ];

        for n in normals {
            for d in dirs {
                let r = reflect(d, n);
                assert!((r.dot(n) + d.dot(n)).abs() < 1e-12);
                assert!((r.length() - d.length()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_reflect_head_on() {
        let r = reflect(Vec3::new(0.0, -2.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(0.0, 2.0, 0.0));
    }
}
