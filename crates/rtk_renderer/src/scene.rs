//! Scene description and recursive shading.

use crate::{Hittable, Light, Material, MaterialId, Ray};
use rtk_math::{reflect, Color, Interval};

/// Offset used for primary, reflected and shadow rays to avoid self-hits.
pub const EPSILON: f64 = 0.001;

/// Everything the renderer needs to shade a ray.
///
/// Built once, then shared read-only between worker threads.
pub struct Scene {
    /// Returned for rays that escape the world
    pub background: Color,
    pub world: Option<Box<dyn Hittable>>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
}

impl Scene {
    /// Empty scene with a black background.
    pub fn new() -> Self {
        Self {
            background: Color::ZERO,
            world: None,
            lights: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn with_world(mut self, world: impl Hittable + 'static) -> Self {
        self.world = Some(Box::new(world));
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Append to the material table and return the new entry's id.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Look up a material, treating missing or out-of-range ids as "none".
    pub fn material(&self, id: Option<MaterialId>) -> Option<&Material> {
        id.and_then(|id| self.materials.get(id))
    }

    /// Radiance carried back along `ray`, following at most `depth` bounces.
    ///
    /// Sums diffuse light from every unoccluded point light plus the mirror
    /// reflection weighted by the material's reflective colour. Lighting uses
    /// `|cos|`, so back faces are lit as well.
    pub fn ray_color(&self, ray: &Ray, depth: u32) -> Color {
        if depth == 0 {
            return Color::ZERO;
        }

        let Some(world) = self.world.as_deref() else {
            return self.background;
        };

        let Some(rec) = world.hit(ray, Interval::after(EPSILON)) else {
            return self.background;
        };

        let material = self.material(rec.material_id);
        let diffuse = material.map_or(Color::ZERO, |m| m.diffuse);

        let mut direct = Color::ZERO;
        for light in &self.lights {
            let to_light = light.position - rec.p;
            let distance = to_light.length();
            // A light on the surface has no direction to shade from
            if distance <= EPSILON {
                continue;
            }
            let shadow_ray = Ray::new(rec.p, to_light / distance);
            if world
                .hit(&shadow_ray, Interval::new(EPSILON, distance - EPSILON))
                .is_some()
            {
                continue;
            }

            let cos_light = rec.normal.dot(to_light).abs() / distance;
            direct += cos_light * light.intensity(to_light) * diffuse;
        }

        let reflected = match material {
            Some(m) => {
                let reflect_ray = Ray::new(rec.p, reflect(ray.direction(), rec.normal));
                m.reflective * self.ray_color(&reflect_ray, depth - 1)
            }
            None => Color::ZERO,
        };

        direct + reflected
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HittableList, Sphere, Triangle};
    use rtk_math::{Point3, Vec3};

    fn close(a: Color, b: Color) -> bool {
        (a - b).length() < 1e-9
    }

    /// White sphere of radius 10 at the origin lit from (0, 100, 0).
    fn lit_sphere_scene(occluded: bool) -> Scene {
        let mut scene = Scene::new();
        let white = scene.add_material(Material::diffuse(Color::ONE));

        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(Point3::ZERO, 10.0).with_material(white)));
        if occluded {
            // Quad at y = 60 between the sphere top and the light; its
            // diagonal stays clear of the x = z = 0 shadow ray
            let corners = [
                Point3::new(-20.0, 60.0, -25.0),
                Point3::new(30.0, 60.0, -25.0),
                Point3::new(30.0, 60.0, 20.0),
                Point3::new(-20.0, 60.0, 20.0),
            ];
            world.add(Box::new(Triangle::new(corners[0], corners[1], corners[2])));
            world.add(Box::new(Triangle::new(corners[0], corners[2], corners[3])));
        }

        scene.add_light(Light::new(Point3::new(0.0, 100.0, 0.0)).with_attenuation(1.0, 0.0, 0.0));
        scene.with_world(world)
    }

    fn down_ray() -> Ray {
        Ray::new(Point3::new(0.0, 50.0, 0.0), Vec3::NEG_Y)
    }

    #[test]
    fn test_depth_zero_is_black() {
        let scene = lit_sphere_scene(false).with_background(Color::ONE);
        assert_eq!(scene.ray_color(&down_ray(), 0), Color::ZERO);

        let miss = Ray::new(Point3::new(0.0, 50.0, 0.0), Vec3::Y);
        assert_eq!(scene.ray_color(&miss, 0), Color::ZERO);
    }

    #[test]
    fn test_miss_returns_background() {
        let background = Color::new(0.1, 0.2, 0.3);
        let scene = lit_sphere_scene(false).with_background(background);
        let miss = Ray::new(Point3::new(0.0, 50.0, 0.0), Vec3::Y);
        assert_eq!(scene.ray_color(&miss, 5), background);
    }

    #[test]
    fn test_head_on_light_gives_full_diffuse() {
        let scene = lit_sphere_scene(false);
        assert!(close(scene.ray_color(&down_ray(), 1), Color::ONE));
    }

    #[test]
    fn test_occluder_blocks_light() {
        let scene = lit_sphere_scene(true);
        assert_eq!(scene.ray_color(&down_ray(), 1), Color::ZERO);
        assert_eq!(scene.ray_color(&down_ray(), 4), Color::ZERO);
    }

    #[test]
    fn test_back_faces_are_lit() {
        // Light inside a hollow sphere, shaded point on the inner wall
        let mut scene = Scene::new();
        let white = scene.add_material(Material::diffuse(Color::ONE));
        scene.add_light(Light::new(Point3::ZERO));
        let scene = scene.with_world(Sphere::new(Point3::ZERO, 5.0).with_material(white));

        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(close(scene.ray_color(&ray, 1), Color::ONE));
    }

    #[test]
    fn test_out_of_range_material_contributes_nothing() {
        let mut scene = Scene::new().with_background(Color::splat(0.5));
        scene.add_light(Light::new(Point3::new(0.0, 100.0, 0.0)));
        let scene = scene.with_world(Sphere::new(Point3::ZERO, 10.0).with_material(42));

        assert_eq!(scene.ray_color(&down_ray(), 3), Color::ZERO);
        assert!(scene.material(Some(42)).is_none());
        assert!(scene.material(None).is_none());
    }

    #[test]
    fn test_mirror_reflects_background() {
        let mut scene = Scene::new().with_background(Color::new(0.2, 0.4, 0.6));
        let mirror = scene.add_material(Material::mirror(Color::splat(0.5)));
        scene.add_light(Light::new(Point3::new(0.0, 100.0, 0.0)));
        let scene = scene.with_world(Sphere::new(Point3::ZERO, 10.0).with_material(mirror));

        // Reflected ray escapes straight up into the background
        assert!(close(scene.ray_color(&down_ray(), 2), Color::new(0.1, 0.2, 0.3)));
        // Without a bounce left the reflection gathers nothing
        assert_eq!(scene.ray_color(&down_ray(), 1), Color::ZERO);
    }

    #[test]
    fn test_light_on_hit_point_is_skipped() {
        let mut scene = lit_sphere_scene(false);
        // Exactly where the down ray meets the sphere top
        scene.add_light(Light::new(Point3::new(0.0, 10.0, 0.0)));

        let color = scene.ray_color(&down_ray(), 1);
        assert!(color.is_finite(), "color = {color:?}");
        assert!(close(color, Color::ONE));
    }

    #[test]
    fn test_no_world_returns_background() {
        let scene = Scene::new().with_background(Color::X);
        assert_eq!(scene.ray_color(&down_ray(), 3), Color::X);
    }
}
