//! Built-in demo scenes.

use clap::ValueEnum;
use rtk_math::{Color, Point3, Vec3};
use rtk_renderer::{
    Camera, HeightField, HittableList, Light, Material, MaterialId, Scene, Sphere, Triangle,
};
use std::f64::consts::PI;

/// Side length of the Cornell box.
const BOX_SIZE: f64 = 555.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DemoScene {
    /// Cornell box with a mirrored height field and sphere
    #[default]
    Cornell,
    /// A single white sphere lit head-on
    Sphere,
}

impl DemoScene {
    /// Build the scene and a camera framing it at `aspect_ratio`.
    pub fn build(self, aspect_ratio: f64) -> (Scene, Camera) {
        match self {
            DemoScene::Cornell => (cornell_scene(), cornell_camera(aspect_ratio)),
            DemoScene::Sphere => (sphere_scene(), sphere_camera(aspect_ratio)),
        }
    }
}

/// Two triangles spanning the quad `a b c d`, wound in that order.
fn add_quad(world: &mut HittableList, corners: [Point3; 4], material: MaterialId) {
    let [a, b, c, d] = corners;
    world.add(Box::new(Triangle::new(a, b, c).with_material(material)));
    world.add(Box::new(Triangle::new(a, c, d).with_material(material)));
}

fn cornell_box(world: &mut HittableList, scene: &mut Scene) {
    let red = scene.add_material(Material::diffuse(Color::new(0.65, 0.05, 0.05)));
    let white = scene.add_material(Material::diffuse(Color::splat(0.73)));
    let green = scene.add_material(Material::diffuse(Color::new(0.12, 0.45, 0.15)));

    let s = BOX_SIZE;
    let p = Point3::new;

    // Left and right walls
    add_quad(world, [p(s, 0.0, 0.0), p(s, s, 0.0), p(s, s, s), p(s, 0.0, s)], green);
    add_quad(world, [p(0.0, 0.0, 0.0), p(0.0, 0.0, s), p(0.0, s, s), p(0.0, s, 0.0)], red);
    // Floor and back wall; the ceiling stays open
    add_quad(world, [p(0.0, 0.0, 0.0), p(s, 0.0, 0.0), p(s, 0.0, s), p(0.0, 0.0, s)], white);
    add_quad(world, [p(0.0, 0.0, s), p(s, 0.0, s), p(s, s, s), p(0.0, s, s)], white);
}

/// Mirrored 20x20 height field: a shallow bowl with a diagonal ripple.
fn wavy_height_field(material: MaterialId, translate: Vec3) -> HeightField {
    let mut field = HeightField::flat(20, 20).with_material(material);
    field.step = 2.5;

    let (x_size, y_size) = field.dimensions();
    let center_x = x_size as f64 / 2.0;
    let center_y = y_size as f64 / 2.0;
    field.generate_data(|x, y| {
        let dx = (x - center_x) * 2.5;
        let dy = (y - center_y) * 2.5;
        (dx * dx + dy * dy) * 0.15 + (2.0 * PI * (dx + dy) / 40.0).cos() * 15.0
    });
    field.generate_geometry(translate);
    field
}

pub fn cornell_scene() -> Scene {
    let mut scene = Scene::new();
    let mut world = HittableList::new();

    cornell_box(&mut world, &mut scene);

    let light_pos = Point3::new(BOX_SIZE / 2.0, 50.0, BOX_SIZE / 2.0);
    let metal = scene.add_material(Material::mirror(Color::splat(0.95)));
    world.add(Box::new(wavy_height_field(metal, light_pos + Vec3::new(0.0, -30.0, 0.0))));

    let chrome = scene.add_material(
        Material::diffuse(Color::splat(0.1)).with_reflective(Color::new(0.8, 0.85, 0.88)),
    );
    world.add(Box::new(Sphere::new(Point3::new(400.0, 90.0, 380.0), 90.0).with_material(chrome)));

    scene.add_light(Light::new(light_pos));
    scene.add_light(Light::new(Point3::new(200.0, 100.0, -50.0)));

    scene.with_world(world)
}

pub fn cornell_camera(aspect_ratio: f64) -> Camera {
    let mut camera = Camera::new()
        .with_position(
            Point3::new(278.0, 200.0, -800.0),
            Point3::new(277.5, 277.5, 276.0),
            Vec3::Y,
        )
        .with_lens(50.0, 1.0)
        .with_aspect_ratio(aspect_ratio);
    camera.initialize();
    camera
}

pub fn sphere_scene() -> Scene {
    let mut scene = Scene::new();
    let white = scene.add_material(Material::diffuse(Color::ONE));
    scene.add_light(Light::new(Point3::new(0.0, 0.0, 100.0)));
    scene.with_world(Sphere::new(Point3::ZERO, 10.0).with_material(white))
}

pub fn sphere_camera(aspect_ratio: f64) -> Camera {
    let mut camera = Camera::new()
        .with_position(Point3::new(0.0, 0.0, 50.0), Point3::ZERO, Vec3::Y)
        .with_lens(40.0, 1.0)
        .with_aspect_ratio(aspect_ratio);
    camera.initialize();
    camera
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtk_math::Interval;
    use rtk_renderer::Hittable;

    #[test]
    fn test_cornell_scene_contents() {
        let scene = cornell_scene();
        assert_eq!(scene.lights.len(), 2);
        // red, white, green, height field metal, sphere chrome
        assert_eq!(scene.materials.len(), 5);
        assert!(scene.world.is_some());
    }

    #[test]
    fn test_height_field_tessellation() {
        let field = wavy_height_field(0, Vec3::ZERO);
        assert_eq!(field.triangle_count(), 19 * 19 * 2);
    }

    #[test]
    fn test_camera_sees_back_wall() {
        let scene = cornell_scene();
        let camera = cornell_camera(1.0);
        let world = scene.world.as_ref().unwrap();

        // The centre ray passes over the height field to the back wall
        let ray = camera.get_ray(0.5, 0.5);
        let hit = world.hit(&ray, Interval::after(0.001)).unwrap();
        assert!((hit.p.z - BOX_SIZE).abs() < 1e-6, "hit at {:?}", hit.p);
    }

    #[test]
    fn test_sphere_scene_center_is_lit() {
        let scene = sphere_scene();
        let camera = sphere_camera(1.0);
        let color = scene.ray_color(&camera.get_ray(0.5, 0.5), 1);
        assert!((color - Color::ONE).length() < 1e-9);
    }
}
