//! Height field surface.
//!
//! A rectangular grid of height samples tessellated into two triangles per
//! cell. The grid is centred on the origin in XZ, heights go along +Y.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    MaterialId, Ray, Triangle,
};
use rayon::prelude::*;
use rtk_math::{Aabb, Interval, Point3, Vec3};

/// Triangulated grid of height samples.
pub struct HeightField {
    /// Height samples indexed as `map_data[y][x]`
    pub map_data: Vec<Vec<f64>>,
    /// Grid spacing along X and Z
    pub step: f64,
    /// Multiplier applied to every sample
    pub height_scale: f64,
    material_id: Option<MaterialId>,
    geometry: HittableList,
}

impl HeightField {
    /// Create an `x_size` by `y_size` field filled with the default bowl.
    pub fn new(x_size: usize, y_size: usize) -> Self {
        let mut field = Self::flat(x_size, y_size);
        field.generate_bowl_data();
        field.generate_geometry(Vec3::ZERO);
        field
    }

    /// Create a zero-height field with no geometry generated yet.
    pub fn flat(x_size: usize, y_size: usize) -> Self {
        Self {
            map_data: vec![vec![0.0; x_size]; y_size],
            step: 1.0,
            height_scale: 1.0,
            material_id: None,
            geometry: HittableList::new(),
        }
    }

    /// Attach a material table entry. Applies on the next `generate_geometry`.
    pub fn with_material(mut self, id: MaterialId) -> Self {
        self.material_id = Some(id);
        self
    }

    /// Grid dimensions as `(x_size, y_size)`.
    pub fn dimensions(&self) -> (usize, usize) {
        let y_size = self.map_data.len();
        let x_size = self.map_data.first().map_or(0, Vec::len);
        (x_size, y_size)
    }

    /// Number of triangles currently generated.
    pub fn triangle_count(&self) -> usize {
        self.geometry.len()
    }

    /// Fill every sample with `func(x, y)`.
    pub fn generate_data<F>(&mut self, func: F)
    where
        F: Fn(f64, f64) -> f64,
    {
        for (y, row) in self.map_data.iter_mut().enumerate() {
            for (x, height) in row.iter_mut().enumerate() {
                *height = func(x as f64, y as f64);
            }
        }
    }

    /// Fill with the default paraboloid, lowest at the grid centre.
    pub fn generate_bowl_data(&mut self) {
        let (x_size, y_size) = self.dimensions();
        let center_x = x_size as f64 / 2.0;
        let center_y = y_size as f64 / 2.0;

        self.generate_data(|x, y| {
            let dx = x - center_x;
            let dy = y - center_y;
            dx * dx + dy * dy
        });
    }

    /// Rebuild the triangle mesh from `map_data`, offset by `translate`.
    pub fn generate_geometry(&mut self, translate: Vec3) {
        self.geometry.clear();

        let (x_size, y_size) = self.dimensions();
        if x_size < 2 || y_size < 2 {
            return;
        }

        let center_x = x_size as f64 / 2.0;
        let center_y = y_size as f64 / 2.0;
        let map = &self.map_data;
        let step = self.step;
        let scale = self.height_scale;
        let material_id = self.material_id;

        let vertex = |x: usize, y: usize| -> Point3 {
            Point3::new(
                (x as f64 - center_x) * step,
                map[y][x] * scale,
                (y as f64 - center_y) * step,
            ) + translate
        };

        let triangles: Vec<Box<dyn Hittable>> = (0..y_size - 1)
            .into_par_iter()
            .flat_map_iter(|y| {
                (0..x_size - 1).flat_map(move |x| {
                    let p1 = vertex(x, y);
                    let p2 = vertex(x + 1, y);
                    let p3 = vertex(x + 1, y + 1);
                    let p4 = vertex(x, y + 1);
                    [
                        cell_triangle(p1, p2, p3, material_id),
                        cell_triangle(p1, p3, p4, material_id),
                    ]
                })
            })
            .collect();

        log::debug!(
            "Height field {}x{} tessellated into {} triangles",
            x_size,
            y_size,
            triangles.len()
        );
        self.geometry.extend(triangles);
    }
}

fn cell_triangle(a: Point3, b: Point3, c: Point3, material_id: Option<MaterialId>) -> Box<dyn Hittable> {
    let tri = Triangle::new(a, b, c);
    Box::new(match material_id {
        Some(id) => tri.with_material(id),
        None => tri,
    })
}

impl Hittable for HeightField {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.geometry.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Option<Aabb> {
        self.geometry.bounding_box()
    }
}
