//! rtk renderer - CPU Whitted-style ray tracing
//!
//! Casts one primary ray per sample, resolves direct lighting from point
//! lights with shadow rays, follows mirror reflections up to a fixed depth,
//! and writes the result into a shared framebuffer from several scanline
//! worker threads.

mod bitmap;
mod camera;
mod error;
mod framebuffer;
mod height_field;
mod hittable;
mod light;
mod material;
mod renderer;
mod scene;
mod smooth_triangle;
mod sphere;
mod triangle;

pub use bitmap::{
    encode_bmp, map_to_bytes, map_to_bytes_normalized, save_bmp, to_rgb_image, ToneMap,
    BMP_HEADER_SIZE,
};
pub use camera::Camera;
pub use error::{BitmapError, RenderError, Result};
pub use framebuffer::{FrameBuffer, CHANNELS};
pub use height_field::HeightField;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use light::Light;
pub use material::{Material, MaterialId};
pub use renderer::{
    scanline_bands, ImageGuard, RenderConfig, RenderHandle, RenderStatus, Renderer,
};
pub use scene::{Scene, EPSILON};
pub use smooth_triangle::SmoothTriangle;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export vector and ray types from rtk_math
pub use rtk_math::{reflect, Aabb, Color, Interval, Point3, Ray, Vec3};
