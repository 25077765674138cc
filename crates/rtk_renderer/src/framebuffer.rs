//! Floating-point framebuffer shared between scanline workers.
//!
//! Pixels are stored as `f64` bit patterns in atomics so that workers owning
//! disjoint rows can write without a lock. Row 0 is the top of the image and
//! each pixel holds its channels in B, G, R order, which is the byte order of
//! a 24-bit bitmap.

use rtk_math::Color;
use std::sync::atomic::{AtomicU64, Ordering};

/// Channels stored per pixel.
pub const CHANNELS: usize = 3;

/// Row-major radiance buffer, `CHANNELS` values per pixel.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    data: Vec<AtomicU64>,
}

impl FrameBuffer {
    /// Create a zero-filled buffer.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height * CHANNELS;
        let zero = 0.0f64.to_bits();
        Self {
            width,
            height,
            data: (0..len).map(|_| AtomicU64::new(zero)).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of channel values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the buffer already has the requested dimensions.
    pub fn matches(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }

    /// Flat index of the first channel of pixel `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    /// Store `color` at `(x, y)`.
    ///
    /// Callers must own row `y`; concurrent writers to the same pixel race.
    pub fn set(&self, x: usize, y: usize, color: Color) {
        let i = self.index(x, y);
        self.data[i].store(color.z.to_bits(), Ordering::Relaxed);
        self.data[i + 1].store(color.y.to_bits(), Ordering::Relaxed);
        self.data[i + 2].store(color.x.to_bits(), Ordering::Relaxed);
    }

    /// Read pixel `(x, y)` back as an RGB colour.
    pub fn get(&self, x: usize, y: usize) -> Color {
        let i = self.index(x, y);
        Color::new(self.channel(i + 2), self.channel(i + 1), self.channel(i))
    }

    #[inline]
    fn channel(&self, i: usize) -> f64 {
        f64::from_bits(self.data[i].load(Ordering::Relaxed))
    }

    /// Copy of the raw channel values in storage order.
    pub fn to_vec(&self) -> Vec<f64> {
        (0..self.data.len()).map(|i| self.channel(i)).collect()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
