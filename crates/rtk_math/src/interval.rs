/// Window of accepted ray parameters, or one axis of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Every parameter beyond `min`, e.g. a primary ray offset from its origin.
    pub fn after(min: f64) -> Self {
        Self::new(min, f64::INFINITY)
    }

    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Strict containment; a hit exactly on either bound is rejected.
    pub fn surrounds(&self, t: f64) -> bool {
        self.min < t && t < self.max
    }

    /// Narrow the far end, as when a closer hit has been found.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }

    /// Grow by `delta / 2` at both ends.
    pub fn expand(&self, delta: f64) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    pub fn add_scalar(&self, displacement: f64) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }

    /// Smallest interval covering both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}
