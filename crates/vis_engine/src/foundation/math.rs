//! Math utilities and types
//!
//! Provides the fundamental math types used throughout the drawing and
//! UI layers. All 2D positions are in whatever space the caller is
//! working in (screen space or UI space); `Bounds2` is an axis-aligned
//! min/max rectangle.

pub use nalgebra::{Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Axis-aligned 2D bounding rectangle stored as min/max corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    /// Bottom-left corner
    pub min: Vec2,
    /// Top-right corner
    pub max: Vec2,
}

impl Bounds2 {
    /// Create bounds from explicit min/max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create bounds from a centre point and full size
    pub fn from_centre_size(centre: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: centre - half,
            max: centre + half,
        }
    }

    /// Empty bounds: growing these with any point yields that point.
    /// Min/max start at opposite infinities, halved so that translating
    /// a layer does not immediately overflow.
    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f32::MAX / 2.0, f32::MAX / 2.0),
            max: Vec2::new(f32::MIN / 2.0, f32::MIN / 2.0),
        }
    }

    /// Bounds covering effectively the whole plane
    pub fn infinite() -> Self {
        Self {
            min: Vec2::new(f32::MIN / 2.0, f32::MIN / 2.0),
            max: Vec2::new(f32::MAX / 2.0, f32::MAX / 2.0),
        }
    }

    /// Centre point of the bounds
    pub fn centre(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Full size of the bounds
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Width of the bounds
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the bounds
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Whether the given point lies inside (inclusive) the bounds
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Grow the bounds to include another min/max pair
    pub fn grow(&mut self, min: Vec2, max: Vec2) {
        self.min.x = self.min.x.min(min.x);
        self.min.y = self.min.y.min(min.y);
        self.max.x = self.max.x.max(max.x);
        self.max.y = self.max.y.max(max.y);
    }

    /// Grow the bounds to include a single point
    pub fn grow_to_point(&mut self, point: Vec2) {
        self.grow(point, point);
    }

    /// Intersection of two bounds (may be inverted if they don't overlap)
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            min: Vec2::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Vec2::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        }
    }
}

/// Remap a value from `[min, max]` to `[0, 1]`, clamped.
/// A degenerate range maps everything to 0.5.
pub fn remap01(min: f32, max: f32, value: f32) -> f32 {
    if (max - min).abs() < f32::EPSILON {
        return 0.5;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Linear interpolation between two values
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
