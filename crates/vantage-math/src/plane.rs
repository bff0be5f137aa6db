use glam::Vec3;

use crate::EPSILON;

/// An oriented plane: `normal · p + offset >= 0` is the positive side.
///
/// Invariant: `normal` has unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal pointing toward the positive half-space.
    pub normal: Vec3,
    /// Signed offset term.
    pub offset: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            offset: 0.0,
        }
    }
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and offset.
    ///
    /// Both terms are divided by the normal's length. A near-zero normal
    /// yields the default plane instead of NaN components.
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self::default().with_normalized(normal, offset)
    }

    /// Plane through `point` with the given normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let plane = Self::new(normal, 0.0);
        Self {
            offset: -plane.normal.dot(point),
            ..plane
        }
    }

    /// Signed distance from `point` to the plane.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.offset
    }

    /// Returns `true` for points on the plane or its positive side.
    pub fn is_on_positive_side(&self, point: Vec3) -> bool {
        self.signed_distance(point) >= 0.0
    }

    /// The same plane facing the other way.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    // Returns `self` unchanged when the normal is degenerate.
    fn with_normalized(self, normal: Vec3, offset: f32) -> Self {
        let len = normal.length();
        if len < EPSILON || !len.is_finite() {
            return self;
        }
        Self {
            normal: normal / len,
            offset: offset / len,
        }
    }
}
