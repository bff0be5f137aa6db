//! Triangle-local barycentric weights with degenerate-triangle fallbacks.

use glam::{Vec2, Vec3};

use crate::EPSILON;

/// Barycentric weights `(w0, w1, w2)` of a point relative to a triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Barycentric(pub [f32; 3]);

impl Barycentric {
    /// Weights used when the triangle (or a correction denominator) degenerates.
    pub const EQUAL_THIRDS: Barycentric = Barycentric([1.0 / 3.0; 3]);

    /// Sum of the three weights; 1 for any well-formed result.
    pub fn sum(&self) -> f32 {
        self.0[0] + self.0[1] + self.0[2]
    }

    /// Inside-or-on-edge test with [`EPSILON`] slack.
    pub fn is_inside(&self) -> bool {
        self.0.iter().all(|w| *w >= -EPSILON) && self.sum() <= 1.0 + EPSILON
    }

    /// Weighted sum of three scalar attributes.
    pub fn interpolate(&self, a: [f32; 3]) -> f32 {
        a[0] * self.0[0] + a[1] * self.0[1] + a[2] * self.0[2]
    }

    /// Weighted sum of three vector attributes.
    pub fn interpolate_vec3(&self, a: [Vec3; 3]) -> Vec3 {
        a[0] * self.0[0] + a[1] * self.0[1] + a[2] * self.0[2]
    }

    /// Divide each weight by its vertex's clip-space `w` and renormalize.
    ///
    /// Falls back to [`Barycentric::EQUAL_THIRDS`] when any `w` or the
    /// renormalizing denominator is near zero.
    pub fn perspective_corrected(&self, clip_w: [f32; 3]) -> Barycentric {
        if clip_w.iter().any(|w| w.abs() < EPSILON) {
            return Self::EQUAL_THIRDS;
        }
        let scaled = [
            self.0[0] / clip_w[0],
            self.0[1] / clip_w[1],
            self.0[2] / clip_w[2],
        ];
        let denom = scaled[0] + scaled[1] + scaled[2];
        if denom.abs() < EPSILON {
            return Self::EQUAL_THIRDS;
        }
        Barycentric([scaled[0] / denom, scaled[1] / denom, scaled[2] / denom])
    }
}

// Twice the signed area of (a, b, c); positive for one winding, negative for the other.
fn edge_function(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Screen-space barycentric weights of `p` in triangle `(v0, v1, v2)`.
pub fn barycentric_2d(p: Vec2, v0: Vec2, v1: Vec2, v2: Vec2) -> Barycentric {
    let area = edge_function(v0, v1, v2);
    if area.abs() < EPSILON {
        return Barycentric::EQUAL_THIRDS;
    }
    let inv_area = 1.0 / area;
    Barycentric([
        edge_function(v1, v2, p) * inv_area,
        edge_function(v2, v0, p) * inv_area,
        edge_function(v0, v1, p) * inv_area,
    ])
}

/// World-space barycentric weights of `p` projected onto triangle `(v0, v1, v2)`.
pub fn barycentric_3d(p: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Barycentric {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let ep = p - v0;

    let d00 = e1.dot(e1);
    let d01 = e1.dot(e2);
    let d11 = e2.dot(e2);
    let d20 = ep.dot(e1);
    let d21 = ep.dot(e2);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < EPSILON {
        return Barycentric::EQUAL_THIRDS;
    }
    let w1 = (d11 * d20 - d01 * d21) / denom;
    let w2 = (d00 * d21 - d01 * d20) / denom;
    Barycentric([1.0 - w1 - w2, w1, w2])
}
