//! Vector, matrix, plane, frustum, and barycentric primitives for the Vantage engine.
//!
//! Vectors and matrices are plain `glam` types. Everything that can divide by a
//! vanishing quantity (normalization, triangle area, plane normal length) is
//! guarded here so callers inherit a safe fallback instead of NaN.

mod barycentric;
mod frustum;
mod matrix;
mod plane;
mod vector;

pub use barycentric::{Barycentric, barycentric_2d, barycentric_3d};
pub use frustum::{Frustum, PlaneKind};
pub use matrix::{from_rows, to_rows_array};
pub use plane::Plane;
pub use vector::{approach, safe_normalize};

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Tolerance below which lengths, areas, and denominators are treated as zero.
pub const EPSILON: f32 = 1e-6;

/// World up axis used to derive camera bases.
pub const WORLD_UP: Vec3 = Vec3::Y;
