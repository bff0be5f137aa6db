//! Projection, depth precision, frustum culling, and depth interpolation.
//!
//! Nothing here touches a GPU. The crate produces the matrices, frusta, and
//! per-object depth data a rasterizer needs; with the `wgpu` feature enabled
//! the depth format and compare function can be handed straight to a
//! pipeline descriptor.

pub mod depth;
pub mod frustum;
pub mod interpolation;
pub mod projection;

pub use depth::{DepthCompare, DepthFormat, DepthPrecision, DepthPrecisionSelector};
pub use frustum::FrustumCuller;
pub use interpolation::{
    DepthInterpolationData, DepthInterpolator, apply_depth_curve, linear_depth,
    perspective_correct_depth, screen_space_depth,
};
pub use projection::{
    DepthPrecisionMetrics, ProjectionBuilder, ProjectionMode, ProjectionUpdate, log_depth_inverse,
    log_depth_precision, log_depth_precision_with, log_depth_transform, optimal_log_depth_c,
    reverse_z_transform,
};
pub use vantage_math::Frustum;
