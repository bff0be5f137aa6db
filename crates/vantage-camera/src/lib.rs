//! Camera motion: collision resolution, adaptive clip planes, and the rig
//! that ties them to a position/target pair.

pub mod clipping;
pub mod collision;
pub mod rig;

pub use clipping::{AdaptiveClippingPlanner, ClipHint, ClipResult, ClipState};
pub use collision::{
    BoundingSphere, CollisionInfo, CollisionResolution, CollisionResolver, test_sphere_collision,
};
pub use rig::{CameraRig, CameraState, CameraUpdate};
