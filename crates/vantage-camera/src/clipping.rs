//! Near/far clip planes that follow the camera-to-target distance.
//!
//! Near reacts quickly so close geometry is not clipped; far moves slowly so
//! distant geometry does not visibly pop in and out.

use glam::Vec3;
use vantage_config::ClippingConfig;
use vantage_math::{EPSILON, approach};

/// Per-frame smoothing rate of the near plane.
pub const NEAR_SMOOTHING: f32 = 0.1;

/// Per-frame smoothing rate of the far plane.
pub const FAR_SMOOTHING: f32 = 0.05;

/// Near plane target as a fraction of camera-to-target distance.
const NEAR_DISTANCE_FACTOR: f32 = 0.01;

/// Far plane target as a multiple of camera-to-target distance.
const FAR_DISTANCE_FACTOR: f32 = 2.0;

/// Smallest far/near ratio the planner will produce.
const MIN_DEPTH_RATIO: f32 = 2.0;

/// Frame-to-frame memory of the planner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipState {
    pub last_near: f32,
    pub last_far: f32,
}

/// Externally suggested clip range, used when the camera sits on its target
/// and the distance gives no information.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipHint {
    pub near: f32,
    pub far: f32,
}

/// Planes chosen for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipResult {
    pub near: f32,
    pub far: f32,
    /// `far / near` of this result.
    pub depth_ratio: f32,
}

/// Smooths near/far toward distance-derived targets.
#[derive(Clone, Debug)]
pub struct AdaptiveClippingPlanner {
    config: ClippingConfig,
    state: ClipState,
}

impl AdaptiveClippingPlanner {
    /// Seeded with the configured initial near and far planes.
    pub fn new(config: &ClippingConfig) -> Self {
        Self {
            config: config.clone(),
            state: ClipState {
                last_near: config.near_plane,
                last_far: config.far_plane,
            },
        }
    }

    /// Swap the bounds; the smoothing state carries over.
    pub fn set_config(&mut self, config: &ClippingConfig) {
        self.config = config.clone();
    }

    pub fn state(&self) -> ClipState {
        self.state
    }

    /// Re-seed the smoothing state.
    pub fn reset(&mut self, near: f32, far: f32) {
        self.state = ClipState {
            last_near: near,
            last_far: far,
        };
    }

    /// Plan this frame's clip planes.
    pub fn plan(&mut self, camera: Vec3, target: Vec3, hint: ClipHint) -> ClipResult {
        let cfg = &self.config;
        let max_ratio = cfg.max_depth_ratio.max(MIN_DEPTH_RATIO);
        let distance = camera.distance(target);

        let (near_target, far_target) = if distance < EPSILON {
            (hint.near, hint.far)
        } else {
            (
                distance * NEAR_DISTANCE_FACTOR,
                distance * FAR_DISTANCE_FACTOR,
            )
        };

        // max/min instead of clamp: a misconfigured min > max must not panic.
        let near_target = near_target.max(cfg.min_near_plane).min(cfg.max_near_plane);
        let mut near = approach(self.state.last_near, near_target, NEAR_SMOOTHING);

        let mut far_target = far_target.max(cfg.min_far_plane);
        if far_target / near > max_ratio {
            far_target = near * max_ratio;
        }
        let mut far = approach(self.state.last_far, far_target, FAR_SMOOTHING);

        near = near.max(cfg.min_near_plane).max(EPSILON);
        far = far.min(near * max_ratio);
        if far.is_nan() || far <= near {
            far = near * MIN_DEPTH_RATIO;
        }

        self.state = ClipState {
            last_near: near,
            last_far: far,
        };

        tracing::trace!(near, far, distance, "clip planes planned");

        ClipResult {
            near,
            far,
            depth_ratio: far / near,
        }
    }
}
