//! Camera rig: bounded-speed motion toward a desired position, a look-at
//! basis, and per-frame clip planes and depth precision.

use glam::{Mat4, Vec3};
use vantage_config::{CameraConfig, Config};
use vantage_math::{EPSILON, WORLD_UP, safe_normalize};
use vantage_render::{DepthPrecision, DepthPrecisionSelector};

use crate::clipping::{AdaptiveClippingPlanner, ClipHint, ClipResult};

/// Position, target, orthonormal basis, and clip range of the camera.
///
/// The basis satisfies `right.cross(up) == forward`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub near: f32,
    pub far: f32,
}

/// Result of one [`CameraRig::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraUpdate {
    pub state: CameraState,
    pub clip: ClipResult,
    pub precision: DepthPrecision,
}

/// Moves a camera toward desired positions while looking at a target.
#[derive(Clone, Debug)]
pub struct CameraRig {
    state: CameraState,
    camera: CameraConfig,
    reverse_z_forced: bool,
    planner: AdaptiveClippingPlanner,
    selector: DepthPrecisionSelector,
}

impl CameraRig {
    /// Place the camera and derive its initial basis.
    pub fn new(position: Vec3, target: Vec3, config: &Config) -> Self {
        let mut rig = Self {
            state: CameraState {
                position,
                target,
                forward: Vec3::NEG_Z,
                up: Vec3::Y,
                right: Vec3::NEG_X,
                near: config.clipping.near_plane,
                far: config.clipping.far_plane,
            },
            camera: config.camera.clone(),
            reverse_z_forced: config.projection.reverse_z,
            planner: AdaptiveClippingPlanner::new(&config.clipping),
            selector: DepthPrecisionSelector::default(),
        };
        rig.update_basis();
        rig
    }

    /// Apply new speed, distance, clipping, and reverse-Z settings.
    pub fn set_config(&mut self, config: &Config) {
        self.camera = config.camera.clone();
        self.reverse_z_forced = config.projection.reverse_z;
        self.planner.set_config(&config.clipping);
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Point the camera at a new target.
    pub fn set_target(&mut self, target: Vec3) {
        self.state.target = target;
        self.update_basis();
    }

    /// Right-handed view matrix looking along `forward`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.state.position, self.state.forward, self.state.up)
    }

    /// Advance one frame.
    ///
    /// The camera travels at most `speed × dt` toward `desired` and snaps onto
    /// it when closer than that. It is then held at least `min_distance` from
    /// the target along the view axis. `hint` is only consulted when the
    /// camera ends up on its target.
    pub fn update(&mut self, dt: f32, desired: Vec3, hint: ClipHint) -> CameraUpdate {
        let dt = dt.max(EPSILON);
        let budget = self.camera.speed.max(0.0) * dt;

        let to_desired = desired - self.state.position;
        if to_desired.length() <= budget {
            self.state.position = desired;
        } else {
            self.state.position += safe_normalize(to_desired) * budget;
        }

        self.update_basis();

        let min_distance = self.camera.min_distance.max(0.0);
        if self.state.position.distance(self.state.target) < min_distance {
            self.state.position = self.state.target - self.state.forward * min_distance;
            tracing::trace!(min_distance, "camera held back from target");
        }

        let clip = self
            .planner
            .plan(self.state.position, self.state.target, hint);
        self.state.near = clip.near;
        self.state.far = clip.far;

        let precision = self
            .selector
            .select(clip.near, clip.far, self.reverse_z_forced);

        CameraUpdate {
            state: self.state,
            clip,
            precision,
        }
    }

    /// Recompute forward/right/up from position and target.
    ///
    /// A camera on its target keeps the previous basis. Looking straight along
    /// the world up axis keeps the previous right vector, re-orthogonalized
    /// against the new forward.
    fn update_basis(&mut self) {
        let forward = safe_normalize(self.state.target - self.state.position);
        if forward == Vec3::ZERO {
            return;
        }

        let mut right = safe_normalize(WORLD_UP.cross(forward));
        if right == Vec3::ZERO {
            let previous = self.state.right;
            right = safe_normalize(previous - forward * previous.dot(forward));
            if right == Vec3::ZERO {
                right = forward.any_orthonormal_vector();
            }
        }

        self.state.forward = forward;
        self.state.right = right;
        self.state.up = forward.cross(right);
    }
}
