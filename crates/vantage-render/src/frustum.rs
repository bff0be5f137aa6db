//! Per-frame frustum culling of bounding spheres.

use glam::Vec3;
use vantage_math::Frustum;

/// Holds the current view frustum and tests objects against it.
///
/// Rebuilt once per frame from the camera basis, then queried for every
/// object before depth data is prepared.
#[derive(Clone, Debug, Default)]
pub struct FrustumCuller {
    frustum: Frustum,
}

impl FrustumCuller {
    /// Rebuild all six planes. `fov_y` is in radians.
    pub fn update(
        &mut self,
        position: Vec3,
        forward: Vec3,
        up: Vec3,
        right: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) {
        self.frustum = Frustum::from_camera(position, forward, up, right, fov_y, aspect, near, far);
    }

    /// Frustum from the last update; point and sphere tests live on it.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Visibility flag per entry of `positions`.
    ///
    /// Entries past the end of `radii` have no bounds and are reported hidden.
    pub fn cull(&self, positions: &[Vec3], radii: &[f32]) -> Vec<bool> {
        let mut flags = vec![false; positions.len()];
        for (flag, (&center, &radius)) in flags.iter_mut().zip(positions.iter().zip(radii)) {
            *flag = self.frustum.intersects_sphere(center, radius);
        }
        flags
    }
}
