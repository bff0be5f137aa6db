//! Six-plane view frustum built directly from a camera basis.

use glam::Vec3;

use crate::Plane;

/// Identifies one of the six frustum planes. The discriminant is the plane's
/// slot in [`Frustum::planes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    Near = 0,
    Far = 1,
    Left = 2,
    Right = 3,
    Top = 4,
    Bottom = 5,
}

impl PlaneKind {
    /// Slot index into the plane array.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A view frustum of six inward-facing planes ordered near, far, left, right,
/// top, bottom, plus the camera position the side planes meet at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    planes: [Plane; 6],
    apex: Vec3,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            planes: [Plane::default(); 6],
            apex: Vec3::ZERO,
        }
    }
}

impl Frustum {
    /// Build the frustum for a camera at `position` with the given basis.
    ///
    /// `fov_y` is the full vertical field of view in radians. The near and far
    /// planes face along `forward` at their distances. The four side planes
    /// pass through the camera apex and the matching near-plane edge; their
    /// normals come from crossing the edge direction with `up` or `right` and
    /// are flipped inward if needed, so the result does not depend on the
    /// handedness of the supplied basis.
    pub fn from_camera(
        position: Vec3,
        forward: Vec3,
        up: Vec3,
        right: Vec3,
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let half_height = (fov_y * 0.5).tan() * near;
        let half_width = half_height * aspect;
        let near_center = forward * near;

        let side = |edge: Vec3, axis: Vec3| {
            let mut normal = axis.cross(edge);
            if normal.dot(forward) < 0.0 {
                normal = -normal;
            }
            Plane::from_point_normal(position, normal)
        };

        let mut planes = [Plane::default(); 6];
        planes[PlaneKind::Near.index()] =
            Plane::from_point_normal(position + forward * near, forward);
        planes[PlaneKind::Far.index()] =
            Plane::from_point_normal(position + forward * far, forward).flipped();
        planes[PlaneKind::Left.index()] = side(near_center - right * half_width, up);
        planes[PlaneKind::Right.index()] = side(near_center + right * half_width, up);
        planes[PlaneKind::Top.index()] = side(near_center + up * half_height, right);
        planes[PlaneKind::Bottom.index()] = side(near_center - up * half_height, right);

        Self {
            planes,
            apex: position,
        }
    }

    /// All six planes in storage order.
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Camera position the frustum was built from.
    pub fn apex(&self) -> Vec3 {
        self.apex
    }

    /// A single plane by kind.
    pub fn plane(&self, kind: PlaneKind) -> &Plane {
        &self.planes[kind.index()]
    }

    /// Returns `true` when `point` is on the non-negative side of every plane.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| p.is_on_positive_side(point))
    }

    /// Conservative sphere test.
    ///
    /// Returns `false` only when the sphere lies entirely behind at least one
    /// plane. Spheres near the frustum corners may be kept even though they
    /// miss the volume, but an intersecting sphere is never rejected.
    ///
    /// A sphere enclosing the camera itself always counts as intersecting,
    /// even when it ends short of the near plane.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        if center.distance_squared(self.apex) <= radius * radius {
            return true;
        }
        self.planes
            .iter()
            .all(|p| p.signed_distance(center) >= -radius)
    }
}
