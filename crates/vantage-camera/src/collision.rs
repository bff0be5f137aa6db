//! Iterative camera-vs-sphere penetration resolution.
//!
//! The camera is a sphere of `camera_radius`. Each pass finds the deepest
//! overlap among the broad-phase candidates and pushes the camera out along
//! that contact's normal. Passes repeat until nothing overlaps or the
//! iteration cap is reached.

use glam::Vec3;
use vantage_config::{CameraConfig, CollisionConfig};
use vantage_math::safe_normalize;

/// Centre and radius of a bounding sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn overlaps(&self, other: &BoundingSphere) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }
}

/// One camera/object overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionInfo {
    /// Unit direction the camera must move to separate, or zero when it
    /// cannot be determined.
    pub normal: Vec3,
    /// Overlap depth along `normal`, including any approach-speed allowance.
    pub penetration: f32,
}

/// Outcome of [`CollisionResolver::resolve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionResolution {
    /// Camera position after push-out and height clamp.
    pub position: Vec3,
    /// Some pass found and resolved a penetration.
    pub collided: bool,
    /// The iteration cap was reached and the camera still overlaps an object.
    pub still_penetrating: bool,
    /// The last contact that was resolved.
    pub contact: Option<CollisionInfo>,
    /// Index of the object behind `contact`.
    pub contact_object: Option<usize>,
    /// Number of passes that moved the camera.
    pub iterations: u32,
}

/// Test the camera sphere against one object sphere.
///
/// The normal points from the object centre toward the camera. If the camera
/// has travelled past the object's centre relative to `origin` (where it came
/// from this frame) the normal is flipped, so the camera is returned to the
/// side it approached from instead of being popped out through the far side.
/// When the centres coincide the normal opposes `velocity`.
///
/// Approaching along the normal deepens the penetration by
/// `approach_speed × velocity_factor`, never by more than the camera radius.
pub fn test_sphere_collision(
    camera: BoundingSphere,
    object: BoundingSphere,
    origin: Vec3,
    velocity: Vec3,
    velocity_factor: f32,
) -> Option<CollisionInfo> {
    let offset = camera.center - object.center;
    let distance = offset.length();
    let reach = camera.radius + object.radius;
    if distance.is_nan() || distance >= reach {
        return None;
    }

    let mut normal = safe_normalize(offset);
    if normal == Vec3::ZERO {
        normal = -safe_normalize(velocity);
    } else if offset.dot(origin - object.center) < 0.0 {
        normal = -normal;
    }

    let approach_speed = (-velocity.dot(normal)).max(0.0);
    let allowance = (approach_speed * velocity_factor).min(camera.radius.max(0.0));

    Some(CollisionInfo {
        normal,
        penetration: reach - distance + allowance,
    })
}

/// Pushes the camera out of nearby bounding spheres.
#[derive(Clone, Debug)]
pub struct CollisionResolver {
    config: CollisionConfig,
    min_height: f32,
}

impl CollisionResolver {
    pub fn new(collision: &CollisionConfig, camera: &CameraConfig) -> Self {
        Self {
            config: collision.clone(),
            min_height: camera.min_height,
        }
    }

    pub fn set_config(&mut self, collision: &CollisionConfig, camera: &CameraConfig) {
        self.config = collision.clone();
        self.min_height = camera.min_height;
    }

    /// Resolve the camera's `desired` position against the candidate objects.
    ///
    /// `current` is the camera's position before this frame's move.
    /// Candidate indices that fall outside either array are skipped. Ties in
    /// penetration depth go to the first candidate found. The final height
    /// is never below the configured floor.
    pub fn resolve(
        &self,
        desired: Vec3,
        current: Vec3,
        candidates: &[usize],
        positions: &[Vec3],
        radii: &[f32],
        velocity: Vec3,
    ) -> CollisionResolution {
        let mut position = desired;
        let mut contact: Option<(usize, CollisionInfo)> = None;
        let mut iterations = 0;
        let mut still_penetrating = false;

        for _ in 0..self.config.max_iterations {
            let camera = BoundingSphere::new(position, self.config.camera_radius);
            let mut deepest: Option<(usize, CollisionInfo)> = None;

            for &index in candidates {
                let (Some(&center), Some(&radius)) = (positions.get(index), radii.get(index)) else {
                    continue;
                };
                let hit = test_sphere_collision(
                    camera,
                    BoundingSphere::new(center, radius),
                    current,
                    velocity,
                    self.config.velocity_penetration_factor,
                );
                if let Some(hit) = hit
                    && deepest.is_none_or(|(_, d)| hit.penetration > d.penetration)
                {
                    deepest = Some((index, hit));
                }
            }

            let Some((object, hit)) = deepest else {
                still_penetrating = false;
                break;
            };

            let separation = hit.penetration * self.config.response_strength
                + self.config.separation_bias;
            position += hit.normal * separation;
            contact = Some((object, hit));
            iterations += 1;
            still_penetrating = true;

            tracing::trace!(
                object,
                penetration = hit.penetration,
                iteration = iterations,
                "camera pushed out of object"
            );
        }

        if still_penetrating {
            // The loop ran out of passes; check whether the last push freed us.
            let camera = BoundingSphere::new(position, self.config.camera_radius);
            still_penetrating = candidates.iter().any(|&i| {
                matches!((positions.get(i), radii.get(i)), (Some(&c), Some(&r))
                    if camera.overlaps(&BoundingSphere::new(c, r)))
            });
        }

        if position.y < self.min_height {
            position.y = self.min_height;
        }

        CollisionResolution {
            position,
            collided: contact.is_some(),
            still_penetrating,
            contact: contact.map(|(_, info)| info),
            contact_object: contact.map(|(object, _)| object),
            iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> CollisionResolver {
        CollisionResolver::new(&CollisionConfig::default(), &CameraConfig::default())
    }

    #[test]
    fn test_no_overlap_returns_none() {
        let hit = test_sphere_collision(
            BoundingSphere::new(Vec3::ZERO, 0.3),
            BoundingSphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0),
            Vec3::ZERO,
            Vec3::ZERO,
            0.1,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_touching_spheres_do_not_collide() {
        let hit = test_sphere_collision(
            BoundingSphere::new(Vec3::ZERO, 1.0),
            BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0),
            Vec3::ZERO,
            Vec3::ZERO,
            0.1,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_normal_points_toward_camera() {
        let hit = test_sphere_collision(
            BoundingSphere::new(Vec3::new(0.0, 0.0, 1.5), 0.3),
            BoundingSphere::new(Vec3::ZERO, 2.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            0.1,
        )
        .unwrap();
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
        assert!((hit.penetration - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normal_flips_after_passing_centre() {
        // Came from +Z, ended up just past the centre on the -Z side.
        let hit = test_sphere_collision(
            BoundingSphere::new(Vec3::new(0.0, 0.0, -0.5), 0.3),
            BoundingSphere::new(Vec3::ZERO, 2.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            0.1,
        )
        .unwrap();
        assert!((hit.normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_coincident_centres_use_negated_velocity() {
        let hit = test_sphere_collision(
            BoundingSphere::new(Vec3::ONE, 0.3),
            BoundingSphere::new(Vec3::ONE, 1.0),
            Vec3::ONE,
            Vec3::new(3.0, 0.0, 0.0),
            0.0,
        )
        .unwrap();
        assert!((hit.normal - Vec3::NEG_X).length() < 1e-6);
        assert!((hit.penetration - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_centres_without_velocity_have_zero_normal() {
        let hit = test_sphere_collision(
            BoundingSphere::new(Vec3::ZERO, 0.3),
            BoundingSphere::new(Vec3::ZERO, 1.0),
            Vec3::ZERO,
            Vec3::ZERO,
            0.1,
        )
        .unwrap();
        assert_eq!(hit.normal, Vec3::ZERO);
        assert!(!hit.normal.x.is_nan());
    }

    #[test]
    fn test_approach_speed_deepens_penetration() {
        let camera = BoundingSphere::new(Vec3::new(0.0, 0.0, 1.5), 0.3);
        let object = BoundingSphere::new(Vec3::ZERO, 2.0);
        let origin = Vec3::new(0.0, 0.0, 10.0);

        let approaching =
            test_sphere_collision(camera, object, origin, Vec3::new(0.0, 0.0, -1.0), 0.1).unwrap();
        assert!((approaching.penetration - 0.9).abs() < 1e-6);

        // Capped at the camera radius.
        let fast =
            test_sphere_collision(camera, object, origin, Vec3::new(0.0, 0.0, -100.0), 0.1).unwrap();
        assert!((fast.penetration - 1.1).abs() < 1e-6);

        let leaving =
            test_sphere_collision(camera, object, origin, Vec3::new(0.0, 0.0, 1.0), 0.1).unwrap();
        assert!((leaving.penetration - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_camera_blocked_by_object_in_path() {
        let current = Vec3::new(0.0, 2.0, 10.0);
        let desired = Vec3::new(0.0, 2.0, 4.0);
        let result = resolver().resolve(
            desired,
            current,
            &[0],
            &[Vec3::new(0.0, 2.0, 5.0)],
            &[2.0],
            desired - current,
        );
        assert!(result.collided);
        assert!(!result.still_penetrating);
        assert!(result.position.z > 5.0 + 2.0 + 0.3, "z = {}", result.position.z);
        assert_eq!(result.contact_object, Some(0));
        assert!(result.contact.is_some_and(|c| c.normal.z > 0.99));
    }

    #[test]
    fn test_high_frame_rate_velocity_stays_bounded() {
        let current = Vec3::new(0.0, 2.0, 10.0);
        let desired = Vec3::new(0.0, 2.0, 4.0);
        let velocity = (desired - current) * 60.0;
        let result = resolver().resolve(
            desired,
            current,
            &[0],
            &[Vec3::new(0.0, 2.0, 5.0)],
            &[2.0],
            velocity,
        );
        assert!(result.position.z > 7.3);
        assert!(result.position.z < 9.0);
    }

    #[test]
    fn test_height_floor() {
        let result = resolver().resolve(
            Vec3::new(0.0, -1.0, 10.0),
            Vec3::new(0.0, 2.0, 10.0),
            &[],
            &[],
            &[],
            Vec3::new(0.0, -3.0, 0.0),
        );
        assert!((result.position.y - 0.0).abs() < 0.01);
        assert!(!result.collided);
    }

    #[test]
    fn test_no_candidates_returns_desired() {
        let desired = Vec3::new(1.0, 2.0, 3.0);
        let result = resolver().resolve(desired, Vec3::ZERO, &[], &[], &[], Vec3::ONE);
        assert_eq!(result.position, desired);
        assert!(!result.collided);
        assert!(result.contact.is_none());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_out_of_range_indices_skipped() {
        let desired = Vec3::new(0.0, 1.0, 0.0);
        let result = resolver().resolve(
            desired,
            desired,
            &[3, 7],
            &[desired],
            &[1.0, 1.0, 1.0, 1.0],
            Vec3::ZERO,
        );
        assert_eq!(result.position, desired);
        assert!(!result.collided);
    }

    #[test]
    fn test_deepest_penetration_resolved_first() {
        let desired = Vec3::new(0.0, 5.0, 0.0);
        let positions = [Vec3::new(1.0, 5.0, 0.0), Vec3::new(-0.5, 5.0, 0.0)];
        let config = CollisionConfig {
            max_iterations: 1,
            ..Default::default()
        };
        let resolver = CollisionResolver::new(&config, &CameraConfig::default());
        let result = resolver.resolve(desired, desired, &[0, 1], &positions, &[1.0, 1.0], Vec3::ZERO);
        // Object 1 overlaps by 0.8, object 0 by 0.3.
        assert_eq!(result.contact_object, Some(1));
        assert!(result.position.x > 0.0);
    }

    #[test]
    fn test_iteration_cap_reports_still_penetrating() {
        let config = CollisionConfig {
            max_iterations: 1,
            response_strength: 0.1,
            ..Default::default()
        };
        let resolver = CollisionResolver::new(&config, &CameraConfig::default());
        let desired = Vec3::new(0.0, 5.0, 1.0);
        let result = resolver.resolve(
            desired,
            Vec3::new(0.0, 5.0, 10.0),
            &[0],
            &[Vec3::new(0.0, 5.0, 0.0)],
            &[2.0],
            Vec3::ZERO,
        );
        assert!(result.collided);
        assert!(result.still_penetrating);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_zero_iterations_never_moves() {
        let config = CollisionConfig {
            max_iterations: 0,
            ..Default::default()
        };
        let resolver = CollisionResolver::new(&config, &CameraConfig::default());
        let desired = Vec3::new(0.0, 5.0, 0.0);
        let result = resolver.resolve(desired, desired, &[0], &[desired], &[1.0], Vec3::ZERO);
        assert_eq!(result.position, desired);
        assert!(!result.collided);
    }

    #[test]
    fn test_sphere_overlap() {
        let a = BoundingSphere::new(Vec3::ZERO, 1.0);
        assert!(a.overlaps(&BoundingSphere::new(Vec3::X, 0.5)));
        assert!(!a.overlaps(&BoundingSphere::new(Vec3::X * 3.0, 0.5)));
    }
}
