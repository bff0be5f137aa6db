//! Per-object depth data and barycentric depth interpolation.
//!
//! [`DepthInterpolator::prepare`] summarizes the visible objects' distances
//! into normalized factors a rasterizer can use to bias depth. The remaining
//! functions interpolate per-vertex depth and attributes across a triangle,
//! with or without perspective correction.

use glam::{Vec3, Vec4};
use vantage_config::{DepthCurve, InterpolationConfig};
use vantage_math::Barycentric;

/// Distance ranges narrower than this are treated as a unit range.
const MIN_DISTANCE_RANGE: f32 = 0.001;

/// Objects closer to the camera than this get no interpolation factor.
const MIN_FACTOR_DISTANCE: f32 = 0.01;

/// Per-object depth summary, index-aligned with the input positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepthInterpolationData {
    /// Distance to the sphere surface (`distance - radius`), 0 for hidden objects.
    pub depths: Vec<f32>,
    /// Distance to the sphere centre, 0 for hidden objects.
    pub distances: Vec<f32>,
    /// Curve-mapped position of each distance within `[min, max]`.
    pub factors: Vec<f32>,
    /// Smallest visible distance, 0 when nothing is visible.
    pub min_distance: f32,
    /// Largest visible distance, 0 when nothing is visible.
    pub max_distance: f32,
    pub visible_count: usize,
}

/// Remap a normalized depth `t` in `[0, 1]`.
pub fn apply_depth_curve(curve: DepthCurve, t: f32) -> f32 {
    match curve {
        DepthCurve::Linear => t,
        DepthCurve::Logarithmic => (t * 9.0).ln_1p() / std::f32::consts::LN_10,
        DepthCurve::Exponential => t * t,
    }
}

/// Prepares depth data and interpolates across triangles.
#[derive(Clone, Debug)]
pub struct DepthInterpolator {
    perspective_correct: bool,
    curve: DepthCurve,
}

impl DepthInterpolator {
    pub fn new(config: &InterpolationConfig) -> Self {
        Self {
            perspective_correct: config.perspective_correct,
            curve: config.depth_curve,
        }
    }

    pub fn set_config(&mut self, config: &InterpolationConfig) {
        self.perspective_correct = config.perspective_correct;
        self.curve = config.depth_curve;
    }

    pub fn curve(&self) -> DepthCurve {
        self.curve
    }

    /// Apply the configured curve.
    pub fn apply_curve(&self, t: f32) -> f32 {
        apply_depth_curve(self.curve, t)
    }

    /// Compute depths, distances, and curve factors for every visible object.
    ///
    /// The three input slices may differ in length; only indices present in
    /// all of them are considered, and the rest of the output is zero.
    pub fn prepare(
        &self,
        camera: Vec3,
        positions: &[Vec3],
        radii: &[f32],
        visibility: &[bool],
    ) -> DepthInterpolationData {
        let len = positions.len();
        let mut data = DepthInterpolationData {
            depths: vec![0.0; len],
            distances: vec![0.0; len],
            factors: vec![0.0; len],
            ..Default::default()
        };

        let mut min_distance = f32::MAX;
        let mut max_distance = 0.0f32;

        let objects = positions.iter().zip(radii).zip(visibility).enumerate();
        for (i, ((&position, &radius), &visible)) in objects {
            if !visible {
                continue;
            }
            let distance = camera.distance(position);
            data.distances[i] = distance;
            data.depths[i] = distance - radius;
            min_distance = min_distance.min(distance);
            max_distance = max_distance.max(distance);
            data.visible_count += 1;
        }

        if data.visible_count == 0 {
            return data;
        }
        data.min_distance = min_distance;
        data.max_distance = max_distance;

        let mut range = max_distance - min_distance;
        if range < MIN_DISTANCE_RANGE {
            range = 1.0;
        }
        for (factor, &distance) in data.factors.iter_mut().zip(&data.distances) {
            if distance > MIN_FACTOR_DISTANCE {
                *factor = self.apply_curve((distance - min_distance) / range);
            }
        }

        data
    }

    /// Interpolate a depth across a triangle.
    ///
    /// Uses perspective correction when it is enabled and clip-space vertex
    /// positions are available, plain affine weights otherwise.
    pub fn interpolate_depth(
        &self,
        weights: Barycentric,
        vertex_depths: [f32; 3],
        clip_positions: Option<[Vec4; 3]>,
    ) -> f32 {
        self.effective_weights(weights, clip_positions)
            .interpolate(vertex_depths)
    }

    /// Interpolate a vector attribute across a triangle, same rules as
    /// [`interpolate_depth`](Self::interpolate_depth).
    pub fn interpolate_attribute(
        &self,
        weights: Barycentric,
        attributes: [Vec3; 3],
        clip_positions: Option<[Vec4; 3]>,
    ) -> Vec3 {
        self.effective_weights(weights, clip_positions)
            .interpolate_vec3(attributes)
    }

    fn effective_weights(&self, weights: Barycentric, clip: Option<[Vec4; 3]>) -> Barycentric {
        match clip {
            Some(clip) if self.perspective_correct => {
                weights.perspective_corrected([clip[0].w, clip[1].w, clip[2].w])
            }
            _ => weights,
        }
    }
}

/// Perspective-correct depth, regardless of configuration.
pub fn perspective_correct_depth(
    weights: Barycentric,
    vertex_depths: [f32; 3],
    clip_positions: [Vec4; 3],
) -> f32 {
    let w = [clip_positions[0].w, clip_positions[1].w, clip_positions[2].w];
    weights.perspective_corrected(w).interpolate(vertex_depths)
}

/// Map a view distance to a `[0, 1]` buffer value, linearly between the clip
/// planes. Reverse-Z puts near at 1.
pub fn screen_space_depth(world_depth: f32, near: f32, far: f32, reverse_z: bool) -> f32 {
    let t = (world_depth - near) / (far - near);
    if reverse_z { 1.0 - t } else { t }
}

/// Inverse of [`screen_space_depth`].
pub fn linear_depth(screen_depth: f32, near: f32, far: f32, reverse_z: bool) -> f32 {
    let t = if reverse_z { 1.0 - screen_depth } else { screen_depth };
    near + t * (far - near)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpolator(curve: DepthCurve, perspective_correct: bool) -> DepthInterpolator {
        DepthInterpolator::new(&InterpolationConfig {
            perspective_correct,
            depth_curve: curve,
        })
    }

    #[test]
    fn test_curves_fix_endpoints() {
        for curve in [DepthCurve::Linear, DepthCurve::Logarithmic, DepthCurve::Exponential] {
            assert!(apply_depth_curve(curve, 0.0).abs() < 1e-6);
            assert!((apply_depth_curve(curve, 1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_curve_shapes() {
        assert_eq!(apply_depth_curve(DepthCurve::Linear, 0.5), 0.5);
        assert_eq!(apply_depth_curve(DepthCurve::Exponential, 0.5), 0.25);
        // Logarithmic pushes mid-range values up.
        let log = apply_depth_curve(DepthCurve::Logarithmic, 0.5);
        assert!((log - 5.5f32.log10()).abs() < 1e-5);
        assert!(log > 0.5);
    }

    #[test]
    fn test_prepare_linear_factors() {
        let interp = interpolator(DepthCurve::Linear, true);
        let positions = [
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(0.0, 0.0, -6.0),
            Vec3::new(0.0, 0.0, -10.0),
        ];
        let data = interp.prepare(Vec3::ZERO, &positions, &[0.5, 1.0, 2.0], &[true; 3]);

        assert_eq!(data.visible_count, 3);
        assert_eq!(data.min_distance, 2.0);
        assert_eq!(data.max_distance, 10.0);
        assert_eq!(data.distances, vec![2.0, 6.0, 10.0]);
        assert_eq!(data.depths, vec![1.5, 5.0, 8.0]);
        assert_eq!(data.factors, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_hidden_objects_are_zeroed() {
        let interp = interpolator(DepthCurve::Linear, true);
        let positions = [Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 0.0, -8.0)];
        let data = interp.prepare(Vec3::ZERO, &positions, &[1.0, 1.0], &[false, true]);

        assert_eq!(data.visible_count, 1);
        assert_eq!(data.depths[0], 0.0);
        assert_eq!(data.distances[0], 0.0);
        assert_eq!(data.factors[0], 0.0);
        assert_eq!(data.min_distance, 8.0);
        assert_eq!(data.max_distance, 8.0);
    }

    #[test]
    fn test_narrow_range_uses_unit_range() {
        let interp = interpolator(DepthCurve::Linear, true);
        let positions = [Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -5.0005)];
        let data = interp.prepare(Vec3::ZERO, &positions, &[0.1, 0.1], &[true, true]);
        assert!(data.factors[1] < 0.001);
        assert!(data.factors.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_nothing_visible() {
        let interp = interpolator(DepthCurve::Logarithmic, true);
        let data = interp.prepare(Vec3::ZERO, &[Vec3::X], &[1.0], &[false]);
        assert_eq!(data.visible_count, 0);
        assert_eq!(data.min_distance, 0.0);
        assert_eq!(data.max_distance, 0.0);
        assert_eq!(data.factors, vec![0.0]);
    }

    #[test]
    fn test_prepare_mismatched_lengths() {
        let interp = interpolator(DepthCurve::Linear, true);
        let positions = [Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, -9.0), Vec3::Z];
        let data = interp.prepare(Vec3::ZERO, &positions, &[1.0, 1.0], &[true, true, true]);
        assert_eq!(data.depths.len(), 3);
        assert_eq!(data.visible_count, 2);
        assert_eq!(data.distances[2], 0.0);
        assert_eq!(data.factors[2], 0.0);
    }

    #[test]
    fn test_affine_interpolation_without_clip() {
        let interp = interpolator(DepthCurve::Linear, true);
        let weights = Barycentric([0.2, 0.3, 0.5]);
        let depth = interp.interpolate_depth(weights, [1.0, 2.0, 3.0], None);
        assert!((depth - 2.3).abs() < 1e-6);
    }

    #[test]
    fn test_perspective_correct_interpolation() {
        let interp = interpolator(DepthCurve::Linear, true);
        let weights = Barycentric([0.5, 0.5, 0.0]);
        let clip = [
            Vec4::new(0.0, 0.0, 0.0, 1.0),
            Vec4::new(0.0, 0.0, 0.0, 3.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ];
        // Weights become 0.5/1 : 0.5/3 renormalized = 0.75 : 0.25.
        let depth = interp.interpolate_depth(weights, [4.0, 8.0, 0.0], Some(clip));
        assert!((depth - 5.0).abs() < 1e-5);
        assert!((perspective_correct_depth(weights, [4.0, 8.0, 0.0], clip) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_perspective_correction_disabled_is_affine() {
        let interp = interpolator(DepthCurve::Linear, false);
        let weights = Barycentric([0.5, 0.5, 0.0]);
        let clip = [Vec4::W, Vec4::W * 3.0, Vec4::W];
        let depth = interp.interpolate_depth(weights, [4.0, 8.0, 0.0], Some(clip));
        assert!((depth - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_clip_w_falls_back_to_thirds() {
        let interp = interpolator(DepthCurve::Linear, true);
        let weights = Barycentric([1.0, 0.0, 0.0]);
        let clip = [Vec4::ZERO, Vec4::W, Vec4::W];
        let depth = interp.interpolate_depth(weights, [3.0, 6.0, 9.0], Some(clip));
        assert!((depth - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_interpolate_attribute() {
        let interp = interpolator(DepthCurve::Linear, true);
        let weights = Barycentric([0.25, 0.25, 0.5]);
        let color = interp.interpolate_attribute(weights, [Vec3::X, Vec3::Y, Vec3::Z], None);
        assert!((color - Vec3::new(0.25, 0.25, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_screen_space_depth_round_trip() {
        for reverse_z in [false, true] {
            let screen = screen_space_depth(25.0, 0.5, 100.0, reverse_z);
            assert!((linear_depth(screen, 0.5, 100.0, reverse_z) - 25.0).abs() < 1e-4);
        }
        assert_eq!(screen_space_depth(0.5, 0.5, 100.0, true), 1.0);
        assert_eq!(screen_space_depth(100.0, 0.5, 100.0, true), 0.0);
        assert_eq!(screen_space_depth(0.5, 0.5, 100.0, false), 0.0);
    }

    #[test]
    fn test_set_config() {
        let mut interp = interpolator(DepthCurve::Linear, true);
        interp.set_config(&InterpolationConfig {
            perspective_correct: false,
            depth_curve: DepthCurve::Exponential,
        });
        assert_eq!(interp.curve(), DepthCurve::Exponential);
        assert_eq!(interp.apply_curve(0.5), 0.25);
    }
}
