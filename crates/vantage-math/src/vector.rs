use glam::Vec3;

use crate::EPSILON;

/// Normalize `v`, returning [`Vec3::ZERO`] when its length is below [`EPSILON`].
///
/// `glam`'s own `normalize_or_zero` only guards exact zero and non-finite
/// reciprocals; vectors a few ulps long still blow up into huge unit-ish
/// garbage. The camera basis and collision normals rely on this cut-off.
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len < EPSILON || !len.is_finite() {
        Vec3::ZERO
    } else {
        v / len
    }
}

/// Exponential step of `current` toward `target` by fraction `rate` in `[0, 1]`.
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_normalize_unit_length() {
        let n = safe_normalize(Vec3::new(3.0, 4.0, 0.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_safe_normalize_zero_vector() {
        assert_eq!(safe_normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_safe_normalize_tiny_vector_is_zero() {
        let tiny = Vec3::new(1e-9, -1e-9, 0.0);
        let n = safe_normalize(tiny);
        assert_eq!(n, Vec3::ZERO);
        assert!(!n.x.is_nan());
    }

    #[test]
    fn test_safe_normalize_parallel_cross_is_zero() {
        // Forward looking straight down: crossing with world up degenerates.
        let forward = Vec3::NEG_Y;
        let right = safe_normalize(Vec3::Y.cross(forward));
        assert_eq!(right, Vec3::ZERO);
    }

    #[test]
    fn test_approach_moves_fraction_of_gap() {
        assert!((approach(0.0, 10.0, 0.1) - 1.0).abs() < 1e-6);
        assert!((approach(10.0, 0.0, 0.05) - 9.5).abs() < 1e-6);
        assert_eq!(approach(4.0, 4.0, 0.3), 4.0);
    }
}
