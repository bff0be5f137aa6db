//! Depth buffer format selection.
//!
//! Reverse-Z maps the near plane to 1.0 and the far plane to 0.0, which puts
//! the dense end of the float range at distant geometry. It is chosen
//! automatically once the far/near ratio gets large enough that a standard
//! mapping would lose most of its precision in the first few units.

use std::fmt;

/// Far/near ratio above which reverse-Z is selected even when not forced.
pub const REVERSE_Z_RATIO_THRESHOLD: f32 = 1000.0;

/// Depth buffer storage layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DepthFormat {
    /// 32-bit float, near = 0, far = 1.
    Standard32Float,
    /// 32-bit float, near = 1, far = 0.
    Reverse32Float,
}

impl DepthFormat {
    /// Stable tag used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            DepthFormat::Standard32Float => "STANDARD_FLOAT32",
            DepthFormat::Reverse32Float => "REVERSE_FLOAT32",
        }
    }

    /// Value the depth attachment is cleared to: the far plane.
    pub fn clear_value(self) -> f32 {
        match self {
            DepthFormat::Standard32Float => 1.0,
            DepthFormat::Reverse32Float => 0.0,
        }
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, DepthFormat::Reverse32Float)
    }

    /// Both layouts are backed by a single-channel 32-bit float texture.
    #[cfg(feature = "wgpu")]
    pub fn to_wgpu(self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Depth32Float
    }
}

impl fmt::Display for DepthFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth test comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DepthCompare {
    /// Closer fragments have smaller depth.
    Less,
    /// Closer fragments have larger depth (reverse-Z).
    Greater,
}

impl DepthCompare {
    pub fn as_str(self) -> &'static str {
        match self {
            DepthCompare::Less => "LESS",
            DepthCompare::Greater => "GREATER",
        }
    }

    #[cfg(feature = "wgpu")]
    pub fn to_wgpu(self) -> wgpu::CompareFunction {
        match self {
            DepthCompare::Less => wgpu::CompareFunction::Less,
            DepthCompare::Greater => wgpu::CompareFunction::Greater,
        }
    }
}

impl fmt::Display for DepthCompare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A depth format paired with the comparison that makes it work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DepthPrecision {
    pub format: DepthFormat,
    pub compare: DepthCompare,
}

impl DepthPrecision {
    pub const STANDARD: DepthPrecision = DepthPrecision {
        format: DepthFormat::Standard32Float,
        compare: DepthCompare::Less,
    };

    pub const REVERSE: DepthPrecision = DepthPrecision {
        format: DepthFormat::Reverse32Float,
        compare: DepthCompare::Greater,
    };

    pub fn clear_value(&self) -> f32 {
        self.format.clear_value()
    }
}

impl Default for DepthPrecision {
    fn default() -> Self {
        Self::REVERSE
    }
}

/// Picks [`DepthPrecision`] from the current clip range.
#[derive(Clone, Copy, Debug)]
pub struct DepthPrecisionSelector {
    ratio_threshold: f32,
}

impl Default for DepthPrecisionSelector {
    fn default() -> Self {
        Self {
            ratio_threshold: REVERSE_Z_RATIO_THRESHOLD,
        }
    }
}

impl DepthPrecisionSelector {
    pub fn new(ratio_threshold: f32) -> Self {
        Self { ratio_threshold }
    }

    /// Reverse-Z when forced or when `far / near` exceeds the threshold.
    ///
    /// A non-positive `near` counts as an unbounded ratio.
    pub fn select(&self, near: f32, far: f32, reverse_z_forced: bool) -> DepthPrecision {
        let ratio = if near > 0.0 { far / near } else { f32::INFINITY };
        if reverse_z_forced || ratio > self.ratio_threshold {
            DepthPrecision::REVERSE
        } else {
            DepthPrecision::STANDARD
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_ratio_selects_standard() {
        let precision = DepthPrecisionSelector::default().select(1.0, 100.0, false);
        assert_eq!(precision.format, DepthFormat::Standard32Float);
        assert_eq!(precision.compare, DepthCompare::Less);
    }

    #[test]
    fn test_large_ratio_selects_reverse() {
        let precision = DepthPrecisionSelector::default().select(0.1, 500.0, false);
        assert_eq!(precision, DepthPrecision::REVERSE);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let selector = DepthPrecisionSelector::default();
        assert_eq!(selector.select(1.0, 1000.0, false), DepthPrecision::STANDARD);
        assert_eq!(selector.select(1.0, 1000.5, false), DepthPrecision::REVERSE);
    }

    #[test]
    fn test_forced_reverse_wins() {
        let precision = DepthPrecisionSelector::default().select(1.0, 2.0, true);
        assert_eq!(precision.format, DepthFormat::Reverse32Float);
        assert_eq!(precision.compare, DepthCompare::Greater);
    }

    #[test]
    fn test_zero_near_is_reverse() {
        let precision = DepthPrecisionSelector::default().select(0.0, 10.0, false);
        assert_eq!(precision, DepthPrecision::REVERSE);
    }

    #[test]
    fn test_custom_threshold() {
        let selector = DepthPrecisionSelector::new(10.0);
        assert_eq!(selector.select(1.0, 20.0, false), DepthPrecision::REVERSE);
    }

    #[test]
    fn test_tags() {
        assert_eq!(DepthFormat::Reverse32Float.to_string(), "REVERSE_FLOAT32");
        assert_eq!(DepthFormat::Standard32Float.to_string(), "STANDARD_FLOAT32");
        assert_eq!(DepthCompare::Greater.to_string(), "GREATER");
        assert_eq!(DepthCompare::Less.to_string(), "LESS");
    }

    #[test]
    fn test_clear_value_is_far_plane() {
        assert_eq!(DepthPrecision::REVERSE.clear_value(), 0.0);
        assert_eq!(DepthPrecision::STANDARD.clear_value(), 1.0);
        assert!(DepthFormat::Reverse32Float.is_reversed());
        assert!(!DepthFormat::Standard32Float.is_reversed());
    }

    #[cfg(feature = "wgpu")]
    #[test]
    fn test_wgpu_mapping() {
        assert_eq!(
            DepthFormat::Reverse32Float.to_wgpu(),
            wgpu::TextureFormat::Depth32Float
        );
        assert_eq!(
            DepthCompare::Greater.to_wgpu(),
            wgpu::CompareFunction::Greater
        );
        assert_eq!(DepthCompare::Less.to_wgpu(), wgpu::CompareFunction::Less);
    }
}
