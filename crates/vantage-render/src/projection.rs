//! Projection matrices for the three depth mappings, plus the depth-space
//! transforms that go with them.
//!
//! All matrices are right-handed with the camera looking down `-Z`. Angles are
//! radians.

use std::fmt;

use glam::{Mat4, Vec3};
use vantage_config::ProjectionConfig;
use vantage_math::{EPSILON, Frustum, from_rows};

use crate::frustum::FrustumCuller;

/// Scale constant `C` of the logarithmic depth mapping.
pub const LOG_DEPTH_C: f32 = 1.0;

/// Ratio at which [`DepthPrecisionMetrics::quality`] starts to drop below 1.
const QUALITY_REFERENCE_RATIO: f32 = 10_000.0;

/// Depth mapping used by the projection matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ProjectionMode {
    /// OpenGL-style, near -> -1, far -> +1.
    Standard,
    /// near -> 1, far -> 0.
    #[default]
    ReverseZ,
    /// `ln(Cz + 1) / ln(Cf + 1)` depth distribution.
    Logarithmic,
}

impl ProjectionMode {
    /// Reverse-Z wins over logarithmic; standard is the fallback.
    pub fn from_config(config: &ProjectionConfig) -> Self {
        if config.reverse_z {
            ProjectionMode::ReverseZ
        } else if config.logarithmic_depth {
            ProjectionMode::Logarithmic
        } else {
            ProjectionMode::Standard
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionMode::Standard => "STANDARD",
            ProjectionMode::ReverseZ => "REVERSE_Z",
            ProjectionMode::Logarithmic => "LOGARITHMIC",
        }
    }

    /// Build the projection matrix for this mode.
    ///
    /// Out-of-range inputs are pulled back into a usable range (positive near,
    /// far beyond near, positive aspect) rather than producing infinities.
    pub fn build(self, fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let near = near.max(EPSILON);
        let far = if far > near { far } else { near + 1.0 };
        let aspect = if aspect > EPSILON { aspect } else { 1.0 };

        match self {
            ProjectionMode::Standard => Mat4::perspective_rh_gl(fov_y, aspect, near, far),
            // Swapping near and far inverts the depth range.
            ProjectionMode::ReverseZ => Mat4::perspective_rh(fov_y, aspect, far, near),
            ProjectionMode::Logarithmic => logarithmic_matrix(fov_y, aspect, far),
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn logarithmic_matrix(fov_y: f32, aspect: f32, far: f32) -> Mat4 {
    let focal = 1.0 / (fov_y * 0.5).tan();
    let log_far = (LOG_DEPTH_C * far + 1.0).ln();
    from_rows([
        [focal / aspect, 0.0, 0.0, 0.0],
        [0.0, focal, 0.0, 0.0],
        [0.0, 0.0, 1.0 / log_far, 0.0],
        [0.0, 0.0, LOG_DEPTH_C / log_far, 1.0],
    ])
}

/// How well the current clip range uses the depth buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthPrecisionMetrics {
    pub depth_ratio: f32,
    /// `1 / near`.
    pub precision_near: f32,
    /// `1 / far`.
    pub precision_far: f32,
    /// `min(1, 10000 / ratio)`.
    pub quality: f32,
}

impl DepthPrecisionMetrics {
    pub fn from_clip(near: f32, far: f32) -> Self {
        let depth_ratio = far / near;
        Self {
            depth_ratio,
            precision_near: 1.0 / near,
            precision_far: 1.0 / far,
            quality: (QUALITY_REFERENCE_RATIO / depth_ratio).min(1.0),
        }
    }
}

/// Everything the renderer needs from one projection update.
#[derive(Clone, Copy, Debug)]
pub struct ProjectionUpdate {
    pub matrix: Mat4,
    pub mode: ProjectionMode,
    pub frustum: Frustum,
    pub precision: DepthPrecisionMetrics,
}

/// Builds the projection matrix and view frustum each frame.
///
/// The builder owns the frame's [`FrustumCuller`], so visibility tests run
/// against exactly the frustum reported in the last [`ProjectionUpdate`].
#[derive(Clone, Debug)]
pub struct ProjectionBuilder {
    mode: ProjectionMode,
    fov_y: f32,
    aspect: f32,
    culler: FrustumCuller,
}

impl ProjectionBuilder {
    pub fn new(config: &ProjectionConfig) -> Self {
        Self {
            mode: ProjectionMode::from_config(config),
            fov_y: config.fov_y_radians(),
            aspect: config.aspect_ratio,
            culler: FrustumCuller::default(),
        }
    }

    /// Replace mode, field of view, and aspect. The current frustum is kept
    /// until the next [`update`](Self::update).
    pub fn set_config(&mut self, config: &ProjectionConfig) {
        self.mode = ProjectionMode::from_config(config);
        self.fov_y = config.fov_y_radians();
        self.aspect = config.aspect_ratio;
        tracing::debug!(mode = %self.mode, fov_y = self.fov_y, "projection reconfigured");
    }

    /// Culler holding the frustum from the last update.
    pub fn culler(&self) -> &FrustumCuller {
        &self.culler
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Projection matrix, frustum, and precision metrics for the given camera
    /// basis and clip range.
    pub fn update(
        &mut self,
        position: Vec3,
        forward: Vec3,
        up: Vec3,
        right: Vec3,
        near: f32,
        far: f32,
    ) -> ProjectionUpdate {
        let matrix = self.mode.build(self.fov_y, self.aspect, near, far);
        self.culler.update(
            position,
            forward,
            up,
            right,
            self.fov_y,
            self.aspect,
            near,
            far,
        );
        ProjectionUpdate {
            matrix,
            mode: self.mode,
            frustum: *self.culler.frustum(),
            precision: DepthPrecisionMetrics::from_clip(near, far),
        }
    }
}

/// Map a linear view depth into `[0, 1]` logarithmically.
pub fn log_depth_transform(linear_depth: f32, far: f32) -> f32 {
    (LOG_DEPTH_C * linear_depth + 1.0).ln() / (LOG_DEPTH_C * far + 1.0).ln()
}

/// Inverse of [`log_depth_transform`].
pub fn log_depth_inverse(log_depth: f32, far: f32) -> f32 {
    ((log_depth * (LOG_DEPTH_C * far + 1.0).ln()).exp() - 1.0) / LOG_DEPTH_C
}

/// Derivative of [`log_depth_transform`] at `linear_depth`: how much stored
/// depth changes per world unit there.
pub fn log_depth_precision(linear_depth: f32, far: f32) -> f32 {
    log_depth_precision_with(LOG_DEPTH_C, linear_depth, far)
}

/// [`log_depth_precision`] for an arbitrary distribution constant `c`.
pub fn log_depth_precision_with(c: f32, linear_depth: f32, far: f32) -> f32 {
    c / ((c * linear_depth + 1.0) * (c * far + 1.0).ln())
}

/// Search for the distribution constant whose precision at `near` comes
/// closest to `target_precision`.
///
/// Starts from [`LOG_DEPTH_C`] and walks with a shrinking step, so the result
/// stays within about two units of it. Never returns a non-positive constant.
pub fn optimal_log_depth_c(near: f32, far: f32, target_precision: f32) -> f32 {
    const ITERATIONS: usize = 100;
    const MIN_C: f32 = 0.01;

    let mut c = LOG_DEPTH_C;
    let mut step = 0.1;
    let mut best_c = c;
    let mut best_error = f32::MAX;

    for _ in 0..ITERATIONS {
        let precision = log_depth_precision_with(c, near, far);
        let error = (precision - target_precision).abs();
        if error < best_error {
            best_error = error;
            best_c = c;
        }
        // Precision at the near plane grows with c.
        if precision < target_precision {
            c += step;
        } else {
            c = (c - step).max(MIN_C);
        }
        step *= 0.95;
    }
    best_c
}

/// Reverse-Z depth of a linear distance: 1 at the eye, 0 at `far`.
pub fn reverse_z_transform(depth: f32, far: f32) -> f32 {
    1.0 - depth / far
}
