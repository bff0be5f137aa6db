//! Scene-driven clip and field-of-view suggestions with a rolling quality
//! history.
//!
//! The tracker looks at every object's distance from the camera, not just the
//! target, so its near/far values are what the engine hands the clipping
//! planner when the camera distance alone says nothing.

use glam::Vec3;
use serde::Serialize;
use vantage_config::{ClippingConfig, ProjectionConfig};
use vantage_math::approach;

/// Number of frames kept by [`MetricsHistory`].
pub const METRICS_HISTORY_LEN: usize = 60;

/// Objects closer than this are ignored when measuring scene depth.
const MIN_OBJECT_DISTANCE: f32 = 0.01;

/// Distances assumed when no object qualifies.
const FALLBACK_MIN_DISTANCE: f32 = 1.0;
const FALLBACK_MAX_DISTANCE: f32 = 100.0;
const FALLBACK_AVG_DISTANCE: f32 = 50.0;

const NEAR_DISTANCE_FACTOR: f32 = 0.05;
const FAR_DISTANCE_FACTOR: f32 = 2.0;
const NEAR_SMOOTHING: f32 = 0.1;
const FAR_SMOOTHING: f32 = 0.05;
const FOV_SMOOTHING: f32 = 0.05;

/// Field of view narrows when anything is closer than this.
const CLOSE_OBJECT_DISTANCE: f32 = 10.0;
const CLOSE_FOV_FACTOR: f32 = 0.8;

/// Far/near ratio at which depth quality reaches zero.
const QUALITY_ZERO_RATIO: f32 = 1000.0;

/// Fixed-capacity ring of per-frame depth quality values.
#[derive(Clone, Debug)]
pub struct MetricsHistory {
    samples: [f32; METRICS_HISTORY_LEN],
    head: usize,
    count: usize,
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self {
            samples: [0.0; METRICS_HISTORY_LEN],
            head: 0,
            count: 0,
        }
    }
}

impl MetricsHistory {
    /// Record a sample, overwriting the oldest once full.
    pub fn push(&mut self, quality: f32) {
        self.samples[self.head] = quality;
        self.head = (self.head + 1) % METRICS_HISTORY_LEN;
        if self.count < METRICS_HISTORY_LEN {
            self.count += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Stored samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let start = (self.head + METRICS_HISTORY_LEN - self.count) % METRICS_HISTORY_LEN;
        (0..self.count).map(move |i| self.samples[(start + i) % METRICS_HISTORY_LEN])
    }

    /// Mean quality, 1.0 when empty.
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            return 1.0;
        }
        self.iter().sum::<f32>() / self.count as f32
    }

    /// Population variance of the stored samples, 0 when empty.
    pub fn variance(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.average();
        self.iter().map(|q| (q - mean) * (q - mean)).sum::<f32>() / self.count as f32
    }

    /// `1 / (1 + 100 × variance)`; 1.0 with fewer than two samples.
    pub fn stability(&self) -> f32 {
        if self.count < 2 {
            return 1.0;
        }
        1.0 / (1.0 + 100.0 * self.variance())
    }
}

/// Current adaptive values and history summary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub near: f32,
    pub far: f32,
    pub fov_degrees: f32,
    pub depth_quality: f32,
    pub average_quality: f32,
    pub stability: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub avg_distance: f32,
}

/// Smooths near, far, and field of view toward values derived from the
/// spread of object distances.
#[derive(Clone, Debug)]
pub struct AdaptiveMetricsTracker {
    clipping: ClippingConfig,
    projection: ProjectionConfig,
    near: f32,
    far: f32,
    fov_degrees: f32,
    depth_quality: f32,
    min_distance: f32,
    max_distance: f32,
    avg_distance: f32,
    history: MetricsHistory,
}

impl AdaptiveMetricsTracker {
    pub fn new(clipping: &ClippingConfig, projection: &ProjectionConfig) -> Self {
        Self {
            clipping: clipping.clone(),
            projection: projection.clone(),
            near: clipping.near_plane,
            far: clipping.far_plane,
            fov_degrees: projection.fov_degrees,
            depth_quality: 1.0,
            min_distance: FALLBACK_MIN_DISTANCE,
            max_distance: FALLBACK_MAX_DISTANCE,
            avg_distance: FALLBACK_AVG_DISTANCE,
            history: MetricsHistory::default(),
        }
    }

    /// Replace bounds; smoothed values and history carry over.
    pub fn set_config(&mut self, clipping: &ClippingConfig, projection: &ProjectionConfig) {
        self.clipping = clipping.clone();
        self.projection = projection.clone();
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    /// Fold one frame of object positions into the smoothed values.
    pub fn update(&mut self, camera: Vec3, positions: &[Vec3]) {
        let mut min_distance = f32::MAX;
        let mut max_distance = 0.0_f32;
        let mut sum = 0.0;
        let mut counted = 0usize;
        for &position in positions {
            let distance = camera.distance(position);
            // NaN fails the comparison and is skipped.
            if distance > MIN_OBJECT_DISTANCE {
                min_distance = min_distance.min(distance);
                max_distance = max_distance.max(distance);
                sum += distance;
                counted += 1;
            }
        }
        let avg_distance = if counted == 0 {
            min_distance = FALLBACK_MIN_DISTANCE;
            max_distance = FALLBACK_MAX_DISTANCE;
            FALLBACK_AVG_DISTANCE
        } else {
            sum / counted as f32
        };

        let clip = &self.clipping;
        let near_target = clip.min_near_plane.max(min_distance * NEAR_DISTANCE_FACTOR);
        self.near = approach(self.near, near_target, NEAR_SMOOTHING);

        let max_ratio = clip.max_depth_ratio.max(2.0);
        let mut far_target = clip.min_far_plane.max(max_distance * FAR_DISTANCE_FACTOR);
        if far_target / self.near > max_ratio {
            far_target = self.near * max_ratio;
        }
        self.far = approach(self.far, far_target, FAR_SMOOTHING);

        let proj = &self.projection;
        let mut fov_target = proj.fov_degrees;
        if min_distance < CLOSE_OBJECT_DISTANCE {
            fov_target *= CLOSE_FOV_FACTOR;
        }
        let fov_target = fov_target
            .max(proj.min_fov_degrees)
            .min(proj.max_fov_degrees);
        self.fov_degrees = approach(self.fov_degrees, fov_target, FOV_SMOOTHING);

        let ratio = self.far / self.near;
        self.depth_quality = 1.0 - (ratio / QUALITY_ZERO_RATIO).min(1.0);
        self.history.push(self.depth_quality);

        self.min_distance = min_distance;
        self.max_distance = max_distance;
        self.avg_distance = avg_distance;

        tracing::trace!(
            near = self.near,
            far = self.far,
            fov = self.fov_degrees,
            quality = self.depth_quality,
            "metrics updated"
        );
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            near: self.near,
            far: self.far,
            fov_degrees: self.fov_degrees,
            depth_quality: self.depth_quality,
            average_quality: self.history.average(),
            stability: self.history.stability(),
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            avg_distance: self.avg_distance,
        }
    }
}
