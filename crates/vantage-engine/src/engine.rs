//! The per-frame pipeline.

use glam::{Mat4, Vec3};
use tracing::{debug, info, warn};
use vantage_camera::{CameraRig, CameraUpdate, ClipHint, CollisionResolution, CollisionResolver};
use vantage_config::Config;
use vantage_math::EPSILON;
use vantage_render::{DepthInterpolationData, DepthInterpolator, ProjectionBuilder, ProjectionUpdate};
use vantage_spatial::SpatialGrid;

use crate::error::EngineError;
use crate::metrics::{AdaptiveMetricsTracker, MetricsSnapshot};
use crate::timing::{FrameStats, FrameTimer, Stage};

/// Everything produced by one [`PhysicsEngine::update`].
///
/// `visibility` and the arrays in `depth` are index-aligned with the
/// `positions` passed in.
#[derive(Clone, Debug)]
pub struct PhysicsUpdateResult {
    pub frame_index: u64,
    pub camera: CameraUpdate,
    pub view: Mat4,
    pub projection: ProjectionUpdate,
    pub collision: CollisionResolution,
    /// Broad-phase candidates tested for collision.
    pub nearby: Vec<usize>,
    pub visibility: Vec<bool>,
    pub depth: DepthInterpolationData,
    pub metrics: MetricsSnapshot,
    pub frame: FrameStats,
}

/// Runs the camera pipeline once per frame.
///
/// Configuration changes are staged with [`set_config`](Self::set_config)
/// and take effect at the start of the next update, so one frame never mixes
/// two configurations.
pub struct PhysicsEngine {
    config: Config,
    pending_config: Option<Config>,
    grid: SpatialGrid,
    metrics: AdaptiveMetricsTracker,
    resolver: CollisionResolver,
    projection: ProjectionBuilder,
    interpolator: DepthInterpolator,
    rig: Option<CameraRig>,
    timer: FrameTimer,
    frame_count: u64,
    since_metrics_log: f32,
}

impl PhysicsEngine {
    pub fn new(config: Config) -> Self {
        Self {
            grid: SpatialGrid::new(&config.spatial),
            metrics: AdaptiveMetricsTracker::new(&config.clipping, &config.projection),
            resolver: CollisionResolver::new(&config.collision, &config.camera),
            projection: ProjectionBuilder::new(&config.projection),
            interpolator: DepthInterpolator::new(&config.interpolation),
            rig: None,
            timer: FrameTimer::new(),
            frame_count: 0,
            since_metrics_log: 0.0,
            pending_config: None,
            config,
        }
    }

    /// Place the camera. Calling this again replaces the camera and its
    /// clip-plane history.
    pub fn initialize(&mut self, position: Vec3, target: Vec3) {
        self.rig = Some(CameraRig::new(position, target, &self.config));
        info!(?position, ?target, "physics engine initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.rig.is_some()
    }

    /// Stage a new configuration for the next update.
    pub fn set_config(&mut self, config: Config) {
        self.pending_config = Some(config);
    }

    /// Configuration in effect for the last update.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn camera(&self) -> Option<&CameraRig> {
        self.rig.as_ref()
    }

    /// Point the camera at a new target.
    pub fn set_target(&mut self, target: Vec3) -> Result<(), EngineError> {
        let rig = self.rig.as_mut().ok_or(EngineError::NotInitialized)?;
        rig.set_target(target);
        Ok(())
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Advance one frame.
    ///
    /// `positions` and `radii` describe the scene's bounding spheres. When
    /// their lengths differ the shorter one decides how many objects take
    /// part; the rest are reported hidden.
    pub fn update(
        &mut self,
        dt: f32,
        desired: Vec3,
        positions: &[Vec3],
        radii: &[f32],
    ) -> Result<PhysicsUpdateResult, EngineError> {
        if self.rig.is_none() {
            return Err(EngineError::NotInitialized);
        }
        if let Some(config) = self.pending_config.take() {
            self.apply_config(config);
        }

        let dt = if dt.is_finite() && dt > EPSILON {
            dt
        } else {
            warn!(dt, "frame delta out of range, clamping");
            EPSILON
        };

        if positions.len() != radii.len() {
            warn!(
                positions = positions.len(),
                radii = radii.len(),
                "object arrays differ in length, using the shorter"
            );
        }
        let object_count = positions.len().min(radii.len());

        let Self {
            grid,
            metrics,
            resolver,
            projection,
            interpolator,
            rig,
            timer,
            ..
        } = self;
        let Some(rig) = rig.as_mut() else {
            return Err(EngineError::NotInitialized);
        };

        timer.begin_frame();
        let current = rig.position();

        timer.time(Stage::Spatial, || grid.rebuild(positions, radii));
        timer.time(Stage::Metrics, || {
            metrics.update(current, &positions[..object_count])
        });

        let (nearby, collision) = timer.time(Stage::Collision, || {
            let nearby = grid.query(current);
            let velocity = (desired - current) / dt;
            let collision = resolver.resolve(desired, current, &nearby, positions, radii, velocity);
            (nearby, collision)
        });

        let hint = ClipHint {
            near: metrics.near(),
            far: metrics.far(),
        };
        let camera = timer.time(Stage::Camera, || rig.update(dt, collision.position, hint));
        let view = rig.view_matrix();

        let state = camera.state;
        let projection_update = timer.time(Stage::Projection, || {
            projection.update(
                state.position,
                state.forward,
                state.up,
                state.right,
                state.near,
                state.far,
            )
        });
        let visibility = timer.time(Stage::Culling, || projection.culler().cull(positions, radii));
        let depth = timer.time(Stage::Interpolation, || {
            interpolator.prepare(state.position, positions, radii, &visibility)
        });
        let frame = timer.end_frame();

        self.frame_count += 1;
        let snapshot = self.metrics.snapshot();
        self.log_metrics(dt, &snapshot, &depth, &collision);

        Ok(PhysicsUpdateResult {
            frame_index: self.frame_count,
            camera,
            view,
            projection: projection_update,
            collision,
            nearby,
            visibility,
            depth,
            metrics: snapshot,
            frame,
        })
    }

    fn apply_config(&mut self, config: Config) {
        self.grid.reconfigure(&config.spatial);
        self.metrics.set_config(&config.clipping, &config.projection);
        self.resolver.set_config(&config.collision, &config.camera);
        self.projection.set_config(&config.projection);
        self.interpolator.set_config(&config.interpolation);
        if let Some(rig) = self.rig.as_mut() {
            rig.set_config(&config);
        }
        self.config = config;
        debug!(frame = self.frame_count, "staged configuration applied");
    }

    fn log_metrics(
        &mut self,
        dt: f32,
        snapshot: &MetricsSnapshot,
        depth: &DepthInterpolationData,
        collision: &CollisionResolution,
    ) {
        if !self.config.debug.log_metrics {
            return;
        }
        self.since_metrics_log += dt;
        if self.since_metrics_log < self.config.debug.metrics_log_interval {
            return;
        }
        self.since_metrics_log = 0.0;
        let frame = self.timer.last();
        info!(
            frame = self.frame_count,
            near = snapshot.near,
            far = snapshot.far,
            fov = snapshot.fov_degrees,
            quality = snapshot.depth_quality,
            stability = snapshot.stability,
            visible = depth.visible_count,
            collided = collision.collided,
            fps = frame.fps,
            avg_frame_ms = frame.avg_frame_time_ms,
            "camera metrics"
        );
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
