//! Per-frame orchestration of the Vantage camera-physics pipeline.
//!
//! [`PhysicsEngine`] takes a desired camera position and the scene's object
//! spheres and runs broad phase, collision, camera motion, projection,
//! culling, and depth preparation in a fixed order. Adaptive metrics and
//! stage timings are reported alongside every frame.

mod engine;
mod error;
mod metrics;
mod timing;

pub use engine::{PhysicsEngine, PhysicsUpdateResult};
pub use error::EngineError;
pub use metrics::{AdaptiveMetricsTracker, METRICS_HISTORY_LEN, MetricsHistory, MetricsSnapshot};
pub use timing::{FRAME_HISTORY_LEN, FrameStats, FrameTimer, Stage, StageTimings};
