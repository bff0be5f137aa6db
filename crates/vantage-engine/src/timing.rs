//! Wall-clock timing of each pipeline stage.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Number of frame times kept for the rolling average.
pub const FRAME_HISTORY_LEN: usize = 60;

/// Pipeline stages timed by [`FrameTimer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Spatial,
    Metrics,
    Collision,
    Camera,
    Projection,
    Culling,
    Interpolation,
}

/// Milliseconds spent in each stage of the last frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StageTimings {
    pub spatial_ms: f32,
    pub metrics_ms: f32,
    pub collision_ms: f32,
    pub camera_ms: f32,
    pub projection_ms: f32,
    pub culling_ms: f32,
    pub interpolation_ms: f32,
}

impl StageTimings {
    fn slot(&mut self, stage: Stage) -> &mut f32 {
        match stage {
            Stage::Spatial => &mut self.spatial_ms,
            Stage::Metrics => &mut self.metrics_ms,
            Stage::Collision => &mut self.collision_ms,
            Stage::Camera => &mut self.camera_ms,
            Stage::Projection => &mut self.projection_ms,
            Stage::Culling => &mut self.culling_ms,
            Stage::Interpolation => &mut self.interpolation_ms,
        }
    }

    pub fn total_ms(&self) -> f32 {
        self.spatial_ms
            + self.metrics_ms
            + self.collision_ms
            + self.camera_ms
            + self.projection_ms
            + self.culling_ms
            + self.interpolation_ms
    }
}

/// Timing summary of the most recent frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FrameStats {
    /// `1000 / frame_time_ms`, 0 for a zero-length frame.
    pub fps: f32,
    pub frame_time_ms: f32,
    /// Mean over the last [`FRAME_HISTORY_LEN`] frames.
    pub avg_frame_time_ms: f32,
    pub stages: StageTimings,
}

/// Measures one frame at a time.
///
/// Call [`begin_frame`](Self::begin_frame), wrap each stage in
/// [`time`](Self::time), then [`end_frame`](Self::end_frame).
#[derive(Debug)]
pub struct FrameTimer {
    frame_start: Option<Instant>,
    current: StageTimings,
    history: [f32; FRAME_HISTORY_LEN],
    head: usize,
    count: usize,
    last: FrameStats,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            frame_start: None,
            current: StageTimings::default(),
            history: [0.0; FRAME_HISTORY_LEN],
            head: 0,
            count: 0,
            last: FrameStats::default(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
        self.current = StageTimings::default();
    }

    /// Run `f` and add its duration to `stage`.
    pub fn time<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        *self.current.slot(stage) += millis(start.elapsed());
        value
    }

    /// Close the frame and fold it into the history. A frame that was never
    /// begun is recorded as zero-length.
    pub fn end_frame(&mut self) -> FrameStats {
        let frame_time_ms = self
            .frame_start
            .take()
            .map(|start| millis(start.elapsed()))
            .unwrap_or(0.0);
        self.record(frame_time_ms)
    }

    /// Stats from the last completed frame.
    pub fn last(&self) -> FrameStats {
        self.last
    }

    fn record(&mut self, frame_time_ms: f32) -> FrameStats {
        self.history[self.head] = frame_time_ms;
        self.head = (self.head + 1) % FRAME_HISTORY_LEN;
        if self.count < FRAME_HISTORY_LEN {
            self.count += 1;
        }

        let window = if self.count < FRAME_HISTORY_LEN {
            &self.history[..self.count]
        } else {
            &self.history[..]
        };
        let avg_frame_time_ms = window.iter().sum::<f32>() / self.count as f32;

        self.last = FrameStats {
            fps: if frame_time_ms > 0.0 {
                1000.0 / frame_time_ms
            } else {
                0.0
            },
            frame_time_ms,
            avg_frame_time_ms,
            stages: self.current,
        };
        self.last
    }
}

fn millis(duration: Duration) -> f32 {
    duration.as_secs_f32() * 1000.0
}
