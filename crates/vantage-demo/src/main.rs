//! Flythrough demo for the Vantage camera pipeline.
//!
//! Scatters bounding spheres around the origin, then flies the desired camera
//! position along a wobbling orbit through them and logs what the engine
//! reports. Configuration is loaded from `config.ron` and can be overridden
//! via CLI flags.
//!
//! Run with `cargo run -p vantage-demo -- --frames 1200 --objects 500`.

use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{error, info, warn};
use vantage_config::{CliArgs, Config, default_config_dir};
use vantage_engine::PhysicsEngine;

const ORBIT_RADIUS: f32 = 30.0;
const ORBIT_RATE: f32 = 0.25;
const ORBIT_HEIGHT: f32 = 3.0;
const SCATTER_RADIUS: f32 = 60.0;

#[derive(Parser, Debug)]
#[command(name = "vantage-demo", about = "Fly a camera through a random scene")]
struct DemoArgs {
    #[command(flatten)]
    engine: CliArgs,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Number of objects to scatter.
    #[arg(long, default_value_t = 200)]
    objects: usize,

    /// Seed for object placement.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Log a frame summary every N frames (0 disables).
    #[arg(long, default_value_t = 60)]
    report_every: u32,
}

fn main() -> ExitCode {
    let args = DemoArgs::parse();

    let config_dir = args.engine.config.clone().or_else(default_config_dir);
    let mut config = match config_dir.as_deref() {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args.engine);

    let log_dir = config_dir.as_ref().map(|dir| dir.join("logs"));
    vantage_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if config_dir.is_none() {
        warn!("No config directory available, running with defaults");
    }

    let mut rng = Xoshiro256StarStar::seed_from_u64(args.seed);
    let (positions, radii) = scatter_objects(&mut rng, args.objects);
    info!(
        objects = positions.len(),
        seed = args.seed,
        frames = args.frames,
        "Scene scattered"
    );

    let mut engine = PhysicsEngine::new(config);
    engine.initialize(orbit_point(0.0), Vec3::ZERO);

    let dt = 1.0 / args.fps.max(1.0);
    let mut collided_frames = 0u32;
    let mut peak_visible = 0usize;

    for frame in 0..args.frames {
        let t = frame as f32 * dt;
        let result = match engine.update(dt, orbit_point(t), &positions, &radii) {
            Ok(result) => result,
            Err(e) => {
                error!("Frame {frame} failed: {e}");
                return ExitCode::FAILURE;
            }
        };

        if result.collision.collided {
            collided_frames += 1;
        }
        peak_visible = peak_visible.max(result.depth.visible_count);

        if args.report_every > 0 && frame % args.report_every == 0 {
            let camera = result.camera.state;
            info!(
                frame = result.frame_index,
                position = ?camera.position,
                near = camera.near,
                far = camera.far,
                mode = %result.projection.mode,
                depth = %result.camera.precision.format,
                visible = result.depth.visible_count,
                nearby = result.nearby.len(),
                collided = result.collision.collided,
                quality = result.metrics.depth_quality,
                frame_ms = result.frame.frame_time_ms,
                "Frame summary"
            );
        }
    }

    let metrics = engine.metrics();
    info!(
        frames = engine.frame_count(),
        collided_frames,
        peak_visible,
        average_quality = metrics.average_quality,
        stability = metrics.stability,
        "Flythrough complete"
    );
    ExitCode::SUCCESS
}

/// Desired camera position at time `t` seconds: a circle around the origin
/// that bobs up and down and swings in and out through the scene.
fn orbit_point(t: f32) -> Vec3 {
    let angle = t * ORBIT_RATE;
    let radius = ORBIT_RADIUS * (0.6 + 0.4 * (angle * 3.0).cos());
    Vec3::new(
        angle.cos() * radius,
        ORBIT_HEIGHT + 2.0 * (angle * 5.0).sin(),
        angle.sin() * radius,
    )
}

/// Random spheres in a flat disc around the origin.
fn scatter_objects(rng: &mut impl Rng, count: usize) -> (Vec<Vec3>, Vec<f32>) {
    let mut positions = Vec::with_capacity(count);
    let mut radii = Vec::with_capacity(count);
    for _ in 0..count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = rng.gen_range(5.0..SCATTER_RADIUS);
        positions.push(Vec3::new(
            angle.cos() * distance,
            rng.gen_range(0.0..8.0),
            angle.sin() * distance,
        ));
        radii.push(rng.gen_range(0.3..3.0));
    }
    (positions, radii)
}
