//! Configuration for the Vantage camera-physics engine.
//!
//! Every tunable the per-frame pipeline consumes lives here: clip-plane bounds,
//! projection mode toggles, collision response, spatial grid sizing. Settings
//! persist to disk as `config.ron`, tolerate missing or unknown fields, and can
//! be overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CameraConfig, ClippingConfig, CollisionConfig, Config, DebugConfig,
    DepthCurve, InterpolationConfig, ProjectionConfig, SpatialConfig, default_config_dir,
};
pub use error::ConfigError;
