//! Command-line argument parsing for Vantage.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, DepthCurve};

/// Vantage command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "vantage", about = "Vantage camera physics engine")]
pub struct CliArgs {
    /// Vertical field of view in degrees.
    #[arg(long)]
    pub fov: Option<f32>,

    /// Viewport aspect ratio (width / height).
    #[arg(long)]
    pub aspect: Option<f32>,

    /// Force reverse-Z depth.
    #[arg(long)]
    pub reverse_z: Option<bool>,

    /// Use logarithmic depth when reverse-Z is off.
    #[arg(long)]
    pub logarithmic_depth: Option<bool>,

    /// Depth curve applied to interpolation factors.
    #[arg(long, value_enum)]
    pub depth_curve: Option<DepthCurve>,

    /// Camera travel speed in world units per second.
    #[arg(long)]
    pub camera_speed: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Periodically log adaptive metrics.
    #[arg(long)]
    pub log_metrics: Option<bool>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(fov) = args.fov {
            self.projection.fov_degrees = fov;
        }
        if let Some(aspect) = args.aspect {
            self.projection.aspect_ratio = aspect;
        }
        if let Some(reverse_z) = args.reverse_z {
            self.projection.reverse_z = reverse_z;
        }
        if let Some(log_depth) = args.logarithmic_depth {
            self.projection.logarithmic_depth = log_depth;
        }
        if let Some(curve) = args.depth_curve {
            self.interpolation.depth_curve = curve;
        }
        if let Some(speed) = args.camera_speed {
            self.camera.speed = speed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(log_metrics) = args.log_metrics {
            self.debug.log_metrics = log_metrics;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            fov: Some(90.0),
            reverse_z: Some(false),
            depth_curve: Some(DepthCurve::Linear),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.projection.fov_degrees, 90.0);
        assert!(!config.projection.reverse_z);
        assert_eq!(config.interpolation.depth_curve, DepthCurve::Linear);
        // Non-overridden fields retain defaults
        assert_eq!(config.projection.aspect_ratio, 16.0 / 9.0);
        assert_eq!(config.camera.speed, 5.0);
    }

    #[test]
    fn test_cli_no_override() {
        let defaults = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "vantage",
            "--fov",
            "75",
            "--depth-curve",
            "exponential",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.fov, Some(75.0));
        assert_eq!(args.depth_curve, Some(DepthCurve::Exponential));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }
}
