//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Camera motion limits.
    pub camera: CameraConfig,
    /// Near/far clip-plane bounds.
    pub clipping: ClippingConfig,
    /// Field of view and depth-mapping mode.
    pub projection: ProjectionConfig,
    /// Depth interpolation settings.
    pub interpolation: InterpolationConfig,
    /// Camera collision response.
    pub collision: CollisionConfig,
    /// Broad-phase grid sizing.
    pub spatial: SpatialConfig,
    /// Logging and diagnostics.
    pub debug: DebugConfig,
}

/// Camera motion configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Maximum travel per second toward the desired position.
    pub speed: f32,
    /// The camera is never allowed closer than this to its target.
    pub min_distance: f32,
    /// Floor applied to the resolved camera height.
    pub min_height: f32,
}

/// Clip-plane configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClippingConfig {
    /// Initial near plane distance.
    pub near_plane: f32,
    /// Initial far plane distance.
    pub far_plane: f32,
    /// Lower bound for the adaptive near plane.
    pub min_near_plane: f32,
    /// Upper bound for the adaptive near plane.
    pub max_near_plane: f32,
    /// Lower bound for the adaptive far plane.
    pub min_far_plane: f32,
    /// Largest allowed far/near ratio.
    pub max_depth_ratio: f32,
}

/// Projection configuration.
///
/// Angles are stored in degrees; all projection and frustum code works in
/// radians via [`ProjectionConfig::fov_y_radians`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Narrowest field of view the metrics adaptation may report, in degrees.
    pub min_fov_degrees: f32,
    /// Widest field of view the metrics adaptation may report, in degrees.
    pub max_fov_degrees: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Force reverse-Z depth (near = 1, far = 0).
    pub reverse_z: bool,
    /// Use the logarithmic depth projection when reverse-Z is off.
    pub logarithmic_depth: bool,
}

/// Remapping applied to normalized depth interpolation factors.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum DepthCurve {
    /// `t`
    Linear,
    /// `log1p(9t) / ln(10)`
    #[default]
    Logarithmic,
    /// `t²`
    Exponential,
}

/// Depth interpolation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Divide barycentric weights by clip-space `w` when clip positions exist.
    pub perspective_correct: bool,
    /// Curve applied to per-object interpolation factors.
    pub depth_curve: DepthCurve,
}

/// Camera collision configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollisionConfig {
    /// Radius of the camera's collision sphere.
    pub camera_radius: f32,
    /// Fraction of the penetration depth removed per resolution pass.
    pub response_strength: f32,
    /// Extra distance added to each push-out.
    pub separation_bias: f32,
    /// Scales the camera's approach speed into additional penetration.
    pub velocity_penetration_factor: f32,
    /// Hard cap on resolution passes per frame.
    pub max_iterations: u32,
}

/// Broad-phase grid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpatialConfig {
    /// Edge length of one grid cell in world units.
    pub cell_size: f32,
    /// Cells per axis. The grid is centred on the origin.
    pub grid_dimension: u32,
    /// Neighbourhood radius, in cells, scanned by a query.
    pub search_radius_cells: u32,
    /// Maximum number of indices a query returns.
    pub max_nearby_objects: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Periodically log the adaptive metrics snapshot.
    pub log_metrics: bool,
    /// Seconds of simulated time between metric log lines.
    pub metrics_log_interval: f32,
}

// --- Default implementations ---

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            min_distance: 0.5,
            min_height: 0.0,
        }
    }
}

impl Default for ClippingConfig {
    fn default() -> Self {
        Self {
            near_plane: 0.1,
            far_plane: 100.0,
            min_near_plane: 0.01,
            max_near_plane: 10.0,
            min_far_plane: 10.0,
            max_depth_ratio: 10_000.0,
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            min_fov_degrees: 30.0,
            max_fov_degrees: 120.0,
            aspect_ratio: 16.0 / 9.0,
            reverse_z: true,
            logarithmic_depth: false,
        }
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            perspective_correct: true,
            depth_curve: DepthCurve::Logarithmic,
        }
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            camera_radius: 0.3,
            response_strength: 1.0,
            separation_bias: 0.05,
            velocity_penetration_factor: 0.1,
            max_iterations: 10,
        }
    }
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            cell_size: 5.0,
            grid_dimension: 100,
            search_radius_cells: 3,
            max_nearby_objects: 50,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_metrics: false,
            metrics_log_interval: 1.0,
        }
    }
}

impl ProjectionConfig {
    /// Vertical field of view in radians.
    pub fn fov_y_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

/// Platform config directory for Vantage (e.g. `~/.config/vantage`).
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vantage"))
}

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

impl Config {
    /// Path of the config file inside `config_dir`.
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load `config.ron` from `config_dir`, writing the defaults there first if
    /// the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(config_dir);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = Self::read_from(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config to `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(config_dir);
        let write_error = |source| ConfigError::WriteError {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;
        std::fs::write(&path, serialized).map_err(write_error)
    }

    /// Re-read the file; `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read_from(&Self::path_in(config_dir))?;
        if &fresh == self {
            return Ok(None);
        }
        log::info!("Config changed on disk, reloading");
        Ok(Some(fresh))
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}
