//! Configuration for stretch-io
//!
//! Loads configuration from a TOML file. Every section except `[robot]` has
//! defaults, and the robot section itself can be adjusted at construction
//! time with [`ConfigOverrides`].

use crate::core::status::Joint;
use crate::devices::mock::config::SimulationConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub robot: StretchConfig,
    #[serde(default)]
    pub body: BodyConfig,
    #[serde(default)]
    pub teleop: TeleopConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Robot configuration handed to the lifecycle shim
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StretchConfig {
    /// Robot type tag reported to the recording pipeline
    #[serde(default = "default_robot_type")]
    pub robot_type: String,

    /// Cameras keyed by name; the name becomes `observation.images.<name>`
    #[serde(default)]
    pub cameras: BTreeMap<String, CameraConfig>,

    /// Clamp on command magnitude, scalar or one value per position joint.
    /// Carried for the recording pipeline; the shim does not apply it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_relative_target: Option<MaxRelativeTarget>,
}

fn default_robot_type() -> String {
    "stretch".to_string()
}

/// Scalar or per-joint command clamp
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MaxRelativeTarget {
    Scalar(f32),
    PerJoint(Vec<f32>),
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CameraConfig {
    /// Camera driver (currently "synthetic")
    #[serde(default = "default_camera_driver")]
    pub driver: String,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    /// Frame rotation in degrees (-90, 90 or 180)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
    /// Simulate an unplugged device (synthetic driver only)
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fail_connect: bool,
}

fn default_camera_driver() -> String {
    "synthetic".to_string()
}

impl CameraConfig {
    pub fn synthetic(fps: u32, width: u32, height: u32) -> Self {
        Self {
            driver: default_camera_driver(),
            fps,
            width,
            height,
            rotation: None,
            fail_connect: false,
        }
    }

    pub fn rotated(mut self, degrees: i32) -> Self {
        self.rotation = Some(degrees);
        self
    }
}

/// Vendor body configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BodyConfig {
    /// Body driver (currently "mock")
    #[serde(default = "default_body_driver")]
    pub driver: String,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_body_driver() -> String {
    "mock".to_string()
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            driver: default_body_driver(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// Teleoperation loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TeleopConfig {
    /// Control loop rate (Hz)
    #[serde(default = "default_teleop_fps")]
    pub fps: u32,
}

fn default_teleop_fps() -> u32 {
    30
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            fps: default_teleop_fps(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Construction-time overrides for [`StretchConfig`]
///
/// Each `Some` field replaces the corresponding base value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub robot_type: Option<String>,
    pub cameras: Option<BTreeMap<String, CameraConfig>>,
    pub max_relative_target: Option<MaxRelativeTarget>,
}

impl StretchConfig {
    /// Stock Stretch cameras: navigation fisheye plus head and wrist depth cameras
    pub fn stretch_defaults() -> Self {
        let mut cameras = BTreeMap::new();
        cameras.insert(
            "navigation".to_string(),
            CameraConfig::synthetic(10, 1280, 720).rotated(-90),
        );
        cameras.insert(
            "head".to_string(),
            CameraConfig::synthetic(30, 640, 480).rotated(90),
        );
        cameras.insert("wrist".to_string(), CameraConfig::synthetic(30, 640, 480));
        Self {
            robot_type: default_robot_type(),
            cameras,
            max_relative_target: None,
        }
    }

    /// Apply construction-time overrides
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(robot_type) = overrides.robot_type {
            self.robot_type = robot_type;
        }
        if let Some(cameras) = overrides.cameras {
            self.cameras = cameras;
        }
        if overrides.max_relative_target.is_some() {
            self.max_relative_target = overrides.max_relative_target;
        }
        self
    }

    /// Check camera parameters and the command clamp
    pub fn validate(&self) -> Result<()> {
        if self.robot_type.is_empty() {
            return Err(Error::Config("robot_type must not be empty".to_string()));
        }
        for (name, cam) in &self.cameras {
            if cam.fps == 0 {
                return Err(Error::Config(format!("camera '{}': fps must be > 0", name)));
            }
            if cam.width == 0 || cam.height == 0 {
                return Err(Error::Config(format!(
                    "camera '{}': frame size {}x{} is empty",
                    name, cam.width, cam.height
                )));
            }
            if let Some(rotation) = cam.rotation {
                if !matches!(rotation, -90 | 90 | 180) {
                    return Err(Error::Config(format!(
                        "camera '{}': rotation {} not in (-90, 90, 180)",
                        name, rotation
                    )));
                }
            }
        }
        match &self.max_relative_target {
            Some(MaxRelativeTarget::Scalar(v)) if *v <= 0.0 => Err(Error::Config(format!(
                "max_relative_target must be positive, got {}",
                v
            ))),
            Some(MaxRelativeTarget::PerJoint(values)) if values.len() != Joint::ALL.len() => {
                Err(Error::Config(format!(
                    "max_relative_target has {} entries, expected {}",
                    values.len(),
                    Joint::ALL.len()
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for StretchConfig {
    fn default() -> Self {
        Self::stretch_defaults()
    }
}

impl AppConfig {
    /// Load and validate configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// use stretch_io::config::AppConfig;
    ///
    /// let config = AppConfig::load("stretch.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.teleop.fps == 0 {
            return Err(Error::Config("teleop fps must be > 0".to_string()));
        }
        self.body.simulation.validate()?;
        self.robot.validate()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            robot: StretchConfig::stretch_defaults(),
            body: BodyConfig::default(),
            teleop: TeleopConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
