//! Mock body simulation configuration
//!
//! Every parameter has a default close to the Stretch RE2 hardware, so an
//! empty `[body.simulation]` section gives a usable simulated robot.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! SimulationConfig
//! ├── random_seed, status_noise_stddev   # Status noise
//! ├── start_homed, homing_duration_ms    # Homing behaviour
//! ├── claimed_by_other_process           # Startup refusal
//! ├── JointLimitsConfig                  # Per-joint [min, max]
//! ├── HomePoseConfig                     # Pose after homing
//! └── BaseLimitsConfig                   # Base speed clamp
//! ```
//!
//! # Default Values
//!
//! | Joint | Range | Unit |
//! |-------|-------|------|
//! | head_pan | -4.04 .. 1.73 | rad |
//! | head_tilt | -1.53 .. 0.79 | rad |
//! | lift | 0.0 .. 1.1 | m |
//! | arm | 0.0 .. 0.52 | m |
//! | wrist_pitch | -1.57 .. 0.56 | rad |
//! | wrist_roll | -3.14 .. 3.14 | rad |
//! | wrist_yaw | -1.75 .. 4.0 | rad |

use crate::core::status::Joint;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Closed position range of a joint
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct JointRange {
    pub min: f32,
    pub max: f32,
}

impl JointRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Limit `pos` to the range. Never panics; an inverted range yields `max`.
    #[inline]
    pub fn clamp(&self, pos: f32) -> f32 {
        pos.max(self.min).min(self.max)
    }

    fn validate(&self, joint: Joint) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::Config(format!(
                "simulation limit for {:?} must be finite",
                joint
            )));
        }
        if self.min > self.max {
            return Err(Error::Config(format!(
                "simulation limit for {:?}: min {} > max {}",
                joint, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Joint position limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JointLimitsConfig {
    #[serde(default = "default_head_pan_range")]
    pub head_pan: JointRange,
    #[serde(default = "default_head_tilt_range")]
    pub head_tilt: JointRange,
    #[serde(default = "default_lift_range")]
    pub lift: JointRange,
    #[serde(default = "default_arm_range")]
    pub arm: JointRange,
    #[serde(default = "default_wrist_pitch_range")]
    pub wrist_pitch: JointRange,
    #[serde(default = "default_wrist_roll_range")]
    pub wrist_roll: JointRange,
    #[serde(default = "default_wrist_yaw_range")]
    pub wrist_yaw: JointRange,
}

fn default_head_pan_range() -> JointRange {
    JointRange::new(-4.04, 1.73)
}
fn default_head_tilt_range() -> JointRange {
    JointRange::new(-1.53, 0.79)
}
fn default_lift_range() -> JointRange {
    JointRange::new(0.0, 1.1)
}
fn default_arm_range() -> JointRange {
    JointRange::new(0.0, 0.52)
}
fn default_wrist_pitch_range() -> JointRange {
    JointRange::new(-1.57, 0.56)
}
fn default_wrist_roll_range() -> JointRange {
    JointRange::new(-3.14, 3.14)
}
fn default_wrist_yaw_range() -> JointRange {
    JointRange::new(-1.75, 4.0)
}

impl JointLimitsConfig {
    pub fn range(&self, joint: Joint) -> JointRange {
        match joint {
            Joint::HeadPan => self.head_pan,
            Joint::HeadTilt => self.head_tilt,
            Joint::Lift => self.lift,
            Joint::Arm => self.arm,
            Joint::WristPitch => self.wrist_pitch,
            Joint::WristRoll => self.wrist_roll,
            Joint::WristYaw => self.wrist_yaw,
        }
    }
}

impl Default for JointLimitsConfig {
    fn default() -> Self {
        Self {
            head_pan: default_head_pan_range(),
            head_tilt: default_head_tilt_range(),
            lift: default_lift_range(),
            arm: default_arm_range(),
            wrist_pitch: default_wrist_pitch_range(),
            wrist_roll: default_wrist_roll_range(),
            wrist_yaw: default_wrist_yaw_range(),
        }
    }
}

/// Joint positions reached by the homing routine
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HomePoseConfig {
    #[serde(default)]
    pub head_pan: f32,
    #[serde(default)]
    pub head_tilt: f32,
    #[serde(default = "default_home_lift")]
    pub lift: f32,
    #[serde(default = "default_home_arm")]
    pub arm: f32,
    #[serde(default)]
    pub wrist_pitch: f32,
    #[serde(default)]
    pub wrist_roll: f32,
    #[serde(default)]
    pub wrist_yaw: f32,
}

fn default_home_lift() -> f32 {
    0.6
}
fn default_home_arm() -> f32 {
    0.1
}

impl HomePoseConfig {
    pub fn position(&self, joint: Joint) -> f32 {
        match joint {
            Joint::HeadPan => self.head_pan,
            Joint::HeadTilt => self.head_tilt,
            Joint::Lift => self.lift,
            Joint::Arm => self.arm,
            Joint::WristPitch => self.wrist_pitch,
            Joint::WristRoll => self.wrist_roll,
            Joint::WristYaw => self.wrist_yaw,
        }
    }
}

impl Default for HomePoseConfig {
    fn default() -> Self {
        Self {
            head_pan: 0.0,
            head_tilt: 0.0,
            lift: default_home_lift(),
            arm: default_home_arm(),
            wrist_pitch: 0.0,
            wrist_roll: 0.0,
            wrist_yaw: 0.0,
        }
    }
}

/// Base velocity limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BaseLimitsConfig {
    /// Maximum forward speed (m/s)
    #[serde(default = "default_max_linear_speed")]
    pub max_linear_speed: f32,

    /// Maximum yaw rate (rad/s)
    #[serde(default = "default_max_angular_speed")]
    pub max_angular_speed: f32,
}

fn default_max_linear_speed() -> f32 {
    0.3
}
fn default_max_angular_speed() -> f32 {
    1.0
}

impl Default for BaseLimitsConfig {
    fn default() -> Self {
        Self {
            max_linear_speed: default_max_linear_speed(),
            max_angular_speed: default_max_angular_speed(),
        }
    }
}

/// Root simulation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Random seed for reproducible noise (0 = random each run)
    #[serde(default)]
    pub random_seed: u64,

    /// Gaussian noise on reported joint positions and base velocities
    #[serde(default = "default_status_noise_stddev")]
    pub status_noise_stddev: f32,

    /// Robot reports homed from the start
    #[serde(default)]
    pub start_homed: bool,

    /// Blocking time of the homing routine (ms)
    #[serde(default = "default_homing_duration_ms")]
    pub homing_duration_ms: u64,

    /// Refuse `startup()` as if another process owns the robot
    #[serde(default)]
    pub claimed_by_other_process: bool,

    #[serde(default)]
    pub limits: JointLimitsConfig,

    #[serde(default)]
    pub home_pose: HomePoseConfig,

    #[serde(default)]
    pub base: BaseLimitsConfig,
}

fn default_status_noise_stddev() -> f32 {
    0.0005
}
fn default_homing_duration_ms() -> u64 {
    250
}

impl SimulationConfig {
    /// Reject limits and noise settings the simulated body cannot honor
    pub fn validate(&self) -> Result<()> {
        if !self.status_noise_stddev.is_finite() || self.status_noise_stddev < 0.0 {
            return Err(Error::Config(format!(
                "status_noise_stddev must be finite and >= 0, got {}",
                self.status_noise_stddev
            )));
        }
        for joint in Joint::ALL {
            self.limits.range(joint).validate(joint)?;
            if !self.home_pose.position(joint).is_finite() {
                return Err(Error::Config(format!(
                    "home pose for {:?} must be finite",
                    joint
                )));
            }
        }
        for (name, limit) in [
            ("max_linear_speed", self.base.max_linear_speed),
            ("max_angular_speed", self.base.max_angular_speed),
        ] {
            if !limit.is_finite() || limit < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be finite and >= 0, got {}",
                    name, limit
                )));
            }
        }
        Ok(())
    }

    /// Noise-free, instantly homing configuration for tests and demos
    pub fn deterministic() -> Self {
        Self {
            random_seed: 42,
            status_noise_stddev: 0.0,
            homing_duration_ms: 0,
            ..Default::default()
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            random_seed: 0,
            status_noise_stddev: default_status_noise_stddev(),
            start_homed: false,
            homing_duration_ms: default_homing_duration_ms(),
            claimed_by_other_process: false,
            limits: JointLimitsConfig::default(),
            home_pose: HomePoseConfig::default(),
            base: BaseLimitsConfig::default(),
        }
    }
}
