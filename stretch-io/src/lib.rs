//! stretch-io - Stretch mobile manipulator adapter for robot-learning data collection
//!
//! Wraps a vendor robot session, a gamepad teleop session and a set of
//! cameras behind the [`RobotDevice`] contract, and converts vendor state
//! and gamepad actions into fixed-order tensors for a recording pipeline.
//!
//! ## Features
//!
//! - `mock`: simulated vendor body and gamepad teleop for hardware-free runs

pub mod cameras;
pub mod config;
pub mod core;
pub mod devices;
pub mod error;

// Re-export commonly used types
pub use config::{AppConfig, StretchConfig};
pub use crate::core::driver::{with_session, Camera, GamepadTeleop, RobotDevice, StretchBody};
pub use crate::core::types::{Action, Observation, Tensor};
pub use devices::{create_robot, StretchRobot};
pub use error::{Error, Result};
