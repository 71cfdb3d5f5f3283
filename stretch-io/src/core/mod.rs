//! Core abstractions for the robot device contract.
//!
//! - [`driver`]: `RobotDevice` contract and collaborator traits (`StretchBody`, `GamepadTeleop`, `Camera`)
//! - [`status`]: vendor-native status, gamepad state and motion commands
//! - [`schema`]: fixed state/action channel order
//! - [`types`]: tensors and observation/action maps

pub mod driver;
pub mod schema;
pub mod status;
pub mod types;
