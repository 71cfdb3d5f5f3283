//! Simulated vendor collaborators for hardware-free runs
//!
//! Stands in for the vendor SDK so the lifecycle shim, the CLI and the
//! recording pipeline can run without a robot.
//!
//! | Component | Simulation |
//! |-----------|------------|
//! | Vendor session | Joint state with limits, homing, queued commands |
//! | Status | Noise-free truth plus seeded Gaussian noise |
//! | Gamepad teleop | Deterministic stick sweep or scripted states |
//!
//! # Configuration
//!
//! ```toml
//! [body]
//! driver = "mock"
//!
//! [body.simulation]
//! random_seed = 42          # 0 = random each run
//! status_noise_stddev = 0.0005
//! start_homed = false
//! homing_duration_ms = 250
//!
//! [body.simulation.limits.lift]
//! min = 0.0
//! max = 1.1
//! ```
//!
//! # Module Structure
//!
//! - [`config`]: simulation parameters
//! - `body`: simulated vendor session ([`MockStretchBody`])
//! - `teleop`: simulated gamepad teleop ([`MockTeleop`])
//! - `noise`: seeded Gaussian noise

pub mod config;

#[cfg(feature = "mock")]
mod body;
#[cfg(feature = "mock")]
mod noise;
#[cfg(feature = "mock")]
mod teleop;

#[cfg(feature = "mock")]
pub use body::MockStretchBody;
pub use config::SimulationConfig;
#[cfg(feature = "mock")]
pub use teleop::MockTeleop;

#[cfg(feature = "mock")]
use crate::core::driver::{GamepadTeleop, TeleopFactory};

/// Factory creating a sweep-driven [`MockTeleop`] on first teleop step
#[cfg(feature = "mock")]
pub fn mock_teleop_factory() -> TeleopFactory {
    Box::new(|| -> crate::Result<Box<dyn GamepadTeleop>> { Ok(Box::new(MockTeleop::new())) })
}
