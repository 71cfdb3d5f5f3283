//! Device implementations

pub mod mock;
pub mod stretch;

pub use stretch::{StretchRobot, TeleopSession};

use crate::config::{AppConfig, BodyConfig};
use crate::core::driver::{StretchBody, TeleopFactory};
use crate::error::{Error, Result};

/// Create the vendor body and its teleop factory based on configuration
pub fn create_body(config: &BodyConfig) -> Result<(Box<dyn StretchBody>, TeleopFactory)> {
    config.simulation.validate()?;
    match config.driver.as_str() {
        #[cfg(feature = "mock")]
        "mock" => Ok((
            Box::new(mock::MockStretchBody::new(config.simulation.clone())) as Box<dyn StretchBody>,
            mock::mock_teleop_factory(),
        )),
        other => Err(Error::UnknownDevice(format!("body driver '{}'", other))),
    }
}

/// Create a robot, its body and cameras from the application configuration
pub fn create_robot(config: &AppConfig) -> Result<StretchRobot> {
    let (body, teleop_factory) = create_body(&config.body)?;
    StretchRobot::from_config(config.robot.clone(), body, teleop_factory)
}
