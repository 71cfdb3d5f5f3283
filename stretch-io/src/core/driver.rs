//! Trait definitions for the robot device contract and its collaborators

use crate::core::status::{GamepadState, MotionCommand, RobotStatus};
use crate::core::types::{Action, Feature, Observation, StepLogs, Tensor};
use crate::error::Result;
use image::RgbImage;
use std::collections::BTreeMap;

/// Vendor robot session
///
/// Narrow view of the vendor SDK: session lifecycle, homing, status and the
/// command queue. Joint servoing and safety interlocks live behind it.
pub trait StretchBody: Send {
    /// Start the session. Returns `false` when the robot cannot be claimed.
    fn startup(&mut self) -> Result<bool>;

    fn is_homed(&mut self) -> Result<bool>;

    /// Run the homing routine (blocking)
    fn home(&mut self) -> Result<()>;

    fn get_status(&mut self) -> Result<RobotStatus>;

    /// Queue a motion; nothing moves until `push_command`
    fn enqueue(&mut self, command: MotionCommand) -> Result<()>;

    /// Send queued motions to the hardware
    fn push_command(&mut self) -> Result<()>;

    /// Stop motion and end the session. Safe to call repeatedly.
    fn stop(&mut self) -> Result<()>;
}

/// Gamepad teleoperation session bound to a vendor body
pub trait GamepadTeleop: Send {
    fn startup(&mut self, body: &mut dyn StretchBody) -> Result<()>;

    /// Compute one motion update from gamepad input and queue it on the body
    fn do_motion(&mut self, body: &mut dyn StretchBody) -> Result<()>;

    /// Controller state used for the last motion update
    fn controller_state(&mut self) -> Result<GamepadState>;

    /// Stop the gamepad controller input thread
    fn stop_controller(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;
}

/// Builds the teleop session on first use
pub type TeleopFactory = Box<dyn FnMut() -> Result<Box<dyn GamepadTeleop>> + Send>;

/// Per-camera timing logs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraLogs {
    /// Seconds between the last two frames delivered
    pub delta_timestamp_s: f64,
    /// Seconds since connect for the last frame delivered
    pub timestamp_s: f64,
}

/// Camera driver
pub trait Camera: Send {
    fn connect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Capture a frame synchronously
    fn read(&mut self) -> Result<RgbImage>;

    /// Latest frame from the driver's capture loop
    fn async_read(&mut self) -> Result<RgbImage>;

    fn disconnect(&mut self) -> Result<()>;

    fn logs(&self) -> CameraLogs;

    /// Output frame size as (height, width)
    fn frame_shape(&self) -> (usize, usize);
}

/// Capability contract consumed by the recording pipeline
pub trait RobotDevice {
    fn robot_type(&self) -> &str;

    fn is_connected(&self) -> bool;

    /// Connect the robot and its cameras; returns connectedness
    fn connect(&mut self) -> Result<bool>;

    fn run_calibration(&mut self) -> Result<()>;

    /// One teleoperation step; returns recorded data when `record_data` is set
    fn teleop_step(&mut self, record_data: bool) -> Result<Option<(Observation, Action)>>;

    fn capture_observation(&mut self) -> Result<Observation>;

    fn send_action(&mut self, action: &Tensor) -> Result<Tensor>;

    fn print_logs(&self);

    fn disconnect(&mut self) -> Result<()>;

    /// Description of every key emitted by `teleop_step`
    fn features(&self) -> BTreeMap<String, Feature>;

    fn logs(&self) -> &StepLogs;
}

fn release_after_failed_connect<R: RobotDevice + ?Sized>(robot: &mut R) {
    if let Err(e) = robot.disconnect() {
        log::warn!("{}: disconnect after failed connect: {}", robot.robot_type(), e);
    }
}

/// Connect, run `f`, and always disconnect afterwards
///
/// `f` only runs when the robot and every camera connected. A failure in `f`
/// wins over a failure to disconnect.
pub fn with_session<R, T, F>(robot: &mut R, f: F) -> Result<T>
where
    R: RobotDevice + ?Sized,
    F: FnOnce(&mut R) -> Result<T>,
{
    let connected = match robot.connect() {
        Ok(connected) => connected,
        Err(e) => {
            release_after_failed_connect(robot);
            return Err(e);
        }
    };
    if !connected {
        log::error!(
            "{}: session or camera failed to connect, releasing devices",
            robot.robot_type()
        );
        release_after_failed_connect(robot);
        return Err(crate::Error::NotConnected);
    }

    let result = f(robot);
    let closed = robot.disconnect();
    let value = result?;
    closed?;
    Ok(value)
}
