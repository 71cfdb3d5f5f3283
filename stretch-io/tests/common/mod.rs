//! Recording fakes for lifecycle tests
//!
//! Every collaborator appends to one shared call log so tests can assert
//! on the exact order of vendor, teleop and camera calls.

#![allow(dead_code)]

use image::RgbImage;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use stretch_io::config::CameraConfig;
use stretch_io::core::driver::{CameraLogs, TeleopFactory};
use stretch_io::core::status::{GamepadState, JointStatus, MotionCommand, RobotStatus};
use stretch_io::{Camera, Error, GamepadTeleop, Result, StretchBody, StretchConfig, StretchRobot};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Startup,
    IsHomed,
    Home,
    GetStatus,
    Enqueue,
    PushCommand,
    Stop,
    TeleopCreate,
    TeleopStartup,
    DoMotion,
    ControllerState,
    StopController,
    TeleopStop,
    CameraConnect(String),
    CameraRead(String),
    CameraDisconnect(String),
}

impl Call {
    pub fn is_teleop(&self) -> bool {
        matches!(
            self,
            Call::TeleopCreate
                | Call::TeleopStartup
                | Call::DoMotion
                | Call::ControllerState
                | Call::StopController
                | Call::TeleopStop
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.lock().iter().filter(|c| *c == call).count()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// Vendor status with distinct values on every state channel
pub fn sample_status() -> RobotStatus {
    let mut status = RobotStatus::default();
    status.head.head_pan = JointStatus::at(0.1);
    status.head.head_tilt = JointStatus::at(0.2);
    status.lift = JointStatus::at(0.3);
    status.arm = JointStatus::at(0.4);
    status.end_of_arm.wrist_pitch = JointStatus::at(0.5);
    status.end_of_arm.wrist_roll = JointStatus::at(0.6);
    status.end_of_arm.wrist_yaw = JointStatus::at(0.7);
    status.base.x_vel = 0.8;
    status.base.y_vel = 0.9;
    status.base.theta_vel = 1.0;
    status
}

pub struct RecordingBody {
    log: CallLog,
    homed: bool,
    startup_result: bool,
    fail_stop: bool,
    status: RobotStatus,
}

impl StretchBody for RecordingBody {
    fn startup(&mut self) -> Result<bool> {
        self.log.push(Call::Startup);
        Ok(self.startup_result)
    }

    fn is_homed(&mut self) -> Result<bool> {
        self.log.push(Call::IsHomed);
        Ok(self.homed)
    }

    fn home(&mut self) -> Result<()> {
        self.log.push(Call::Home);
        self.homed = true;
        Ok(())
    }

    fn get_status(&mut self) -> Result<RobotStatus> {
        self.log.push(Call::GetStatus);
        Ok(self.status)
    }

    fn enqueue(&mut self, _command: MotionCommand) -> Result<()> {
        self.log.push(Call::Enqueue);
        Ok(())
    }

    fn push_command(&mut self) -> Result<()> {
        self.log.push(Call::PushCommand);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.log.push(Call::Stop);
        if self.fail_stop {
            return Err(Error::Other("vendor stop failed".to_string()));
        }
        Ok(())
    }
}

pub struct RecordingTeleop {
    log: CallLog,
    gamepad: GamepadState,
}

impl GamepadTeleop for RecordingTeleop {
    fn startup(&mut self, _body: &mut dyn StretchBody) -> Result<()> {
        self.log.push(Call::TeleopStartup);
        Ok(())
    }

    fn do_motion(&mut self, body: &mut dyn StretchBody) -> Result<()> {
        self.log.push(Call::DoMotion);
        body.enqueue(MotionCommand::BaseVelocity {
            x: 0.0,
            theta: 0.0,
        })
    }

    fn controller_state(&mut self) -> Result<GamepadState> {
        self.log.push(Call::ControllerState);
        Ok(self.gamepad)
    }

    fn stop_controller(&mut self) -> Result<()> {
        self.log.push(Call::StopController);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.log.push(Call::TeleopStop);
        Ok(())
    }
}

pub struct RecordingCamera {
    name: String,
    log: CallLog,
    width: u32,
    height: u32,
    fail_connect: bool,
    connected: bool,
}

impl Camera for RecordingCamera {
    fn connect(&mut self) -> Result<()> {
        self.log.push(Call::CameraConnect(self.name.clone()));
        if self.fail_connect {
            return Err(Error::Camera {
                name: self.name.clone(),
                message: "device not found".to_string(),
            });
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn read(&mut self) -> Result<RgbImage> {
        self.async_read()
    }

    fn async_read(&mut self) -> Result<RgbImage> {
        self.log.push(Call::CameraRead(self.name.clone()));
        if !self.connected {
            return Err(Error::NotConnected);
        }
        Ok(RgbImage::new(self.width, self.height))
    }

    fn disconnect(&mut self) -> Result<()> {
        self.log.push(Call::CameraDisconnect(self.name.clone()));
        if !self.connected {
            return Err(Error::NotConnected);
        }
        self.connected = false;
        Ok(())
    }

    fn logs(&self) -> CameraLogs {
        CameraLogs {
            delta_timestamp_s: 0.033,
            timestamp_s: 1.0,
        }
    }

    fn frame_shape(&self) -> (usize, usize) {
        (self.height as usize, self.width as usize)
    }
}

/// Builder for a [`StretchRobot`] wired to recording fakes
pub struct RobotBuilder {
    log: CallLog,
    homed: bool,
    startup_result: bool,
    fail_stop: bool,
    status: RobotStatus,
    gamepad: GamepadState,
    cameras: Vec<(String, u32, u32, bool)>,
}

impl Default for RobotBuilder {
    fn default() -> Self {
        Self {
            log: CallLog::default(),
            homed: true,
            startup_result: true,
            fail_stop: false,
            status: sample_status(),
            gamepad: GamepadState::default(),
            cameras: Vec::new(),
        }
    }
}

impl RobotBuilder {
    pub fn homed(mut self, homed: bool) -> Self {
        self.homed = homed;
        self
    }

    pub fn startup_result(mut self, ok: bool) -> Self {
        self.startup_result = ok;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn gamepad(mut self, gamepad: GamepadState) -> Self {
        self.gamepad = gamepad;
        self
    }

    pub fn camera(mut self, name: &str, width: u32, height: u32) -> Self {
        self.cameras.push((name.to_string(), width, height, false));
        self
    }

    pub fn unplugged_camera(mut self, name: &str) -> Self {
        self.cameras.push((name.to_string(), 4, 4, true));
        self
    }

    pub fn build(self) -> (StretchRobot, CallLog) {
        let log = self.log;

        let body = RecordingBody {
            log: log.clone(),
            homed: self.homed,
            startup_result: self.startup_result,
            fail_stop: self.fail_stop,
            status: self.status,
        };

        let mut config = StretchConfig::default();
        config.cameras.clear();
        let mut cameras: BTreeMap<String, Box<dyn Camera>> = BTreeMap::new();
        for (name, width, height, fail_connect) in self.cameras {
            config
                .cameras
                .insert(name.clone(), CameraConfig::synthetic(30, width, height));
            cameras.insert(
                name.clone(),
                Box::new(RecordingCamera {
                    name,
                    log: log.clone(),
                    width,
                    height,
                    fail_connect,
                    connected: false,
                }),
            );
        }

        let factory_log = log.clone();
        let gamepad = self.gamepad;
        let factory: TeleopFactory = Box::new(move || -> Result<Box<dyn GamepadTeleop>> {
            factory_log.push(Call::TeleopCreate);
            Ok(Box::new(RecordingTeleop {
                log: factory_log.clone(),
                gamepad,
            }))
        });

        (
            StretchRobot::new(config, Box::new(body), cameras, factory),
            log,
        )
    }
}
