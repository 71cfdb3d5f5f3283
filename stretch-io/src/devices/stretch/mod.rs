//! Stretch lifecycle shim
//!
//! [`StretchRobot`] implements the [`RobotDevice`] contract on top of a
//! vendor session ([`StretchBody`]), a lazily created gamepad teleop session
//! and a set of cameras.
//!
//! # Lifecycle
//!
//! ```text
//! Disconnected ──connect──▶ Connected ──run_calibration──▶ Homed
//!       ▲                       │                            │
//!       │                       └──────first teleop_step─────┤
//!       │                                                    ▼
//!       └──────────────────disconnect──────────────── TeleopActive
//! ```
//!
//! The teleop session is one-way: once stopped by `disconnect` it is never
//! restarted on the same robot.
//!
//! # Recorded keys
//!
//! | Key | Tensor |
//! |-----|--------|
//! | `observation.state` | `f32[10]`, order of [`StateChannel::ALL`] |
//! | `observation.images.<camera>` | `u8[height, width, 3]` |
//! | `action` | `f32[21]`, order of [`ACTION_CHANNELS`] |
//!
//! # Timing logs
//!
//! `read_pos_dt_s`, `write_pos_dt_s` on every step; `read_camera_<name>_dt_s`
//! and `async_read_camera_<name>_dt_s` on recorded steps.

use crate::cameras::create_cameras;
use crate::config::StretchConfig;
use crate::core::driver::{Camera, GamepadTeleop, RobotDevice, StretchBody, TeleopFactory};
use crate::core::schema::{action_vector, state_names, state_vector, StateChannel, ACTION_CHANNELS};
use crate::core::status::RobotStatus;
use crate::core::types::{
    image_key, Action, DType, Feature, Observation, StepLogs, Tensor, ACTION, OBS_STATE,
};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::time::Instant;

/// Teleop session state
pub enum TeleopSession {
    /// Not created yet
    Idle,
    /// Started on first teleop step
    Active(Box<dyn GamepadTeleop>),
    /// Stopped by `disconnect`; never restarted
    Stopped,
}

impl TeleopSession {
    pub fn is_active(&self) -> bool {
        matches!(self, TeleopSession::Active(_))
    }
}

/// Stretch robot exposed as a [`RobotDevice`]
pub struct StretchRobot {
    config: StretchConfig,
    body: Box<dyn StretchBody>,
    cameras: BTreeMap<String, Box<dyn Camera>>,
    teleop_factory: TeleopFactory,
    teleop: TeleopSession,
    connected: bool,
    /// Vendor session started and not yet stopped
    session_started: bool,
    logs: StepLogs,
}

fn keep_first(slot: &mut Option<Error>, result: Result<()>) {
    if let Err(e) = result {
        match slot {
            None => *slot = Some(e),
            Some(_) => log::warn!("Additional disconnect error: {}", e),
        }
    }
}

impl StretchRobot {
    /// Build a robot from already-constructed collaborators
    pub fn new(
        config: StretchConfig,
        body: Box<dyn StretchBody>,
        cameras: BTreeMap<String, Box<dyn Camera>>,
        teleop_factory: TeleopFactory,
    ) -> Self {
        Self {
            config,
            body,
            cameras,
            teleop_factory,
            teleop: TeleopSession::Idle,
            connected: false,
            session_started: false,
            logs: StepLogs::default(),
        }
    }

    /// Validate `config` and create its cameras
    pub fn from_config(
        config: StretchConfig,
        body: Box<dyn StretchBody>,
        teleop_factory: TeleopFactory,
    ) -> Result<Self> {
        config.validate()?;
        let cameras = create_cameras(&config.cameras)?;
        Ok(Self::new(config, body, cameras, teleop_factory))
    }

    pub fn config(&self) -> &StretchConfig {
        &self.config
    }

    pub fn camera_names(&self) -> impl Iterator<Item = &str> {
        self.cameras.keys().map(String::as_str)
    }

    /// State channel names in recording order
    pub fn state_names(&self) -> Vec<&'static str> {
        state_names()
    }

    /// Action channel names in recording order
    pub fn action_names(&self) -> &'static [&'static str] {
        &ACTION_CHANNELS
    }

    pub fn teleop_session(&self) -> &TeleopSession {
        &self.teleop
    }

    /// Raw vendor status
    pub fn read_status(&mut self) -> Result<RobotStatus> {
        self.body.get_status()
    }

    fn start_teleop_if_idle(&mut self) -> Result<()> {
        match self.teleop {
            TeleopSession::Active(_) => Ok(()),
            TeleopSession::Stopped => Err(Error::TeleopStopped),
            TeleopSession::Idle => {
                let mut teleop = (self.teleop_factory)()?;
                teleop.startup(self.body.as_mut())?;
                log::info!("{}: gamepad teleop started", self.config.robot_type);
                self.teleop = TeleopSession::Active(teleop);
                Ok(())
            }
        }
    }

    /// One frame per camera, read sequentially
    fn capture_images(&mut self, observation: &mut Observation) -> Result<()> {
        for (name, camera) in self.cameras.iter_mut() {
            let start = Instant::now();
            let frame = camera.async_read()?;
            self.logs.set(
                &format!("read_camera_{}_dt_s", name),
                camera.logs().delta_timestamp_s,
            );
            self.logs.set(
                &format!("async_read_camera_{}_dt_s", name),
                start.elapsed().as_secs_f64(),
            );
            observation.insert(image_key(name), Tensor::from_image(frame));
        }
        Ok(())
    }
}

impl RobotDevice for StretchRobot {
    fn robot_type(&self) -> &str {
        &self.config.robot_type
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<bool> {
        if self.connected {
            return Err(Error::AlreadyConnected);
        }

        let session = self.body.startup()?;
        self.session_started = session;
        if !session {
            log::error!(
                "{}: vendor session refused startup, another process may be using the robot",
                self.config.robot_type
            );
        }

        let mut cameras_ok = true;
        for (name, camera) in self.cameras.iter_mut() {
            if !camera.is_connected() {
                if let Err(e) = camera.connect() {
                    log::warn!("Camera {} failed to connect: {}", name, e);
                }
            }
            cameras_ok &= camera.is_connected();
        }

        self.connected = session && cameras_ok;
        if self.connected {
            log::info!(
                "{}: connected ({} cameras)",
                self.config.robot_type,
                self.cameras.len()
            );
        } else if session {
            log::error!(
                "{}: not all cameras connected, check that every camera is plugged in",
                self.config.robot_type
            );
        }
        Ok(self.connected)
    }

    fn run_calibration(&mut self) -> Result<()> {
        if self.body.is_homed()? {
            log::debug!("{}: already homed", self.config.robot_type);
            return Ok(());
        }
        log::info!("{}: homing", self.config.robot_type);
        self.body.home()
    }

    fn teleop_step(&mut self, record_data: bool) -> Result<Option<(Observation, Action)>> {
        if !self.connected {
            return Err(Error::NotConnected);
        }
        self.start_teleop_if_idle()?;
        let TeleopSession::Active(teleop) = &mut self.teleop else {
            return Err(Error::TeleopStopped);
        };
        let body = self.body.as_mut();

        let motion_start = Instant::now();
        teleop.do_motion(body)?;
        let motion_dt = motion_start.elapsed();

        let read_start = Instant::now();
        let status = body.get_status()?;
        let gamepad = teleop.controller_state()?;
        let read_dt = read_start.elapsed();

        let push_start = Instant::now();
        body.push_command()?;
        let write_dt = motion_dt + push_start.elapsed();

        self.logs.set("read_pos_dt_s", read_dt.as_secs_f64());
        self.logs.set("write_pos_dt_s", write_dt.as_secs_f64());

        if !record_data {
            return Ok(None);
        }

        let mut observation = Observation::new();
        observation.insert(OBS_STATE, Tensor::from_f32(state_vector(&status)));
        let action = Action::from_tensor(Tensor::from_f32(action_vector(&gamepad)));
        self.capture_images(&mut observation)?;

        Ok(Some((observation, action)))
    }

    fn capture_observation(&mut self) -> Result<Observation> {
        Err(Error::NotSupported(
            "capture_observation is not available on Stretch".to_string(),
        ))
    }

    fn send_action(&mut self, _action: &Tensor) -> Result<Tensor> {
        Err(Error::NotSupported(
            "send_action is not available on Stretch".to_string(),
        ))
    }

    fn print_logs(&self) {
        if self.logs.is_empty() {
            log::info!("{}: no timing samples yet", self.config.robot_type);
            return;
        }
        for (key, seconds) in self.logs.iter() {
            log::info!("{}: {} = {:.3} ms", self.config.robot_type, key, seconds * 1e3);
        }
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut first_error = None;

        keep_first(&mut first_error, self.body.stop());
        self.session_started = false;

        match std::mem::replace(&mut self.teleop, TeleopSession::Stopped) {
            TeleopSession::Active(mut teleop) => {
                keep_first(&mut first_error, teleop.stop_controller());
                keep_first(&mut first_error, teleop.stop());
                log::info!("{}: gamepad teleop stopped", self.config.robot_type);
            }
            previous => self.teleop = previous,
        }

        for camera in self.cameras.values_mut() {
            if camera.is_connected() {
                keep_first(&mut first_error, camera.disconnect());
            }
        }

        if self.connected {
            log::info!("{}: disconnected", self.config.robot_type);
        }
        self.connected = false;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn features(&self) -> BTreeMap<String, Feature> {
        let mut features = BTreeMap::new();
        features.insert(
            OBS_STATE.to_string(),
            Feature {
                dtype: DType::F32,
                shape: vec![StateChannel::ALL.len()],
                names: state_names().into_iter().map(String::from).collect(),
            },
        );
        features.insert(
            ACTION.to_string(),
            Feature {
                dtype: DType::F32,
                shape: vec![ACTION_CHANNELS.len()],
                names: ACTION_CHANNELS.iter().map(|s| s.to_string()).collect(),
            },
        );
        for (name, camera) in &self.cameras {
            let (height, width) = camera.frame_shape();
            features.insert(
                image_key(name),
                Feature {
                    dtype: DType::U8,
                    shape: vec![height, width, 3],
                    names: vec!["height".into(), "width".into(), "channel".into()],
                },
            );
        }
        features
    }

    fn logs(&self) -> &StepLogs {
        &self.logs
    }
}

impl Drop for StretchRobot {
    fn drop(&mut self) {
        let cameras_live = self.cameras.values().any(|c| c.is_connected());
        if self.connected || self.session_started || cameras_live || self.teleop.is_active() {
            log::warn!(
                "{}: dropped with live devices, disconnecting",
                self.config.robot_type
            );
            if let Err(e) = self.disconnect() {
                log::error!("{}: disconnect on drop failed: {}", self.config.robot_type, e);
            }
        }
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::devices::mock::{mock_teleop_factory, MockStretchBody, SimulationConfig};

    fn robot_with(sim: SimulationConfig, cameras: &[(&str, CameraConfig)]) -> StretchRobot {
        let mut config = StretchConfig::stretch_defaults();
        config.cameras = cameras
            .iter()
            .map(|(name, cam)| (name.to_string(), cam.clone()))
            .collect();
        StretchRobot::from_config(
            config,
            Box::new(MockStretchBody::new(sim)),
            mock_teleop_factory(),
        )
        .unwrap()
    }

    #[test]
    fn test_step_requires_connection() {
        let mut robot = robot_with(SimulationConfig::deterministic(), &[]);
        assert!(matches!(robot.teleop_step(false), Err(Error::NotConnected)));
        assert!(!robot.teleop_session().is_active());
    }

    #[test]
    fn test_calibration_homes_mock_body() {
        let mut robot = robot_with(SimulationConfig::deterministic(), &[]);
        assert!(robot.connect().unwrap());
        robot.run_calibration().unwrap();
        let status = robot.read_status().unwrap();
        assert!((status.lift.pos - 0.6).abs() < 1e-6);
        robot.disconnect().unwrap();
    }

    #[test]
    fn test_recorded_step_with_rotated_camera() {
        let mut robot = robot_with(
            SimulationConfig::deterministic(),
            &[("nav", CameraConfig::synthetic(30, 16, 8).rotated(-90))],
        );
        assert!(robot.connect().unwrap());
        let (obs, action) = robot.teleop_step(true).unwrap().unwrap();

        assert_eq!(obs.image("nav").unwrap().shape(), &[16, 8, 3]);
        assert_eq!(
            robot.features()["observation.images.nav"].shape,
            vec![16, 8, 3]
        );
        assert_eq!(action.action().unwrap().shape(), &[21]);
        assert!(robot.logs().get("async_read_camera_nav_dt_s").is_some());
        robot.disconnect().unwrap();
    }

    #[test]
    fn test_unplugged_camera_degrades_connectedness() {
        let mut unplugged = CameraConfig::synthetic(30, 8, 8);
        unplugged.fail_connect = true;
        let mut robot = robot_with(
            SimulationConfig::deterministic(),
            &[("ok", CameraConfig::synthetic(30, 8, 8)), ("bad", unplugged)],
        );
        assert!(!robot.connect().unwrap());
        assert!(!robot.is_connected());
        robot.disconnect().unwrap();
    }

    #[test]
    fn test_teleop_not_restarted_after_disconnect() {
        let mut robot = robot_with(SimulationConfig::deterministic(), &[]);
        robot.connect().unwrap();
        robot.teleop_step(false).unwrap();
        robot.disconnect().unwrap();

        assert!(robot.connect().unwrap());
        assert!(matches!(robot.teleop_step(false), Err(Error::TeleopStopped)));
        robot.disconnect().unwrap();
    }

    #[test]
    fn test_print_logs_with_and_without_samples() {
        let mut robot = robot_with(
            SimulationConfig::deterministic(),
            &[("wrist", CameraConfig::synthetic(30, 8, 8))],
        );
        robot.print_logs();

        assert!(robot.connect().unwrap());
        robot.teleop_step(true).unwrap();
        assert!(!robot.logs().is_empty());
        robot.print_logs();
        robot.disconnect().unwrap();
    }

    #[test]
    fn test_placeholders_are_not_supported() {
        let mut robot = robot_with(SimulationConfig::deterministic(), &[]);
        assert!(matches!(
            robot.capture_observation(),
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(
            robot.send_action(&Tensor::from_f32(vec![0.0; 21])),
            Err(Error::NotSupported(_))
        ));
    }
}
