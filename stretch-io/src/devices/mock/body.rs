//! Simulated vendor session

use super::config::{JointRange, SimulationConfig};
use super::noise::NoiseGenerator;
use crate::core::driver::StretchBody;
use crate::core::status::{Joint, MotionCommand, RobotStatus};
use crate::error::{Error, Result};
use std::thread;
use std::time::Duration;

/// Simulated Stretch body
///
/// Joint moves are queued by `enqueue` and applied on `push_command`,
/// clamped to the configured limits.
pub struct MockStretchBody {
    config: SimulationConfig,
    noise: NoiseGenerator,
    started: bool,
    homed: bool,
    /// Noise-free pose and base velocity
    truth: RobotStatus,
    pending: Vec<MotionCommand>,
    pushes: u64,
}

impl MockStretchBody {
    pub fn new(config: SimulationConfig) -> Self {
        let noise = NoiseGenerator::new(config.random_seed);
        let homed = config.start_homed;
        let mut body = Self {
            config,
            noise,
            started: false,
            homed,
            truth: RobotStatus::default(),
            pending: Vec::new(),
            pushes: 0,
        };
        if homed {
            body.move_to_home_pose();
        }
        body
    }

    /// Number of `push_command` calls that reached the simulated hardware
    pub fn push_count(&self) -> u64 {
        self.pushes
    }

    /// Noise-free simulated state
    pub fn truth(&self) -> &RobotStatus {
        &self.truth
    }

    fn ensure_started(&self) -> Result<()> {
        if self.started {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn move_to_home_pose(&mut self) {
        for joint in Joint::ALL {
            let target = self.config.home_pose.position(joint);
            self.truth.joint_mut(joint).pos = self.config.limits.range(joint).clamp(target);
        }
    }

    fn apply(&mut self, command: MotionCommand) {
        match command {
            MotionCommand::MoveBy { joint, delta } => {
                let range = self.config.limits.range(joint);
                let state = self.truth.joint_mut(joint);
                state.pos = range.clamp(state.pos + delta);
            }
            MotionCommand::BaseVelocity { x, theta } => {
                let limits = &self.config.base;
                let linear = JointRange::new(-limits.max_linear_speed, limits.max_linear_speed);
                let angular = JointRange::new(-limits.max_angular_speed, limits.max_angular_speed);
                self.truth.base.x_vel = linear.clamp(x);
                self.truth.base.theta_vel = angular.clamp(theta);
            }
        }
    }
}

impl StretchBody for MockStretchBody {
    fn startup(&mut self) -> Result<bool> {
        if self.config.claimed_by_other_process {
            log::warn!("Mock body: robot claimed by another process");
            return Ok(false);
        }
        self.started = true;
        log::info!("Mock body: session started (homed: {})", self.homed);
        Ok(true)
    }

    fn is_homed(&mut self) -> Result<bool> {
        self.ensure_started()?;
        Ok(self.homed)
    }

    fn home(&mut self) -> Result<()> {
        self.ensure_started()?;
        log::info!("Mock body: homing");
        if self.config.homing_duration_ms > 0 {
            thread::sleep(Duration::from_millis(self.config.homing_duration_ms));
        }
        self.pending.clear();
        self.truth.base.x_vel = 0.0;
        self.truth.base.theta_vel = 0.0;
        self.move_to_home_pose();
        self.homed = true;
        Ok(())
    }

    fn get_status(&mut self) -> Result<RobotStatus> {
        self.ensure_started()?;
        Ok(self
            .noise
            .perturb(&self.truth, self.config.status_noise_stddev))
    }

    fn enqueue(&mut self, command: MotionCommand) -> Result<()> {
        self.ensure_started()?;
        self.pending.push(command);
        Ok(())
    }

    fn push_command(&mut self) -> Result<()> {
        self.ensure_started()?;
        let pending = std::mem::take(&mut self.pending);
        for command in pending {
            self.apply(command);
        }
        self.pushes += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.started {
            log::info!("Mock body: session stopped");
        }
        self.pending.clear();
        self.truth.base.x_vel = 0.0;
        self.truth.base.y_vel = 0.0;
        self.truth.base.theta_vel = 0.0;
        self.started = false;
        Ok(())
    }
}
