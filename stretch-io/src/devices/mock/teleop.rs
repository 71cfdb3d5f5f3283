//! Simulated gamepad teleop session
//!
//! Stands in for the vendor's gamepad teleop. Input comes from a
//! deterministic sweep or a script of controller states; the stick/pad to
//! joint mapping below is a simple stand-in, not the vendor's.
//!
//! | Input | Motion |
//! |-------|--------|
//! | left stick y / x | base forward / yaw velocity |
//! | right stick y | lift |
//! | right stick x | arm extension |
//! | top / bottom pad | wrist pitch |
//! | left / right pad | wrist yaw |
//! | shoulder buttons | wrist roll |

use crate::core::driver::{GamepadTeleop, StretchBody};
use crate::core::status::{GamepadState, Joint, MotionCommand};
use crate::error::{Error, Result};

/// Base forward speed at full stick (m/s)
const BASE_SPEED: f32 = 0.1;
/// Base yaw rate at full stick (rad/s)
const BASE_YAW_RATE: f32 = 0.5;
/// Lift/arm travel per motion update at full stick (m)
const LINEAR_STEP: f32 = 0.01;
/// Wrist travel per motion update while a pad is held (rad)
const WRIST_STEP: f32 = 0.02;

enum InputSource {
    Sweep,
    Script(Vec<GamepadState>),
}

pub struct MockTeleop {
    input: InputSource,
    active: bool,
    controller_running: bool,
    tick: u64,
    state: GamepadState,
}

impl MockTeleop {
    /// Teleop driven by a slow deterministic stick sweep
    pub fn new() -> Self {
        Self::with_input(InputSource::Sweep)
    }

    /// Teleop replaying `states` in a loop
    pub fn scripted(states: Vec<GamepadState>) -> Self {
        if states.is_empty() {
            return Self::new();
        }
        Self::with_input(InputSource::Script(states))
    }

    fn with_input(input: InputSource) -> Self {
        Self {
            input,
            active: false,
            controller_running: false,
            tick: 0,
            state: GamepadState::default(),
        }
    }

    fn next_state(&self) -> GamepadState {
        match &self.input {
            InputSource::Script(states) => states[(self.tick as usize) % states.len()],
            InputSource::Sweep => {
                let phase = self.tick as f32 * 0.05;
                // Pads alternate every 40 updates
                let pad_cycle = (self.tick / 40) % 4;
                GamepadState {
                    left_stick_y: 0.5 * phase.sin(),
                    left_stick_x: 0.25 * (0.5 * phase).sin(),
                    right_stick_y: 0.8 * (0.7 * phase).sin(),
                    right_stick_x: 0.8 * (0.3 * phase).cos(),
                    top_pad_pressed: pad_cycle == 0,
                    bottom_pad_pressed: pad_cycle == 2,
                    left_pad_pressed: pad_cycle == 1,
                    right_pad_pressed: pad_cycle == 3,
                    ..Default::default()
                }
            }
        }
    }

    fn commands(state: &GamepadState) -> Vec<MotionCommand> {
        let mut commands = vec![MotionCommand::BaseVelocity {
            x: BASE_SPEED * state.left_stick_y,
            theta: -BASE_YAW_RATE * state.left_stick_x,
        }];
        let mut move_by = |joint, delta: f32| {
            if delta != 0.0 {
                commands.push(MotionCommand::MoveBy { joint, delta });
            }
        };
        move_by(Joint::Lift, LINEAR_STEP * state.right_stick_y);
        move_by(Joint::Arm, LINEAR_STEP * state.right_stick_x);
        move_by(Joint::WristPitch, pad(state.top_pad_pressed, state.bottom_pad_pressed));
        move_by(Joint::WristYaw, pad(state.left_pad_pressed, state.right_pad_pressed));
        move_by(
            Joint::WristRoll,
            pad(
                state.right_shoulder_button_pressed,
                state.left_shoulder_button_pressed,
            ),
        );
        commands
    }
}

fn pad(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => WRIST_STEP,
        (false, true) => -WRIST_STEP,
        _ => 0.0,
    }
}

impl Default for MockTeleop {
    fn default() -> Self {
        Self::new()
    }
}

impl GamepadTeleop for MockTeleop {
    fn startup(&mut self, _body: &mut dyn StretchBody) -> Result<()> {
        self.active = true;
        self.controller_running = true;
        log::info!("Mock teleop: gamepad session started");
        Ok(())
    }

    fn do_motion(&mut self, body: &mut dyn StretchBody) -> Result<()> {
        if !self.active {
            return Err(Error::NotInitialized);
        }
        self.state = self.next_state();
        self.tick += 1;
        for command in Self::commands(&self.state) {
            body.enqueue(command)?;
        }
        Ok(())
    }

    fn controller_state(&mut self) -> Result<GamepadState> {
        if !self.controller_running {
            return Err(Error::NotInitialized);
        }
        Ok(self.state)
    }

    fn stop_controller(&mut self) -> Result<()> {
        self.controller_running = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.active {
            log::info!("Mock teleop: gamepad session stopped after {} updates", self.tick);
        }
        self.active = false;
        Ok(())
    }
}
