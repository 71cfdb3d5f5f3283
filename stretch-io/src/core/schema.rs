//! Fixed channel schemas for recorded state and action vectors.
//!
//! The order of [`StateChannel::ALL`] and [`ACTION_CHANNELS`] defines the
//! meaning of every recorded `observation.state` and `action` tensor. It is
//! declared here once and never inferred from vendor record iteration order.

use crate::core::status::{GamepadState, RobotStatus};

/// Scalar state channel read from the vendor status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChannel {
    HeadPanPos,
    HeadTiltPos,
    LiftPos,
    ArmPos,
    WristPitchPos,
    WristRollPos,
    WristYawPos,
    BaseXVel,
    BaseYVel,
    BaseThetaVel,
}

impl StateChannel {
    /// Recording order
    pub const ALL: [StateChannel; 10] = [
        StateChannel::HeadPanPos,
        StateChannel::HeadTiltPos,
        StateChannel::LiftPos,
        StateChannel::ArmPos,
        StateChannel::WristPitchPos,
        StateChannel::WristRollPos,
        StateChannel::WristYawPos,
        StateChannel::BaseXVel,
        StateChannel::BaseYVel,
        StateChannel::BaseThetaVel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StateChannel::HeadPanPos => "head_pan.pos",
            StateChannel::HeadTiltPos => "head_tilt.pos",
            StateChannel::LiftPos => "lift.pos",
            StateChannel::ArmPos => "arm.pos",
            StateChannel::WristPitchPos => "wrist_pitch.pos",
            StateChannel::WristRollPos => "wrist_roll.pos",
            StateChannel::WristYawPos => "wrist_yaw.pos",
            StateChannel::BaseXVel => "base_x.vel",
            StateChannel::BaseYVel => "base_y.vel",
            StateChannel::BaseThetaVel => "base_theta.vel",
        }
    }

    /// Extract this channel from a vendor status snapshot
    pub fn read(self, status: &RobotStatus) -> f32 {
        match self {
            StateChannel::HeadPanPos => status.head.head_pan.pos,
            StateChannel::HeadTiltPos => status.head.head_tilt.pos,
            StateChannel::LiftPos => status.lift.pos,
            StateChannel::ArmPos => status.arm.pos,
            StateChannel::WristPitchPos => status.end_of_arm.wrist_pitch.pos,
            StateChannel::WristRollPos => status.end_of_arm.wrist_roll.pos,
            StateChannel::WristYawPos => status.end_of_arm.wrist_yaw.pos,
            StateChannel::BaseXVel => status.base.x_vel,
            StateChannel::BaseYVel => status.base.y_vel,
            StateChannel::BaseThetaVel => status.base.theta_vel,
        }
    }
}

/// Names of the state channels in recording order
pub fn state_names() -> Vec<&'static str> {
    StateChannel::ALL.iter().map(|c| c.name()).collect()
}

/// Flatten a vendor status into the recorded state vector
pub fn state_vector(status: &RobotStatus) -> Vec<f32> {
    StateChannel::ALL.iter().map(|c| c.read(status)).collect()
}

/// Gamepad action channels in recording order
pub const ACTION_CHANNELS: [&str; 21] = [
    "middle_led_ring_button_pressed",
    "left_stick_x",
    "left_stick_y",
    "right_stick_x",
    "right_stick_y",
    "left_stick_button_pressed",
    "right_stick_button_pressed",
    "bottom_button_pressed",
    "top_button_pressed",
    "left_button_pressed",
    "right_button_pressed",
    "left_shoulder_button_pressed",
    "right_shoulder_button_pressed",
    "select_button_pressed",
    "start_button_pressed",
    "left_trigger_pulled",
    "right_trigger_pulled",
    "bottom_pad_pressed",
    "top_pad_pressed",
    "left_pad_pressed",
    "right_pad_pressed",
];

#[inline]
fn flag(pressed: bool) -> f32 {
    if pressed {
        1.0
    } else {
        0.0
    }
}

/// Flatten a gamepad state into the recorded action vector
///
/// Must stay in step with [`ACTION_CHANNELS`].
pub fn action_vector(state: &GamepadState) -> Vec<f32> {
    vec![
        flag(state.middle_led_ring_button_pressed),
        state.left_stick_x,
        state.left_stick_y,
        state.right_stick_x,
        state.right_stick_y,
        flag(state.left_stick_button_pressed),
        flag(state.right_stick_button_pressed),
        flag(state.bottom_button_pressed),
        flag(state.top_button_pressed),
        flag(state.left_button_pressed),
        flag(state.right_button_pressed),
        flag(state.left_shoulder_button_pressed),
        flag(state.right_shoulder_button_pressed),
        flag(state.select_button_pressed),
        flag(state.start_button_pressed),
        state.left_trigger_pulled,
        state.right_trigger_pulled,
        flag(state.bottom_pad_pressed),
        flag(state.top_pad_pressed),
        flag(state.left_pad_pressed),
        flag(state.right_pad_pressed),
    ]
}
