//! Vendor-native state records.
//!
//! [`RobotStatus`] mirrors the nested status the vendor SDK reports
//! (`head.head_pan.pos`, `lift.pos`, `base.x_vel`, ...). Unknown keys in a
//! vendor JSON dump are ignored, missing known keys are an error.
//!
//! [`GamepadState`] mirrors the gamepad controller state the teleop session
//! exposes after each motion update.

use serde::{Deserialize, Serialize};

/// Single actuated joint as reported by the vendor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointStatus {
    /// Position (m for prismatic joints, rad for revolute joints)
    pub pos: f32,
    /// Velocity, when the vendor reports it
    #[serde(default)]
    pub vel: f32,
}

impl JointStatus {
    pub fn at(pos: f32) -> Self {
        Self { pos, vel: 0.0 }
    }
}

/// Pan/tilt head
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadStatus {
    pub head_pan: JointStatus,
    pub head_tilt: JointStatus,
}

/// Wrist joints on the end of arm
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EndOfArmStatus {
    pub wrist_pitch: JointStatus,
    pub wrist_roll: JointStatus,
    pub wrist_yaw: JointStatus,
}

/// Mobile base
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseStatus {
    /// Forward velocity (m/s)
    pub x_vel: f32,
    /// Lateral velocity (m/s, always ~0 on a differential base)
    pub y_vel: f32,
    /// Yaw rate (rad/s)
    pub theta_vel: f32,
    /// Odometry pose
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub theta: f32,
}

/// Full vendor status snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotStatus {
    pub head: HeadStatus,
    pub lift: JointStatus,
    pub arm: JointStatus,
    pub end_of_arm: EndOfArmStatus,
    pub base: BaseStatus,
}

impl RobotStatus {
    /// Parse a vendor status dump
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn joint(&self, joint: Joint) -> &JointStatus {
        match joint {
            Joint::HeadPan => &self.head.head_pan,
            Joint::HeadTilt => &self.head.head_tilt,
            Joint::Lift => &self.lift,
            Joint::Arm => &self.arm,
            Joint::WristPitch => &self.end_of_arm.wrist_pitch,
            Joint::WristRoll => &self.end_of_arm.wrist_roll,
            Joint::WristYaw => &self.end_of_arm.wrist_yaw,
        }
    }

    pub fn joint_mut(&mut self, joint: Joint) -> &mut JointStatus {
        match joint {
            Joint::HeadPan => &mut self.head.head_pan,
            Joint::HeadTilt => &mut self.head.head_tilt,
            Joint::Lift => &mut self.lift,
            Joint::Arm => &mut self.arm,
            Joint::WristPitch => &mut self.end_of_arm.wrist_pitch,
            Joint::WristRoll => &mut self.end_of_arm.wrist_roll,
            Joint::WristYaw => &mut self.end_of_arm.wrist_yaw,
        }
    }
}

/// Position-controlled joints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    HeadPan,
    HeadTilt,
    Lift,
    Arm,
    WristPitch,
    WristRoll,
    WristYaw,
}

impl Joint {
    pub const ALL: [Joint; 7] = [
        Joint::HeadPan,
        Joint::HeadTilt,
        Joint::Lift,
        Joint::Arm,
        Joint::WristPitch,
        Joint::WristRoll,
        Joint::WristYaw,
    ];
}

/// Motion queued on the vendor body, applied on `push_command`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MotionCommand {
    /// Relative position move
    MoveBy { joint: Joint, delta: f32 },
    /// Base velocity (m/s, rad/s)
    BaseVelocity { x: f32, theta: f32 },
}

/// Gamepad controller state after a motion update
///
/// Sticks are in [-1, 1], triggers in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadState {
    pub middle_led_ring_button_pressed: bool,
    pub left_stick_x: f32,
    pub left_stick_y: f32,
    pub right_stick_x: f32,
    pub right_stick_y: f32,
    pub left_stick_button_pressed: bool,
    pub right_stick_button_pressed: bool,
    pub bottom_button_pressed: bool,
    pub top_button_pressed: bool,
    pub left_button_pressed: bool,
    pub right_button_pressed: bool,
    pub left_shoulder_button_pressed: bool,
    pub right_shoulder_button_pressed: bool,
    pub select_button_pressed: bool,
    pub start_button_pressed: bool,
    pub left_trigger_pulled: f32,
    pub right_trigger_pulled: f32,
    pub bottom_pad_pressed: bool,
    pub top_pad_pressed: bool,
    pub left_pad_pressed: bool,
    pub right_pad_pressed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VENDOR_STATUS: &str = r#"{
        "head": {
            "head_pan": {"pos": -0.12, "vel": 0.0, "effort": 1.5},
            "head_tilt": {"pos": -0.5}
        },
        "lift": {"pos": 0.61, "vel": 0.01, "force": 12.0},
        "arm": {"pos": 0.1},
        "end_of_arm": {
            "wrist_pitch": {"pos": -0.4},
            "wrist_roll": {"pos": 0.02},
            "wrist_yaw": {"pos": 3.1},
            "stretch_gripper": {"pos": 0.0}
        },
        "base": {"x_vel": 0.05, "y_vel": 0.0, "theta_vel": -0.2, "x": 1.0},
        "pimu": {"voltage": 12.4}
    }"#;

    #[test]
    fn test_vendor_status_parses_and_ignores_extra_keys() {
        let status = RobotStatus::from_json(VENDOR_STATUS).unwrap();
        assert_relative_eq!(status.head.head_pan.pos, -0.12);
        assert_relative_eq!(status.lift.vel, 0.01);
        assert_relative_eq!(status.end_of_arm.wrist_yaw.pos, 3.1);
        assert_relative_eq!(status.base.theta_vel, -0.2);
        assert_relative_eq!(status.base.x, 1.0);
        assert_eq!(status.base.theta, 0.0);
    }

    #[test]
    fn test_vendor_status_missing_key_is_error() {
        let json = r#"{"head": {"head_pan": {"pos": 0.0}, "head_tilt": {"pos": 0.0}},
                       "lift": {"pos": 0.0}, "arm": {"pos": 0.0},
                       "base": {"x_vel": 0.0, "y_vel": 0.0, "theta_vel": 0.0}}"#;
        assert!(matches!(
            RobotStatus::from_json(json),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn test_joint_accessors() {
        let mut status = RobotStatus::default();
        status.joint_mut(Joint::WristRoll).pos = 0.7;
        assert_eq!(status.end_of_arm.wrist_roll.pos, 0.7);
        assert_eq!(status.joint(Joint::WristRoll).pos, 0.7);
    }

    #[test]
    fn test_motion_command_tagged_json() {
        let cmd = MotionCommand::MoveBy {
            joint: Joint::Lift,
            delta: 0.05,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"type":"MoveBy","joint":"lift","delta":0.05}"#);
    }
}
