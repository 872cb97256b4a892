use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which half of the robot a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisGroup {
    /// Drive base: forward/backward translation and left/right turning.
    Motion,
    /// Camera pan/tilt.
    Look,
}

/// The `Command` field of an inbound control message.
///
/// Values other than `move` and `look` are carried through as
/// [`CommandKind::Unknown`] and ignored at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Move,
    Look,
    Unknown(String),
}

impl CommandKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "move" => Self::Move,
            "look" => Self::Look,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The axis group this command drives, or `None` for unknown commands.
    pub fn axis_group(&self) -> Option<AxisGroup> {
        match self {
            Self::Move => Some(AxisGroup::Motion),
            Self::Look => Some(AxisGroup::Look),
            Self::Unknown(_) => None,
        }
    }
}

/// The `Direction` field of an inbound control message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Unknown(String),
}

impl Direction {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// The string-typed `Pressed` flag.
///
/// Only the literals `"true"` and `"false"` carry meaning; anything else is
/// [`PressState::Indeterminate`] and leaves the robot untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressState {
    Pressed,
    Released,
    Indeterminate(String),
}

impl PressState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => Self::Pressed,
            "false" => Self::Released,
            other => Self::Indeterminate(other.to_string()),
        }
    }
}

/// One decoded control message. Transient: one per `/api` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEnvelope {
    pub command: CommandKind,
    pub direction: Direction,
    pub pressed: PressState,
}

impl CommandEnvelope {
    pub fn new(command: CommandKind, direction: Direction, pressed: PressState) -> Self {
        Self {
            command,
            direction,
            pressed,
        }
    }
}

/// Active value of the motion axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionAxis {
    #[default]
    None,
    Left,
    Right,
    Forward,
    Backward,
}

/// Active value of the look (camera) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookAxis {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

/// Current logical command held for each axis group.
///
/// Each axis holds at most one active direction; [`MotionAxis::None`] /
/// [`LookAxis::None`] mean the axis is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RobotState {
    pub motion: MotionAxis,
    pub look: LookAxis,
}

impl RobotState {
    /// `true` when both axes are stopped.
    pub fn is_idle(&self) -> bool {
        self.motion == MotionAxis::None && self.look == LookAxis::None
    }
}

/// Every call the dispatcher can make on the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorCall {
    TurnLeft,
    TurnRight,
    MoveForward,
    MoveBackward,
    StopMove,
    LookLeft,
    LookRight,
    LookUp,
    LookDown,
    StopLook,
}

impl ActuatorCall {
    /// The axis group this call acts on.
    pub fn axis_group(self) -> AxisGroup {
        match self {
            Self::TurnLeft
            | Self::TurnRight
            | Self::MoveForward
            | Self::MoveBackward
            | Self::StopMove => AxisGroup::Motion,
            Self::LookLeft | Self::LookRight | Self::LookUp | Self::LookDown | Self::StopLook => {
                AxisGroup::Look
            }
        }
    }

    /// `true` for [`ActuatorCall::StopMove`] and [`ActuatorCall::StopLook`].
    pub fn is_stop(self) -> bool {
        matches!(self, Self::StopMove | Self::StopLook)
    }
}

impl std::fmt::Display for ActuatorCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TurnLeft => "turn_left",
            Self::TurnRight => "turn_right",
            Self::MoveForward => "move_forward",
            Self::MoveBackward => "move_backward",
            Self::StopMove => "stop_move",
            Self::LookLeft => "look_left",
            Self::LookRight => "look_right",
            Self::LookUp => "look_up",
            Self::LookDown => "look_down",
            Self::StopLook => "stop_look",
        };
        f.write_str(name)
    }
}

/// Workspace-wide error type for hardware faults, the dispatcher channel, and
/// server startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StickerError {
    #[error("Actuator Fault on {robot} during {call}: {details}")]
    ActuatorFault {
        robot: String,
        call: ActuatorCall,
        details: String,
    },

    #[error("Dispatcher is no longer running")]
    DispatcherClosed,

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Server Bind Error on {addr}: {details}")]
    Bind { addr: String, details: String },

    #[error("Server Error: {0}")]
    Server(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_kind_parses_known_and_unknown() {
        assert_eq!(CommandKind::parse("move"), CommandKind::Move);
        assert_eq!(CommandKind::parse("look"), CommandKind::Look);
        assert_eq!(
            CommandKind::parse("dance"),
            CommandKind::Unknown("dance".to_string())
        );
        // Matching is case-sensitive, like the wire protocol.
        assert!(matches!(CommandKind::parse("Move"), CommandKind::Unknown(_)));
    }

    #[test]
    fn command_kind_axis_group() {
        assert_eq!(CommandKind::Move.axis_group(), Some(AxisGroup::Motion));
        assert_eq!(CommandKind::Look.axis_group(), Some(AxisGroup::Look));
        assert_eq!(CommandKind::Unknown(String::new()).axis_group(), None);
    }

    #[test]
    fn press_state_only_accepts_literals() {
        assert_eq!(PressState::parse("true"), PressState::Pressed);
        assert_eq!(PressState::parse("false"), PressState::Released);
        assert_eq!(
            PressState::parse("TRUE"),
            PressState::Indeterminate("TRUE".to_string())
        );
        assert_eq!(
            PressState::parse(""),
            PressState::Indeterminate(String::new())
        );
    }

    #[test]
    fn direction_parses_four_directions() {
        assert_eq!(Direction::parse("up"), Direction::Up);
        assert_eq!(Direction::parse("down"), Direction::Down);
        assert_eq!(Direction::parse("left"), Direction::Left);
        assert_eq!(Direction::parse("right"), Direction::Right);
        assert_eq!(
            Direction::parse("sideways"),
            Direction::Unknown("sideways".to_string())
        );
    }

    #[test]
    fn default_robot_state_is_idle() {
        let state = RobotState::default();
        assert!(state.is_idle());
        assert_eq!(state.motion, MotionAxis::None);
        assert_eq!(state.look, LookAxis::None);
    }

    #[test]
    fn actuator_call_groups() {
        assert_eq!(ActuatorCall::TurnLeft.axis_group(), AxisGroup::Motion);
        assert_eq!(ActuatorCall::StopMove.axis_group(), AxisGroup::Motion);
        assert_eq!(ActuatorCall::LookDown.axis_group(), AxisGroup::Look);
        assert!(ActuatorCall::StopLook.is_stop());
        assert!(!ActuatorCall::LookUp.is_stop());
    }

    #[test]
    fn robot_state_serializes_lowercase() {
        let state = RobotState {
            motion: MotionAxis::Forward,
            look: LookAxis::None,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"motion":"forward","look":"none"}"#);
    }

    #[test]
    fn sticker_error_display() {
        let err = StickerError::ActuatorFault {
            robot: "sticker".to_string(),
            call: ActuatorCall::TurnLeft,
            details: "motor stalled".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("Actuator Fault"));
        assert!(text.contains("turn_left"));
        assert!(text.contains("motor stalled"));
    }
}
