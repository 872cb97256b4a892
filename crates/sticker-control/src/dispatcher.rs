//! [`Dispatcher`] – the robot state machine.
//!
//! Every [`CommandEnvelope`] is mapped to at most one [`ActuatorCall`]:
//!
//! | `Command` | `Pressed` | Effect |
//! |---|---|---|
//! | `move` / `look` | `"true"` | directional call for the group (unknown direction → the group's stop) |
//! | `move` / `look` | `"false"` | the group's stop call, direction ignored |
//! | `move` / `look` | anything else | nothing |
//! | unknown | any | nothing |
//!
//! Each axis group holds at most one active direction.  A new press replaces
//! the previous one without an intervening stop, and a release always clears
//! the group to `none`.  Repeated identical presses are not de-duplicated:
//! each one reaches the robot.

use sticker_hal::Robot;
use sticker_types::{
    ActuatorCall, AxisGroup, CommandEnvelope, Direction, LookAxis, MotionAxis, PressState,
    RobotState,
};
use tracing::{debug, warn};

/// Compute the actuator call and next state for `envelope` applied to
/// `state`.  Returns `None` when the envelope must be ignored.
pub fn transition(
    envelope: &CommandEnvelope,
    state: RobotState,
) -> Option<(ActuatorCall, RobotState)> {
    let group = envelope.command.axis_group()?;
    let mut next = state;

    let call = match (&envelope.pressed, group) {
        (PressState::Indeterminate(_), _) => return None,

        (PressState::Released, AxisGroup::Motion) => {
            next.motion = MotionAxis::None;
            ActuatorCall::StopMove
        }
        (PressState::Released, AxisGroup::Look) => {
            next.look = LookAxis::None;
            ActuatorCall::StopLook
        }

        (PressState::Pressed, AxisGroup::Motion) => {
            let (call, axis) = match envelope.direction {
                Direction::Left => (ActuatorCall::TurnLeft, MotionAxis::Left),
                Direction::Right => (ActuatorCall::TurnRight, MotionAxis::Right),
                Direction::Up => (ActuatorCall::MoveForward, MotionAxis::Forward),
                Direction::Down => (ActuatorCall::MoveBackward, MotionAxis::Backward),
                Direction::Unknown(_) => (ActuatorCall::StopMove, MotionAxis::None),
            };
            next.motion = axis;
            call
        }
        (PressState::Pressed, AxisGroup::Look) => {
            let (call, axis) = match envelope.direction {
                Direction::Left => (ActuatorCall::LookLeft, LookAxis::Left),
                Direction::Right => (ActuatorCall::LookRight, LookAxis::Right),
                Direction::Up => (ActuatorCall::LookUp, LookAxis::Up),
                Direction::Down => (ActuatorCall::LookDown, LookAxis::Down),
                Direction::Unknown(_) => (ActuatorCall::StopLook, LookAxis::None),
            };
            next.look = axis;
            call
        }
    };

    Some((call, next))
}

/// Owns the [`RobotState`] and the [`Robot`] driver it commands.
///
/// Not thread-safe on its own; share it through
/// [`spawn_dispatcher`][crate::actor::spawn_dispatcher].
pub struct Dispatcher {
    robot: Box<dyn Robot>,
    state: RobotState,
}

impl Dispatcher {
    /// Start with both axes stopped.
    pub fn new(robot: Box<dyn Robot>) -> Self {
        Self {
            robot,
            state: RobotState::default(),
        }
    }

    pub fn state(&self) -> RobotState {
        self.state
    }

    /// Apply `envelope`, issuing at most one actuator call.
    ///
    /// Returns the call that was issued, or `None` if the envelope was
    /// ignored.  A failed actuator call is logged and otherwise treated as
    /// issued: the logical state still advances.
    pub fn dispatch(&mut self, envelope: &CommandEnvelope) -> Option<ActuatorCall> {
        let Some((call, next)) = transition(envelope, self.state) else {
            debug!(?envelope, "ignoring command");
            return None;
        };
        self.actuate(call);
        self.state = next;
        Some(call)
    }

    /// Stop both axis groups unconditionally.
    pub fn halt(&mut self) {
        self.actuate(ActuatorCall::StopMove);
        self.actuate(ActuatorCall::StopLook);
        self.state = RobotState::default();
    }

    fn actuate(&mut self, call: ActuatorCall) {
        if let Err(e) = self.robot.actuate(call) {
            warn!(robot = %self.robot.id(), %call, error = %e, "actuator call failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sticker_hal::{CallLog, SimRobot};
    use sticker_types::CommandKind;

    fn sim() -> (Dispatcher, CallLog) {
        let robot = SimRobot::new("sim");
        let log = robot.log();
        (Dispatcher::new(Box::new(robot)), log)
    }

    fn cmd(command: &str, direction: &str, pressed: &str) -> CommandEnvelope {
        CommandEnvelope::new(
            CommandKind::parse(command),
            Direction::parse(direction),
            PressState::parse(pressed),
        )
    }

    // ── Presses ───────────────────────────────────────────────────────────

    #[test]
    fn move_press_sets_motion_to_last_direction() {
        let (mut d, log) = sim();
        let expected = [
            ("up", MotionAxis::Forward, ActuatorCall::MoveForward),
            ("left", MotionAxis::Left, ActuatorCall::TurnLeft),
            ("down", MotionAxis::Backward, ActuatorCall::MoveBackward),
            ("right", MotionAxis::Right, ActuatorCall::TurnRight),
        ];
        for (i, (dir, axis, call)) in expected.iter().enumerate() {
            assert_eq!(d.dispatch(&cmd("move", dir, "true")), Some(*call));
            assert_eq!(d.state().motion, *axis);
            assert_eq!(log.len(), i + 1, "exactly one call per dispatch");
        }
        assert_eq!(d.state().look, LookAxis::None);
    }

    #[test]
    fn look_press_maps_each_direction() {
        let (mut d, log) = sim();
        d.dispatch(&cmd("look", "up", "true"));
        assert_eq!(d.state().look, LookAxis::Up);
        d.dispatch(&cmd("look", "down", "true"));
        assert_eq!(d.state().look, LookAxis::Down);
        d.dispatch(&cmd("look", "left", "true"));
        assert_eq!(d.state().look, LookAxis::Left);
        d.dispatch(&cmd("look", "right", "true"));
        assert_eq!(d.state().look, LookAxis::Right);
        assert_eq!(
            log.calls(),
            vec![
                ActuatorCall::LookUp,
                ActuatorCall::LookDown,
                ActuatorCall::LookLeft,
                ActuatorCall::LookRight
            ]
        );
        assert_eq!(d.state().motion, MotionAxis::None);
    }

    #[test]
    fn press_with_unknown_direction_stops_group() {
        let (mut d, log) = sim();
        d.dispatch(&cmd("move", "left", "true"));
        assert_eq!(d.dispatch(&cmd("move", "diagonal", "true")), Some(ActuatorCall::StopMove));
        assert_eq!(d.state().motion, MotionAxis::None);

        d.dispatch(&cmd("look", "up", "true"));
        assert_eq!(d.dispatch(&cmd("look", "", "true")), Some(ActuatorCall::StopLook));
        assert_eq!(d.state().look, LookAxis::None);
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn repeated_press_is_not_deduplicated() {
        let (mut d, log) = sim();
        d.dispatch(&cmd("move", "left", "true"));
        assert_eq!(d.state().motion, MotionAxis::Left);
        d.dispatch(&cmd("move", "left", "true"));
        assert_eq!(d.state().motion, MotionAxis::Left);
        assert_eq!(log.calls(), vec![ActuatorCall::TurnLeft, ActuatorCall::TurnLeft]);
    }

    // ── Releases ──────────────────────────────────────────────────────────

    #[test]
    fn release_always_clears_regardless_of_direction() {
        for dir in ["up", "down", "left", "right", "", "bogus"] {
            let (mut d, log) = sim();
            d.dispatch(&cmd("move", "up", "true"));
            d.dispatch(&cmd("look", "left", "true"));

            assert_eq!(d.dispatch(&cmd("move", dir, "false")), Some(ActuatorCall::StopMove));
            assert_eq!(d.dispatch(&cmd("look", dir, "false")), Some(ActuatorCall::StopLook));
            assert!(d.state().is_idle(), "direction {dir:?} must not matter on release");
            assert_eq!(log.len(), 4);
        }
    }

    #[test]
    fn release_when_already_stopped_still_issues_stop() {
        let (mut d, log) = sim();
        d.dispatch(&cmd("move", "left", "false"));
        assert_eq!(log.calls(), vec![ActuatorCall::StopMove]);
        assert!(d.state().is_idle());
    }

    #[test]
    fn release_only_clears_its_own_group() {
        let (mut d, _log) = sim();
        d.dispatch(&cmd("move", "up", "true"));
        d.dispatch(&cmd("look", "down", "true"));
        d.dispatch(&cmd("look", "down", "false"));
        assert_eq!(d.state().motion, MotionAxis::Forward);
        assert_eq!(d.state().look, LookAxis::None);
    }

    // ── Ignored input ─────────────────────────────────────────────────────

    #[test]
    fn unknown_command_is_ignored() {
        let (mut d, log) = sim();
        d.dispatch(&cmd("move", "left", "true"));
        let before = d.state();
        for pressed in ["true", "false", "maybe"] {
            assert_eq!(d.dispatch(&cmd("jump", "left", pressed)), None);
        }
        assert_eq!(d.state(), before);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn indeterminate_pressed_is_ignored() {
        let (mut d, log) = sim();
        d.dispatch(&cmd("look", "up", "true"));
        let before = d.state();
        for pressed in ["", "TRUE", "1", "yes"] {
            assert_eq!(d.dispatch(&cmd("look", "down", pressed)), None);
            assert_eq!(d.dispatch(&cmd("move", "down", pressed)), None);
        }
        assert_eq!(d.state(), before);
        assert_eq!(log.len(), 1);
    }

    // ── Scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn left_right_release_scenario() {
        let (mut d, log) = sim();
        d.dispatch(&cmd("move", "left", "true"));
        d.dispatch(&cmd("move", "right", "true"));
        d.dispatch(&cmd("move", "right", "false"));

        assert_eq!(d.state().motion, MotionAxis::None);
        assert_eq!(
            log.calls(),
            vec![
                ActuatorCall::TurnLeft,
                ActuatorCall::TurnRight,
                ActuatorCall::StopMove
            ]
        );
    }

    #[test]
    fn actuator_fault_still_advances_state() {
        let robot = SimRobot::new("faulty").with_fault(ActuatorCall::TurnLeft);
        let log = robot.log();
        let mut d = Dispatcher::new(Box::new(robot));

        assert_eq!(d.dispatch(&cmd("move", "left", "true")), Some(ActuatorCall::TurnLeft));
        assert_eq!(d.state().motion, MotionAxis::Left);
        assert_eq!(log.len(), 1, "no retry after a fault");
    }

    #[test]
    fn halt_stops_both_groups() {
        let (mut d, log) = sim();
        d.dispatch(&cmd("move", "up", "true"));
        d.dispatch(&cmd("look", "left", "true"));
        log.clear();

        d.halt();
        assert!(d.state().is_idle());
        assert_eq!(log.calls(), vec![ActuatorCall::StopMove, ActuatorCall::StopLook]);
    }

    #[test]
    fn transition_is_pure() {
        let state = RobotState {
            motion: MotionAxis::Left,
            look: LookAxis::Up,
        };
        let (call, next) = transition(&cmd("move", "right", "true"), state).unwrap();
        assert_eq!(call, ActuatorCall::TurnRight);
        assert_eq!(next.motion, MotionAxis::Right);
        assert_eq!(next.look, LookAxis::Up);
        assert!(transition(&cmd("noop", "right", "true"), state).is_none());
    }
}
