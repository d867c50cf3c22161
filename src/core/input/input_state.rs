//=========================================================================
// Input State
//
// Per-frame semantic snapshot of player input.
//
// Built once per tick by the InputSystem from the StateTracker and the
// ActionMapper. Downstream systems never look at raw keys; they read the
// move axes, held modifiers and the ordered list of discrete commands.
//
//=========================================================================

//=== External Crates =====================================================
use glam::Vec2;

//=== Internal Modules ====================================================
use super::action::Command;

//=== InputState ==========================================================

/// Semantic input for a single frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Movement axes from the four directional flags: x = right, y = forward.
    /// Components are -1, 0 or 1; normalization is the controller's job.
    pub move_axis: Vec2,
    /// Sprint held.
    pub sprint: bool,
    /// Crouch held.
    pub crouch: bool,
    /// Pointer motion, zero unless the pointer is locked.
    pub look_delta: Vec2,
    /// Wheel notches this frame.
    pub wheel_delta: f32,
    /// Discrete commands pressed this frame, in arrival order.
    pub commands: Vec<Command>,
}

impl InputState {
    /// Returns `true` if any directional flag is held.
    pub fn is_moving(&self) -> bool {
        self.move_axis != Vec2::ZERO
    }

    /// Returns `true` if the forward flag wins over the back flag.
    pub fn moving_forward(&self) -> bool {
        self.move_axis.y > 0.0
    }

    /// Returns `true` if `command` was pressed this frame.
    pub fn pressed(&self, command: Command) -> bool {
        self.commands.contains(&command)
    }

    /// Applies a held command to the snapshot.
    pub(super) fn hold(&mut self, command: Command) {
        match command {
            Command::MoveForward => self.move_axis.y = (self.move_axis.y + 1.0).min(1.0),
            Command::MoveBack => self.move_axis.y = (self.move_axis.y - 1.0).max(-1.0),
            Command::MoveRight => self.move_axis.x = (self.move_axis.x + 1.0).min(1.0),
            Command::MoveLeft => self.move_axis.x = (self.move_axis.x - 1.0).max(-1.0),
            Command::Sprint => self.sprint = true,
            Command::Crouch => self.crouch = true,
            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flags_cancel() {
        let mut state = InputState::default();
        state.hold(Command::MoveForward);
        state.hold(Command::MoveBack);
        state.hold(Command::MoveLeft);

        assert_eq!(state.move_axis, Vec2::new(-1.0, 0.0));
        assert!(!state.moving_forward());
        assert!(state.is_moving());
    }

    #[test]
    fn duplicate_bindings_do_not_double_axis() {
        let mut state = InputState::default();
        state.hold(Command::MoveForward);
        state.hold(Command::MoveForward);

        assert_eq!(state.move_axis.y, 1.0);
    }

    #[test]
    fn pressed_checks_command_list() {
        let state = InputState {
            commands: vec![Command::Interact, Command::SelectSlot(2)],
            ..Default::default()
        };
        assert!(state.pressed(Command::SelectSlot(2)));
        assert!(!state.pressed(Command::Drop));
    }
}
