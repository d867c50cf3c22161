//=========================================================================
// Commands & Input Context
//=========================================================================
//
// Semantic command set and input context system.
//
// Commands: what the player asked for (move, sprint, interact, use...).
// Contexts: which bindings are live (gameplay vs journal vs monitor menu).
//
//=========================================================================

//=== Command =============================================================

/// High-level player command mapped from raw input.
///
/// Movement, sprint and crouch are *held* commands and are read every
/// frame from held keys. All others are *discrete* and fire once per press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    Sprint,
    Crouch,
    Interact,
    Drop,
    ToggleTool,
    ToggleJournal,
    CloseOverlay,
    /// Selects one of the four semantic slots (3 general + lighter).
    SelectSlot(usize),
    PrimaryUse,
    SecondaryUse,
}

impl Command {
    /// Returns `true` for commands that are sampled while held.
    pub fn is_held(&self) -> bool {
        matches!(
            self,
            Self::MoveForward
                | Self::MoveBack
                | Self::MoveLeft
                | Self::MoveRight
                | Self::Sprint
                | Self::Crouch
        )
    }
}

//=== InputContext ========================================================

/// Identifies which set of input bindings is currently active.
///
/// The game switches context with its state: `Menu` while in the main menu
/// or loading, `Gameplay` while playing, `Monitor` while the terminal overlay
/// is open and `Journal` while the journal is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputContext {
    #[default]
    Menu,
    Gameplay,
    Monitor,
    Journal,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn movement_sprint_and_crouch_are_held() {
        assert!(Command::MoveForward.is_held());
        assert!(Command::Sprint.is_held());
        assert!(Command::Crouch.is_held());
    }

    #[test]
    fn actions_are_discrete() {
        assert!(!Command::Interact.is_held());
        assert!(!Command::SelectSlot(3).is_held());
        assert!(!Command::PrimaryUse.is_held());
    }

    #[test]
    fn slot_commands_hash_by_index() {
        let mut set = HashSet::new();
        set.insert(Command::SelectSlot(0));
        set.insert(Command::SelectSlot(0));
        set.insert(Command::SelectSlot(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn default_context_is_menu() {
        assert_eq!(InputContext::default(), InputContext::Menu);
    }
}
