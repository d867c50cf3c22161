//=========================================================================
// Game State
//=========================================================================
//
// Coarse game modes and the requests that move between them.
//
// Architecture:
//   handlers → GameStateMachine::request() → TransitionQueue
//                                                 ↓ (tick boundary)
//   Game ← Transition ← GameStateMachine::apply() ┘
//
//=========================================================================

//=== Module Declarations =================================================

mod machine;
mod transition_queue;

//=== Public API ==========================================================

pub use machine::GameStateMachine;
pub use transition_queue::TransitionQueue;

//=== GameState ===========================================================

/// The active game mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    MainMenu,
    /// Assets for the next session are outstanding.
    Loading,
    /// Gameplay subsystems run.
    Playing,
    /// Journal overlay; gameplay is paused.
    Journal,
}

impl GameState {
    /// Returns `true` if a session's world exists in this state.
    pub fn has_session(&self) -> bool {
        matches!(self, Self::Playing | Self::Journal)
    }
}

//=== StateRequest ========================================================

/// An edge the game may ask the state machine to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateRequest {
    /// Map and entity confirmed in the menu.
    BeginLoading,
    /// Assets ready and the minimum loading time elapsed.
    FinishLoading,
    /// Journal key.
    ToggleJournal,
    /// Hard teardown back to the menu.
    Reset,
}

//=== Transition ==========================================================

/// A transition that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GameState,
    pub to: GameState,
    pub request: StateRequest,
}
