//=========================================================================
// Game State Machine
//=========================================================================
//
// Owns the coarse game mode and the legal edges between modes.
//
// Legal edges:
// ```text
//   MainMenu ──BeginLoading──> Loading ──FinishLoading──> Playing
//                                                          ↑  ↓ ToggleJournal
//                                                         Journal
//   any ──Reset──> MainMenu   (hard teardown, not a gameplay edge)
// ```
//
// Requests are queued during a tick and applied at the tick boundary by
// the game, which runs the lifecycle hook belonging to each edge.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::transition_queue::TransitionQueue;
use super::{GameState, StateRequest, Transition};
use crate::core::error::TransitionError;

//=== GameStateMachine ====================================================

/// Current game mode plus the queue of pending requests.
#[derive(Debug, Default)]
pub struct GameStateMachine {
    current: GameState,
    pending: TransitionQueue,
}

impl GameStateMachine {
    /// Creates a machine in `MainMenu`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> GameState {
        self.current
    }

    /// Whether gameplay subsystems may run this tick.
    pub fn is_playing(&self) -> bool {
        self.current == GameState::Playing
    }

    //--- Edge Table -------------------------------------------------------

    /// Destination of `request` from `from`, or `None` if the edge does
    /// not exist.
    pub fn target(from: GameState, request: StateRequest) -> Option<GameState> {
        use GameState::*;
        use StateRequest::*;

        match (from, request) {
            (MainMenu, BeginLoading) => Some(Loading),
            (Loading, FinishLoading) => Some(Playing),
            (Playing, ToggleJournal) => Some(Journal),
            (Journal, ToggleJournal) => Some(Playing),
            (_, Reset) => Some(MainMenu),
            _ => None,
        }
    }

    //--- Transitions ------------------------------------------------------

    /// Applies a request immediately.
    ///
    /// Illegal requests leave the state untouched.
    pub fn apply(&mut self, request: StateRequest) -> Result<Transition, TransitionError> {
        let from = self.current;
        let Some(to) = Self::target(from, request) else {
            warn!("Ignoring illegal state request {:?} in {:?}", request, from);
            return Err(TransitionError::Illegal { from, request });
        };

        debug!("Game state {:?} -> {:?} ({:?})", from, to, request);
        self.current = to;
        Ok(Transition { from, to, request })
    }

    /// Queues a request for the next tick boundary.
    pub fn request(&mut self, request: StateRequest) {
        debug!("Queued state request {:?}", request);
        self.pending.push(request);
    }

    /// Takes all queued requests in FIFO order.
    pub fn take_requests(&mut self) -> Vec<StateRequest> {
        self.pending.take()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
