//=========================================================================
// Input System
//
// High-level interface for input handling within the engine.
// Owns the raw StateTracker and the ActionMapper and turns every frame of
// platform events into one semantic `InputState`.
//
// Responsibilities:
// - Digest the batches of raw input events received for a frame
// - Resolve held keys into move axes / sprint / crouch
// - Resolve presses into discrete commands, in arrival order
// - Follow the game's input context (menu, gameplay, monitor, journal)
//
//=========================================================================

//=== Submodules ==========================================================
pub mod action;
pub(crate) mod action_mapper;
pub mod event;
pub mod input_state;
pub mod state_tracker;

//=== Public API ==========================================================
pub use action::{Command, InputContext};
pub use event::{InputEvent, KeyCode, MouseButton};
pub use input_state::InputState;
pub use state_tracker::{Press, StateTracker};

//=== External Crates =====================================================
use log::trace;

//=== Internal Imports ====================================================
use action_mapper::ActionMapper;

//=== InputSystem =========================================================

/// Converts raw input into per-frame [`InputState`] snapshots.
pub struct InputSystem {
    tracker: StateTracker,
    mapper: ActionMapper,
    state: InputState,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    /// Creates an input system with the default investigation bindings.
    pub fn new() -> Self {
        Self {
            tracker: StateTracker::new(),
            mapper: ActionMapper::with_default_bindings(),
            state: InputState::default(),
        }
    }

    //--- Bindings ---------------------------------------------------------

    /// Binds a key to a command in a context.
    pub fn bind_key(&mut self, key: KeyCode, command: Command, context: InputContext) {
        self.mapper.bind_key(key, command, context);
    }

    /// Binds a mouse button to a command in a context.
    pub fn bind_mouse(&mut self, button: MouseButton, command: Command, context: InputContext) {
        self.mapper.bind_mouse(button, command, context);
    }

    /// Removes a key binding.
    pub fn unbind_key(&mut self, key: KeyCode, context: InputContext) {
        self.mapper.unbind_key(key, context);
    }

    /// Removes every binding of a context.
    pub fn clear_context(&mut self, context: InputContext) {
        self.mapper.clear_context(context);
    }

    /// Switches the active binding set.
    pub fn set_context(&mut self, context: InputContext) {
        if self.mapper.current_context() != context {
            trace!("Input context {:?} -> {:?}", self.mapper.current_context(), context);
            self.mapper.set_context(context);
        }
    }

    /// Returns the active binding set.
    pub fn context(&self) -> InputContext {
        self.mapper.current_context()
    }

    //--- Frame Processing -------------------------------------------------

    /// Consumes all input batches of a frame and rebuilds the snapshot.
    pub fn process_frame(&mut self, batches: &[Vec<InputEvent>]) -> &InputState {
        self.tracker.clear();
        for batch in batches {
            self.tracker.process_events(batch);
        }

        let mut state = InputState::default();

        for key in self.tracker.keys_down() {
            if let Some(command) = self.mapper.map_key(*key) {
                if command.is_held() {
                    state.hold(command);
                }
            }
        }

        for press in self.tracker.presses() {
            let command = match *press {
                Press::Key(key) => self.mapper.map_key(key),
                Press::Button(button) => self.mapper.map_button(button),
            };
            if let Some(command) = command.filter(|c| !c.is_held()) {
                state.commands.push(command);
            }
        }

        if self.tracker.pointer_locked() {
            state.look_delta = self.tracker.motion();
        }
        state.wheel_delta = self.tracker.wheel();

        self.state = state;
        &self.state
    }

    /// Drops all held keys (focus loss, teardown).
    pub fn release_all(&mut self) {
        self.tracker.release_all();
        self.state = InputState::default();
    }

    //--- Query Methods ----------------------------------------------------

    /// The snapshot built by the last [`process_frame`](Self::process_frame).
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Raw tracker access for low-level queries.
    pub fn tracker(&self) -> &StateTracker {
        &self.tracker
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
