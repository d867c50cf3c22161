//=========================================================================
// Action Mapper
//=========================================================================
//
// Maps raw keys and mouse buttons to commands based on configured
// bindings and the active input context.
//
// Architecture:
//   (key/button, context) → HashMap → Command
//
// Only bindings in the active context resolve to commands.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::{
    action::{Command, InputContext},
    event::{KeyCode, MouseButton},
};

//=== ActionMapper ========================================================

/// Maps input to commands via (key/button, context) lookups.
pub(crate) struct ActionMapper {
    key_bindings: HashMap<(KeyCode, InputContext), Command>,
    mouse_bindings: HashMap<(MouseButton, InputContext), Command>,
    current_context: InputContext,
}

impl ActionMapper {
    /// Creates a new mapper with the `Menu` context active and no bindings.
    pub(crate) fn new() -> Self {
        Self {
            key_bindings: HashMap::new(),
            mouse_bindings: HashMap::new(),
            current_context: InputContext::Menu,
        }
    }

    /// Creates a mapper with the default investigation layout.
    pub(crate) fn with_default_bindings() -> Self {
        use Command::*;
        use InputContext::{Gameplay, Journal, Monitor};

        let mut mapper = Self::new();

        for (key, command) in [
            (KeyCode::KeyW, MoveForward),
            (KeyCode::ArrowUp, MoveForward),
            (KeyCode::KeyS, MoveBack),
            (KeyCode::ArrowDown, MoveBack),
            (KeyCode::KeyA, MoveLeft),
            (KeyCode::ArrowLeft, MoveLeft),
            (KeyCode::KeyD, MoveRight),
            (KeyCode::ArrowRight, MoveRight),
            (KeyCode::ShiftLeft, Sprint),
            (KeyCode::KeyC, Crouch),
            (KeyCode::ControlLeft, Crouch),
            (KeyCode::KeyE, Interact),
            (KeyCode::KeyG, Drop),
            (KeyCode::KeyF, ToggleTool),
            (KeyCode::KeyJ, ToggleJournal),
            (KeyCode::Digit1, SelectSlot(0)),
            (KeyCode::Digit2, SelectSlot(1)),
            (KeyCode::Digit3, SelectSlot(2)),
            (KeyCode::Digit4, SelectSlot(3)),
        ] {
            mapper.bind_key(key, command, Gameplay);
        }
        mapper.bind_mouse(MouseButton::Left, PrimaryUse, Gameplay);
        mapper.bind_mouse(MouseButton::Right, SecondaryUse, Gameplay);

        mapper.bind_key(KeyCode::Escape, CloseOverlay, Monitor);
        mapper.bind_key(KeyCode::KeyE, Interact, Monitor);

        mapper.bind_key(KeyCode::KeyJ, ToggleJournal, Journal);
        mapper.bind_key(KeyCode::Escape, ToggleJournal, Journal);

        mapper
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a key to a command in a context, replacing any previous binding.
    pub(crate) fn bind_key(&mut self, key: KeyCode, command: Command, context: InputContext) {
        self.key_bindings.insert((key, context), command);
    }

    /// Binds a mouse button to a command in a context.
    pub(crate) fn bind_mouse(&mut self, button: MouseButton, command: Command, context: InputContext) {
        self.mouse_bindings.insert((button, context), command);
    }

    /// Removes a key binding.
    pub(crate) fn unbind_key(&mut self, key: KeyCode, context: InputContext) {
        self.key_bindings.remove(&(key, context));
    }

    /// Clears all bindings for a context (keys and mouse buttons).
    pub(crate) fn clear_context(&mut self, context: InputContext) {
        self.key_bindings.retain(|&(_, ctx), _| ctx != context);
        self.mouse_bindings.retain(|&(_, ctx), _| ctx != context);
    }

    //--- Mapping ----------------------------------------------------------

    /// Maps a key to a command in the active context.
    pub(crate) fn map_key(&self, key: KeyCode) -> Option<Command> {
        self.key_bindings.get(&(key, self.current_context)).copied()
    }

    /// Maps a mouse button to a command in the active context.
    pub(crate) fn map_button(&self, button: MouseButton) -> Option<Command> {
        self.mouse_bindings.get(&(button, self.current_context)).copied()
    }

    /// Sets the active input context.
    pub(crate) fn set_context(&mut self, context: InputContext) {
        self.current_context = context;
    }

    /// Returns the current active context.
    pub(crate) fn current_context(&self) -> InputContext {
        self.current_context
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
