//=========================================================================
// Input Event Types
//
// Defines the internal representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. Winit) into a
// unified, engine-friendly format used by the input subsystem.
//
// Responsibilities:
// - Represent keyboard, mouse button, pointer motion and wheel input
// - Keep the representation Copy-cheap (no heap allocation per event)
// - Distinguish discrete events (order significant) from continuous ones
//   (coalesced by the platform buffer)
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (held keys, frame deltas)
//         ↓
//    Commands (semantic game input)
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// `KeyW` is always the same physical key regardless of layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Modifier Keys ----------------------------------------------------

    /// Left Shift, bound to sprint by default.
    ShiftLeft,

    /// Left Ctrl, bound to crouch by default.
    ControlLeft,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// # Event Types
///
/// - **KeyDown/KeyUp**: discrete keyboard events
/// - **MouseButtonDown/MouseButtonUp**: discrete mouse button events
/// - **MouseMotion**: raw pointer-locked motion delta (continuous)
/// - **Wheel**: scroll delta in notches, positive = away from user (continuous)
/// - **PointerLock**: the host gained or lost pointer capture
/// - **Unidentified**: unknown events, ignored by the system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    MouseMotion { dx: f32, dy: f32 },
    Wheel { delta: f32 },
    PointerLock(bool),
    Unidentified,
}

impl InputEvent {
    /// Returns `true` for events whose payload accumulates across a frame.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMotion { .. } | Self::Wheel { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
