//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into engine InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (engine type) → InputBuffer
//
// Key auto-repeat is filtered here: the core sees one KeyDown per
// physical press. Unmapped keys (F-keys, numpad, media keys) return None.
// Pixel-based wheel deltas (touchpads) are converted to notches.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, MouseButton};

//=== InputProcessor ======================================================

/// Converts Winit events to engine InputEvents.
pub(crate) struct InputProcessor {
    /// Touchpad pixels per wheel notch.
    pixels_per_notch: f32,
}

impl InputProcessor {
    const DEFAULT_PIXELS_PER_NOTCH: f32 = 40.0;

    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            pixels_per_notch: Self::DEFAULT_PIXELS_PER_NOTCH,
        }
    }

    //--- Event Processing -------------------------------------------------

    /// Converts Winit KeyEvent to InputEvent (filters repeats and unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        if key_event.repeat {
            return None;
        }
        let key_code = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key_code, KeyCode::Unidentified) {
            return None;
        }

        Some(Self::key_input_event(key_code, key_event.state))
    }

    /// Converts Winit mouse button event to InputEvent.
    pub(crate) fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let mouse_button = MouseButton::from(button);

        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown(mouse_button),
            ElementState::Released => InputEvent::MouseButtonUp(mouse_button),
        }
    }

    /// Creates a raw pointer motion event from a device delta.
    pub(crate) fn process_mouse_motion(&self, dx: f64, dy: f64) -> InputEvent {
        InputEvent::MouseMotion {
            dx: dx as f32,
            dy: dy as f32,
        }
    }

    /// Converts a scroll delta to wheel notches (positive = away from user).
    pub(crate) fn process_wheel(&self, delta: MouseScrollDelta) -> Option<InputEvent> {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / self.pixels_per_notch,
        };

        (notches != 0.0).then_some(InputEvent::Wheel { delta: notches })
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_input_event(key: KeyCode, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyDown(key),
            ElementState::Released => InputEvent::KeyUp(key),
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, arrows, left Shift / Ctrl and common special keys.
/// Everything else returns `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Modifiers ----------------------------------------------------

            ShiftLeft => KeyCode::ShiftLeft,
            ControlLeft => KeyCode::ControlLeft,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons to engine buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn key_events_follow_element_state() {
        assert_eq!(
            InputProcessor::key_input_event(KeyCode::KeyS, ElementState::Pressed),
            InputEvent::KeyDown(KeyCode::KeyS)
        );
        assert_eq!(
            InputProcessor::key_input_event(KeyCode::KeyS, ElementState::Released),
            InputEvent::KeyUp(KeyCode::KeyS)
        );
    }

    #[test]
    fn keycode_conversion_filters_unidentified() {
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
        assert_eq!(KeyCode::from(WinitKeyCode::Numpad5), KeyCode::Unidentified);
    }

    #[test]
    fn keycode_conversion_covers_game_keys() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyW), KeyCode::KeyW);
        assert_eq!(KeyCode::from(WinitKeyCode::Digit4), KeyCode::Digit4);
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftLeft), KeyCode::ShiftLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::ControlLeft), KeyCode::ControlLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Right), MouseButton::Right);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }

    #[test]
    fn mouse_button_events() {
        let processor = InputProcessor::new();
        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed),
            InputEvent::MouseButtonDown(MouseButton::Left)
        );
        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Right, ElementState::Released),
            InputEvent::MouseButtonUp(MouseButton::Right)
        );
    }

    #[test]
    fn mouse_motion_keeps_raw_delta() {
        let processor = InputProcessor::new();
        assert_eq!(
            processor.process_mouse_motion(3.0, -2.5),
            InputEvent::MouseMotion { dx: 3.0, dy: -2.5 }
        );
    }

    #[test]
    fn wheel_lines_are_notches() {
        let processor = InputProcessor::new();
        assert_eq!(
            processor.process_wheel(MouseScrollDelta::LineDelta(0.0, -1.0)),
            Some(InputEvent::Wheel { delta: -1.0 })
        );
    }

    #[test]
    fn wheel_pixels_are_scaled() {
        let processor = InputProcessor::new();
        assert_eq!(
            processor.process_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0))),
            Some(InputEvent::Wheel { delta: 2.0 })
        );
    }

    #[test]
    fn horizontal_scroll_is_ignored() {
        let processor = InputProcessor::new();
        assert_eq!(processor.process_wheel(MouseScrollDelta::LineDelta(1.0, 0.0)), None);
    }
}
