//=========================================================================
// State Tracker
//=========================================================================
//
// Low-level input state tracking with per-frame delta tracking.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys/buttons held) → query
//
// Frame lifecycle: clear() → process_events() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, MouseButton};

//=== StateTracker ========================================================

/// Tracks persistent state (keys held) and per-frame deltas (keys pressed,
/// pointer motion, wheel).
///
/// Pressed keys are also recorded in arrival order so discrete commands
/// can be dispatched in the order the user produced them.
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    pointer_locked: bool,

    //--- Frame Deltas (reset each frame via clear()) --------------------
    keys_pressed_this_frame: HashSet<KeyCode>,
    keys_released_this_frame: HashSet<KeyCode>,
    mouse_buttons_pressed_this_frame: HashSet<MouseButton>,
    press_order: Vec<Press>,

    //--- Continuous Input (accumulated) ----------------------------------
    motion: Vec2,
    wheel: f32,
}

/// A discrete press in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Key(KeyCode),
    Button(MouseButton),
}

impl StateTracker {
    /// Creates a new state tracker with empty state.
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            mouse_buttons_down: HashSet::new(),
            pointer_locked: false,
            keys_pressed_this_frame: HashSet::new(),
            keys_released_this_frame: HashSet::new(),
            mouse_buttons_pressed_this_frame: HashSet::new(),
            press_order: Vec::new(),
            motion: Vec2::ZERO,
            wheel: 0.0,
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears frame-specific deltas (pressed/released flags, motion, wheel).
    pub(crate) fn clear(&mut self) {
        self.keys_pressed_this_frame.clear();
        self.keys_released_this_frame.clear();
        self.mouse_buttons_pressed_this_frame.clear();
        self.press_order.clear();
        self.motion = Vec2::ZERO;
        self.wheel = 0.0;
    }

    /// Processes input events, updating internal state.
    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Releases everything held. Used when the host loses focus or the
    /// session is torn down so no key stays stuck down.
    pub(crate) fn release_all(&mut self) {
        self.keys_down.clear();
        self.mouse_buttons_down.clear();
        self.clear();
    }

    //--- Internal Helpers -------------------------------------------------
    fn process_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown(key) => {
                // Only mark as pressed if it wasn't already down (key repeat)
                if self.keys_down.insert(key) {
                    self.keys_pressed_this_frame.insert(key);
                    self.press_order.push(Press::Key(key));
                }
            }

            InputEvent::KeyUp(key) => {
                if self.keys_down.remove(&key) {
                    self.keys_released_this_frame.insert(key);
                }
            }

            InputEvent::MouseButtonDown(button) => {
                if self.mouse_buttons_down.insert(button) {
                    self.mouse_buttons_pressed_this_frame.insert(button);
                    self.press_order.push(Press::Button(button));
                }
            }

            InputEvent::MouseButtonUp(button) => {
                self.mouse_buttons_down.remove(&button);
            }

            InputEvent::MouseMotion { dx, dy } => {
                self.motion += Vec2::new(dx, dy);
            }

            InputEvent::Wheel { delta } => {
                self.wheel += delta;
            }

            InputEvent::PointerLock(locked) => {
                self.pointer_locked = locked;
            }

            InputEvent::Unidentified => {}
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` if key transitioned UP → DOWN this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed_this_frame.contains(&key)
    }

    /// Returns `true` while key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` if key transitioned DOWN → UP this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released_this_frame.contains(&key)
    }

    /// Returns an iterator over all keys currently held.
    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    /// Like [`is_key_pressed`](Self::is_key_pressed) but for mouse buttons.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons_pressed_this_frame.contains(&button)
    }

    /// Like [`is_key_down`](Self::is_key_down) but for mouse buttons.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Accumulated pointer motion this frame (pixels).
    pub fn motion(&self) -> Vec2 {
        self.motion
    }

    /// Accumulated wheel delta this frame (notches).
    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    /// Whether the host currently holds pointer capture.
    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Discrete presses of this frame, in arrival order.
    pub fn presses(&self) -> &[Press] {
        &self.press_order
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
