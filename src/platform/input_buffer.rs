//=========================================================================
// Input Buffer
//
// Collects input events between two frame boundaries and turns them into
// one ordered batch for the core.
//
// Responsibilities:
// - Keep discrete inputs (keys, buttons, pointer lock) in arrival order
// - Deduplicate consecutive identical discrete inputs
// - Coalesce continuous inputs: motion deltas and wheel notches are
//   summed into a single event each
//
// Notes:
// The buffer is reused across frames; `drain()` keeps its allocations.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    motion: (f32, f32),
    wheel: f32,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        const DISCRETE_BASE: usize = 128;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            motion: (0.0, 0.0),
            wheel: 0.0,
        }
    }

    //--- Continuous Event Handling ---------------------------------------
    //
    // Motion and wheel accumulate until the next drain. Any other event
    // is treated as discrete.
    //
    pub fn push_continuous(&mut self, event: InputEvent) {
        match event {
            InputEvent::MouseMotion { dx, dy } => {
                self.motion.0 += dx;
                self.motion.1 += dy;
            }
            InputEvent::Wheel { delta } => self.wheel += delta,
            other => self.push_discrete(other),
        }
    }

    //--- Discrete Event Handling -----------------------------------------
    //
    // Duplicate consecutive events are ignored to prevent flooding.
    //
    pub fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns this frame's batch, discrete events first, or None if
    // nothing happened.
    //
    pub fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.is_empty() {
            return None;
        }

        let mut events = Vec::with_capacity(self.discrete.len() + 2);
        events.append(&mut self.discrete);

        let (dx, dy) = std::mem::take(&mut self.motion);
        if dx != 0.0 || dy != 0.0 {
            events.push(InputEvent::MouseMotion { dx, dy });
        }

        let wheel = std::mem::take(&mut self.wheel);
        if wheel != 0.0 {
            events.push(InputEvent::Wheel { delta: wheel });
        }

        Some(events)
    }

    //--- Utilities --------------------------------------------------------
    pub fn clear(&mut self) {
        self.discrete.clear();
        self.motion = (0.0, 0.0);
        self.wheel = 0.0;
    }

    pub fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.motion == (0.0, 0.0) && self.wheel == 0.0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;

    fn key_down(code: KeyCode) -> InputEvent {
        InputEvent::KeyDown(code)
    }

    fn motion(dx: f32, dy: f32) -> InputEvent {
        InputEvent::MouseMotion { dx, dy }
    }

    #[test]
    fn test_discrete_deduplication() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_discrete(key_down(KeyCode::KeyB));
        assert_eq!(buffer.discrete.len(), 2, "Duplicates should be ignored");
    }

    #[test]
    fn test_motion_is_summed() {
        let mut buffer = InputBuffer::new();

        buffer.push_continuous(motion(10.0, 1.0));
        buffer.push_continuous(motion(-4.0, 2.0));

        assert_eq!(buffer.drain(), Some(vec![motion(6.0, 3.0)]));
    }

    #[test]
    fn test_wheel_is_summed_after_discrete() {
        let mut buffer = InputBuffer::new();

        buffer.push_continuous(InputEvent::Wheel { delta: 1.0 });
        buffer.push_discrete(key_down(KeyCode::KeyE));
        buffer.push_continuous(InputEvent::Wheel { delta: 1.0 });

        assert_eq!(
            buffer.drain(),
            Some(vec![key_down(KeyCode::KeyE), InputEvent::Wheel { delta: 2.0 }])
        );
    }

    #[test]
    fn test_drain_clears_buffer() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_continuous(motion(5.0, 5.0));

        let events = buffer.drain().unwrap();
        assert_eq!(events.len(), 2);
        assert!(buffer.is_empty());
        assert_eq!(buffer.drain(), None);
    }

    #[test]
    fn test_cancelled_motion_sends_nothing() {
        let mut buffer = InputBuffer::new();
        buffer.push_continuous(motion(2.0, 0.0));
        buffer.push_continuous(motion(-2.0, 0.0));

        assert_eq!(buffer.drain(), None);
    }

    #[test]
    fn test_clear_does_not_deallocate() {
        let mut buffer = InputBuffer::new();

        for i in 0..256 {
            let key = if i % 2 == 0 { KeyCode::KeyA } else { KeyCode::KeyB };
            buffer.push_discrete(key_down(key));
        }
        let cap_before = buffer.discrete.capacity();

        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.discrete.capacity(), cap_before);
    }
}
