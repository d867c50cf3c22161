//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the engine's core thread.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  Game            │
//  │   ↓                      │    │   ↓              │
//  │  InputProcessor          │    │  InputSystem     │
//  │   ├─ keys / buttons      │    │   ↓              │
//  │   ├─ raw motion (locked) │    │  PlayerController│
//  │   └─ wheel notches       │    │  Items, Doors... │
//  │   ↓                      │    │                  │
//  │  InputBuffer             │    └──────────────────┘
//  │   ├─ discrete: ordered   │             ↑
//  │   └─ motion/wheel: summed│             │
//  │   ↓                      │             │
//  │  RedrawRequested (flush) │             │
//  │   ↓                      │             │
//  │  Channel ────────────────┼─────────────┘
//  └──────────────────────────┘    HostEvent
// ```
//
// Pointer lock:
// - A click into the window grabs and hides the cursor (Locked, falling
//   back to Confined where locking is unsupported)
// - Losing focus releases it
// - Both are reported to the core as `PointerLock` input events; look
//   motion is only forwarded while locked
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::error::PlatformError;
use crate::core::input::InputEvent;
use crate::core::platform_bridge::HostEvent;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window manager and input event aggregator.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and sends
/// batched input to the core thread.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Buffers input until `RedrawRequested`.
    buffer: InputBuffer,

    event_sender: Sender<HostEvent>,

    input_processor: InputProcessor,

    pointer_locked: bool,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates a new platform instance with the given event sender.
    ///
    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub fn new(event_sender: Sender<HostEvent>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
            pointer_locked: false,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop.run_app(&mut self).map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Flushes buffered input to the core thread.
    ///
    /// If the channel is disconnected (core thread exited), the batch is
    /// dropped with a warning so the window can still be closed.
    fn flush_input_buffer(&mut self) {
        if let Some(batch) = self.buffer.drain() {
            let count = batch.len();
            trace!(target: "platform::input", "Flushing {} events", count);

            if self.event_sender.send(HostEvent::Inputs(batch)).is_err() {
                warn!(target: "platform::input", "Channel disconnected, dropping {} events", count);
            }
        }
    }

    /// Grabs and hides the cursor for mouse-look.
    fn lock_pointer(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.pointer_locked {
            return;
        }

        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.set_pointer_locked(true);
            }
            Err(e) => warn!(target: "platform::input", "Pointer lock unavailable: {}", e),
        }
    }

    fn unlock_pointer(&mut self) {
        if !self.pointer_locked {
            return;
        }
        if let Some(window) = &self.window {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!(target: "platform::input", "Pointer release failed: {}", e);
            }
            window.set_cursor_visible(true);
        }
        self.set_pointer_locked(false);
    }

    fn set_pointer_locked(&mut self, locked: bool) {
        debug!(target: "platform::input", "Pointer lock: {}", locked);
        self.pointer_locked = locked;
        self.buffer.push_discrete(InputEvent::PointerLock(locked));
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Haunt Engine")
            .with_inner_size(LogicalSize::new(1280, 720));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.send(HostEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.flush_input_buffer();
                let _ = self.event_sender.send(HostEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Focused(false) => self.unlock_pointer(),

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(&key_event) {
                    self.buffer.push_discrete(event);
                } else {
                    trace!(target: "platform::input", "Unmapped or repeated key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if state == ElementState::Pressed && !self.pointer_locked {
                    self.lock_pointer();
                }
                let event = self.input_processor.process_mouse_button(button, state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(event) = self.input_processor.process_wheel(delta) {
                    self.buffer.push_continuous(event);
                }
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: flush all buffered input
                self.flush_input_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    /// Raw device motion, unaffected by cursor acceleration or clamping.
    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.pointer_locked {
                let event = self.input_processor.process_mouse_motion(dx, dy);
                self.buffer.push_continuous(event);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crossbeam_channel::unbounded;

    #[test]
    fn platform_creation() {
        let (tx, _rx) = unbounded();
        let platform = Platform::new(tx);
        assert!(platform.window().is_none(), "Window should be created lazily");
        assert!(!platform.pointer_locked);
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx);

        platform.flush_input_buffer();

        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn flush_sends_buffered_events() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx);

        platform.buffer.push_discrete(InputEvent::KeyDown(KeyCode::Space));
        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(HostEvent::Inputs(batch)) => {
                assert_eq!(batch, vec![InputEvent::KeyDown(KeyCode::Space)]);
            }
            other => panic!("Expected Inputs event, got {:?}", other),
        }
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx);

        platform.buffer.push_discrete(InputEvent::KeyDown(KeyCode::Space));
        drop(rx);

        // Should not panic, just log warning
        platform.flush_input_buffer();
    }

    #[test]
    fn pointer_lock_changes_are_reported() {
        let (tx, rx) = unbounded();
        let mut platform = Platform::new(tx);

        platform.set_pointer_locked(true);
        platform.unlock_pointer();
        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(HostEvent::Inputs(batch)) => assert_eq!(
                batch,
                vec![InputEvent::PointerLock(true), InputEvent::PointerLock(false)]
            ),
            other => panic!("Expected Inputs event, got {:?}", other),
        }
    }

    #[test]
    fn lock_without_window_is_noop() {
        let (tx, _rx) = unbounded();
        let mut platform = Platform::new(tx);

        platform.lock_pointer();

        assert!(!platform.pointer_locked);
        assert!(platform.buffer.is_empty());
    }
}
