//=========================================================================
// Platform Subsystem
//
// Hosts the runtime inside a Winit event loop.
//
// Architecture:
// ```text
//  Main Thread
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ↓                                          │
//  │  InputProcessor                              │
//  │   ├─ Converts Winit → RawInput               │
//  │   └─ Tracks modifiers                        │
//  │   ↓                                          │
//  │  Bounded queue (crossbeam) ──► Runtime       │
//  │                                 ↑            │
//  │  RedrawRequested ── tick(now) ──┘            │
//  │   ↓                                          │
//  │  request_redraw()  (next animation frame)    │
//  └──────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: queued input is applied at the
//   start of the next `Runtime::tick`, in arrival order
// - **Sticky modifiers**: modifier state persists across events until
//   explicitly changed (matches platform behavior)
// - **Full queue drops input**: if the runtime falls behind, new input is
//   dropped with a warning instead of blocking the event loop
// - **Logical pixels**: cursor and size are converted with the window's
//   scale factor before they reach the runtime
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== Standard Library ====================================================

use std::time::Instant;

//=== External Crates =====================================================

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::config::EngineConfig;
use crate::core::error::EngineResult;
use crate::core::input::RawInput;
use crate::core::runtime::Runtime;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window owner and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(runtime, config)`
/// 2. **Execution**: `platform.run()` - blocks in the event loop
/// 3. **Frames**: every `RedrawRequested` ticks the runtime and requests
///    the next redraw
/// 4. **Shutdown**: user closes window → event loop exits → `run` returns
///
/// This type is NOT Send/Sync - it must remain on the main thread.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    runtime: Runtime,

    /// Producer end of the runtime's input queue.
    input_sender: Sender<RawInput>,

    input_processor: InputProcessor,

    title: String,
    size: LogicalSize<u32>,
    started: Instant,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet - that happens lazily in `resumed()`.
    pub fn new(runtime: Runtime, config: &EngineConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            input_sender: runtime.sender(),
            runtime,
            input_processor: InputProcessor::new(),
            title: config.title.clone(),
            size: LogicalSize::new(config.width, config.height),
            started: Instant::now(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EventLoop`](crate::core::error::EngineError)
    /// if the event loop cannot be created or fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub fn run(mut self) -> EngineResult<()> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new()?;
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    //--- Internal Helpers -------------------------------------------------

    /// Queues one input for the runtime. Never blocks.
    fn send_input(&self, input: RawInput) {
        match self.input_sender.try_send(input) {
            Ok(()) => {}
            Err(TrySendError::Full(input)) => {
                warn!(target: "platform::input", "Input queue full, dropping {input:?}");
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(target: "platform::input", "Input queue disconnected");
            }
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, Window::scale_factor)
    }

    /// Milliseconds since the platform started; the runtime's frame clock.
    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
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
            .with_title(self.title.clone())
            .with_inner_size(self.size);

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
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(self.scale_factor());
                let input = self.input_processor.process_mouse_move(logical.x, logical.y);
                self.send_input(input);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.process_key_event(key_event) {
                    Some(input) => self.send_input(input),
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let input = self.input_processor.process_mouse_button(*button, *state);
                self.send_input(input);
            }

            WindowEvent::Resized(size) => {
                let logical = size.to_logical::<u32>(self.scale_factor());
                self.send_input(RawInput::Resized {
                    width: logical.width,
                    height: logical.height,
                });
            }

            WindowEvent::RedrawRequested => {
                let now = self.now_ms();
                self.runtime.tick(now);

                // Next animation frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, RawKeyEvent};
    use crate::core::render::RecordingCanvas;

    fn platform(capacity: usize) -> Platform {
        let config = EngineConfig {
            channel_capacity: capacity,
            ..EngineConfig::default()
        };
        let runtime = Runtime::new(&config, Box::new(RecordingCanvas::new(config.width, config.height)));
        Platform::new(runtime, &config)
    }

    #[test]
    fn platform_creation() {
        let platform = platform(4);
        assert!(platform.window().is_none(), "Window should be created lazily");
        assert_eq!(platform.title, "Lantern");
        assert_eq!(platform.size, LogicalSize::new(480, 270));
    }

    #[test]
    fn queued_input_reaches_runtime_on_tick() {
        let mut platform = platform(4);

        platform.send_input(RawInput::Key(RawKeyEvent::pressed(KeyCode::KeyW)));
        platform.runtime.tick(0.0);

        assert!(!platform.runtime.controllers().active_intents().is_empty());
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let platform = platform(1);

        platform.send_input(RawInput::MouseMoved { x: 1.0, y: 1.0 });
        platform.send_input(RawInput::MouseMoved { x: 2.0, y: 2.0 });

        assert_eq!(platform.input_sender.len(), 1);
    }

    #[test]
    fn scale_factor_defaults_to_one_without_window() {
        assert_eq!(platform(4).scale_factor(), 1.0);
    }
}
