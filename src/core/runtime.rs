//=========================================================================
// Runtime
//
// Host-agnostic engine core driven one animation frame at a time.
//
// Responsibilities:
// - Drain the bounded raw-input queue filled by the platform host
// - Feed keys, cursor and gamepads to the input normalizers
// - Route pointer presses to the active scene
// - Advance the clock, then update and draw the scene stack
// - Own the pause flag and announce its changes
//
// Notes:
// The platform only ever talks to the runtime through the queue and
// `tick`, so the whole frame pipeline runs headless in tests.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::Cell;
use std::rc::Rc;

//=== External Crates =====================================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info, trace};

//=== Internal Modules ====================================================

use crate::core::config::EngineConfig;
use crate::core::game_loop::{FrameTime, GameLoop};
use crate::core::input::{ControllerManager, InputSystem, RawInput};
use crate::core::render::Canvas;
use crate::core::scene::Scenes;
use crate::core::signal::Signal;

//=== PauseState ==========================================================

/// Shared pause flag. Clones observe the same state.
#[derive(Clone, Default)]
pub struct PauseState {
    paused: Rc<Cell<bool>>,
    on_change: Signal<bool>,
}

impl PauseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// Updates the flag; emits `on_change` only when it actually flips.
    pub fn set_paused(&self, paused: bool) {
        if self.paused.replace(paused) != paused {
            info!("Game {}", if paused { "paused" } else { "resumed" });
            self.on_change.emit(&paused);
        }
    }

    pub fn on_change(&self) -> &Signal<bool> {
        &self.on_change
    }
}

impl std::fmt::Debug for PauseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PauseState")
            .field("paused", &self.paused.get())
            .finish()
    }
}

//=== Runtime =============================================================

pub struct Runtime {
    game_loop: GameLoop,
    input: InputSystem,
    scenes: Scenes,
    pause: PauseState,
    receiver: Receiver<RawInput>,
    sender: Sender<RawInput>,
    surface: Box<dyn Canvas>,
    width: u32,
    height: u32,
}

impl Runtime {
    //--- Construction -----------------------------------------------------

    pub fn new(config: &EngineConfig, surface: Box<dyn Canvas>) -> Self {
        let (sender, receiver) = bounded(config.channel_capacity);
        let controllers = ControllerManager::new();

        Self {
            game_loop: GameLoop::new(config.max_dt),
            input: InputSystem::new(controllers.clone(), config.axis_threshold, config.stick_deadzone),
            scenes: Scenes::new(controllers),
            pause: PauseState::new(),
            receiver,
            sender,
            surface,
            width: config.width,
            height: config.height,
        }
    }

    //--- tick() -----------------------------------------------------------
    //
    // One animation frame:
    //  1. Apply queued raw input
    //  2. Poll gamepads
    //  3. Advance the clock
    //  4. Update, draw and present the scene stack (skipped while paused)
    //
    pub fn tick(&mut self, now_ms: f64) -> FrameTime {
        self.drain_inputs();
        self.input.poll_gamepads();

        let frame = self.game_loop.tick(now_ms);
        if self.pause.is_paused() {
            return frame;
        }

        self.scenes.update(frame.dt, frame.time);
        self.surface.clear();
        self.scenes.draw(&mut *self.surface, frame.time);
        self.surface.present();
        frame
    }

    fn drain_inputs(&mut self) {
        while let Ok(input) = self.receiver.try_recv() {
            match input {
                RawInput::MouseButton { button, pressed: true } => {
                    let cursor = self.input.cursor();
                    let hit = self.scenes.pointer_down(cursor, button);
                    trace!(target: "platform::input", "Pointer {button:?} at {cursor} hit {hit:?}");
                }
                RawInput::MouseButton { pressed: false, .. } => {}
                RawInput::Resized { width, height } => self.resize(width, height),
                other => self.input.handle(&other),
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) || width == 0 || height == 0 {
            return;
        }
        debug!(target: "platform", "Resizing surface to {width}x{height}");
        self.width = width;
        self.height = height;
        self.surface.resize(width, height);
        self.scenes.resize(width, height);
    }

    //--- Pause ------------------------------------------------------------

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.pause.set_paused(paused);
    }

    pub fn pause(&self) -> &PauseState {
        &self.pause
    }

    //--- Accessors --------------------------------------------------------

    /// Producer end of the raw-input queue.
    pub fn sender(&self) -> Sender<RawInput> {
        self.sender.clone()
    }

    pub fn scenes(&self) -> &Scenes {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut Scenes {
        &mut self.scenes
    }

    pub fn input(&self) -> &InputSystem {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputSystem {
        &mut self.input
    }

    pub fn controllers(&self) -> &ControllerManager {
        self.input.controllers()
    }

    pub fn surface(&self) -> &dyn Canvas {
        &*self.surface
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn time(&self) -> f64 {
        self.game_loop.time()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
