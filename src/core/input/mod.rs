//=========================================================================
// Input System
//
// Owns the input normalizers and feeds them raw platform input.
//
// Responsibilities:
// - Route raw key events to the `Keyboard`
// - Route cursor motion to the `ControllerManager`
// - Track gamepad hot-plug and poll the `GamepadSource` once per frame
//
// Notes:
// Everything downstream of this system talks in `ControllerEvent`s and
// intents; nothing outside `platform` sees winit types.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod controller_manager;
pub mod event;
pub mod gamepad;
pub mod intent;
pub mod keyboard;

//=== Re-exports ==========================================================

pub use controller_manager::{ControllerManager, ControllerSprite, GamepadStyle};
pub use event::{
    ControllerEvent, ControllerEventType, ControllerFamily, KeyCode, KeyState, Modifiers,
    MouseButton, RawInput, RawKeyEvent,
};
pub use gamepad::{
    GamepadEvent, GamepadId, GamepadInput, GamepadMapping, GamepadPoll, GamepadSnapshot,
    GamepadSource, NoGamepads, StickMapping,
};
pub use intent::Intents;
pub use keyboard::Keyboard;

//=== External Crates =====================================================

use glam::Vec2;
use log::trace;

//=== InputSystem =========================================================
//
// Public-facing input API held by the runtime.
//
pub struct InputSystem {
    controllers: ControllerManager,
    keyboard: Keyboard,
    gamepads: GamepadInput,
    gamepad_source: Box<dyn GamepadSource>,
    cursor: Vec2,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------
    pub fn new(controllers: ControllerManager, axis_threshold: f32, stick_deadzone: f32) -> Self {
        Self {
            keyboard: Keyboard::new(controllers.clone()),
            gamepads: GamepadInput::new(controllers.clone())
                .with_threshold(axis_threshold)
                .with_deadzone(stick_deadzone),
            gamepad_source: Box::new(NoGamepads),
            cursor: Vec2::ZERO,
            controllers,
        }
    }

    //--- handle() ---------------------------------------------------------
    //
    // Applies one raw input. Pointer presses and resizes are not input
    // state and are left to the caller.
    //
    pub fn handle(&mut self, input: &RawInput) {
        match input {
            RawInput::Key(event) => self.keyboard.handle(event),
            RawInput::MouseMoved { x, y } => {
                self.cursor = Vec2::new(*x, *y);
                self.controllers.on_mouse_move().emit(&self.cursor);
            }
            RawInput::GamepadConnected { id, name } => self.gamepads.connect(*id, name),
            RawInput::GamepadDisconnected { id } => self.gamepads.disconnect(*id),
            RawInput::MouseButton { .. } | RawInput::Resized { .. } => {
                trace!(target: "platform::input", "Input system ignoring {input:?}");
            }
        }
    }

    //--- poll_gamepads() --------------------------------------------------
    //
    // Once per frame, before scenes update. Hot-plug events apply first so
    // a pad's first snapshot is not dropped.
    //
    pub fn poll_gamepads(&mut self) {
        let poll = self.gamepad_source.poll();
        for event in &poll.events {
            match event {
                GamepadEvent::Connected { id, name } => self.gamepads.connect(*id, name),
                GamepadEvent::Disconnected { id } => self.gamepads.disconnect(*id),
            }
        }
        if !poll.snapshots.is_empty() {
            self.gamepads.update(&poll.snapshots);
        }
    }

    pub fn set_gamepad_source(&mut self, source: Box<dyn GamepadSource>) {
        self.gamepad_source = source;
    }

    //--- Accessors --------------------------------------------------------

    pub fn controllers(&self) -> &ControllerManager {
        &self.controllers
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn gamepads(&self) -> &GamepadInput {
        &self.gamepads
    }

    pub fn gamepads_mut(&mut self) -> &mut GamepadInput {
        &mut self.gamepads
    }

    /// Last cursor position in screen pixels.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    struct ScriptedPad {
        frames: Vec<GamepadPoll>,
    }

    impl GamepadSource for ScriptedPad {
        fn poll(&mut self) -> GamepadPoll {
            if self.frames.is_empty() {
                GamepadPoll::default()
            } else {
                self.frames.remove(0)
            }
        }
    }

    fn pressed(id: GamepadId, button: usize) -> GamepadSnapshot {
        let mut buttons = vec![false; button + 1];
        buttons[button] = true;
        GamepadSnapshot { id, buttons, axes: Vec::new() }
    }

    fn system() -> InputSystem {
        InputSystem::new(ControllerManager::new(), 0.5, 0.25)
    }

    //=====================================================================
    // Routing
    //=====================================================================

    #[test]
    fn key_input_reaches_controller_manager() {
        let mut input = system();

        input.handle(&RawInput::Key(RawKeyEvent::pressed(KeyCode::Space)));

        assert!(input.controllers().is_intent_active(Intents::CONFIRM));
    }

    #[test]
    fn mouse_move_updates_cursor_and_family() {
        let mut input = system();
        input.handle(&RawInput::GamepadConnected {
            id: GamepadId(0),
            name: "pad".into(),
        });
        input.set_gamepad_source(Box::new(ScriptedPad {
            frames: vec![GamepadPoll {
                events: Vec::new(),
                snapshots: vec![pressed(GamepadId(0), 0)],
            }],
        }));
        input.poll_gamepads();
        assert_eq!(input.controllers().family(), ControllerFamily::Gamepad);

        input.handle(&RawInput::MouseMoved { x: 12.0, y: 8.0 });

        assert_eq!(input.cursor(), Vec2::new(12.0, 8.0));
        assert_eq!(input.controllers().family(), ControllerFamily::Keyboard);
    }

    #[test]
    fn source_hot_plug_reaches_gamepads() {
        let mut input = system();
        let id = GamepadId(2);
        input.set_gamepad_source(Box::new(ScriptedPad {
            frames: vec![
                GamepadPoll {
                    events: vec![GamepadEvent::Connected {
                        id,
                        name: "DualSense Wireless Controller".into(),
                    }],
                    snapshots: vec![pressed(id, 1)],
                },
                GamepadPoll {
                    events: vec![GamepadEvent::Disconnected { id }],
                    snapshots: Vec::new(),
                },
            ],
        }));

        input.poll_gamepads();
        assert!(input.gamepads().is_connected(id));
        assert!(input.controllers().is_intent_active(Intents::ABORT));
        assert_eq!(input.controllers().gamepad_style(), GamepadStyle::PlayStation);

        input.poll_gamepads();
        assert!(!input.gamepads().is_connected(id));
        assert!(!input.controllers().is_intent_active(Intents::ABORT));
    }

    #[test]
    fn gamepad_disconnect_is_routed() {
        let mut input = system();
        let id = GamepadId(3);
        input.handle(&RawInput::GamepadConnected { id, name: "pad".into() });
        assert!(input.gamepads().is_connected(id));

        input.handle(&RawInput::GamepadDisconnected { id });

        assert!(!input.gamepads().is_connected(id));
    }
}
