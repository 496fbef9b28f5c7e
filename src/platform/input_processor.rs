//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit events into the engine's raw input.
//
// Architecture:
//   Winit Events → InputProcessor → RawInput (engine type) → runtime queue
//
// Stateful modifier tracking: caches modifier state from ModifiersChanged
// events and applies it to every subsequent key event. Keys the engine
// does not name are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{KeyCode, KeyState, Modifiers, MouseButton, RawInput, RawKeyEvent};

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent events).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a Winit key event (filters unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<RawInput> {
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return None;
        };
        self.key_input(
            KeyCode::from(code),
            key_event.state,
            key_event.repeat,
            key_event.text.as_deref(),
        )
    }

    pub(crate) fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> RawInput {
        RawInput::MouseButton {
            button: MouseButton::from(button),
            pressed: state.is_pressed(),
        }
    }

    /// Cursor position in logical pixels.
    pub(crate) fn process_mouse_move(&self, x: f32, y: f32) -> RawInput {
        RawInput::MouseMoved { x, y }
    }

    //--- Internal Helpers -------------------------------------------------

    fn key_input(
        &self,
        code: KeyCode,
        state: ElementState,
        repeat: bool,
        text: Option<&str>,
    ) -> Option<RawInput> {
        if code == KeyCode::Unidentified {
            return None;
        }

        let state = match state {
            ElementState::Pressed => KeyState::Pressed,
            ElementState::Released => KeyState::Released,
        };
        // Winit also reports text on release; only presses carry it.
        let text = text
            .filter(|_| state == KeyState::Pressed)
            .map(str::to_owned);

        Some(RawInput::Key(RawKeyEvent {
            code,
            state,
            repeat,
            modifiers: self.current_modifiers,
            text,
        }))
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Option → Alt). The Super /
/// Command key becomes `meta`.
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        }
    }
}

/// Maps A-Z, 0-9, arrows, modifiers and common special keys. Everything
/// else becomes `KeyCode::Unidentified`.
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
            ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            _ => KeyCode::Unidentified,
        }
    }
}

/// Left/Right/Middle map directly; Back/Forward/Other → Other.
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

    fn make_modifiers(shift: bool, ctrl: bool, alt: bool, logo: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        if shift { state.insert(ModifiersState::SHIFT); }
        if ctrl { state.insert(ModifiersState::CONTROL); }
        if alt { state.insert(ModifiersState::ALT); }
        if logo { state.insert(ModifiersState::SUPER); }
        state
    }

    fn key(input: Option<RawInput>) -> RawKeyEvent {
        match input {
            Some(RawInput::Key(event)) => event,
            other => panic!("Expected key input, got {other:?}"),
        }
    }

    #[test]
    fn starts_with_no_modifiers() {
        let processor = InputProcessor::new();
        assert_eq!(processor.current_modifiers(), Modifiers::NONE);
    }

    #[test]
    fn update_modifiers_maps_super_to_meta() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(true, false, true, true));

        let mods = processor.current_modifiers();
        assert!(mods.shift && !mods.ctrl && mods.alt && mods.meta);
    }

    #[test]
    fn key_press_carries_modifiers_and_text() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(false, true, false, false));

        let event = key(processor.key_input(KeyCode::KeyS, ElementState::Pressed, false, Some("s")));

        assert_eq!(event.code, KeyCode::KeyS);
        assert!(event.is_pressed());
        assert!(event.modifiers.ctrl);
        assert_eq!(event.text.as_deref(), Some("s"));
    }

    #[test]
    fn key_release_drops_text() {
        let processor = InputProcessor::new();

        let event = key(processor.key_input(KeyCode::KeyA, ElementState::Released, false, Some("a")));

        assert_eq!(event.state, KeyState::Released);
        assert_eq!(event.text, None);
    }

    #[test]
    fn repeat_flag_is_kept() {
        let processor = InputProcessor::new();
        let event = key(processor.key_input(KeyCode::ArrowUp, ElementState::Pressed, true, None));
        assert!(event.repeat);
    }

    #[test]
    fn unidentified_keys_are_filtered() {
        let processor = InputProcessor::new();
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
        assert!(processor
            .key_input(KeyCode::Unidentified, ElementState::Pressed, false, None)
            .is_none());
    }

    #[test]
    fn mouse_button_press_and_release() {
        let processor = InputProcessor::new();

        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed),
            RawInput::MouseButton { button: MouseButton::Left, pressed: true }
        );
        assert_eq!(
            processor.process_mouse_button(WinitMouseButton::Back, ElementState::Released),
            RawInput::MouseButton { button: MouseButton::Other, pressed: false }
        );
    }

    #[test]
    fn mouse_move_correct() {
        let processor = InputProcessor::new();
        assert_eq!(
            processor.process_mouse_move(123.5, 456.7),
            RawInput::MouseMoved { x: 123.5, y: 456.7 }
        );
    }

    #[test]
    fn keycode_conversion() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftLeft), KeyCode::ShiftLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::Enter);
    }
}
