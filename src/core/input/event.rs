//=========================================================================
// Input Event Types
//
// Raw device vocabulary and the normalized controller event.
//
// Two layers live here:
// - Raw events (`RawKeyEvent`, `RawInput`) describing what the platform
//   reported: physical keys, cursor motion, gamepad hot-plug.
// - `ControllerEvent`, the device-agnostic event carried by the
//   controller manager's signals, expressed in intents.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    RawInput (this module, via crossbeam channel)
//         ↓
//    Keyboard / GamepadInput (normalizers)
//         ↓
//    ControllerEvent (this module)
//         ↓
//    ControllerManager signals → gameplay
// ```
//
//=========================================================================

//=== External Crates =====================================================

use glam::Vec2;

//=== Internal Imports ====================================================

use super::gamepad::GamepadId;
use super::intent::Intents;

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
/// `KeyW` is always the same physical key regardless of layout, so WASD
/// movement stays in place on AZERTY keyboards.
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

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Fallback for keys the input layer does not name.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state at the time of a key event.
///
/// Left/right variants are not distinguished. `meta` is the Windows /
/// Command / Super key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Self = Self { shift: true, ..Self::NONE };
    pub const CTRL: Self = Self { ctrl: true, ..Self::NONE };
    pub const ALT: Self = Self { alt: true, ..Self::NONE };
    pub const META: Self = Self { meta: true, ..Self::NONE };

    /// `true` if a held modifier turns the key into a shortcut.
    ///
    /// Shortcut chords (Ctrl+R, Cmd+W, ...) belong to the host and never
    /// produce gameplay intents. Shift alone does not count.
    pub fn is_shortcut(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

//=== RawKeyEvent =========================================================

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

/// A keyboard event as reported by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct RawKeyEvent {
    pub code: KeyCode,
    pub state: KeyState,

    /// `true` for OS auto-repeat while the key is held.
    pub repeat: bool,

    pub modifiers: Modifiers,

    /// Text produced by the key, if any. A pressed key with text also
    /// generates a press event.
    pub text: Option<String>,
}

impl RawKeyEvent {
    /// Key-down without text.
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            code,
            state: KeyState::Pressed,
            repeat: false,
            modifiers: Modifiers::NONE,
            text: None,
        }
    }

    /// Key-up.
    pub fn released(code: KeyCode) -> Self {
        Self {
            state: KeyState::Released,
            ..Self::pressed(code)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn is_pressed(&self) -> bool {
        self.state == KeyState::Pressed
    }

    /// `true` when this key-down should also produce a press event.
    pub fn produces_text(&self) -> bool {
        self.is_pressed() && self.text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

//=== RawInput ============================================================

/// Item of the platform → runtime input queue.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Key(RawKeyEvent),

    /// Cursor position in logical screen pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    MouseButton { button: MouseButton, pressed: bool },

    GamepadConnected { id: GamepadId, name: String },

    GamepadDisconnected { id: GamepadId },

    Resized { width: u32, height: u32 },
}

//=== ControllerFamily ====================================================

/// Broad class of the device currently driving the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControllerFamily {
    #[default]
    Keyboard,
    Gamepad,
}

//=== ControllerEventType =================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerEventType {
    Down,
    Up,
    Press,
    Drag,
}

//=== ControllerEvent =====================================================

/// Device-agnostic input event expressed in intents.
///
/// Immutable once constructed. `direction` is only present on drag
/// events and carries the normalized stick vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerEvent {
    family: ControllerFamily,
    event_type: ControllerEventType,
    intents: Intents,
    repeat: bool,
    direction: Option<Vec2>,
}

impl ControllerEvent {
    pub fn new(
        family: ControllerFamily,
        event_type: ControllerEventType,
        intents: Intents,
        repeat: bool,
    ) -> Self {
        Self {
            family,
            event_type,
            intents,
            repeat,
            direction: None,
        }
    }

    /// Analog drag event carrying a direction vector.
    pub fn drag(family: ControllerFamily, intents: Intents, direction: Vec2) -> Self {
        Self {
            family,
            event_type: ControllerEventType::Drag,
            intents,
            repeat: false,
            direction: Some(direction),
        }
    }

    pub fn family(&self) -> ControllerFamily {
        self.family
    }

    pub fn event_type(&self) -> ControllerEventType {
        self.event_type
    }

    pub fn intents(&self) -> Intents {
        self.intents
    }

    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    pub fn direction(&self) -> Option<Vec2> {
        self.direction
    }

    /// `true` if the event carries any of `intents`.
    pub fn has_intent(&self, intents: Intents) -> bool {
        self.intents.intersects(intents)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
