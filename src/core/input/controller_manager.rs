//=========================================================================
// Controller Manager
//=========================================================================
//
// Shared hub for normalized controller events.
//
// Responsibilities:
// - Host the signals every input normalizer emits on and gameplay listens to
// - Track which intents are currently held across all devices
// - Track which device family is currently in use, for UI hints
//
// Architecture:
// ```text
// Keyboard ──┐                           ┌──► gameplay slots
//            ├──► on_button_down/up/... ─┤
// Gamepad  ──┘                           └──► internal slots
//                                               ├─ active intents (OR / AND-NOT)
//                                               └─ current family → on_family_change
// ```
//
// The manager is a cloneable handle passed to whoever needs it. All
// clones share the same signals and state.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

//=== External Crates =====================================================

use glam::Vec2;
use log::debug;

//=== Internal Imports ====================================================

use super::event::{ControllerEvent, ControllerFamily};
use super::intent::Intents;
use crate::core::signal::Signal;

//=== GamepadStyle ========================================================

/// Button glyph family of the connected gamepad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamepadStyle {
    #[default]
    Xbox,
    PlayStation,
}

impl GamepadStyle {
    /// Guesses the glyph family from a gamepad's reported name.
    ///
    /// Sony controllers report vendor id `054c` or a product name; anything
    /// else gets Xbox glyphs.
    pub fn from_gamepad_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let sony = ["054c", "playstation", "dualshock", "dualsense"];
        if sony.iter().any(|marker| name.contains(marker)) {
            Self::PlayStation
        } else {
            Self::Xbox
        }
    }
}

/// Which glyph set UI hints should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSprite {
    Keyboard,
    Xbox,
    PlayStation,
}

//=== ControllerManager ===================================================

struct ControllerState {
    active_intents: Cell<Intents>,
    family: Cell<ControllerFamily>,
    style: Cell<GamepadStyle>,
}

/// Input service shared by normalizers and gameplay.
#[derive(Clone)]
pub struct ControllerManager {
    state: Rc<ControllerState>,
    on_button_down: Signal<ControllerEvent>,
    on_button_up: Signal<ControllerEvent>,
    on_button_press: Signal<ControllerEvent>,
    on_drag: Signal<ControllerEvent>,
    on_mouse_move: Signal<Vec2>,
    on_family_change: Signal<ControllerFamily>,
}

impl ControllerManager {
    pub fn new() -> Self {
        let manager = Self {
            state: Rc::new(ControllerState {
                active_intents: Cell::new(Intents::empty()),
                family: Cell::new(ControllerFamily::Keyboard),
                style: Cell::new(GamepadStyle::Xbox),
            }),
            on_button_down: Signal::new(),
            on_button_up: Signal::new(),
            on_button_press: Signal::new(),
            on_drag: Signal::new(),
            on_mouse_move: Signal::new(),
            on_family_change: Signal::new(),
        };
        manager.wire_internal_slots();
        manager
    }

    //--- wire_internal_slots() --------------------------------------------

    fn wire_internal_slots(&self) {
        let state = Rc::clone(&self.state);
        let family_change = self.on_family_change.clone();
        self.on_button_down.connect(move |event| {
            let active = state.active_intents.get() | event.intents();
            state.active_intents.set(active);
            switch_family(&state, &family_change, event.family());
        });

        let state = Rc::clone(&self.state);
        self.on_button_up.connect(move |event| {
            let active = state.active_intents.get() - event.intents();
            state.active_intents.set(active);
        });

        let state = Rc::clone(&self.state);
        let family_change = self.on_family_change.clone();
        self.on_drag.connect(move |_| {
            switch_family(&state, &family_change, ControllerFamily::Gamepad);
        });

        let state = Rc::clone(&self.state);
        let family_change = self.on_family_change.clone();
        self.on_mouse_move.connect(move |_| {
            switch_family(&state, &family_change, ControllerFamily::Keyboard);
        });
    }

    //--- Signals ----------------------------------------------------------

    pub fn on_button_down(&self) -> &Signal<ControllerEvent> {
        &self.on_button_down
    }

    pub fn on_button_up(&self) -> &Signal<ControllerEvent> {
        &self.on_button_up
    }

    pub fn on_button_press(&self) -> &Signal<ControllerEvent> {
        &self.on_button_press
    }

    pub fn on_drag(&self) -> &Signal<ControllerEvent> {
        &self.on_drag
    }

    /// Cursor position in screen pixels.
    pub fn on_mouse_move(&self) -> &Signal<Vec2> {
        &self.on_mouse_move
    }

    pub fn on_family_change(&self) -> &Signal<ControllerFamily> {
        &self.on_family_change
    }

    //--- State ------------------------------------------------------------

    /// Union of intents whose down was seen without a matching up.
    pub fn active_intents(&self) -> Intents {
        self.state.active_intents.get()
    }

    /// `true` if any of `intents` is currently held.
    pub fn is_intent_active(&self, intents: Intents) -> bool {
        self.active_intents().intersects(intents)
    }

    pub fn family(&self) -> ControllerFamily {
        self.state.family.get()
    }

    pub fn gamepad_style(&self) -> GamepadStyle {
        self.state.style.get()
    }

    pub fn set_gamepad_style(&self, style: GamepadStyle) {
        if self.state.style.replace(style) != style {
            debug!("Gamepad glyph style set to {style:?}");
        }
    }

    /// Glyph set matching the family currently in use.
    pub fn controller_sprite(&self) -> ControllerSprite {
        match (self.family(), self.gamepad_style()) {
            (ControllerFamily::Keyboard, _) => ControllerSprite::Keyboard,
            (ControllerFamily::Gamepad, GamepadStyle::Xbox) => ControllerSprite::Xbox,
            (ControllerFamily::Gamepad, GamepadStyle::PlayStation) => ControllerSprite::PlayStation,
        }
    }
}

//--- switch_family() -----------------------------------------------------

fn switch_family(
    state: &ControllerState,
    signal: &Signal<ControllerFamily>,
    family: ControllerFamily,
) {
    if state.family.replace(family) != family {
        debug!("Controller family changed to {family:?}");
        signal.emit(&family);
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for ControllerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ControllerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerManager")
            .field("active_intents", &self.active_intents())
            .field("family", &self.family())
            .field("style", &self.gamepad_style())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::ControllerEventType;
    use std::cell::RefCell;

    //--- Test Helpers -----------------------------------------------------

    fn event(family: ControllerFamily, kind: ControllerEventType, intents: Intents) -> ControllerEvent {
        ControllerEvent::new(family, kind, intents, false)
    }

    //=====================================================================
    // Active Intents
    //=====================================================================

    #[test]
    fn down_adds_and_up_removes_intents() {
        let manager = ControllerManager::new();
        let up = Intents::PLAYER_MOVE_UP | Intents::MENU_UP;

        manager
            .on_button_down()
            .emit(&event(ControllerFamily::Keyboard, ControllerEventType::Down, up));
        assert!(manager.is_intent_active(Intents::MENU_UP));

        manager
            .on_button_down()
            .emit(&event(ControllerFamily::Keyboard, ControllerEventType::Down, Intents::PLAYER_RUN));
        manager
            .on_button_up()
            .emit(&event(ControllerFamily::Keyboard, ControllerEventType::Up, up));

        assert_eq!(manager.active_intents(), Intents::PLAYER_RUN);
    }

    #[test]
    fn clones_share_state() {
        let manager = ControllerManager::new();
        let other = manager.clone();

        manager
            .on_button_down()
            .emit(&event(ControllerFamily::Keyboard, ControllerEventType::Down, Intents::CONFIRM));

        assert!(other.is_intent_active(Intents::CONFIRM));
    }

    //=====================================================================
    // Family Tracking
    //=====================================================================

    #[test]
    fn gamepad_down_switches_family_once() {
        let manager = ControllerManager::new();
        let changes = Rc::new(RefCell::new(Vec::new()));
        {
            let changes = Rc::clone(&changes);
            manager.on_family_change().connect(move |f| changes.borrow_mut().push(*f));
        }

        let down = event(ControllerFamily::Gamepad, ControllerEventType::Down, Intents::CONFIRM);
        manager.on_button_down().emit(&down);
        manager.on_button_down().emit(&down);

        assert_eq!(manager.family(), ControllerFamily::Gamepad);
        assert_eq!(*changes.borrow(), vec![ControllerFamily::Gamepad]);
    }

    #[test]
    fn mouse_move_switches_back_to_keyboard() {
        let manager = ControllerManager::new();
        manager.on_drag().emit(&ControllerEvent::drag(
            ControllerFamily::Gamepad,
            Intents::STICK_LEFT,
            Vec2::X,
        ));
        assert_eq!(manager.family(), ControllerFamily::Gamepad);

        manager.on_mouse_move().emit(&Vec2::new(3.0, 4.0));

        assert_eq!(manager.family(), ControllerFamily::Keyboard);
    }

    //=====================================================================
    // Glyph Style
    //=====================================================================

    #[test]
    fn style_detection_from_name() {
        assert_eq!(
            GamepadStyle::from_gamepad_name("Sony DualSense (Vendor: 054c Product: 0ce6)"),
            GamepadStyle::PlayStation
        );
        assert_eq!(
            GamepadStyle::from_gamepad_name("Xbox Wireless Controller (Vendor: 045e)"),
            GamepadStyle::Xbox
        );
    }

    #[test]
    fn controller_sprite_follows_family_and_style() {
        let manager = ControllerManager::new();
        manager.set_gamepad_style(GamepadStyle::PlayStation);
        assert_eq!(manager.controller_sprite(), ControllerSprite::Keyboard);

        manager
            .on_button_down()
            .emit(&event(ControllerFamily::Gamepad, ControllerEventType::Down, Intents::ABORT));

        assert_eq!(manager.controller_sprite(), ControllerSprite::PlayStation);
    }
}
