//=========================================================================
// Keyboard Input
//=========================================================================
//
// Translates raw key events into controller events.
//
// Pipeline per event:
// ```text
// RawKeyEvent
//     ├──► raw signals (on_key_down / on_key_up / on_key_press)
//     │      every slot, or only the blocking context's slots
//     ├──► release of a key that sent down? → up with the same intents
//     ├──► blocked?                  → stop
//     ├──► ctrl / alt / meta held?   → stop
//     └──► key table lookup          → ControllerManager down / up / press
// ```
//
// A key that sent a down always sends its up with the same intents, even
// if input got blocked or a modifier went down in between.
//
// Raw signals serve text entry and key rebinding screens; the semantic
// pipeline serves gameplay. Blocking input lets a text field take the
// keyboard without movement keys leaking into the game.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::RefCell;
use std::collections::HashMap;

//=== External Crates =====================================================

use log::{debug, trace, warn};

//=== Internal Imports ====================================================

use super::controller_manager::ControllerManager;
use super::event::{
    ControllerEvent, ControllerEventType, ControllerFamily, KeyCode, KeyState, RawKeyEvent,
};
use super::intent::Intents;
use crate::core::signal::{Signal, SignalContext};

//=== Keyboard ============================================================

/// Keyboard normalizer.
pub struct Keyboard {
    controllers: ControllerManager,
    bindings: HashMap<KeyCode, Intents>,
    blocking: Option<SignalContext>,

    /// Keys whose down reached the manager, with the intents it carried.
    held: RefCell<HashMap<KeyCode, Intents>>,

    on_key_down: Signal<RawKeyEvent>,
    on_key_up: Signal<RawKeyEvent>,
    on_key_press: Signal<RawKeyEvent>,
}

impl Keyboard {
    /// Creates a keyboard with the default key table.
    pub fn new(controllers: ControllerManager) -> Self {
        Self {
            controllers,
            bindings: Self::default_bindings(),
            blocking: None,
            held: RefCell::new(HashMap::new()),
            on_key_down: Signal::new(),
            on_key_up: Signal::new(),
            on_key_press: Signal::new(),
        }
    }

    //--- default_bindings() -----------------------------------------------

    /// WASD / arrows for movement and menus, Enter / Space to confirm,
    /// Escape to back out.
    pub fn default_bindings() -> HashMap<KeyCode, Intents> {
        use KeyCode::*;

        HashMap::from([
            (KeyW, Intents::UP),
            (ArrowUp, Intents::UP),
            (KeyS, Intents::DOWN),
            (ArrowDown, Intents::DOWN),
            (KeyA, Intents::LEFT),
            (ArrowLeft, Intents::LEFT),
            (KeyD, Intents::RIGHT),
            (ArrowRight, Intents::RIGHT),
            (Enter, Intents::CONFIRM),
            (Space, Intents::CONFIRM),
            (Escape, Intents::ABORT | Intents::PAUSE),
            (KeyE, Intents::PLAYER_INTERACT),
            (KeyF, Intents::PLAYER_ACTION),
            (KeyR, Intents::PLAYER_RELOAD),
            (Digit1, Intents::PLAYER_DANCE_1),
            (Digit2, Intents::PLAYER_DANCE_2),
            (ShiftLeft, Intents::PLAYER_RUN),
            (ShiftRight, Intents::PLAYER_RUN),
            (KeyP, Intents::PAUSE),
        ])
    }

    //--- Bindings ---------------------------------------------------------

    /// Maps `key` to `intents`, replacing any previous mapping.
    pub fn bind(&mut self, key: KeyCode, intents: Intents) {
        if intents.is_empty() {
            self.unbind(key);
            return;
        }
        debug!(target: "platform::input", "Bound {key:?} to {intents:?}");
        self.bindings.insert(key, intents);
    }

    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    /// Intents mapped to `key`, empty for unmapped keys.
    pub fn intents_for(&self, key: KeyCode) -> Intents {
        self.bindings.get(&key).copied().unwrap_or_default()
    }

    //--- Blocking ---------------------------------------------------------

    /// Grants `context` exclusive access to raw key events and suspends
    /// intent dispatch.
    pub fn block_input(&mut self, context: &SignalContext) {
        if let Some(current) = &self.blocking {
            if current != context {
                warn!(target: "platform::input", "Keyboard already blocked, handing over to a new owner");
            }
        }
        self.blocking = Some(context.clone());
    }

    /// Releases the block if `context` holds it. Other contexts are ignored.
    pub fn unblock_input(&mut self, context: &SignalContext) {
        if self.blocking.as_ref() == Some(context) {
            self.blocking = None;
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocking.is_some()
    }

    //--- Raw Signals ------------------------------------------------------

    pub fn on_key_down(&self) -> &Signal<RawKeyEvent> {
        &self.on_key_down
    }

    pub fn on_key_up(&self) -> &Signal<RawKeyEvent> {
        &self.on_key_up
    }

    pub fn on_key_press(&self) -> &Signal<RawKeyEvent> {
        &self.on_key_press
    }

    //--- handle() ---------------------------------------------------------

    /// Processes one raw key event.
    pub fn handle(&self, event: &RawKeyEvent) {
        trace!(target: "platform::input", "Key {:?} {:?} (repeat: {})", event.code, event.state, event.repeat);

        match event.state {
            KeyState::Pressed => {
                self.emit_raw(&self.on_key_down, event);
                if event.produces_text() {
                    self.emit_raw(&self.on_key_press, event);
                }
            }
            KeyState::Released => self.emit_raw(&self.on_key_up, event),
        }

        if event.state == KeyState::Released {
            let held = self.held.borrow_mut().remove(&event.code);
            if let Some(intents) = held {
                self.emit_up(intents);
                return;
            }
        }

        if self.blocking.is_some() || event.modifiers.is_shortcut() {
            return;
        }

        let intents = self.intents_for(event.code);
        if intents.is_empty() {
            return;
        }

        let family = ControllerFamily::Keyboard;
        match event.state {
            KeyState::Pressed => {
                self.held.borrow_mut().insert(event.code, intents);
                let down = ControllerEvent::new(family, ControllerEventType::Down, intents, event.repeat);
                self.controllers.on_button_down().emit(&down);

                if event.produces_text() {
                    let press =
                        ControllerEvent::new(family, ControllerEventType::Press, intents, event.repeat);
                    self.controllers.on_button_press().emit(&press);
                }
            }
            KeyState::Released => self.emit_up(intents),
        }
    }

    fn emit_up(&self, intents: Intents) {
        let up = ControllerEvent::new(ControllerFamily::Keyboard, ControllerEventType::Up, intents, false);
        self.controllers.on_button_up().emit(&up);
    }

    fn emit_raw(&self, signal: &Signal<RawKeyEvent>, event: &RawKeyEvent) {
        match &self.blocking {
            Some(context) => signal.emit_to(context, event),
            None => signal.emit(event),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::Modifiers;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    fn collect(signal: &Signal<ControllerEvent>) -> Rc<RefCell<Vec<ControllerEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        signal.connect(move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    fn setup() -> (ControllerManager, Keyboard) {
        let manager = ControllerManager::new();
        let keyboard = Keyboard::new(manager.clone());
        (manager, keyboard)
    }

    //=====================================================================
    // Intent Dispatch
    //=====================================================================

    #[test]
    fn w_down_then_up_toggles_move_and_menu_up() {
        let (manager, keyboard) = setup();
        let downs = collect(manager.on_button_down());

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyW));

        assert_eq!(downs.borrow().len(), 1);
        let event = &downs.borrow()[0];
        assert_eq!(event.family(), ControllerFamily::Keyboard);
        assert_eq!(event.intents(), Intents::PLAYER_MOVE_UP | Intents::MENU_UP);
        assert!(manager.is_intent_active(Intents::PLAYER_MOVE_UP));
        assert!(manager.is_intent_active(Intents::MENU_UP));

        keyboard.handle(&RawKeyEvent::released(KeyCode::KeyW));

        assert!(manager.active_intents().is_empty());
    }

    #[test]
    fn ctrl_chord_emits_raw_but_no_intents() {
        let (manager, keyboard) = setup();
        let downs = collect(manager.on_button_down());
        let raw = Rc::new(RefCell::new(0));
        {
            let raw = Rc::clone(&raw);
            keyboard.on_key_down().connect(move |_| *raw.borrow_mut() += 1);
        }

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyR).with_modifiers(Modifiers::CTRL));

        assert_eq!(*raw.borrow(), 1);
        assert!(downs.borrow().is_empty());
        assert!(manager.active_intents().is_empty());
    }

    #[test]
    fn alt_held_w_emits_nothing_semantic() {
        let (manager, keyboard) = setup();
        let downs = collect(manager.on_button_down());
        let ups = collect(manager.on_button_up());

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyW).with_modifiers(Modifiers::ALT));
        keyboard.handle(&RawKeyEvent::released(KeyCode::KeyW).with_modifiers(Modifiers::ALT));

        assert!(downs.borrow().is_empty());
        assert!(ups.borrow().is_empty());
        assert!(manager.active_intents().is_empty());
    }

    #[test]
    fn release_under_modifier_still_clears_intent() {
        let (manager, keyboard) = setup();

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyD));
        assert!(manager.is_intent_active(Intents::PLAYER_MOVE_RIGHT));

        keyboard.handle(&RawKeyEvent::released(KeyCode::KeyD).with_modifiers(Modifiers::CTRL));

        assert!(manager.active_intents().is_empty());
    }

    #[test]
    fn unmapped_key_emits_nothing_semantic() {
        let (manager, keyboard) = setup();
        let downs = collect(manager.on_button_down());

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyZ));

        assert!(downs.borrow().is_empty());
    }

    #[test]
    fn text_key_emits_press_after_down() {
        let (manager, keyboard) = setup();
        let order = Rc::new(RefCell::new(Vec::new()));
        {
            let order = Rc::clone(&order);
            manager.on_button_down().connect(move |_| order.borrow_mut().push("down"));
        }
        {
            let order = Rc::clone(&order);
            manager.on_button_press().connect(move |_| order.borrow_mut().push("press"));
        }

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyE).with_text("e"));

        assert_eq!(*order.borrow(), vec!["down", "press"]);
    }

    #[test]
    fn rebinding_changes_table() {
        let (manager, mut keyboard) = setup();
        keyboard.bind(KeyCode::KeyZ, Intents::PLAYER_ACTION);
        keyboard.unbind(KeyCode::KeyF);

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyF));
        assert!(manager.active_intents().is_empty());

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyZ));
        assert!(manager.is_intent_active(Intents::PLAYER_ACTION));
    }

    //=====================================================================
    // Blocking
    //=====================================================================

    #[test]
    fn blocked_keyboard_routes_raw_events_to_owner_only() {
        let (manager, mut keyboard) = setup();
        let downs = collect(manager.on_button_down());
        let owner = SignalContext::new();
        let owner_hits = Rc::new(RefCell::new(0));
        let other_hits = Rc::new(RefCell::new(0));
        {
            let owner_hits = Rc::clone(&owner_hits);
            keyboard
                .on_key_down()
                .connect_with(&owner, move |_| *owner_hits.borrow_mut() += 1);
        }
        {
            let other_hits = Rc::clone(&other_hits);
            keyboard.on_key_down().connect(move |_| *other_hits.borrow_mut() += 1);
        }

        keyboard.block_input(&owner);
        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyW));

        assert_eq!(*owner_hits.borrow(), 1);
        assert_eq!(*other_hits.borrow(), 0);
        assert!(downs.borrow().is_empty());
    }

    #[test]
    fn release_while_blocked_still_clears_intent() {
        let (manager, mut keyboard) = setup();
        let owner = SignalContext::new();

        keyboard.handle(&RawKeyEvent::pressed(KeyCode::KeyW));
        keyboard.block_input(&owner);
        keyboard.handle(&RawKeyEvent::released(KeyCode::KeyW));

        assert!(manager.active_intents().is_empty());
    }

    #[test]
    fn unblock_with_foreign_context_is_ignored() {
        let (_, mut keyboard) = setup();
        let owner = SignalContext::new();
        keyboard.block_input(&owner);

        keyboard.unblock_input(&SignalContext::new());
        assert!(keyboard.is_blocked());

        keyboard.unblock_input(&owner);
        assert!(!keyboard.is_blocked());
    }
}
