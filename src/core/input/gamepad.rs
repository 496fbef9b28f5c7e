//=========================================================================
// Gamepad Input
//=========================================================================
//
// Polls gamepad snapshots and emits controller events.
//
// Responsibilities:
// - Track connected gamepads and their last observed state
// - Edge-detect digital buttons into down / up events
// - Split each axis into two virtual buttons (negative / positive side)
// - Turn stick axis pairs into deadzone-normalized drag vectors
//
// Polling model:
// ```text
// GamepadSource::poll() ──► GamepadPoll
//                             ├─ events    ──► connect() / disconnect()
//                             └─ snapshots ──► GamepadInput::update()
//                                                ├─ buttons  → down / up
//                                                ├─ axes     → virtual down / up
//                                                └─ sticks   → drag (on change)
// ```
//
// Default mappings follow the W3C "standard" gamepad layout.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashMap;

//=== External Crates =====================================================

use glam::Vec2;
use log::{info, warn};

//=== Internal Imports ====================================================

use super::controller_manager::{ControllerManager, GamepadStyle};
use super::event::{ControllerEvent, ControllerEventType, ControllerFamily};
use super::intent::Intents;

//=== Defaults ============================================================

pub const DEFAULT_AXIS_THRESHOLD: f32 = 0.5;
pub const DEFAULT_STICK_DEADZONE: f32 = 0.25;

//=== GamepadId / Snapshot ================================================

/// Platform-assigned gamepad slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GamepadId(pub u32);

/// State of one gamepad at poll time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GamepadSnapshot {
    pub id: GamepadId,
    pub buttons: Vec<bool>,
    pub axes: Vec<f32>,
}

/// Hot-plug change reported by a source.
#[derive(Debug, Clone, PartialEq)]
pub enum GamepadEvent {
    Connected { id: GamepadId, name: String },
    Disconnected { id: GamepadId },
}

/// Result of one source poll. Events apply before snapshots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GamepadPoll {
    pub events: Vec<GamepadEvent>,
    pub snapshots: Vec<GamepadSnapshot>,
}

//=== GamepadSource =======================================================

/// Supplier of hot-plug events and per-frame gamepad snapshots.
pub trait GamepadSource {
    fn poll(&mut self) -> GamepadPoll;
}

/// Source for hosts without gamepad support.
#[derive(Debug, Default)]
pub struct NoGamepads;

impl GamepadSource for NoGamepads {
    fn poll(&mut self) -> GamepadPoll {
        GamepadPoll::default()
    }
}

//=== GamepadMapping ======================================================

/// Axis pair read as one analog stick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickMapping {
    pub x_axis: usize,
    pub y_axis: usize,
    pub intents: Intents,
}

/// Intents produced by buttons, axis sides and sticks.
#[derive(Debug, Clone, PartialEq)]
pub struct GamepadMapping {
    /// Indexed by button number.
    pub buttons: Vec<Intents>,

    /// Indexed by axis number: (negative side, positive side).
    pub axes: Vec<(Intents, Intents)>,

    pub sticks: Vec<StickMapping>,
}

impl GamepadMapping {
    pub fn button(&self, index: usize) -> Intents {
        self.buttons.get(index).copied().unwrap_or_default()
    }

    pub fn axis(&self, index: usize) -> (Intents, Intents) {
        self.axes.get(index).copied().unwrap_or_default()
    }
}

impl Default for GamepadMapping {
    /// W3C standard layout: face buttons 0-3, bumpers 4-5, triggers 6-7,
    /// select/start 8-9, stick clicks 10-11, d-pad 12-15.
    fn default() -> Self {
        let none = Intents::empty();
        Self {
            buttons: vec![
                Intents::CONFIRM | Intents::PLAYER_INTERACT, // A / Cross
                Intents::ABORT,                              // B / Circle
                Intents::PLAYER_ACTION,                      // X / Square
                Intents::PLAYER_RELOAD,                      // Y / Triangle
                Intents::PLAYER_DANCE_1,                     // LB
                Intents::PLAYER_DANCE_2,                     // RB
                none,                                        // LT
                Intents::PLAYER_RUN,                         // RT
                none,                                        // Select
                Intents::PAUSE,                              // Start
                none,                                        // L3
                none,                                        // R3
                Intents::UP,
                Intents::DOWN,
                Intents::LEFT,
                Intents::RIGHT,
            ],
            axes: vec![(Intents::LEFT, Intents::RIGHT), (Intents::UP, Intents::DOWN)],
            sticks: vec![
                StickMapping { x_axis: 0, y_axis: 1, intents: Intents::STICK_LEFT },
                StickMapping { x_axis: 2, y_axis: 3, intents: Intents::STICK_RIGHT },
            ],
        }
    }
}

//=== GamepadState ========================================================

#[derive(Debug, Clone, Copy, Default)]
struct AxisButtons {
    negative: bool,
    positive: bool,
}

#[derive(Debug, Default)]
struct GamepadState {
    name: String,
    buttons: Vec<bool>,
    axes: Vec<AxisButtons>,
    sticks: Vec<Vec2>,
}

//=== GamepadInput ========================================================

/// Gamepad normalizer.
pub struct GamepadInput {
    controllers: ControllerManager,
    mapping: GamepadMapping,
    threshold: f32,
    deadzone: f32,
    gamepads: HashMap<GamepadId, GamepadState>,
}

impl GamepadInput {
    pub fn new(controllers: ControllerManager) -> Self {
        Self {
            controllers,
            mapping: GamepadMapping::default(),
            threshold: DEFAULT_AXIS_THRESHOLD,
            deadzone: DEFAULT_STICK_DEADZONE,
            gamepads: HashMap::new(),
        }
    }

    /// Sets the virtual-button trigger threshold.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is not within `(0, 1)`.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        assert!(
            threshold > 0.0 && threshold < 1.0,
            "Axis threshold must be within (0, 1)"
        );
        self.threshold = threshold;
        self
    }

    /// Sets the stick deadzone.
    ///
    /// # Panics
    ///
    /// Panics if `deadzone` is not within `[0, 1)`.
    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        assert!(
            (0.0..1.0).contains(&deadzone),
            "Stick deadzone must be within [0, 1)"
        );
        self.deadzone = deadzone;
        self
    }

    pub fn set_mapping(&mut self, mapping: GamepadMapping) {
        self.mapping = mapping;
    }

    pub fn mapping(&self) -> &GamepadMapping {
        &self.mapping
    }

    //--- Connection -------------------------------------------------------

    /// Registers a gamepad and picks the glyph style from its name.
    pub fn connect(&mut self, id: GamepadId, name: &str) {
        info!(target: "platform::input", "Gamepad {} connected: {name}", id.0);

        if self.gamepads.contains_key(&id) {
            warn!(target: "platform::input", "Gamepad {} reconnected without disconnect", id.0);
            self.disconnect(id);
        }

        self.controllers
            .set_gamepad_style(GamepadStyle::from_gamepad_name(name));
        self.gamepads.insert(
            id,
            GamepadState {
                name: name.to_owned(),
                sticks: vec![Vec2::ZERO; self.mapping.sticks.len()],
                ..GamepadState::default()
            },
        );
    }

    /// Forgets a gamepad, releasing everything it still held.
    pub fn disconnect(&mut self, id: GamepadId) {
        let Some(state) = self.gamepads.remove(&id) else {
            return;
        };
        info!(target: "platform::input", "Gamepad {} disconnected: {}", id.0, state.name);

        for (index, held) in state.buttons.iter().enumerate() {
            if *held {
                self.emit(ControllerEventType::Up, self.mapping.button(index));
            }
        }
        for (index, axis) in state.axes.iter().enumerate() {
            let (negative, positive) = self.mapping.axis(index);
            if axis.negative {
                self.emit(ControllerEventType::Up, negative);
            }
            if axis.positive {
                self.emit(ControllerEventType::Up, positive);
            }
        }
        for (stick, direction) in self.mapping.sticks.iter().zip(&state.sticks) {
            if *direction != Vec2::ZERO {
                let drag = ControllerEvent::drag(ControllerFamily::Gamepad, stick.intents, Vec2::ZERO);
                self.controllers.on_drag().emit(&drag);
            }
        }
    }

    pub fn is_connected(&self, id: GamepadId) -> bool {
        self.gamepads.contains_key(&id)
    }

    pub fn connected_count(&self) -> usize {
        self.gamepads.len()
    }

    //--- update() ---------------------------------------------------------

    /// Diffs `snapshots` against the last poll and emits the changes.
    ///
    /// Snapshots for gamepads that were never connected are ignored.
    pub fn update(&mut self, snapshots: &[GamepadSnapshot]) {
        for snapshot in snapshots {
            let Some(mut state) = self.gamepads.remove(&snapshot.id) else {
                continue;
            };

            self.poll_buttons(&mut state, snapshot);
            self.poll_axes(&mut state, snapshot);
            self.poll_sticks(&mut state, snapshot);

            self.gamepads.insert(snapshot.id, state);
        }
    }

    fn poll_buttons(&self, state: &mut GamepadState, snapshot: &GamepadSnapshot) {
        if state.buttons.len() < snapshot.buttons.len() {
            state.buttons.resize(snapshot.buttons.len(), false);
        }

        for (index, &pressed) in snapshot.buttons.iter().enumerate() {
            if state.buttons[index] == pressed {
                continue;
            }
            state.buttons[index] = pressed;

            let kind = if pressed { ControllerEventType::Down } else { ControllerEventType::Up };
            self.emit(kind, self.mapping.button(index));
        }
    }

    fn poll_axes(&self, state: &mut GamepadState, snapshot: &GamepadSnapshot) {
        if state.axes.len() < snapshot.axes.len() {
            state.axes.resize(snapshot.axes.len(), AxisButtons::default());
        }

        for (index, &value) in snapshot.axes.iter().enumerate() {
            let (negative_intents, positive_intents) = self.mapping.axis(index);
            let previous = state.axes[index];
            let current = AxisButtons {
                negative: value <= -self.threshold,
                positive: value >= self.threshold,
            };
            state.axes[index] = current;

            // Releases first so a side-to-side flick never holds both.
            if previous.negative && !current.negative {
                self.emit(ControllerEventType::Up, negative_intents);
            }
            if previous.positive && !current.positive {
                self.emit(ControllerEventType::Up, positive_intents);
            }
            if !previous.negative && current.negative {
                self.emit(ControllerEventType::Down, negative_intents);
            }
            if !previous.positive && current.positive {
                self.emit(ControllerEventType::Down, positive_intents);
            }
        }
    }

    fn poll_sticks(&self, state: &mut GamepadState, snapshot: &GamepadSnapshot) {
        state.sticks.resize(self.mapping.sticks.len(), Vec2::ZERO);

        for (index, stick) in self.mapping.sticks.iter().enumerate() {
            let x = snapshot.axes.get(stick.x_axis).copied().unwrap_or(0.0);
            let y = snapshot.axes.get(stick.y_axis).copied().unwrap_or(0.0);
            let direction = Vec2::new(self.normalize(x), self.normalize(y));

            if state.sticks[index] != direction {
                state.sticks[index] = direction;
                let drag = ControllerEvent::drag(ControllerFamily::Gamepad, stick.intents, direction);
                self.controllers.on_drag().emit(&drag);
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Rescales `value` so the deadzone edge maps to 0 and full tilt to 1.
    fn normalize(&self, value: f32) -> f32 {
        let magnitude = value.abs();
        if magnitude <= self.deadzone {
            return 0.0;
        }
        let scaled = ((magnitude - self.deadzone) / (1.0 - self.deadzone)).min(1.0);
        scaled.copysign(value)
    }

    fn emit(&self, kind: ControllerEventType, intents: Intents) {
        if intents.is_empty() {
            return;
        }
        let event = ControllerEvent::new(ControllerFamily::Gamepad, kind, intents, false);
        match kind {
            ControllerEventType::Down => self.controllers.on_button_down().emit(&event),
            ControllerEventType::Up => self.controllers.on_button_up().emit(&event),
            ControllerEventType::Press => self.controllers.on_button_press().emit(&event),
            ControllerEventType::Drag => self.controllers.on_drag().emit(&event),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    const PAD: GamepadId = GamepadId(0);

    fn setup() -> (ControllerManager, GamepadInput) {
        let manager = ControllerManager::new();
        let mut gamepads = GamepadInput::new(manager.clone());
        gamepads.connect(PAD, "Generic USB Gamepad");
        (manager, gamepads)
    }

    fn axes(values: &[f32]) -> GamepadSnapshot {
        GamepadSnapshot {
            id: PAD,
            buttons: Vec::new(),
            axes: values.to_vec(),
        }
    }

    fn buttons(pressed: &[usize]) -> GamepadSnapshot {
        let mut state = vec![false; 16];
        for &i in pressed {
            state[i] = true;
        }
        GamepadSnapshot {
            id: PAD,
            buttons: state,
            axes: Vec::new(),
        }
    }

    /// Records (type, intents) of every down and up event.
    fn record(manager: &ControllerManager) -> Rc<RefCell<Vec<(ControllerEventType, Intents)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for signal in [manager.on_button_down(), manager.on_button_up()] {
            let log = Rc::clone(&log);
            signal.connect(move |e| log.borrow_mut().push((e.event_type(), e.intents())));
        }
        log
    }

    //=====================================================================
    // Digital Buttons
    //=====================================================================

    #[test]
    fn button_edges_emit_down_and_up() {
        let (manager, mut gamepads) = setup();
        let log = record(&manager);

        gamepads.update(&[buttons(&[0])]);
        gamepads.update(&[buttons(&[0])]);
        gamepads.update(&[buttons(&[])]);

        let confirm = Intents::CONFIRM | Intents::PLAYER_INTERACT;
        assert_eq!(
            *log.borrow(),
            vec![(ControllerEventType::Down, confirm), (ControllerEventType::Up, confirm)]
        );
        assert_eq!(manager.family(), ControllerFamily::Gamepad);
    }

    #[test]
    fn unknown_gamepad_snapshot_is_ignored() {
        let (manager, mut gamepads) = setup();
        let log = record(&manager);

        let mut snapshot = buttons(&[0]);
        snapshot.id = GamepadId(7);
        gamepads.update(&[snapshot]);

        assert!(log.borrow().is_empty());
    }

    //=====================================================================
    // Axis Virtual Buttons
    //=====================================================================

    #[test]
    fn axis_crossing_negative_threshold_holds_negative_side() {
        let (manager, mut gamepads) = setup();
        let log = record(&manager);

        gamepads.update(&[axes(&[0.0, 0.0])]);
        gamepads.update(&[axes(&[-0.6, 0.0])]);

        assert_eq!(*log.borrow(), vec![(ControllerEventType::Down, Intents::LEFT)]);
    }

    #[test]
    fn axis_flip_releases_before_pressing() {
        let (manager, mut gamepads) = setup();
        let log = record(&manager);

        gamepads.update(&[axes(&[-0.6, 0.0])]);
        log.borrow_mut().clear();
        gamepads.update(&[axes(&[0.6, 0.0])]);

        assert_eq!(
            *log.borrow(),
            vec![
                (ControllerEventType::Up, Intents::LEFT),
                (ControllerEventType::Down, Intents::RIGHT),
            ]
        );
        assert!(manager.is_intent_active(Intents::PLAYER_MOVE_RIGHT));
        assert!(!manager.is_intent_active(Intents::PLAYER_MOVE_LEFT));
    }

    //=====================================================================
    // Sticks
    //=====================================================================

    #[test]
    fn stick_inside_deadzone_emits_nothing() {
        let (manager, mut gamepads) = setup();
        let drags = Rc::new(RefCell::new(Vec::new()));
        {
            let drags = Rc::clone(&drags);
            manager.on_drag().connect(move |e| drags.borrow_mut().push(e.clone()));
        }

        gamepads.update(&[axes(&[0.1, -0.2, 0.0, 0.0])]);

        assert!(drags.borrow().is_empty());
    }

    #[test]
    fn stick_tilt_emits_normalized_drag_once() {
        let (manager, mut gamepads) = setup();
        let drags = Rc::new(RefCell::new(Vec::new()));
        {
            let drags = Rc::clone(&drags);
            manager.on_drag().connect(move |e| drags.borrow_mut().push(e.clone()));
        }

        gamepads.update(&[axes(&[0.0, 0.0, 1.0, 0.0])]);
        gamepads.update(&[axes(&[0.0, 0.0, 1.0, 0.0])]);

        let drags = drags.borrow();
        assert_eq!(drags.len(), 1);
        assert_eq!(drags[0].intents(), Intents::STICK_RIGHT);
        assert_eq!(drags[0].direction(), Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn normalize_rescales_outside_deadzone() {
        let (_, gamepads) = setup();
        assert_eq!(gamepads.normalize(0.25), 0.0);
        assert!((gamepads.normalize(-0.625) + 0.5).abs() < 1e-6);
        assert_eq!(gamepads.normalize(1.5), 1.0);
    }

    //=====================================================================
    // Connection
    //=====================================================================

    #[test]
    fn disconnect_releases_held_buttons() {
        let (manager, mut gamepads) = setup();
        gamepads.update(&[buttons(&[2, 12])]);
        assert!(manager.is_intent_active(Intents::PLAYER_ACTION));

        gamepads.disconnect(PAD);

        assert!(manager.active_intents().is_empty());
        assert!(!gamepads.is_connected(PAD));
    }

    #[test]
    fn playstation_pad_sets_glyph_style() {
        let manager = ControllerManager::new();
        let mut gamepads = GamepadInput::new(manager.clone());

        gamepads.connect(GamepadId(1), "DualShock 4 (Vendor: 054c)");

        assert_eq!(manager.gamepad_style(), GamepadStyle::PlayStation);
    }
}
