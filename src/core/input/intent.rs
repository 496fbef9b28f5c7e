//=========================================================================
// Intents
//=========================================================================
//
// Semantic input actions as a 32-bit set.
//
// Every physical input (key, gamepad button, virtual axis button, stick)
// maps to a combination of intents. Gameplay and UI code test intents
// instead of devices, so one handler serves keyboard and gamepad alike.
//
//=========================================================================

use bitflags::bitflags;

bitflags! {
    /// Set of semantic input actions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Intents: u32 {
        const PLAYER_MOVE_UP    = 1 << 0;
        const PLAYER_MOVE_DOWN  = 1 << 1;
        const PLAYER_MOVE_LEFT  = 1 << 2;
        const PLAYER_MOVE_RIGHT = 1 << 3;
        const PLAYER_RUN        = 1 << 4;
        const PLAYER_INTERACT   = 1 << 5;
        const PLAYER_ACTION     = 1 << 6;
        const PLAYER_RELOAD     = 1 << 7;
        const PLAYER_DANCE_1    = 1 << 8;
        const PLAYER_DANCE_2    = 1 << 9;

        const MENU_UP           = 1 << 10;
        const MENU_DOWN         = 1 << 11;
        const MENU_LEFT         = 1 << 12;
        const MENU_RIGHT        = 1 << 13;
        const CONFIRM           = 1 << 14;
        const ABORT             = 1 << 15;
        const PAUSE             = 1 << 16;

        const STICK_LEFT        = 1 << 17;
        const STICK_RIGHT       = 1 << 18;

        const PLAYER_MOVE = Self::PLAYER_MOVE_UP.bits()
            | Self::PLAYER_MOVE_DOWN.bits()
            | Self::PLAYER_MOVE_LEFT.bits()
            | Self::PLAYER_MOVE_RIGHT.bits();

        const MENU_NAVIGATION = Self::MENU_UP.bits()
            | Self::MENU_DOWN.bits()
            | Self::MENU_LEFT.bits()
            | Self::MENU_RIGHT.bits();
    }
}

impl Intents {
    /// Combined up/move-up intent used by keys and d-pads.
    pub const UP: Self = Self::PLAYER_MOVE_UP.union(Self::MENU_UP);
    pub const DOWN: Self = Self::PLAYER_MOVE_DOWN.union(Self::MENU_DOWN);
    pub const LEFT: Self = Self::PLAYER_MOVE_LEFT.union(Self::MENU_LEFT);
    pub const RIGHT: Self = Self::PLAYER_MOVE_RIGHT.union(Self::MENU_RIGHT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_intents_are_distinct_bits() {
        let singles = [
            Intents::PLAYER_MOVE_UP,
            Intents::PLAYER_RUN,
            Intents::CONFIRM,
            Intents::PAUSE,
            Intents::STICK_RIGHT,
        ];
        for intent in singles {
            assert_eq!(intent.bits().count_ones(), 1);
        }
    }

    #[test]
    fn direction_groups_cover_move_and_menu() {
        assert!(Intents::UP.contains(Intents::PLAYER_MOVE_UP));
        assert!(Intents::UP.contains(Intents::MENU_UP));
        assert!(Intents::PLAYER_MOVE.contains(Intents::PLAYER_MOVE_LEFT));
        assert!(!Intents::MENU_NAVIGATION.intersects(Intents::PLAYER_MOVE));
    }
}
