//=========================================================================
// Engine Configuration
//=========================================================================
//
// Settings collected by `EngineBuilder` and read by the runtime and the
// platform host.
//
//=========================================================================

use crate::core::game_loop::DEFAULT_MAX_DT;
use crate::core::input::gamepad::{DEFAULT_AXIS_THRESHOLD, DEFAULT_STICK_DEADZONE};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Upper clamp for the frame delta, in seconds.
    pub max_dt: f64,

    /// Capacity of the bounded platform → runtime input queue.
    pub channel_capacity: usize,

    /// Logical canvas width in pixels.
    pub width: u32,

    /// Logical canvas height in pixels.
    pub height: u32,

    pub title: String,

    pub axis_threshold: f32,

    pub stick_deadzone: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dt: DEFAULT_MAX_DT,
            channel_capacity: 128,
            width: 480,
            height: 270,
            title: "Lantern".to_string(),
            axis_threshold: DEFAULT_AXIS_THRESHOLD,
            stick_deadzone: DEFAULT_STICK_DEADZONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_dt, 0.1);
        assert_eq!(config.channel_capacity, 128);
        assert_eq!((config.width, config.height), (480, 270));
        assert_eq!(config.title, "Lantern");
        assert_eq!(config.axis_threshold, 0.5);
        assert_eq!(config.stick_deadzone, 0.25);
    }
}
