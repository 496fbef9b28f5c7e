//=========================================================================
// Game Loop Clock
//=========================================================================
//
// Turns animation-frame timestamps into a clamped frame delta and an
// accumulated game time.
//
// The first tick only records its timestamp (dt = 0). Long stalls (tab
// switch, debugger pause) are clamped to `max_dt` so simulation never
// jumps. Time running backwards yields dt = 0.
//
//=========================================================================

pub const DEFAULT_MAX_DT: f64 = 0.1;

//=== FrameTime ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f64,

    /// Sum of every `dt` so far.
    pub time: f64,
}

//=== GameLoop ============================================================

#[derive(Debug, Clone)]
pub struct GameLoop {
    max_dt: f64,
    last: Option<f64>,
    time: f64,
}

impl GameLoop {
    /// # Panics
    ///
    /// Panics if `max_dt` is not strictly positive.
    pub fn new(max_dt: f64) -> Self {
        assert!(max_dt > 0.0, "max_dt must be positive, got {}", max_dt);
        Self {
            max_dt,
            last: None,
            time: 0.0,
        }
    }

    /// Advances the clock to `now_ms` (milliseconds, any monotonic origin).
    pub fn tick(&mut self, now_ms: f64) -> FrameTime {
        let dt = match self.last {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, self.max_dt),
            None => 0.0,
        };
        self.last = Some(now_ms);
        self.time += dt;
        FrameTime { dt, time: self.time }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn max_dt(&self) -> f64 {
        self.max_dt
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DT)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_dt() {
        let mut clock = GameLoop::default();
        assert_eq!(clock.tick(5000.0), FrameTime { dt: 0.0, time: 0.0 });
    }

    #[test]
    fn dt_is_seconds_between_ticks() {
        let mut clock = GameLoop::default();
        clock.tick(1000.0);

        let frame = clock.tick(1016.0);

        assert!((frame.dt - 0.016).abs() < 1e-9);
        assert!((frame.time - 0.016).abs() < 1e-9);
    }

    #[test]
    fn long_stalls_are_clamped() {
        let mut clock = GameLoop::new(0.1);
        clock.tick(0.0);

        let frame = clock.tick(3000.0);

        assert_eq!(frame.dt, 0.1);
    }

    #[test]
    fn backwards_time_yields_zero_dt() {
        let mut clock = GameLoop::default();
        clock.tick(1000.0);
        assert_eq!(clock.tick(900.0).dt, 0.0);
    }

    #[test]
    fn time_accumulates_clamped_deltas() {
        let mut clock = GameLoop::new(0.05);
        clock.tick(0.0);
        clock.tick(40.0);
        clock.tick(1040.0);
        assert!((clock.time() - 0.09).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "max_dt must be positive")]
    fn zero_max_dt_panics() {
        GameLoop::new(0.0);
    }
}
