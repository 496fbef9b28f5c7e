//=========================================================================
// Scene Transitions
//=========================================================================
//
// Screen-space effects played when a scene enters or leaves the stack.
//
// A transition is started by the scene stack, advanced by its stage's
// update and drawn on top of everything in screen space. `start` hands
// out a deferred completion that resolves when the effect ends or is
// stopped.
//
//=========================================================================

use log::debug;

use crate::core::deferred::Deferred;
use crate::core::geometry::Bounds2;
use crate::core::render::{Canvas, Rgba};

//=== Transition ==========================================================

pub trait Transition {
    /// Starts the effect. While already running, returns the pending
    /// completion instead of restarting.
    fn start(&mut self) -> Deferred<()>;

    /// Ends the effect and resolves its completion. No-op when idle.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    fn update(&mut self, dt: f64);

    fn draw(&self, canvas: &mut dyn Canvas, width: u32, height: u32);
}

//=== FadeTransition ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// From solid colour to the scene.
    In,
    /// From the scene to solid colour.
    Out,
}

/// Full-screen colour fade.
#[derive(Debug)]
pub struct FadeTransition {
    color: Rgba,
    duration: f64,
    direction: FadeDirection,
    elapsed: f64,
    pending: Option<Deferred<()>>,
}

impl FadeTransition {
    pub fn new(direction: FadeDirection, duration: f64) -> Self {
        Self {
            color: Rgba::BLACK,
            duration: duration.max(0.0),
            direction,
            elapsed: 0.0,
            pending: None,
        }
    }

    pub fn fade_in(duration: f64) -> Self {
        Self::new(FadeDirection::In, duration)
    }

    pub fn fade_out(duration: f64) -> Self {
        Self::new(FadeDirection::Out, duration)
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Progress in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    fn overlay_alpha(&self) -> f32 {
        let p = self.progress() as f32;
        match self.direction {
            FadeDirection::In => 1.0 - p,
            FadeDirection::Out => p,
        }
    }
}

impl Transition for FadeTransition {
    fn start(&mut self) -> Deferred<()> {
        if let Some(pending) = &self.pending {
            return pending.clone();
        }
        debug!(target: "scene", "Fade {:?} started ({}s)", self.direction, self.duration);
        self.elapsed = 0.0;
        let done = Deferred::new();
        self.pending = Some(done.clone());
        done
    }

    fn stop(&mut self) {
        match self.pending.take() {
            Some(done) => {
                debug!(target: "scene", "Fade {:?} stopped", self.direction);
                done.resolve(());
            }
            None => debug!(target: "scene", "Fade {:?} already stopped", self.direction),
        }
    }

    fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    fn update(&mut self, dt: f64) {
        if !self.is_running() {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.stop();
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, width: u32, height: u32) {
        if !self.is_running() {
            return;
        }
        let color = self.color.with_alpha(self.color.a * self.overlay_alpha());
        canvas.fill_rect(Bounds2::new(0.0, 0.0, width as f32, height as f32), color);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
