//=========================================================================
// Camera
//=========================================================================
//
// Maps scene space to screen space.
//
// The camera position is the scene point shown at the centre of the
// screen. Each frame it either eases towards a focus target, follows a
// node, or stays put; the result is then clamped to the optional limits
// so the view never shows outside the level.
//
//=========================================================================

use log::debug;

use crate::core::deferred::Deferred;
use crate::core::geometry::{Affine2, Bounds2, Vec2};
use crate::core::scene_graph::{NodeId, SceneGraph};

//=== Focus ===============================================================

#[derive(Debug)]
struct Focus {
    target: NodeId,
    from: Vec2,
    duration: f64,
    elapsed: f64,
    done: Deferred<bool>,
}

//=== Camera ==============================================================

#[derive(Debug)]
pub struct Camera {
    position: Vec2,
    zoom: f32,
    follow: Option<NodeId>,
    limits: Option<Bounds2>,
    focus: Option<Focus>,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            follow: None,
            limits: None,
            focus: None,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn follow(&self) -> Option<NodeId> {
        self.follow
    }

    pub fn limits(&self) -> Option<Bounds2> {
        self.limits
    }

    pub fn is_focusing(&self) -> bool {
        self.focus.is_some()
    }

    //--- Control ----------------------------------------------------------

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// # Panics
    ///
    /// Panics if `zoom` is not strictly positive.
    pub fn set_zoom(&mut self, zoom: f32) {
        assert!(zoom > 0.0, "Camera zoom must be greater than 0");
        self.zoom = zoom;
    }

    pub fn set_follow(&mut self, node: Option<NodeId>) {
        self.follow = node;
    }

    pub fn set_limits(&mut self, limits: Option<Bounds2>) {
        self.limits = limits;
    }

    /// Eases the camera onto `node` over `duration` seconds.
    ///
    /// Resolves `true` once the target is reached, `false` if another focus
    /// request or [`cancel_focus`](Self::cancel_focus) cuts it short or the
    /// node disappears.
    pub fn focus(&mut self, node: NodeId, duration: f64) -> Deferred<bool> {
        self.cancel_focus();
        let done = Deferred::new();
        self.focus = Some(Focus {
            target: node,
            from: self.position,
            duration: duration.max(0.0),
            elapsed: 0.0,
            done: done.clone(),
        });
        done
    }

    pub fn cancel_focus(&mut self) {
        if let Some(focus) = self.focus.take() {
            debug!(target: "scene", "Camera focus superseded");
            focus.done.resolve(false);
        }
    }

    //--- update() ---------------------------------------------------------

    pub fn update(&mut self, dt: f64, graph: &SceneGraph, width: f32, height: f32) {
        if let Some(focus) = &mut self.focus {
            match graph.scene_position(focus.target) {
                Some(target) => {
                    focus.elapsed += dt;
                    let t = if focus.duration <= 0.0 {
                        1.0
                    } else {
                        (focus.elapsed / focus.duration).min(1.0)
                    };
                    self.position = focus.from.lerp(target, ease_in_out(t as f32));
                    if t >= 1.0 {
                        if let Some(focus) = self.focus.take() {
                            focus.done.resolve(true);
                        }
                    }
                }
                None => self.cancel_focus(),
            }
        } else if let Some(node) = self.follow {
            match graph.scene_position(node) {
                Some(position) => self.position = position,
                None => self.follow = None,
            }
        }

        self.clamp_to_limits(width, height);
    }

    fn clamp_to_limits(&mut self, width: f32, height: f32) {
        let Some(limits) = self.limits else {
            return;
        };
        let half = Vec2::new(width, height) * 0.5 / self.zoom;
        self.position.x = clamp_axis(self.position.x, limits.min.x, limits.max.x, half.x);
        self.position.y = clamp_axis(self.position.y, limits.min.y, limits.max.y, half.y);
    }

    //--- Projection -------------------------------------------------------

    /// Scene → screen matrix for a viewport of `width` × `height`.
    pub fn scene_transformation(&self, width: f32, height: f32) -> Affine2 {
        Affine2::from_translation(Vec2::new(width, height) * 0.5)
            * Affine2::from_scale(Vec2::splat(self.zoom))
            * Affine2::from_translation(-self.position)
    }

    pub fn screen_to_scene(&self, point: Vec2, width: f32, height: f32) -> Vec2 {
        self.scene_transformation(width, height)
            .inverse()
            .transform_point2(point)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

//--- Helpers -------------------------------------------------------------

fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Keeps a view of half-extent `half` inside `[min, max]`; centres it when
/// the range is smaller than the view.
fn clamp_axis(value: f32, min: f32, max: f32, half: f32) -> f32 {
    if max - min <= half * 2.0 {
        (min + max) * 0.5
    } else {
        value.clamp(min + half, max - half)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
