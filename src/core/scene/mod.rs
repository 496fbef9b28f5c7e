//=========================================================================
// Scene System
//=========================================================================
//
// Scenes, their stages and the stack that sequences them.
//
// Architecture:
//   Scenes
//     ├─ stack: Vec<Box<dyn Scene>>
//     └─ queue: VecDeque<pending push / pop / set>
//   Scene
//     └─ Stage
//          ├─ SceneGraph
//          ├─ Camera
//          └─ in / out Transition
//
// Flow:
//   Scenes::update() → top Scene::update() → Stage::update()
//   Scenes::draw()   → visible Scene::draw() → Stage::draw()
//
//=========================================================================

//=== Module Declarations =================================================

pub mod camera;
pub mod scenes;
pub mod stage;
pub mod transition;

//=== Public API ==========================================================

pub use camera::Camera;
pub use scenes::Scenes;
pub use stage::Stage;
pub use transition::{FadeDirection, FadeTransition, Transition};

//=== Internal Dependencies ===============================================

use crate::core::geometry::Vec2;
use crate::core::input::{ControllerManager, MouseButton};
use crate::core::render::Canvas;
use crate::core::scene_graph::NodeId;

//=== Scene Trait =========================================================

/// A screen of the game: a stage plus lifecycle hooks.
///
/// Only `stage()` and `stage_mut()` are required. The hooks are called by
/// [`Scenes`] in this order over a scene's life:
///
/// ```text
/// setup → (activate → deactivate)* → cleanup
/// ```
///
/// # Minimal Implementation
///
/// ```rust
/// # use lantern_engine::prelude::*;
/// struct Title {
///     stage: Stage,
/// }
///
/// impl Scene for Title {
///     fn stage(&self) -> &Stage {
///         &self.stage
///     }
///
///     fn stage_mut(&mut self) -> &mut Stage {
///         &mut self.stage
///     }
/// }
/// ```
pub trait Scene {
    fn stage(&self) -> &Stage;

    fn stage_mut(&mut self) -> &mut Stage;

    /// Called once, right before the scene is pushed.
    fn setup(&mut self, _controllers: &ControllerManager) {}

    /// Called whenever the scene becomes the interactive top scene.
    fn activate(&mut self, _controllers: &ControllerManager) {}

    /// Called whenever the scene stops being the interactive top scene.
    fn deactivate(&mut self, _controllers: &ControllerManager) {}

    /// Called once, after the scene left the stack for good.
    fn cleanup(&mut self) {}

    fn update(&mut self, dt: f64, time: f64, controllers: &ControllerManager) {
        self.stage_mut().update(dt, time, controllers);
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, time: f64) {
        self.stage_mut().draw(canvas, time);
    }

    fn pointer_down(&mut self, screen: Vec2, button: MouseButton) -> Option<NodeId> {
        self.stage_mut().pointer_down(screen, button)
    }

    /// Whether scenes beneath this one stay visible.
    fn is_transparent(&self) -> bool {
        false
    }
}
