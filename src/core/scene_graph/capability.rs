//=========================================================================
// Node Capabilities
//=========================================================================
//
// Traits a node composes its behaviour from, plus the contexts they run
// with and a few ready-made implementations.
//
// Capabilities are held by the node and temporarily taken out of it while
// they run, so they receive `&mut SceneGraph` and may restructure the tree
// (spawn, move, destroy) without aliasing their own node.
//
//=========================================================================

use std::any::Any;

use crate::core::geometry::{Polygon2, Vec2};
use crate::core::input::{ControllerManager, MouseButton};
use crate::core::render::{Canvas, Rgba};

use super::graph::SceneGraph;
use super::node::{NodeId, SceneNode};

//=== AsAny ===============================================================

/// Downcasting support for capability trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== UpdateContext =======================================================

/// Everything a node sees during its per-frame update.
pub struct UpdateContext<'a> {
    pub graph: &'a mut SceneGraph,
    pub node: NodeId,

    /// Clamped seconds since the previous frame.
    pub dt: f64,

    /// Accumulated game time in seconds.
    pub time: f64,

    pub controllers: &'a ControllerManager,
}

//=== Updatable ===========================================================

pub trait Updatable: AsAny {
    fn update(&mut self, ctx: &mut UpdateContext<'_>);

    /// Called once when the node becomes part of an active scene.
    fn activate(&mut self, _graph: &mut SceneGraph, _node: NodeId) {}

    /// Called once when the node leaves an active scene.
    fn deactivate(&mut self, _graph: &mut SceneGraph, _node: NodeId) {}
}

//=== Drawable ============================================================

pub trait Drawable: AsAny {
    /// Draws in the node's local space. The canvas already carries the
    /// node's transform and opacity.
    fn draw(&self, canvas: &mut dyn Canvas, node: &SceneNode, time: f64);

    /// Intrinsic local bounds. `None` falls back to the node's size and
    /// anchor.
    fn local_bounds(&self, _node: &SceneNode) -> Option<Polygon2> {
        None
    }

    /// `false` while the drawable waits on data that decides its bounds.
    fn is_ready(&self) -> bool {
        true
    }
}

//=== Interactable ========================================================

/// Pointer press delivered to the picked node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub screen: Vec2,
    pub scene: Vec2,
    pub button: MouseButton,
}

pub trait Interactable: AsAny {
    fn pointer_down(&mut self, graph: &mut SceneGraph, node: NodeId, event: &PointerEvent);
}

//=== Behavior ============================================================

/// Closure-backed `Updatable`.
pub struct Behavior<F>
where
    F: FnMut(&mut UpdateContext<'_>) + 'static,
{
    update: F,
}

impl<F> Behavior<F>
where
    F: FnMut(&mut UpdateContext<'_>) + 'static,
{
    pub fn new(update: F) -> Self {
        Self { update }
    }
}

impl<F> Updatable for Behavior<F>
where
    F: FnMut(&mut UpdateContext<'_>) + 'static,
{
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        (self.update)(ctx)
    }
}

//=== RectShape ===========================================================

/// Solid rectangle covering the node's anchored bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectShape {
    pub color: Rgba,
}

impl RectShape {
    pub fn new(color: Rgba) -> Self {
        Self { color }
    }
}

impl Drawable for RectShape {
    fn draw(&self, canvas: &mut dyn Canvas, node: &SceneNode, _time: f64) {
        canvas.fill_polygon(&node.anchored_rect(), self.color);
    }
}

//=== Clickable ===========================================================

/// Closure-backed `Interactable`.
pub struct Clickable<F>
where
    F: FnMut(&mut SceneGraph, NodeId, &PointerEvent) + 'static,
{
    on_press: F,
}

impl<F> Clickable<F>
where
    F: FnMut(&mut SceneGraph, NodeId, &PointerEvent) + 'static,
{
    pub fn new(on_press: F) -> Self {
        Self { on_press }
    }
}

impl<F> Interactable for Clickable<F>
where
    F: FnMut(&mut SceneGraph, NodeId, &PointerEvent) + 'static,
{
    fn pointer_down(&mut self, graph: &mut SceneGraph, node: NodeId, event: &PointerEvent) {
        (self.on_press)(graph, node, event)
    }
}
