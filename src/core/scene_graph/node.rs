//=========================================================================
// Scene Node
//=========================================================================
//
// Per-node data held by the `SceneGraph` arena.
//
// A node is plain data plus optional capability objects:
// - `Updatable`    per-frame logic and lifecycle hooks
// - `Drawable`     rendering and intrinsic bounds
// - `Interactable` pointer handling
//
// Capabilities are chosen at construction with the builder methods.
// Structure (parent / children) and cached derived state belong to the
// graph, not the node.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;

//=== Internal Imports ====================================================

use super::capability::{Drawable, Interactable, Updatable};
use super::Layer;
use crate::core::geometry::{Affine2, Anchor, Polygon2, Vec2};

//=== NodeId ==============================================================

/// Generational handle to a node in a `SceneGraph`.
///
/// A handle outlives its node safely: once the node is destroyed, lookups
/// with the old handle return `None` even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

//=== SceneNode ===========================================================

pub struct SceneNode {
    id: Option<String>,
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    pub(crate) anchor: Anchor,
    pub(crate) child_anchor: Anchor,
    pub(crate) transform: Affine2,
    pub(crate) layer: Layer,
    pub(crate) hidden: bool,
    pub(crate) opacity: f32,
    pub(crate) bounds_override: Option<Polygon2>,
    pub(crate) updatable: Option<Box<dyn Updatable>>,
    pub(crate) drawable: Option<Box<dyn Drawable>>,
    pub(crate) interactable: Option<Box<dyn Interactable>>,
}

impl SceneNode {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            id: None,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            anchor: Anchor::TopLeft,
            child_anchor: Anchor::TopLeft,
            transform: Affine2::IDENTITY,
            layer: Layer::DEFAULT,
            hidden: false,
            opacity: 1.0,
            bounds_override: None,
            updatable: None,
            drawable: None,
            interactable: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Where children's origin sits within this node's bounds.
    pub fn with_child_anchor(mut self, anchor: Anchor) -> Self {
        self.child_anchor = anchor;
        self
    }

    /// Extra local transform (rotation, scale, skew) applied after the
    /// position translation.
    pub fn with_transform(mut self, transform: Affine2) -> Self {
        self.transform = transform;
        self
    }

    pub fn on_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_bounds(mut self, bounds: Polygon2) -> Self {
        self.bounds_override = Some(bounds);
        self
    }

    pub fn with_updatable(mut self, updatable: impl Updatable + 'static) -> Self {
        self.updatable = Some(Box::new(updatable));
        self
    }

    pub fn with_drawable(mut self, drawable: impl Drawable + 'static) -> Self {
        self.drawable = Some(Box::new(drawable));
        self
    }

    pub fn with_interactable(mut self, interactable: impl Interactable + 'static) -> Self {
        self.interactable = Some(Box::new(interactable));
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn child_anchor(&self) -> Anchor {
        self.child_anchor
    }

    pub fn transform(&self) -> Affine2 {
        self.transform
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_interactive(&self) -> bool {
        self.interactable.is_some()
    }

    /// Downcasts the drawable to `T`.
    pub fn drawable<T: Drawable>(&self) -> Option<&T> {
        self.drawable.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Downcasts the updatable to `T`.
    pub fn updatable<T: Updatable>(&self) -> Option<&T> {
        self.updatable.as_deref()?.as_any().downcast_ref::<T>()
    }

    //--- Derived Geometry -------------------------------------------------

    /// Translation to position followed by the extra local transform.
    pub fn local_matrix(&self) -> Affine2 {
        Affine2::from_translation(self.position) * self.transform
    }

    /// Rectangle of `size` placed so the anchor sits at the origin.
    pub fn anchored_rect(&self) -> Polygon2 {
        let origin = -self.anchor.offset(self.size);
        Polygon2::rect(origin.x, origin.y, self.size.x, self.size.y)
    }

    /// Offset of the children's origin relative to this node's origin.
    pub fn child_offset(&self) -> Vec2 {
        self.child_anchor.offset(self.size) - self.anchor.offset(self.size)
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("layer", &self.layer)
            .field("hidden", &self.hidden)
            .field("updatable", &self.updatable.is_some())
            .field("drawable", &self.drawable.is_some())
            .field("interactable", &self.interactable.is_some())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_rect_centers_on_origin() {
        let node = SceneNode::new().with_size(10.0, 4.0).with_anchor(Anchor::Center);
        let bounds = node.anchored_rect().bounds();
        assert_eq!(bounds.min, Vec2::new(-5.0, -2.0));
        assert_eq!(bounds.max, Vec2::new(5.0, 2.0));
    }

    #[test]
    fn child_offset_moves_from_anchor_to_child_anchor() {
        let node = SceneNode::new()
            .with_size(10.0, 10.0)
            .with_anchor(Anchor::Center)
            .with_child_anchor(Anchor::BottomRight);
        assert_eq!(node.child_offset(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(SceneNode::new().with_opacity(3.0).opacity(), 1.0);
    }
}
