//=========================================================================
// SceneGraph
//=========================================================================
//
// Arena-backed node tree.
//
// Architecture:
// ```text
// slots: Vec<Slot>            free: Vec<u32>
//   [0] root ─┬─ [1] player ─── [3] lamp
//             └─ [2] hud
// ```
// Nodes refer to parents and children by `NodeId`; the arena owns
// everything. Destroying a node bumps its slot's generation so stale ids
// stop resolving.
//
// Derived geometry:
// - Scene transform = parent's child base × own local matrix. Each cached
//   transform records the revision of the parent transform it was built
//   from; a read recomputes only when the node is TRANSFORM-dirty or the
//   parent's revision moved on. Mutating an ancestor therefore costs
//   nothing until a descendant is read.
// - Local bounds are cached until BOUNDS-dirty; scene bounds until either
//   the local bounds or the scene transform revision changes.
// - Subtree layer masks are cached per node and invalidated up the
//   ancestor chain on structural or layer changes.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::{Cell, RefCell};
use std::fmt;

//=== External Crates =====================================================

use log::{debug, warn};

//=== Internal Imports ====================================================

use super::capability::{Drawable, Interactable, PointerEvent, UpdateContext, Updatable};
use super::node::{NodeId, SceneNode};
use super::{Dirty, Layer};
use crate::core::error::{EngineError, EngineResult};
use crate::core::geometry::{Affine2, Anchor, Polygon2, Vec2};
use crate::core::input::ControllerManager;
use crate::core::render::Canvas;

//=== Cache Records =======================================================

#[derive(Debug, Clone, Copy)]
struct SceneCache {
    transform: Affine2,

    /// `transform` shifted to where children's origin sits.
    child_base: Affine2,

    parent_revision: u64,
    revision: u64,
}

#[derive(Debug, Clone)]
struct SceneBoundsCache {
    polygon: Polygon2,
    scene_revision: u64,
    bounds_revision: u64,
}

//=== Entry / Slot ========================================================

struct Entry {
    node: SceneNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    active: bool,
    dirty: Cell<Dirty>,
    scene: Cell<Option<SceneCache>>,
    bounds: RefCell<Option<Polygon2>>,
    bounds_revision: Cell<u64>,
    scene_bounds: RefCell<Option<SceneBoundsCache>>,
    subtree_layers: Cell<Option<u32>>,
}

impl Entry {
    fn new(node: SceneNode) -> Self {
        Self {
            node,
            parent: None,
            children: Vec::new(),
            active: false,
            dirty: Cell::new(Dirty::all()),
            scene: Cell::new(None),
            bounds: RefCell::new(None),
            bounds_revision: Cell::new(0),
            scene_bounds: RefCell::new(None),
            subtree_layers: Cell::new(None),
        }
    }

    fn mark(&self, dirty: Dirty) {
        self.dirty.set(self.dirty.get() | dirty);
    }

    fn clear(&self, dirty: Dirty) {
        self.dirty.set(self.dirty.get() - dirty);
    }
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

//=== SceneGraph ==========================================================

pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    active: bool,
    revisions: Cell<u64>,
}

impl SceneGraph {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::with_root(SceneNode::new().with_id("root"))
    }

    pub fn with_root(root: SceneNode) -> Self {
        let mut graph = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId { index: 0, generation: 0 },
            active: false,
            revisions: Cell::new(0),
        };
        graph.root = graph.insert(root);
        graph
    }

    /// Adds a detached node. Attach it with [`append_child`](Self::append_child).
    pub fn insert(&mut self, node: SceneNode) -> NodeId {
        let entry = Entry::new(node);
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                NodeId { index, generation: 0 }
            }
        }
    }

    //--- Lookup -----------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.entry(id).map(|e| &e.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id)?.parent
    }

    /// Children in draw order. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entry(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if the node's ancestor chain reaches the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Root of the tree `id` is attached to, `None` while detached.
    pub fn scene_of(&self, id: NodeId) -> Option<NodeId> {
        self.is_attached(id).then_some(self.root)
    }

    //--- Structure --------------------------------------------------------

    /// Moves `child` (with its subtree) to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> EngineResult<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(EngineError::UnknownNode);
        }
        if child == self.root {
            return Err(EngineError::RootReparent);
        }
        if self.is_self_or_ancestor(child, parent) {
            return Err(EngineError::CyclicAppend);
        }

        let was_active = self.entry(child).is_some_and(|e| e.active);
        self.detach(child);

        if let Some(entry) = self.entry_mut(parent) {
            entry.children.push(child);
        }
        if let Some(entry) = self.entry_mut(child) {
            entry.parent = Some(parent);
            entry.mark(Dirty::TRANSFORM);
        }
        self.invalidate_layers(parent);

        if self.active && self.is_attached(child) {
            self.activate_subtree(child);
        } else if was_active {
            self.deactivate_subtree(child);
        }
        Ok(())
    }

    /// Detaches `id` from its parent. The node stays alive and can be
    /// appended again.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            warn!(target: "scene", "Ignoring request to remove the root node");
            return;
        }
        let Some(entry) = self.entry(id) else {
            return;
        };
        let was_active = entry.active;

        self.detach(id);
        if let Some(entry) = self.entry(id) {
            entry.mark(Dirty::TRANSFORM);
        }
        if was_active {
            self.deactivate_subtree(id);
        }
    }

    /// Removes `id` and frees its whole subtree.
    pub fn destroy(&mut self, id: NodeId) {
        if id == self.root {
            warn!(target: "scene", "Ignoring request to destroy the root node");
            return;
        }
        if !self.contains(id) {
            return;
        }

        self.remove(id);
        for node in self.subtree(id) {
            if let Some(slot) = self.slots.get_mut(node.index as usize) {
                slot.entry = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(node.index);
            }
        }
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activates or deactivates every attached node.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        debug!(target: "scene", "Scene graph {}", if active { "activated" } else { "deactivated" });

        let root = self.root;
        if active {
            self.activate_subtree(root);
        } else {
            self.deactivate_subtree(root);
        }
    }

    //--- Mutation ---------------------------------------------------------

    pub fn move_to(&mut self, id: NodeId, x: f32, y: f32) {
        self.modify(id, Dirty::TRANSFORM, |n| n.position = Vec2::new(x, y));
    }

    pub fn move_by(&mut self, id: NodeId, dx: f32, dy: f32) {
        self.modify(id, Dirty::TRANSFORM, |n| n.position += Vec2::new(dx, dy));
    }

    /// Replaces the extra local transform with `f(current)`.
    pub fn transform<F>(&mut self, id: NodeId, f: F)
    where
        F: FnOnce(Affine2) -> Affine2,
    {
        self.modify(id, Dirty::TRANSFORM, |n| n.transform = f(n.transform));
    }

    pub fn set_rotation(&mut self, id: NodeId, radians: f32) {
        self.transform(id, |m| {
            let (scale, _, translation) = m.to_scale_angle_translation();
            Affine2::from_scale_angle_translation(scale, radians, translation)
        });
    }

    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        self.transform(id, |m| {
            let (_, angle, translation) = m.to_scale_angle_translation();
            Affine2::from_scale_angle_translation(scale, angle, translation)
        });
    }

    /// Changing size moves the child origin too, hence TRANSFORM.
    pub fn resize_to(&mut self, id: NodeId, width: f32, height: f32) {
        let dirty = Dirty::BOUNDS | Dirty::RENDERING | Dirty::TRANSFORM;
        self.modify(id, dirty, |n| n.size = Vec2::new(width, height));
    }

    pub fn set_layer(&mut self, id: NodeId, layer: u32) -> EngineResult<()> {
        let layer = Layer::new(layer)?;
        if !self.modify(id, Dirty::RENDERING, |n| n.layer = layer) {
            return Err(EngineError::UnknownNode);
        }
        self.invalidate_layers(id);
        Ok(())
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        self.modify(id, Dirty::RENDERING, |n| n.hidden = hidden);
    }

    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) {
        self.modify(id, Dirty::RENDERING, |n| n.opacity = opacity.clamp(0.0, 1.0));
    }

    pub fn set_anchor(&mut self, id: NodeId, anchor: Anchor) {
        let dirty = Dirty::BOUNDS | Dirty::RENDERING | Dirty::TRANSFORM;
        self.modify(id, dirty, |n| n.anchor = anchor);
    }

    pub fn set_child_anchor(&mut self, id: NodeId, anchor: Anchor) {
        self.modify(id, Dirty::TRANSFORM, |n| n.child_anchor = anchor);
    }

    pub fn set_bounds_override(&mut self, id: NodeId, bounds: Option<Polygon2>) {
        self.modify(id, Dirty::BOUNDS, |n| n.bounds_override = bounds);
    }

    /// Marks derived state stale, e.g. after a drawable changed shape.
    pub fn invalidate(&mut self, id: NodeId, dirty: Dirty) {
        self.modify(id, dirty, |_| {});
    }

    pub fn is_dirty(&self, id: NodeId, dirty: Dirty) -> bool {
        self.entry(id).is_some_and(|e| e.dirty.get().intersects(dirty))
    }

    /// Mutable access to the drawable as `T`. Marks BOUNDS and RENDERING.
    pub fn drawable_mut<T: Drawable>(&mut self, id: NodeId) -> Option<&mut T> {
        let entry = self.entry_mut(id)?;
        entry.mark(Dirty::BOUNDS | Dirty::RENDERING);
        entry.node.drawable.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    pub fn updatable_mut<T: Updatable>(&mut self, id: NodeId) -> Option<&mut T> {
        let entry = self.entry_mut(id)?;
        entry.node.updatable.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    //--- Derived Geometry -------------------------------------------------

    pub fn scene_transform(&self, id: NodeId) -> Option<Affine2> {
        self.resolve(id).map(|cache| cache.transform)
    }

    /// Scene-space position of the node's anchor point.
    pub fn scene_position(&self, id: NodeId) -> Option<Vec2> {
        self.scene_transform(id).map(|m| m.translation)
    }

    /// Local bounds: explicit override, else drawable bounds, else the
    /// anchored size rectangle.
    ///
    /// A drawable that is not ready yet (e.g. a sprite whose asset is still
    /// loading) keeps the node BOUNDS-dirty, so the next read asks again.
    pub fn bounds(&self, id: NodeId) -> Option<Polygon2> {
        let entry = self.entry(id)?;
        let stale = entry.dirty.get().contains(Dirty::BOUNDS) || entry.bounds.borrow().is_none();
        if stale {
            let node = &entry.node;
            let intrinsic = match &node.bounds_override {
                Some(polygon) => Some(polygon.clone()),
                None => node.drawable.as_ref().and_then(|d| d.local_bounds(node)),
            };
            let provisional = node.bounds_override.is_none()
                && node.drawable.as_ref().is_some_and(|d| !d.is_ready());
            let polygon = intrinsic.unwrap_or_else(|| node.anchored_rect());

            if entry.bounds.borrow().as_ref() != Some(&polygon) {
                *entry.bounds.borrow_mut() = Some(polygon);
                entry.bounds_revision.set(self.next_revision());
            }
            if !provisional {
                entry.clear(Dirty::BOUNDS);
            }
        }
        entry.bounds.borrow().clone()
    }

    pub fn scene_bounds(&self, id: NodeId) -> Option<Polygon2> {
        let scene = self.resolve(id)?;
        let local = self.bounds(id)?;
        let entry = self.entry(id)?;
        let bounds_revision = entry.bounds_revision.get();

        if let Some(cache) = entry.scene_bounds.borrow().as_ref() {
            if cache.scene_revision == scene.revision && cache.bounds_revision == bounds_revision {
                return Some(cache.polygon.clone());
            }
        }

        let polygon = local.transform(&scene.transform);
        *entry.scene_bounds.borrow_mut() = Some(SceneBoundsCache {
            polygon: polygon.clone(),
            scene_revision: scene.revision,
            bounds_revision,
        });
        Some(polygon)
    }

    /// `true` if `point` (scene space) lies inside the node's scene bounds.
    pub fn contains_point(&self, id: NodeId, point: Vec2) -> bool {
        self.scene_bounds(id).is_some_and(|b| b.contains_point(point))
    }

    //--- Layers -----------------------------------------------------------

    /// OR of the layer bits used by `id` and its descendants.
    pub fn subtree_layers(&self, id: NodeId) -> u32 {
        let Some(entry) = self.entry(id) else {
            return 0;
        };
        if let Some(mask) = entry.subtree_layers.get() {
            return mask;
        }

        let mask = entry
            .children
            .iter()
            .fold(entry.node.layer.bit(), |mask, child| mask | self.subtree_layers(*child));
        entry.subtree_layers.set(Some(mask));
        mask
    }

    //--- update() ---------------------------------------------------------

    /// Runs every attached updatable depth-first and returns the layers in
    /// use.
    pub fn update(&mut self, dt: f64, time: f64, controllers: &ControllerManager) -> u32 {
        let root = self.root;
        self.update_node(root, dt, time, controllers)
    }

    fn update_node(&mut self, id: NodeId, dt: f64, time: f64, controllers: &ControllerManager) -> u32 {
        let updatable = match self.entry_mut(id) {
            Some(entry) => entry.node.updatable.take(),
            None => return 0,
        };

        if let Some(mut updatable) = updatable {
            let mut ctx = UpdateContext {
                graph: &mut *self,
                node: id,
                dt,
                time,
                controllers,
            };
            updatable.update(&mut ctx);
            self.restore_updatable(id, updatable);
        }

        let (mut layers, children) = match self.entry(id) {
            Some(entry) => (entry.node.layer.bit(), entry.children.clone()),
            None => return 0,
        };
        for child in children {
            if self.parent(child) == Some(id) {
                layers |= self.update_node(child, dt, time, controllers);
            }
        }
        layers
    }

    //--- draw_layer() -----------------------------------------------------

    /// Draws the nodes on `layer`, depth-first in insertion order.
    ///
    /// Every visited node wraps its subtree in `save` / `restore` with its
    /// local transform and opacity applied, so nodes on other layers still
    /// position their descendants.
    ///
    /// Returns `true` if at least one drawable was drawn.
    pub fn draw_layer(&self, canvas: &mut dyn Canvas, layer: Layer, time: f64) -> bool {
        self.draw_node(self.root, canvas, layer.bit(), time)
    }

    fn draw_node(&self, id: NodeId, canvas: &mut dyn Canvas, bit: u32, time: f64) -> bool {
        let Some(entry) = self.entry(id) else {
            return false;
        };
        let node = &entry.node;
        if node.hidden || self.subtree_layers(id) & bit == 0 {
            return false;
        }

        let offset = entry
            .parent
            .and_then(|p| self.node(p))
            .map_or(Vec2::ZERO, |p| p.child_offset());

        canvas.save();
        canvas.transform(&(Affine2::from_translation(offset) * node.local_matrix()));
        if node.opacity < 1.0 {
            canvas.set_global_alpha(canvas.global_alpha() * node.opacity);
        }

        let mut drew = false;
        if node.layer.bit() == bit {
            if let Some(drawable) = &node.drawable {
                drawable.draw(canvas, node, time);
                drew = true;
            }
            entry.clear(Dirty::RENDERING);
        }

        for child in &entry.children {
            drew |= self.draw_node(*child, canvas, bit, time);
        }
        canvas.restore();
        drew
    }

    //--- Picking ----------------------------------------------------------

    /// Topmost visible interactive node under `point` (scene space).
    pub fn pick(&self, point: Vec2) -> Option<NodeId> {
        self.pick_in(point, u32::MAX)
    }

    /// Like [`pick`](Self::pick), restricted to layers in `layer_mask`.
    ///
    /// Higher layers win; within a layer the node drawn last wins.
    pub fn pick_in(&self, point: Vec2, layer_mask: u32) -> Option<NodeId> {
        let mut order = 0;
        let mut best = None;
        self.pick_node(self.root, point, layer_mask, &mut order, &mut best);
        best.map(|(_, _, id)| id)
    }

    fn pick_node(
        &self,
        id: NodeId,
        point: Vec2,
        layer_mask: u32,
        order: &mut usize,
        best: &mut Option<(u32, usize, NodeId)>,
    ) {
        let Some(entry) = self.entry(id) else {
            return;
        };
        if entry.node.hidden {
            return;
        }
        *order += 1;

        let layer = entry.node.layer;
        if entry.node.is_interactive()
            && layer.bit() & layer_mask != 0
            && self.contains_point(id, point)
        {
            let beats = best.map_or(true, |(l, o, _)| (layer.index(), *order) > (l, o));
            if beats {
                *best = Some((layer.index(), *order, id));
            }
        }

        for child in &entry.children {
            self.pick_node(*child, point, layer_mask, order, best);
        }
    }

    /// Picks the node under `event.scene` and hands it the press.
    pub fn dispatch_pointer_down(&mut self, event: &PointerEvent, layer_mask: u32) -> Option<NodeId> {
        let target = self.pick_in(event.scene, layer_mask)?;
        let mut interactable: Box<dyn Interactable> = self.entry_mut(target)?.node.interactable.take()?;

        interactable.pointer_down(self, target, event);

        if let Some(entry) = self.entry_mut(target) {
            if entry.node.interactable.is_none() {
                entry.node.interactable = Some(interactable);
            }
        }
        Some(target)
    }

    //--- Search -----------------------------------------------------------

    /// First descendant of `from` (depth-first) whose id is `id`.
    pub fn descendant_by_id(&self, from: NodeId, id: &str) -> Option<NodeId> {
        self.subtree(from)
            .into_iter()
            .skip(1)
            .find(|n| self.node(*n).and_then(|node| node.id()) == Some(id))
    }

    pub fn descendants_where<P>(&self, from: NodeId, predicate: P) -> Vec<NodeId>
    where
        P: Fn(&SceneNode) -> bool,
    {
        self.subtree(from)
            .into_iter()
            .skip(1)
            .filter(|n| self.node(*n).is_some_and(&predicate))
            .collect()
    }

    /// Descendants whose drawable is a `T`.
    pub fn descendants_with_drawable<T: Drawable>(&self, from: NodeId) -> Vec<NodeId> {
        self.descendants_where(from, |n| n.drawable::<T>().is_some())
    }

    /// Descendants whose updatable is a `T`.
    pub fn descendants_with_updatable<T: Updatable>(&self, from: NodeId) -> Vec<NodeId> {
        self.descendants_where(from, |n| n.updatable::<T>().is_some())
    }

    //--- Internal Helpers -------------------------------------------------

    fn entry(&self, id: NodeId) -> Option<&Entry> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    fn next_revision(&self) -> u64 {
        let revision = self.revisions.get() + 1;
        self.revisions.set(revision);
        revision
    }

    fn modify<F>(&mut self, id: NodeId, dirty: Dirty, f: F) -> bool
    where
        F: FnOnce(&mut SceneNode),
    {
        match self.entry_mut(id) {
            Some(entry) => {
                f(&mut entry.node);
                entry.mark(dirty);
                true
            }
            None => {
                debug!(target: "scene", "Ignoring mutation of stale node {id:?}");
                false
            }
        }
    }

    /// Scene transform of `id`, recomputed only when stale.
    fn resolve(&self, id: NodeId) -> Option<SceneCache> {
        let entry = self.entry(id)?;
        let (base, parent_revision) = match entry.parent {
            Some(parent) => {
                let parent = self.resolve(parent)?;
                (parent.child_base, parent.revision)
            }
            None => (Affine2::IDENTITY, 0),
        };

        if !entry.dirty.get().contains(Dirty::TRANSFORM) {
            if let Some(cache) = entry.scene.get() {
                if cache.parent_revision == parent_revision {
                    return Some(cache);
                }
            }
        }

        let transform = base * entry.node.local_matrix();
        let cache = SceneCache {
            transform,
            child_base: transform * Affine2::from_translation(entry.node.child_offset()),
            parent_revision,
            revision: self.next_revision(),
        };
        entry.scene.set(Some(cache));
        entry.clear(Dirty::TRANSFORM);
        Some(cache)
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(entry) = self.entry_mut(parent) {
            entry.children.retain(|c| *c != id);
        }
        if let Some(entry) = self.entry_mut(id) {
            entry.parent = None;
        }
        self.invalidate_layers(parent);
    }

    fn invalidate_layers(&self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node) = current {
            let Some(entry) = self.entry(node) else {
                break;
            };
            entry.subtree_layers.set(None);
            current = entry.parent;
        }
    }

    fn is_self_or_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// `id` and its descendants, pre-order.
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if let Some(entry) = self.entry(node) {
                nodes.push(node);
                stack.extend(entry.children.iter().rev());
            }
        }
        nodes
    }

    fn activate_subtree(&mut self, id: NodeId) {
        for node in self.subtree(id) {
            let updatable = match self.entry_mut(node) {
                Some(entry) if !entry.active => {
                    entry.active = true;
                    entry.node.updatable.take()
                }
                _ => continue,
            };
            if let Some(mut updatable) = updatable {
                updatable.activate(self, node);
                self.restore_updatable(node, updatable);
            }
        }
    }

    fn deactivate_subtree(&mut self, id: NodeId) {
        for node in self.subtree(id).into_iter().rev() {
            let updatable = match self.entry_mut(node) {
                Some(entry) if entry.active => {
                    entry.active = false;
                    entry.node.updatable.take()
                }
                _ => continue,
            };
            if let Some(mut updatable) = updatable {
                updatable.deactivate(self, node);
                self.restore_updatable(node, updatable);
            }
        }
    }

    fn restore_updatable(&mut self, id: NodeId, updatable: Box<dyn Updatable>) {
        if let Some(entry) = self.entry_mut(id) {
            if entry.node.updatable.is_none() {
                entry.node.updatable = Some(updatable);
            }
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.len())
            .field("root", &self.root)
            .field("active", &self.active)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
