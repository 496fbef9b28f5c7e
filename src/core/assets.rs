//=========================================================================
// Assets
//=========================================================================
//
// Late-bound shared resources.
//
// Nodes are often built before their images finish loading. An `Asset`
// is the slot they hold on to: empty at first, filled exactly once by the
// loader, read by drawables every frame. Drawables treat an empty slot as
// "draw nothing yet".
//
//=========================================================================

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::core::geometry::{Anchor, Bounds2, Polygon2, Vec2};
use crate::core::render::{Canvas, ImageId};
use crate::core::scene_graph::{Drawable, SceneNode};

//=== Asset ===============================================================

/// Shared, write-once resource slot.
pub struct Asset<T> {
    cell: Rc<OnceCell<T>>,
}

impl<T> Asset<T> {
    /// Empty slot awaiting its value.
    pub fn pending() -> Self {
        Self {
            cell: Rc::new(OnceCell::new()),
        }
    }

    pub fn ready(value: T) -> Self {
        let asset = Self::pending();
        let _ = asset.cell.set(value);
        asset
    }

    /// Fills the slot. Returns `false` if it was already filled.
    pub fn set(&self, value: T) -> bool {
        let stored = self.cell.set(value).is_ok();
        if !stored {
            debug!("Asset already loaded, ignoring second value");
        }
        stored
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Clone for Asset<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T> Default for Asset<T> {
    fn default() -> Self {
        Self::pending()
    }
}

impl<T: fmt::Debug> fmt::Debug for Asset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Asset").field(&self.cell.get()).finish()
    }
}

//=== SpriteSheet =========================================================

/// Horizontal strip of equally sized animation frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub image: ImageId,
    pub frame_width: f32,
    pub frame_height: f32,
    pub frames: u32,
    pub fps: f32,
}

impl SpriteSheet {
    /// Frame index shown at `time` seconds.
    pub fn frame_at(&self, time: f64) -> u32 {
        if self.frames <= 1 || self.fps <= 0.0 {
            return 0;
        }
        ((time * self.fps as f64).floor() as u64 % self.frames as u64) as u32
    }

    fn frame_rect(&self, frame: u32) -> Bounds2 {
        Bounds2::new(
            frame as f32 * self.frame_width,
            0.0,
            self.frame_width,
            self.frame_height,
        )
    }
}

//=== Sprite ==============================================================

/// Drawable showing an animated sprite sheet once it has loaded.
#[derive(Debug, Clone)]
pub struct Sprite {
    sheet: Asset<SpriteSheet>,
}

impl Sprite {
    pub fn new(sheet: Asset<SpriteSheet>) -> Self {
        Self { sheet }
    }

    pub fn sheet(&self) -> &Asset<SpriteSheet> {
        &self.sheet
    }
}

impl Drawable for Sprite {
    fn draw(&self, canvas: &mut dyn Canvas, node: &SceneNode, time: f64) {
        let Some(sheet) = self.sheet.get() else {
            return;
        };
        let size = Vec2::new(sheet.frame_width, sheet.frame_height);
        let origin = -node.anchor().offset(size);
        let target = Bounds2::new(origin.x, origin.y, size.x, size.y);
        canvas.draw_image(sheet.image, sheet.frame_rect(sheet.frame_at(time)), target);
    }

    fn local_bounds(&self, node: &SceneNode) -> Option<Polygon2> {
        let sheet = self.sheet.get()?;
        Some(anchored_rect(
            node.anchor(),
            Vec2::new(sheet.frame_width, sheet.frame_height),
        ))
    }

    fn is_ready(&self) -> bool {
        self.sheet.is_ready()
    }
}

fn anchored_rect(anchor: Anchor, size: Vec2) -> Polygon2 {
    let origin = -anchor.offset(size);
    Polygon2::rect(origin.x, origin.y, size.x, size.y)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{DrawCommand, RecordingCanvas};
    use crate::core::scene_graph::{Dirty, SceneGraph};

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            image: ImageId(1),
            frame_width: 16.0,
            frame_height: 24.0,
            frames: 4,
            fps: 8.0,
        }
    }

    #[test]
    fn asset_is_write_once() {
        let asset = Asset::pending();
        assert!(!asset.is_ready());

        assert!(asset.set(1));
        assert!(!asset.set(2));
        assert_eq!(asset.get(), Some(&1));
    }

    #[test]
    fn clones_see_late_value() {
        let asset = Asset::pending();
        let held_by_node = asset.clone();

        asset.set("sheet");

        assert!(held_by_node.is_ready());
    }

    #[test]
    fn frame_index_wraps() {
        let sheet = sheet();
        assert_eq!(sheet.frame_at(0.0), 0);
        assert_eq!(sheet.frame_at(0.25), 2);
        assert_eq!(sheet.frame_at(0.5), 0);
    }

    #[test]
    fn sprite_draws_nothing_until_loaded() {
        let asset = Asset::pending();
        let sprite = Sprite::new(asset.clone());
        let node = SceneNode::new();
        let mut canvas = RecordingCanvas::new(32, 32);

        sprite.draw(&mut canvas, &node, 0.0);
        assert!(canvas.commands().is_empty());
        assert!(sprite.local_bounds(&node).is_none());

        asset.set(sheet());
        sprite.draw(&mut canvas, &node, 0.125);

        match &canvas.commands()[0] {
            DrawCommand::DrawImage { source, .. } => {
                assert_eq!(*source, Bounds2::new(16.0, 0.0, 16.0, 24.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn node_bounds_follow_late_asset() {
        let asset = Asset::pending();
        let mut graph = SceneGraph::new();
        let node = graph.insert(SceneNode::new().with_drawable(Sprite::new(asset.clone())));
        let root = graph.root();
        graph.append_child(root, node).expect("append");

        assert_eq!(graph.bounds(node).map(|b| b.bounds().width()), Some(0.0));
        assert!(!graph.contains_point(node, Vec2::new(5.0, 5.0)));

        asset.set(sheet());

        let bounds = graph.bounds(node).map(|b| b.bounds());
        assert_eq!(bounds, Some(Bounds2::new(0.0, 0.0, 16.0, 24.0)));
        assert!(graph.contains_point(node, Vec2::new(5.0, 5.0)));
        assert!(!graph.is_dirty(node, Dirty::BOUNDS));
    }
}
