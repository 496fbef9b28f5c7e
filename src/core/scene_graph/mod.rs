//=========================================================================
// Scene Graph
//
// Hierarchical, layered node tree with lazily derived geometry.
//
// Responsibilities:
// - Own every node of a scene in a generational arena
// - Derive scene transforms and bounds on demand, cached behind dirty
//   flags and revision numbers
// - Aggregate which layers a subtree uses so drawing can prune branches
// - Drive per-frame updates, per-layer drawing and pointer picking
//
// Notes:
// Layer indices live in `0..=31` so a whole scene's layer usage fits in a
// `u32` mask. `Layer` is the only way to name one; constructing it
// validates the index.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod capability;
pub mod graph;
pub mod node;

//=== Re-exports ==========================================================

pub use capability::{
    AsAny, Behavior, Clickable, Drawable, Interactable, PointerEvent, RectShape, UpdateContext,
    Updatable,
};
pub use graph::SceneGraph;
pub use node::{NodeId, SceneNode};

//=== External Crates =====================================================

use bitflags::bitflags;

//=== Internal Imports ====================================================

use crate::core::error::{EngineError, EngineResult};

//=== Dirty ===============================================================

bitflags! {
    /// Derived aspects of a node that need recomputation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Dirty: u8 {
        const TRANSFORM = 1 << 0;
        const BOUNDS    = 1 << 1;
        const RENDERING = 1 << 2;
    }
}

//=== Layer ===============================================================

/// Draw layer index in `0..=31`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Layer(u8);

impl Layer {
    pub const DEFAULT: Layer = Layer(0);
    pub const MAX: u32 = 31;

    pub fn new(index: u32) -> EngineResult<Layer> {
        if index > Self::MAX {
            return Err(EngineError::InvalidLayer(index));
        }
        Ok(Layer(index as u8))
    }

    pub fn index(&self) -> u32 {
        self.0 as u32
    }

    /// Single-bit mask for this layer.
    pub fn bit(&self) -> u32 {
        1 << self.0
    }

    /// Layers set in `mask`, ascending.
    pub fn iter_mask(mask: u32) -> impl Iterator<Item = Layer> {
        (0..=Self::MAX as u8)
            .filter(move |i| mask & (1 << i) != 0)
            .map(Layer)
    }
}

impl TryFrom<u32> for Layer {
    type Error = EngineError;

    fn try_from(index: u32) -> EngineResult<Layer> {
        Layer::new(index)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_out_of_range_is_an_error() {
        assert!(matches!(Layer::new(32), Err(EngineError::InvalidLayer(32))));
        assert_eq!(Layer::new(31).map(|l| l.bit()).ok(), Some(1 << 31));
    }

    #[test]
    fn iter_mask_is_ascending() {
        let layers: Vec<u32> = Layer::iter_mask(0b1010_0001).map(|l| l.index()).collect();
        assert_eq!(layers, vec![0, 5, 7]);
    }
}
