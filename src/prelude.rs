//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use lantern_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::core::config::EngineConfig;
pub use crate::core::error::{EngineError, EngineResult};
pub use crate::core::runtime::{PauseState, Runtime};

// Signals and completions
pub use crate::core::deferred::Deferred;
pub use crate::core::signal::{Signal, SignalContext, SlotId};

// Geometry and rendering
pub use crate::core::geometry::{Affine2, Anchor, Bounds2, Polygon2, Vec2};
pub use crate::core::render::{Canvas, CompositeOperation, Rgba};

// Input system
pub use crate::core::input::{
    ControllerEvent, ControllerEventType, ControllerFamily, ControllerManager, Intents, KeyCode,
    Modifiers, MouseButton,
};

// Scene graph
pub use crate::core::scene_graph::{
    Behavior, Drawable, Interactable, Layer, NodeId, SceneGraph, SceneNode, Updatable,
    UpdateContext,
};

// Scene system
pub use crate::core::scene::{Camera, FadeTransition, Scene, Scenes, Stage, Transition};

// Assets
pub use crate::core::assets::{Asset, Sprite, SpriteSheet};
