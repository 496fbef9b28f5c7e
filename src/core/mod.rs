//=========================================================================
// Core Systems
//
// Host-agnostic engine systems.
//
// Responsibilities:
// - Typed pub-sub signals and one-shot deferred completions
// - Input normalization from keyboard and gamepads into intents
// - The layered scene graph and its capabilities
// - Scenes, stages, cameras, transitions and the scene stack
// - The frame clock and the runtime that drives one frame per tick
//
// Notes:
// Everything here is single-threaded and shares state through `Rc`
// handles. The only cross-boundary type is `RawInput`, which the
// platform host queues for the runtime.
//
//=========================================================================

//=== Foundations =========================================================

pub mod deferred;
pub mod error;
pub mod geometry;
pub mod signal;

//=== Systems =============================================================

pub mod assets;
pub mod input;
pub mod render;
pub mod scene;
pub mod scene_graph;

//=== Frame Driver ========================================================

pub mod config;
pub mod game_loop;
pub mod runtime;
