//=========================================================================
// Lantern Engine — Library Root
//
// This crate defines the public API surface of the Lantern Engine, a 2D
// scene-graph engine core.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the core systems (signals, input, scene graph, scenes)
// - Keep the Winit host (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use lantern_engine::EngineBuilder;
//
// fn main() {
//     EngineBuilder::new().build().run().expect("engine failed");
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains every host-agnostic system: signals, input
// normalization, the scene graph, scenes and the frame runtime.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the Winit window and event loop integration and is
// not part of the public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
