//=========================================================================
// Render Targets
//=========================================================================
//
// Immediate-mode 2D drawing surface used by the scene pipeline.
//
// Responsibilities:
// - Define the `Canvas` trait every backend implements
// - Provide the colour / composite / image vocabulary drawables use
// - Ship a `RecordingCanvas` backend for headless runs and tests
//
// The canvas keeps a state stack (transform, global alpha, composite
// operation). `save` pushes it, `restore` pops it. Drawing commands use
// the state current at the time of the call.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod recording;

pub use recording::{DrawCommand, DrawState, RecordingCanvas};

//=== Standard Library Imports ============================================

use std::any::Any;

//=== Internal Imports ====================================================

use crate::core::geometry::{Affine2, Bounds2, Polygon2};

//=== CompositeOperation ==================================================

/// How source pixels combine with what is already on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    Screen,
    Multiply,
    Lighter,
}

//=== Rgba ================================================================

/// Straight-alpha colour with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

//=== ImageId =============================================================

/// Backend-specific handle to a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

//=== Canvas ==============================================================

/// 2D render target.
pub trait Canvas: Any {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resizes the target. Content is dropped.
    fn resize(&mut self, width: u32, height: u32);

    /// Shows the finished frame. Offscreen and headless targets ignore it.
    fn present(&mut self) {}

    //--- State Stack ------------------------------------------------------

    fn save(&mut self);
    fn restore(&mut self);

    /// Post-multiplies the current transform by `matrix`.
    fn transform(&mut self, matrix: &Affine2);
    fn set_transform(&mut self, matrix: &Affine2);
    fn current_transform(&self) -> Affine2;

    fn set_composite_operation(&mut self, operation: CompositeOperation);
    fn composite_operation(&self) -> CompositeOperation;

    fn set_global_alpha(&mut self, alpha: f32);
    fn global_alpha(&self) -> f32;

    //--- Drawing ----------------------------------------------------------

    /// Drops all content and resets the state stack.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Bounds2, color: Rgba);
    fn fill_polygon(&mut self, polygon: &Polygon2, color: Rgba);

    /// Draws the `source` region of `image` into `target` (local space).
    fn draw_image(&mut self, image: ImageId, source: Bounds2, target: Bounds2);

    /// Creates an offscreen target compatible with this canvas.
    fn create_offscreen(&self, width: u32, height: u32) -> Box<dyn Canvas>;

    /// Composites another canvas with its top-left corner at `(x, y)`.
    fn draw_canvas(&mut self, source: &dyn Canvas, x: f32, y: f32);

    fn as_any(&self) -> &dyn Any;
}
