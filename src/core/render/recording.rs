//=========================================================================
// Recording Canvas
//=========================================================================
//
// `Canvas` backend that stores every draw call with the state it was
// issued under. Used as the headless surface and by the draw-pipeline
// tests.
//
//=========================================================================

use std::any::Any;

use crate::core::geometry::{Affine2, Bounds2, Polygon2};

use super::{Canvas, CompositeOperation, ImageId, Rgba};

//=== DrawState ===========================================================

/// Canvas state captured with each command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub transform: Affine2,
    pub alpha: f32,
    pub composite: CompositeOperation,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            composite: CompositeOperation::SourceOver,
        }
    }
}

//=== DrawCommand =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Bounds2,
        color: Rgba,
        state: DrawState,
    },
    FillPolygon {
        polygon: Polygon2,
        color: Rgba,
        state: DrawState,
    },
    DrawImage {
        image: ImageId,
        source: Bounds2,
        target: Bounds2,
        state: DrawState,
    },
    /// Another canvas composited onto this one. `commands` holds the
    /// source's recording when it was a `RecordingCanvas`.
    DrawCanvas {
        commands: Vec<DrawCommand>,
        x: f32,
        y: f32,
        state: DrawState,
    },
}

impl DrawCommand {
    pub fn state(&self) -> &DrawState {
        match self {
            DrawCommand::FillRect { state, .. }
            | DrawCommand::FillPolygon { state, .. }
            | DrawCommand::DrawImage { state, .. }
            | DrawCommand::DrawCanvas { state, .. } => state,
        }
    }
}

//=== RecordingCanvas =====================================================

#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    state: DrawState,
    stack: Vec<DrawState>,
    commands: Vec<DrawCommand>,
    presented: usize,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: DrawState::default(),
            stack: Vec::new(),
            commands: Vec::new(),
            presented: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }

    /// Depth of unmatched `save` calls.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.clear();
    }

    fn present(&mut self) {
        self.presented += 1;
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn transform(&mut self, matrix: &Affine2) {
        self.state.transform = self.state.transform * *matrix;
    }

    fn set_transform(&mut self, matrix: &Affine2) {
        self.state.transform = *matrix;
    }

    fn current_transform(&self) -> Affine2 {
        self.state.transform
    }

    fn set_composite_operation(&mut self, operation: CompositeOperation) {
        self.state.composite = operation;
    }

    fn composite_operation(&self) -> CompositeOperation {
        self.state.composite
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.stack.clear();
        self.state = DrawState::default();
    }

    fn fill_rect(&mut self, rect: Bounds2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            state: self.state,
        });
    }

    fn fill_polygon(&mut self, polygon: &Polygon2, color: Rgba) {
        self.commands.push(DrawCommand::FillPolygon {
            polygon: polygon.clone(),
            color,
            state: self.state,
        });
    }

    fn draw_image(&mut self, image: ImageId, source: Bounds2, target: Bounds2) {
        self.commands.push(DrawCommand::DrawImage {
            image,
            source,
            target,
            state: self.state,
        });
    }

    fn create_offscreen(&self, width: u32, height: u32) -> Box<dyn Canvas> {
        Box::new(RecordingCanvas::new(width, height))
    }

    fn draw_canvas(&mut self, source: &dyn Canvas, x: f32, y: f32) {
        let commands = source
            .as_any()
            .downcast_ref::<RecordingCanvas>()
            .map(|recording| recording.commands.clone())
            .unwrap_or_default();
        self.commands.push(DrawCommand::DrawCanvas {
            commands,
            x,
            y,
            state: self.state,
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn save_restore_round_trips_state() {
        let mut canvas = RecordingCanvas::new(10, 10);
        canvas.save();
        canvas.transform(&Affine2::from_translation(Vec2::new(3.0, 0.0)));
        canvas.set_global_alpha(0.5);
        canvas.set_composite_operation(CompositeOperation::Multiply);
        canvas.restore();

        assert_eq!(canvas.current_transform(), Affine2::IDENTITY);
        assert_eq!(canvas.global_alpha(), 1.0);
        assert_eq!(canvas.composite_operation(), CompositeOperation::SourceOver);
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn commands_capture_current_state() {
        let mut canvas = RecordingCanvas::new(10, 10);
        canvas.transform(&Affine2::from_translation(Vec2::new(1.0, 2.0)));
        canvas.fill_rect(Bounds2::new(0.0, 0.0, 1.0, 1.0), Rgba::WHITE);

        let state = canvas.commands()[0].state();
        assert_eq!(state.transform.translation, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn draw_canvas_embeds_recording() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let mut offscreen = canvas.create_offscreen(10, 10);
        offscreen.fill_rect(Bounds2::new(0.0, 0.0, 10.0, 10.0), Rgba::BLACK);

        canvas.draw_canvas(offscreen.as_ref(), 0.0, 0.0);

        match &canvas.commands()[0] {
            DrawCommand::DrawCanvas { commands, .. } => assert_eq!(commands.len(), 1),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn restore_without_save_is_ignored() {
        let mut canvas = RecordingCanvas::new(4, 4);
        canvas.set_global_alpha(0.25);
        canvas.restore();
        assert_eq!(canvas.global_alpha(), 0.25);
    }
}
