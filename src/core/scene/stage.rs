//=========================================================================
// Stage
//=========================================================================
//
// A scene's world: node graph, camera, transitions and layer roles.
//
// Draw pipeline (per frame):
// ```text
// camera transform pushed
// for layer in ascending(layers in tree & !hidden_layers):
//     light?  → offscreen: black fill, Screen-composite the layer's nodes,
//               then composite the buffer in screen space
//               (Multiply once a non-light layer was drawn, else SourceOver)
//     hud?    → draw under the inverse camera transform (screen space)
//     else    → draw in camera space
// camera transform popped
// running transitions drawn on top, screen space
// ```
// A layer flagged both light and HUD is treated as light.
//
//=========================================================================

//=== External Crates =====================================================

use log::debug;

//=== Internal Imports ====================================================

use super::camera::Camera;
use super::transition::Transition;
use crate::core::deferred::Deferred;
use crate::core::error::EngineResult;
use crate::core::geometry::{Affine2, Bounds2, Vec2};
use crate::core::input::{ControllerManager, MouseButton};
use crate::core::render::{Canvas, CompositeOperation, Rgba};
use crate::core::scene_graph::{Layer, NodeId, PointerEvent, SceneGraph};

//=== Stage ===============================================================

pub struct Stage {
    graph: SceneGraph,
    camera: Camera,
    in_transition: Option<Box<dyn Transition>>,
    out_transition: Option<Box<dyn Transition>>,
    hidden_layers: u32,
    light_layers: u32,
    hud_layers: u32,
    used_layers: u32,
    width: u32,
    height: u32,
    light_buffer: Option<Box<dyn Canvas>>,
}

impl Stage {
    pub fn new(width: u32, height: u32) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        graph.resize_to(root, width as f32, height as f32);

        Self {
            graph,
            camera: Camera::new(),
            in_transition: None,
            out_transition: None,
            hidden_layers: 0,
            light_layers: 0,
            hud_layers: 0,
            used_layers: 0,
            width,
            height,
            light_buffer: None,
        }
    }

    pub fn with_in_transition(mut self, transition: impl Transition + 'static) -> Self {
        self.in_transition = Some(Box::new(transition));
        self
    }

    pub fn with_out_transition(mut self, transition: impl Transition + 'static) -> Self {
        self.out_transition = Some(Box::new(transition));
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn root(&self) -> NodeId {
        self.graph.root()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Layers in use as of the last update.
    pub fn used_layers(&self) -> u32 {
        self.used_layers
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        let root = self.graph.root();
        self.graph.resize_to(root, width as f32, height as f32);
    }

    //--- Layer Roles ------------------------------------------------------

    pub fn set_layer_hidden(&mut self, layer: u32, hidden: bool) -> EngineResult<()> {
        set_bit(&mut self.hidden_layers, Layer::new(layer)?, hidden);
        Ok(())
    }

    pub fn set_light_layer(&mut self, layer: u32, light: bool) -> EngineResult<()> {
        set_bit(&mut self.light_layers, Layer::new(layer)?, light);
        Ok(())
    }

    pub fn set_hud_layer(&mut self, layer: u32, hud: bool) -> EngineResult<()> {
        set_bit(&mut self.hud_layers, Layer::new(layer)?, hud);
        Ok(())
    }

    pub fn hidden_layers(&self) -> u32 {
        self.hidden_layers
    }

    pub fn light_layers(&self) -> u32 {
        self.light_layers
    }

    pub fn hud_layers(&self) -> u32 {
        self.hud_layers
    }

    //--- Transitions ------------------------------------------------------

    /// Starts the in-transition, if any.
    pub fn start_in_transition(&mut self) -> Option<Deferred<()>> {
        self.in_transition.as_mut().map(|t| t.start())
    }

    /// Starts the out-transition, if any.
    pub fn start_out_transition(&mut self) -> Option<Deferred<()>> {
        self.out_transition.as_mut().map(|t| t.start())
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitions().any(|t| t.is_running())
    }

    /// Advances running transitions only.
    pub fn update_transitions(&mut self, dt: f64) {
        for transition in [&mut self.in_transition, &mut self.out_transition]
            .into_iter()
            .flatten()
        {
            transition.update(dt);
        }
    }

    fn transitions(&self) -> impl Iterator<Item = &dyn Transition> {
        [&self.in_transition, &self.out_transition]
            .into_iter()
            .flatten()
            .map(|t| &**t)
    }

    //--- update() ---------------------------------------------------------

    pub fn update(&mut self, dt: f64, time: f64, controllers: &ControllerManager) {
        self.used_layers = self.graph.update(dt, time, controllers);
        self.camera
            .update(dt, &self.graph, self.width as f32, self.height as f32);
        self.update_transitions(dt);
    }

    //--- draw() -----------------------------------------------------------

    pub fn draw(&mut self, canvas: &mut dyn Canvas, time: f64) {
        let camera = self.scene_transformation();
        let inverse = camera.inverse();
        let visible = self.visible_layers();
        let mut drew_base = false;

        canvas.save();
        canvas.transform(&camera);

        for layer in Layer::iter_mask(visible) {
            let bit = layer.bit();
            if self.light_layers & bit != 0 {
                self.draw_light_layer(canvas, layer, &camera, drew_base, time);
            } else if self.hud_layers & bit != 0 {
                canvas.save();
                canvas.transform(&inverse);
                drew_base |= self.graph.draw_layer(canvas, layer, time);
                canvas.restore();
            } else {
                drew_base |= self.graph.draw_layer(canvas, layer, time);
            }
        }

        canvas.restore();

        for transition in self.transitions() {
            if transition.is_running() {
                transition.draw(canvas, self.width, self.height);
            }
        }
    }

    fn draw_light_layer(
        &mut self,
        canvas: &mut dyn Canvas,
        layer: Layer,
        camera: &Affine2,
        drew_base: bool,
        time: f64,
    ) {
        let (width, height) = (self.width, self.height);
        let reusable = self
            .light_buffer
            .as_ref()
            .is_some_and(|b| b.width() == width && b.height() == height);
        if !reusable {
            debug!(target: "scene", "Allocating {width}x{height} light buffer");
            self.light_buffer = Some(canvas.create_offscreen(width, height));
        }
        let Some(buffer) = self.light_buffer.as_mut() else {
            return;
        };

        buffer.clear();
        buffer.fill_rect(Bounds2::new(0.0, 0.0, width as f32, height as f32), Rgba::BLACK);
        buffer.set_composite_operation(CompositeOperation::Screen);
        buffer.save();
        buffer.transform(camera);
        self.graph.draw_layer(&mut **buffer, layer, time);
        buffer.restore();

        let operation = if drew_base {
            CompositeOperation::Multiply
        } else {
            CompositeOperation::SourceOver
        };
        canvas.save();
        canvas.set_transform(&Affine2::IDENTITY);
        canvas.set_composite_operation(operation);
        canvas.draw_canvas(&**buffer, 0.0, 0.0);
        canvas.restore();
    }

    /// Layers present in the tree right now, minus hidden ones. Read from
    /// the graph so scenes that have not updated yet still draw.
    fn visible_layers(&self) -> u32 {
        self.graph.subtree_layers(self.graph.root()) & !self.hidden_layers
    }

    //--- Pointer ----------------------------------------------------------

    pub fn scene_transformation(&self) -> Affine2 {
        self.camera
            .scene_transformation(self.width as f32, self.height as f32)
    }

    /// Routes a screen-space press to the topmost interactive node.
    ///
    /// HUD layers are picked in screen space, everything else in scene
    /// space; HUD wins when both hit.
    pub fn pointer_down(&mut self, screen: Vec2, button: MouseButton) -> Option<NodeId> {
        let visible = self.visible_layers();
        let hud = visible & self.hud_layers & !self.light_layers;

        if hud != 0 {
            let event = PointerEvent { screen, scene: screen, button };
            if let Some(node) = self.graph.dispatch_pointer_down(&event, hud) {
                return Some(node);
            }
        }

        let scene = self
            .camera
            .screen_to_scene(screen, self.width as f32, self.height as f32);
        let event = PointerEvent { screen, scene, button };
        self.graph.dispatch_pointer_down(&event, visible & !hud)
    }
}

//--- Helpers -------------------------------------------------------------

fn set_bit(mask: &mut u32, layer: Layer, on: bool) {
    if on {
        *mask |= layer.bit();
    } else {
        *mask &= !layer.bit();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
