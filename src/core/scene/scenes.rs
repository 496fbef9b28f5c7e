//=========================================================================
// Scenes
//=========================================================================
//
// Stack of scenes with sequenced, transition-aware switching.
//
// Every push / pop / set runs as one operation:
// ```text
// top.deactivate → top out-transition ─┐
//                                      ▼ (out-transition done)
//   push: new.setup, pushed
//   pop:  top.cleanup, removed
//   set:  cleanup every scene, new.setup, pushed
//                                      │
// new top in-transition ───────────────┘
//                                      ▼ (in-transition done)
// new top activate, operation resolved
// ```
// Operations requested while another one runs are queued and start in
// request order. Transitions are waited on across frames, so the stack
// only advances from `update`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::Scene;
use crate::core::deferred::Deferred;
use crate::core::geometry::Vec2;
use crate::core::input::{ControllerManager, MouseButton};
use crate::core::render::Canvas;
use crate::core::scene_graph::NodeId;

//=== Operation ===========================================================

enum Operation {
    Push(Box<dyn Scene>),
    Pop,
    Set(Box<dyn Scene>),
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::Push(_) => "push",
            Operation::Pop => "pop",
            Operation::Set(_) => "set",
        }
    }
}

//=== Phase ===============================================================

enum Phase {
    Idle,
    Leaving {
        operation: Operation,
        done: Deferred<()>,
        wait: Option<Deferred<()>>,
    },
    Entering {
        done: Deferred<()>,
        wait: Option<Deferred<()>>,
    },
}

fn is_pending(wait: &Option<Deferred<()>>) -> bool {
    wait.as_ref().is_some_and(|w| !w.is_resolved())
}

//=== Scenes ==============================================================

pub struct Scenes {
    stack: Vec<Box<dyn Scene>>,
    queue: VecDeque<(Operation, Deferred<()>)>,
    phase: Phase,
    controllers: ControllerManager,
}

impl Scenes {
    pub fn new(controllers: ControllerManager) -> Self {
        Self {
            stack: Vec::new(),
            queue: VecDeque::new(),
            phase: Phase::Idle,
            controllers,
        }
    }

    //--- Stack Operations -------------------------------------------------

    /// Pushes `scene` on top. Resolves once it is active.
    pub fn push(&mut self, scene: impl Scene + 'static) -> Deferred<()> {
        self.request(Operation::Push(Box::new(scene)))
    }

    /// Removes the top scene. Resolves once the new top is active, or
    /// right away when the stack is empty.
    pub fn pop(&mut self) -> Deferred<()> {
        self.request(Operation::Pop)
    }

    /// Replaces the whole stack with `scene`.
    pub fn set(&mut self, scene: impl Scene + 'static) -> Deferred<()> {
        self.request(Operation::Set(Box::new(scene)))
    }

    fn request(&mut self, operation: Operation) -> Deferred<()> {
        let done = Deferred::new();
        if !matches!(self.phase, Phase::Idle) || !self.queue.is_empty() {
            debug!(target: "scene", "Queued scene {} ({} pending)", operation.name(), self.queue.len() + 1);
        }
        self.queue.push_back((operation, done.clone()));
        self.advance();
        done
    }

    //--- Queries ----------------------------------------------------------

    /// The interactive top scene; `None` while switching.
    pub fn active(&self) -> Option<&dyn Scene> {
        match self.phase {
            Phase::Idle => self.stack.last().map(|s| &**s),
            _ => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn Scene + 'static)> {
        match self.phase {
            Phase::Idle => self.stack.last_mut().map(|s| &mut **s),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether an operation is running or queued.
    pub fn is_transitioning(&self) -> bool {
        !matches!(self.phase, Phase::Idle) || !self.queue.is_empty()
    }

    //--- update() ---------------------------------------------------------

    /// Updates the active scene, or only the running transition while
    /// switching, then advances pending operations.
    pub fn update(&mut self, dt: f64, time: f64) {
        if let Some(top) = self.stack.last_mut() {
            match self.phase {
                Phase::Idle => top.update(dt, time, &self.controllers),
                _ => top.stage_mut().update_transitions(dt),
            }
        }
        self.advance();
    }

    //--- draw() -----------------------------------------------------------

    /// Draws the top scene and, while it is transparent or entering, the
    /// scenes beneath it (bottom first).
    pub fn draw(&mut self, canvas: &mut dyn Canvas, time: f64) {
        let Some(top) = self.stack.len().checked_sub(1) else {
            return;
        };
        let entering = matches!(self.phase, Phase::Entering { .. });

        let mut first = top;
        while first > 0 {
            let scene = &self.stack[first];
            let see_through = scene.is_transparent() || (first == top && entering);
            if !see_through {
                break;
            }
            first -= 1;
        }

        for scene in &mut self.stack[first..] {
            scene.draw(canvas, time);
        }
    }

    //--- Input ------------------------------------------------------------

    /// Routes a press to the active scene. Ignored while switching.
    pub fn pointer_down(&mut self, screen: Vec2, button: MouseButton) -> Option<NodeId> {
        self.active_mut()?.pointer_down(screen, button)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        for scene in &mut self.stack {
            scene.stage_mut().resize(width, height);
        }
    }

    //--- Sequencing -------------------------------------------------------

    fn advance(&mut self) {
        loop {
            match &self.phase {
                Phase::Idle => match self.queue.pop_front() {
                    Some((operation, done)) => self.begin(operation, done),
                    None => return,
                },
                Phase::Leaving { wait, .. } | Phase::Entering { wait, .. } if is_pending(wait) => {
                    return;
                }
                Phase::Leaving { .. } => {
                    if let Phase::Leaving { operation, done, .. } =
                        std::mem::replace(&mut self.phase, Phase::Idle)
                    {
                        self.finish_leaving(operation, done);
                    }
                }
                Phase::Entering { .. } => {
                    if let Phase::Entering { done, .. } = std::mem::replace(&mut self.phase, Phase::Idle) {
                        self.finish_entering(done);
                    }
                }
            }
        }
    }

    fn begin(&mut self, operation: Operation, done: Deferred<()>) {
        if matches!(operation, Operation::Pop) && self.stack.is_empty() {
            warn!(target: "scene", "Pop requested on an empty scene stack");
            done.resolve(());
            return;
        }

        debug!(target: "scene", "Scene {} started", operation.name());
        let wait = match self.stack.last_mut() {
            Some(top) => {
                top.deactivate(&self.controllers);
                let stage = top.stage_mut();
                stage.graph_mut().set_active(false);
                stage.start_out_transition()
            }
            None => None,
        };
        self.phase = Phase::Leaving { operation, done, wait };
    }

    fn finish_leaving(&mut self, operation: Operation, done: Deferred<()>) {
        match operation {
            Operation::Push(mut scene) => {
                scene.setup(&self.controllers);
                self.stack.push(scene);
                info!(target: "scene", "Pushed scene (depth {})", self.stack.len());
            }
            Operation::Pop => {
                if let Some(mut scene) = self.stack.pop() {
                    scene.cleanup();
                }
                info!(target: "scene", "Popped scene (depth {})", self.stack.len());
            }
            Operation::Set(mut scene) => {
                while let Some(mut old) = self.stack.pop() {
                    old.cleanup();
                }
                scene.setup(&self.controllers);
                self.stack.push(scene);
                info!(target: "scene", "Set scene");
            }
        }

        match self.stack.last_mut() {
            Some(top) => {
                let wait = top.stage_mut().start_in_transition();
                self.phase = Phase::Entering { done, wait };
            }
            None => {
                done.resolve(());
            }
        }
    }

    fn finish_entering(&mut self, done: Deferred<()>) {
        if let Some(top) = self.stack.last_mut() {
            top.stage_mut().graph_mut().set_active(true);
            top.activate(&self.controllers);
        }
        debug!(target: "scene", "Scene switch finished");
        done.resolve(());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
