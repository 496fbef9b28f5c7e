//=========================================================================
// Lantern Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  Platform (winit)
//         │                          │                     │
//         ├─ with_max_dt()           ├─ init()             └─ RedrawRequested
//         ├─ with_size()             └─ runtime_mut()           → Runtime::tick()
//         └─ with_channel_capacity()
// ```
//
//=========================================================================

//=== Standard Library ====================================================

use std::fmt;
use std::rc::Rc;

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::config::EngineConfig;
use crate::core::error::EngineResult;
use crate::core::render::{Canvas, RecordingCanvas};
use crate::core::runtime::Runtime;
use crate::platform::Platform;

//=== EngineBuilder =======================================================

/// Creates the frame surface for a given logical size.
type SurfaceFactory = Rc<dyn Fn(u32, u32) -> Box<dyn Canvas>>;

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Max dt**: 0.1 s
/// - **Channel capacity**: 128 events
/// - **Size**: 480 × 270
/// - **Title**: "Lantern"
/// - **Axis threshold**: 0.5
/// - **Stick deadzone**: 0.25
/// - **Surface**: [`RecordingCanvas`] (headless: frames are recorded, not
///   shown). Install a window-backed canvas with
///   [`with_surface`](Self::with_surface).
///
/// # Examples
///
/// Simple usage with defaults:
/// ```no_run
/// use lantern_engine::EngineBuilder;
///
/// EngineBuilder::new().build().run().expect("engine failed");
/// ```
///
/// With initialization:
/// ```no_run
/// # use lantern_engine::prelude::*;
/// struct Title {
///     stage: Stage,
/// }
///
/// impl Scene for Title {
///     fn stage(&self) -> &Stage { &self.stage }
///     fn stage_mut(&mut self) -> &mut Stage { &mut self.stage }
/// }
///
/// EngineBuilder::new()
///     .with_size(640, 360)
///     .build()
///     .init(|runtime| {
///         let (width, height) = (runtime.width(), runtime.height());
///         runtime.scenes_mut().push(Title { stage: Stage::new(width, height) });
///     })
///     .run()
///     .expect("engine failed");
/// ```
#[derive(Clone)]
pub struct EngineBuilder {
    config: EngineConfig,
    surface: Option<SurfaceFactory>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            surface: None,
        }
    }

    /// Upper clamp for the frame delta. Frames slower than this run the
    /// simulation in slow motion instead of jumping.
    ///
    /// # Panics
    ///
    /// Panics if `max_dt <= 0.0`.
    pub fn with_max_dt(mut self, max_dt: f64) -> Self {
        assert!(max_dt > 0.0, "max_dt must be positive, got {}", max_dt);
        self.config.max_dt = max_dt;
        self
    }

    /// Capacity of the platform → runtime input queue. Input arriving while
    /// the queue is full is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// Logical canvas size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Size must be non-zero, got {}x{}", width, height);
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// # Panics
    ///
    /// Panics if `threshold` is not within `(0, 1)`.
    pub fn with_axis_threshold(mut self, threshold: f32) -> Self {
        assert!(
            threshold > 0.0 && threshold < 1.0,
            "Axis threshold must be within (0, 1), got {}",
            threshold
        );
        self.config.axis_threshold = threshold;
        self
    }

    /// # Panics
    ///
    /// Panics if `deadzone` is not within `[0, 1)`.
    pub fn with_stick_deadzone(mut self, deadzone: f32) -> Self {
        assert!(
            (0.0..1.0).contains(&deadzone),
            "Stick deadzone must be within [0, 1), got {}",
            deadzone
        );
        self.config.stick_deadzone = deadzone;
        self
    }

    /// Surface the runtime draws every frame into. The factory receives
    /// the logical size; the canvas's `present` is called once per drawn
    /// frame and `resize` on window resizes.
    pub fn with_surface<F>(mut self, factory: F) -> Self
    where
        F: Fn(u32, u32) -> Box<dyn Canvas> + 'static,
    {
        self.surface = Some(Rc::new(factory));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds the engine. Without [`with_surface`](Self::with_surface) the
    /// engine draws into a headless [`RecordingCanvas`].
    pub fn build(self) -> Engine {
        let config = self.config;
        info!(
            "Building engine ({}x{}, max dt: {}, channel: {})",
            config.width, config.height, config.max_dt, config.channel_capacity
        );

        let surface: Box<dyn Canvas> = match &self.surface {
            Some(factory) => factory(config.width, config.height),
            None => Box::new(RecordingCanvas::new(config.width, config.height)),
        };
        Engine {
            runtime: Runtime::new(&config, surface),
            config,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("config", &self.config)
            .field("custom_surface", &self.surface.is_some())
            .finish()
    }
}

//=== Engine ==============================================================

/// Configured engine, ready to run.
///
/// Create via [`EngineBuilder`].
pub struct Engine {
    runtime: Runtime,
    config: EngineConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to the [`Runtime`] before the loop starts
    /// (push the first scene, bind keys, install a gamepad source).
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut Runtime),
    {
        info!("Initializing engine systems");
        init_fn(&mut self.runtime);
        info!("Engine initialization complete");
        self
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until it is closed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EventLoop`](crate::core::error::EngineError)
    /// when the platform event loop fails.
    pub fn run(self) -> EngineResult<()> {
        info!("Starting engine runtime");

        let platform = Platform::new(self.runtime, &self.config);
        platform.run()?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.config(), &EngineConfig::default());
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_max_dt(0.05)
            .with_channel_capacity(256)
            .with_size(320, 180)
            .with_title("Test")
            .with_axis_threshold(0.4)
            .with_stick_deadzone(0.1)
            .build();

        let config = engine.config();
        assert_eq!(config.max_dt, 0.05);
        assert_eq!(config.channel_capacity, 256);
        assert_eq!((config.width, config.height), (320, 180));
        assert_eq!(config.title, "Test");
        assert_eq!(engine.runtime().width(), 320);
    }

    #[test]
    #[should_panic(expected = "max_dt must be positive")]
    fn builder_with_max_dt_panics_on_zero() {
        EngineBuilder::new().with_max_dt(0.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Size must be non-zero")]
    fn builder_with_size_panics_on_zero() {
        EngineBuilder::new().with_size(0, 10);
    }

    #[test]
    #[should_panic(expected = "Axis threshold must be within (0, 1)")]
    fn builder_with_axis_threshold_panics_out_of_range() {
        EngineBuilder::new().with_axis_threshold(1.0);
    }

    #[test]
    #[should_panic(expected = "Stick deadzone must be within [0, 1)")]
    fn builder_with_stick_deadzone_panics_out_of_range() {
        EngineBuilder::new().with_stick_deadzone(-0.1);
    }

    #[test]
    fn custom_surface_receives_frames() {
        let mut engine = EngineBuilder::new()
            .with_size(40, 30)
            .with_surface(|width, height| Box::new(RecordingCanvas::new(width, height)))
            .build();

        assert_eq!(engine.runtime().surface().width(), 40);
        engine.runtime_mut().tick(0.0);

        let presented = engine
            .runtime()
            .surface()
            .as_any()
            .downcast_ref::<RecordingCanvas>()
            .map(RecordingCanvas::presented);
        assert_eq!(presented, Some(1));
    }

    #[test]
    fn init_runs_against_the_runtime() {
        let engine = EngineBuilder::new()
            .build()
            .init(|runtime| runtime.set_paused(true));

        assert!(engine.runtime().is_paused());
    }
}
