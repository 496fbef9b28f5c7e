//=========================================================================
// Engine Errors
//=========================================================================
//
// Programmer-error taxonomy surfaced to the host.
//
// Expected absence (missing optional node, detached node) is modelled with
// `Option` at the call site and never appears here. These variants
// indicate corrupt input or misuse and propagate with `?` to the host's
// top-level handler.
//
//=========================================================================

//=== EngineError =========================================================

/// Errors returned by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Layer index outside the 32-bit layer mask.
    #[error("invalid layer {0}, layers must be in 0..=31")]
    InvalidLayer(u32),

    /// A `NodeId` that no longer refers to a live node.
    #[error("unknown or destroyed scene node")]
    UnknownNode,

    /// Appending a node into its own subtree.
    #[error("cannot append a node into its own subtree")]
    CyclicAppend,

    /// The root node of a scene graph cannot be re-parented.
    #[error("the root node cannot be appended to another node")]
    RootReparent,

    /// Window / event loop failure from the platform layer.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Convenience alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_layer_message_names_the_layer() {
        let message = EngineError::InvalidLayer(40).to_string();
        assert!(message.contains("40"));
    }

    #[test]
    fn engine_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }
}
