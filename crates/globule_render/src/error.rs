use crate::backend::InitStage;
use crate::engine::EngineState;
use thiserror::Error;

/// Failures while bringing up or driving a surface.
///
/// Acquisition errors are terminal for the surface instance: the engine goes
/// to `Failed` and stays there until the host creates the surface again.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no display adapter available")]
    NoDisplay,

    #[error("no surface configuration matches: {0}")]
    NoMatchingConfig(String),

    #[error("drawing surface creation failed: {0}")]
    Surface(String),

    #[error("rendering context creation failed: {0}")]
    Context(String),

    #[error("shader program failed to build: {0}")]
    Program(String),

    #[error("frame failed: {0}")]
    Frame(String),

    #[error("GPU out of memory")]
    OutOfMemory,

    #[error("surface is not ready (state: {0:?})")]
    NotReady(EngineState),
}

impl RenderError {
    /// Init stage that produced this error, if it is an acquisition failure.
    pub fn stage(&self) -> Option<InitStage> {
        match self {
            RenderError::NoDisplay => Some(InitStage::Display),
            RenderError::NoMatchingConfig(_) => Some(InitStage::Config),
            RenderError::Surface(_) => Some(InitStage::Surface),
            RenderError::Context(_) => Some(InitStage::Context),
            RenderError::Program(_) => Some(InitStage::Program),
            RenderError::Frame(_) | RenderError::OutOfMemory | RenderError::NotReady(_) => None,
        }
    }

    /// Fatal errors stop the render loop; anything else is retried next frame.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RenderError::Frame(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_frame_errors_are_transient() {
        assert!(!RenderError::Frame("timeout".into()).is_fatal());
        assert!(RenderError::OutOfMemory.is_fatal());
        assert!(RenderError::Program("link".into()).is_fatal());
    }

    #[test]
    fn acquisition_errors_name_their_stage() {
        for stage in InitStage::ALL {
            assert_eq!(stage.error().stage(), Some(stage));
        }
        assert_eq!(RenderError::OutOfMemory.stage(), None);
    }
}
