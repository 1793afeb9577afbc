//! Typed errors for the rendering collaborators.
//!
//! Everything else in the crate either cannot fail (geometry, layout) or
//! reports through `anyhow` (configuration, frame dumps).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The texture was never uploaded or has been destroyed.
    #[error("invalid or destroyed texture {0}")]
    InvalidTexture(u64),

    /// A render target or texture with zero width or height was requested.
    #[error("cannot allocate an empty {0}x{1} target")]
    EmptyTarget(i32, i32),
}
