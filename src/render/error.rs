//! Renderer error kinds.

use thiserror::Error;

/// Errors surfaced by configuration validation and frame rendering.
///
/// Configuration errors fail fast before any frame is produced. Numeric
/// errors (a singular camera) abort the frame rather than emit garbage.
/// Degenerate geometry is never an error; bad triangles are skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("output size {width}x{height} is invalid; both dimensions must be at least 1")]
    InvalidSize { width: u32, height: u32 },

    #[error("MSAA factor {0} is invalid; must be at least 1")]
    InvalidMsaa(u32),

    #[error("worker count must be at least 1")]
    InvalidWorkers,

    #[error("no scene configured")]
    MissingScene,

    #[error("no camera configured")]
    MissingCamera,

    #[error("camera view/projection is singular (coincident eye and target, or up parallel to view)")]
    SingularProjection,

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}
