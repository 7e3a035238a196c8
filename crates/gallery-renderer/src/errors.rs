//! Gallery renderer error types.
//!
//! Nothing in the reconciliation core is fatal. Surface errors are logged at
//! the dispatch boundary and counted; they never flow back into reconciler
//! state.

use thiserror::Error;

/// Failure reported by the external render surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The engine rejected the call (bad state, decode not available, ...).
    #[error("Render surface rejected call: {0}")]
    Rejected(String),

    /// The drawable target is no longer attached.
    #[error("Render target detached: {0}")]
    TargetDetached(String),

    /// The operation is not available on this platform or target.
    #[error("Unsupported surface operation: {0}")]
    Unsupported(String),
}

impl SurfaceError {
    /// Returns a bounded label for metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            SurfaceError::Rejected(_) => "rejected",
            SurfaceError::TargetDetached(_) => "detached",
            SurfaceError::Unsupported(_) => "unsupported",
        }
    }
}

/// Gallery renderer error type for the owning layer (views, trackers, replay).
#[derive(Debug, Error)]
pub enum GalleryError {
    /// A component that spawns tasks was created outside a tokio runtime.
    #[error("No async runtime available: {0}")]
    Runtime(String),

    /// The dimension tracker task has exited.
    #[error("Dimension tracker closed")]
    TrackerClosed,

    /// Replay scenario could not be read or parsed.
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// Surface error surfaced to a caller that asked for it explicitly.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}
