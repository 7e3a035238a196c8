//! Render surface capability consumed by the gallery.
//!
//! The media engine composites decoded video onto a drawable target. All
//! calls are asynchronous and fallible; callers treat them as best-effort.
//!
//! # Modules
//!
//! - [`dispatch`] - Per-participant FIFO execution of [`RenderOp`]s

pub mod dispatch;

use async_trait::async_trait;
use common::types::{CellGeometry, Dimension, UserId};
use std::fmt;

use crate::errors::SurfaceError;

pub use dispatch::SurfaceDispatcher;

/// Name of the drawable a surface call applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceTarget(String);

impl SurfaceTarget {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tile compositing operations of the media engine.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Begin (or replace) compositing `user_id` into the cell at its quality.
    async fn render_start(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
        geometry: CellGeometry,
    ) -> Result<(), SurfaceError>;

    /// Cease compositing `user_id` and release its decode resources.
    async fn stop_render(&self, target: &SurfaceTarget, user_id: UserId)
        -> Result<(), SurfaceError>;

    /// Move or resize an active tile. Quality is not touched.
    async fn adjust_position(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
        geometry: CellGeometry,
    ) -> Result<(), SurfaceError>;

    /// Resize the drawable when the host could not assign its pixel size.
    async fn update_canvas_dimension(
        &self,
        target: &SurfaceTarget,
        dimension: Dimension,
    ) -> Result<(), SurfaceError>;
}

/// Screen-share viewing operations of the media engine.
#[async_trait]
pub trait ShareSurface: Send + Sync {
    async fn start_share_view(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
    ) -> Result<(), SurfaceError>;

    async fn stop_share_view(&self) -> Result<(), SurfaceError>;

    async fn update_sharing_canvas_dimension(
        &self,
        dimension: Dimension,
    ) -> Result<(), SurfaceError>;
}

/// Kind of a tile operation, used for logs and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    RenderStart,
    StopRender,
    AdjustPosition,
}

impl OpKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            OpKind::RenderStart => "render_start",
            OpKind::StopRender => "stop_render",
            OpKind::AdjustPosition => "adjust_position",
        }
    }
}

/// One tile operation emitted by a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOp {
    Start {
        user_id: UserId,
        geometry: CellGeometry,
    },
    Stop {
        user_id: UserId,
    },
    /// Quality of `geometry` is ignored by the surface.
    Adjust {
        user_id: UserId,
        geometry: CellGeometry,
    },
}

impl RenderOp {
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            RenderOp::Start { user_id, .. }
            | RenderOp::Stop { user_id }
            | RenderOp::Adjust { user_id, .. } => *user_id,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> OpKind {
        match self {
            RenderOp::Start { .. } => OpKind::RenderStart,
            RenderOp::Stop { .. } => OpKind::StopRender,
            RenderOp::Adjust { .. } => OpKind::AdjustPosition,
        }
    }

    /// Execute this operation against `surface`.
    pub async fn execute(
        &self,
        surface: &dyn RenderSurface,
        target: &SurfaceTarget,
    ) -> Result<(), SurfaceError> {
        match *self {
            RenderOp::Start { user_id, geometry } => {
                surface.render_start(target, user_id, geometry).await
            }
            RenderOp::Stop { user_id } => surface.stop_render(target, user_id).await,
            RenderOp::Adjust { user_id, geometry } => {
                surface.adjust_position(target, user_id, geometry).await
            }
        }
    }
}
