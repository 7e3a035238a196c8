//! Receiving a remote screen share.
//!
//! [`ShareViewController`] folds engine events into a receive state and
//! emits [`ShareOp`]s on edges. The shared content is letterboxed into the
//! share container (sized by a `DimensionTracker` with a short quiet period)
//! and never scaled up.
//!
//! Starting a local share suppresses receiving: active share events are
//! ignored until the local share ends.

use common::types::{Dimension, UserId};
use std::time::Instant;
use tracing::{debug, warn};

use crate::observability::metrics;
use crate::surface::{ShareSurface, SurfaceTarget};

/// Share activity state reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareState {
    Active,
    Inactive,
}

/// One entry of a participant update batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerUpdate {
    pub user_id: UserId,
    /// `None` when the update does not concern sharing.
    pub sharer_on: Option<bool>,
}

/// Operation on the share surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOp {
    StartView { user_id: UserId },
    StopView,
    ResizeCanvas(Dimension),
}

impl ShareOp {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ShareOp::StartView { .. } => "start_share_view",
            ShareOp::StopView => "stop_share_view",
            ShareOp::ResizeCanvas(_) => "update_sharing_canvas_dimension",
        }
    }
}

/// Largest size with the content's aspect ratio that fits the container,
/// never larger than the content itself. Sides are floored.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fit_share_view(content: Dimension, container: Dimension) -> Dimension {
    if content.is_empty() {
        return content;
    }

    let ratio = (f64::from(container.width) / f64::from(content.width))
        .min(f64::from(container.height) / f64::from(content.height))
        .min(1.0);

    // ratio is in [0, 1], so the products fit in u32
    Dimension::new(
        (f64::from(content.width) * ratio).floor() as u32,
        (f64::from(content.height) * ratio).floor() as u32,
    )
}

/// Receive-side share state machine.
#[derive(Debug, Clone, Default)]
pub struct ShareViewController {
    local_user: Option<UserId>,
    receiving: bool,
    started_share: bool,
    active_sharer: Option<UserId>,
    content: Dimension,
    container: Dimension,
    view: Dimension,
    /// Receive state the surface was last moved to.
    applied_receiving: bool,
    last_resize: Option<Dimension>,
}

impl ShareViewController {
    #[must_use]
    pub fn new(local_user: Option<UserId>) -> Self {
        Self {
            local_user,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_receiving(&self) -> bool {
        self.receiving
    }

    #[must_use]
    pub fn is_started_share(&self) -> bool {
        self.started_share
    }

    /// Either receiving or sending a share.
    #[must_use]
    pub fn is_sharing(&self) -> bool {
        self.receiving || self.started_share
    }

    #[must_use]
    pub fn active_sharer(&self) -> Option<UserId> {
        self.active_sharer
    }

    /// Fitted size of the share viewport.
    #[must_use]
    pub fn view(&self) -> Dimension {
        self.view
    }

    pub fn on_active_share_change(&mut self, state: ShareState, user_id: UserId) {
        if self.started_share {
            debug!(
                target: "gallery.share",
                user_id = %user_id,
                "Ignoring remote share change while sharing locally"
            );
            return;
        }
        self.active_sharer = Some(user_id);
        self.receiving = state == ShareState::Active;
    }

    pub fn on_content_dimension_change(&mut self, content: Dimension) {
        self.content = content;
    }

    /// Apply a participant update batch. Only the local user's sharer flag
    /// matters here.
    pub fn on_user_updates(&mut self, updates: &[SharerUpdate]) {
        let Some(local_user) = self.local_user else {
            return;
        };

        for update in updates.iter().filter(|u| u.user_id == local_user) {
            if let Some(sharer_on) = update.sharer_on {
                self.started_share = sharer_on;
                if sharer_on {
                    self.receiving = false;
                }
            }
        }
    }

    /// Stream attached; `active_sharer` is whoever the engine reports as
    /// already sharing.
    pub fn on_stream_attached(&mut self, active_sharer: Option<UserId>) {
        if let Some(user_id) = active_sharer {
            self.receiving = true;
            self.active_sharer = Some(user_id);
        }
    }

    /// Debounced share container size.
    pub fn on_container_resize(&mut self, container: Dimension) {
        self.container = container;
    }

    /// Emit the operations needed since the last call.
    pub fn reconcile(&mut self) -> Vec<ShareOp> {
        let mut ops = Vec::new();

        if self.receiving != self.applied_receiving {
            if self.receiving {
                match self.active_sharer {
                    Some(user_id) => {
                        ops.push(ShareOp::StartView { user_id });
                        self.applied_receiving = true;
                    }
                    None => {
                        debug!(target: "gallery.share", "Receiving share without a known sharer");
                    }
                }
            } else {
                ops.push(ShareOp::StopView);
                self.applied_receiving = false;
                self.last_resize = None;
            }
        }

        if self.is_sharing() {
            self.view = fit_share_view(self.content, self.container);
            if self.view != self.content && self.last_resize != Some(self.view) {
                ops.push(ShareOp::ResizeCanvas(self.view));
                self.last_resize = Some(self.view);
            }
        }

        ops
    }

    /// Stop viewing, if a view was started.
    pub fn teardown(&mut self) -> Vec<ShareOp> {
        let ops = if self.applied_receiving {
            vec![ShareOp::StopView]
        } else {
            Vec::new()
        };

        self.receiving = false;
        self.applied_receiving = false;
        self.last_resize = None;
        ops
    }
}

/// Run share operations in order. Failures are logged and skipped.
pub async fn execute_share_ops(
    surface: &dyn ShareSurface,
    target: &SurfaceTarget,
    ops: impl IntoIterator<Item = ShareOp>,
) {
    for op in ops {
        let started = Instant::now();
        let result = match op {
            ShareOp::StartView { user_id } => surface.start_share_view(target, user_id).await,
            ShareOp::StopView => surface.stop_share_view().await,
            ShareOp::ResizeCanvas(dimension) => {
                surface.update_sharing_canvas_dimension(dimension).await
            }
        };
        let elapsed = started.elapsed();

        match result {
            Ok(()) => metrics::record_surface_call(op.as_str(), "success", elapsed),
            Err(e) => {
                metrics::record_surface_call(op.as_str(), e.label(), elapsed);
                warn!(
                    target: "gallery.share",
                    target_name = %target,
                    operation = op.as_str(),
                    error = %e,
                    "Share surface call failed"
                );
            }
        }
    }
}
