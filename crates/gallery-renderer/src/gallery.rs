//! Gallery view: one reconciler and one dispatcher per render surface.
//!
//! The view is the only writer for its surface. Passes are applied
//! synchronously; the resulting surface calls run in the background.
//!
//! Teardown happens exactly once: through [`GalleryView::detach`], which also
//! waits for queued calls, or on drop, which only enqueues the stops.

use common::types::{Participant, UserId};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::errors::GalleryError;
use crate::observability::metrics;
use crate::pagination::PaginationPlanner;
use crate::reconciler::{PassInput, RenderReconciler};
use crate::self_video::SelfVideoPolicy;
use crate::surface::{RenderOp, RenderSurface, SurfaceDispatcher, SurfaceTarget};

/// Gallery grid renderer bound to one surface target.
pub struct GalleryView {
    reconciler: RenderReconciler,
    /// `None` once detached.
    dispatcher: Option<SurfaceDispatcher>,
}

impl GalleryView {
    /// Create a view. Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Runtime` when no runtime is available.
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        target: SurfaceTarget,
        policy: SelfVideoPolicy,
    ) -> Result<Self, GalleryError> {
        let dispatcher = SurfaceDispatcher::new(surface, target)?;

        info!(
            target: "gallery.reconciler",
            target_name = %dispatcher.target(),
            cross_origin_isolated = policy.cross_origin_isolated(),
            "Gallery view attached"
        );

        Ok(Self {
            reconciler: RenderReconciler::new(policy),
            dispatcher: Some(dispatcher),
        })
    }

    /// Create a view on the configured gallery canvas.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Runtime` when no runtime is available.
    pub fn from_config(
        surface: Arc<dyn RenderSurface>,
        config: &Config,
    ) -> Result<Self, GalleryError> {
        Self::new(
            surface,
            SurfaceTarget::new(config.canvas_target.clone()),
            SelfVideoPolicy::new(config.cross_origin_isolated),
        )
    }

    /// Desired subscriptions as of the latest pass.
    #[must_use]
    pub fn subscribed(&self) -> &[UserId] {
        self.reconciler.subscribed()
    }

    /// Run one pass and dispatch its operations. Returns the operations in
    /// issue order.
    #[instrument(skip_all, name = "gallery.pass", fields(participants = input.participants.len()))]
    pub fn apply(&mut self, input: &PassInput<'_>) -> Vec<RenderOp> {
        let ops = self.reconciler.reconcile(input);
        metrics::set_tiles_subscribed(self.reconciler.subscribed().len());

        if let Some(dispatcher) = self.dispatcher.as_mut() {
            dispatcher.dispatch(ops.iter().copied());
        }
        ops
    }

    /// Run one pass for the selected page of `roster`.
    ///
    /// Geometry comes from the planner's layout provider at its current
    /// dimension; before a dimension is known the pass is gated.
    pub fn apply_page(
        &mut self,
        planner: &PaginationPlanner,
        roster: &[Participant],
        subscriptions: &[UserId],
        decode_ready: bool,
        local_user: Option<UserId>,
    ) -> Vec<RenderOp> {
        let visible = planner.visible_page(roster);
        let layout = planner.cell_geometry_for(visible);

        self.apply(&PassInput {
            participants: visible,
            layout: &layout,
            subscriptions,
            decode_ready,
            local_user,
        })
    }

    /// Stop every subscribed tile and wait for queued calls to finish.
    pub async fn detach(mut self) {
        let ops = self.reconciler.teardown();
        metrics::set_tiles_subscribed(0);

        if let Some(mut dispatcher) = self.dispatcher.take() {
            let target = dispatcher.target().clone();
            dispatcher.dispatch(ops);
            dispatcher.drain().await;

            info!(
                target: "gallery.reconciler",
                target_name = %target,
                "Gallery view detached"
            );
        }
    }
}

impl Drop for GalleryView {
    fn drop(&mut self) {
        let Some(mut dispatcher) = self.dispatcher.take() else {
            return;
        };

        let ops = self.reconciler.teardown();
        metrics::set_tiles_subscribed(0);
        debug!(
            target: "gallery.reconciler",
            target_name = %dispatcher.target(),
            stops = ops.len(),
            "Gallery view dropped while attached, releasing tiles"
        );
        dispatcher.dispatch(ops);
    }
}
