//! Debounced drawable sizing.
//!
//! Hosts report raw resize signals at whatever rate the platform produces
//! them. The tracker task waits for a quiet period and publishes only the
//! final size of a burst, then applies it to the drawable's pixel size.
//!
//! The drawable is measured once at spawn, before any debounce, so
//! subscribers never observe a zero size while the first quiet period runs.

use common::types::Dimension;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

use crate::config::Config;
use crate::errors::{GalleryError, SurfaceError};
use crate::observability::metrics;
use crate::surface::{RenderSurface, SurfaceTarget};

/// Host-side drawable whose pixel size follows its layout box.
pub trait Drawable: Send + Sync {
    /// Current layout size of the drawable.
    fn measure(&self) -> Dimension;

    /// Assign the drawable's native pixel size directly.
    ///
    /// Fails once the drawable has been handed to the engine for offscreen
    /// rendering.
    fn set_pixel_size(&self, dimension: Dimension) -> Result<(), SurfaceError>;
}

/// Handle to a running dimension tracker.
#[derive(Debug, Clone)]
pub struct DimensionTrackerHandle {
    sender: mpsc::UnboundedSender<Dimension>,
    current: watch::Receiver<Dimension>,
    cancel_token: CancellationToken,
}

impl DimensionTrackerHandle {
    /// Report a raw resize signal.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::TrackerClosed` if the tracker task has exited.
    pub fn report_resize(&self, dimension: Dimension) -> Result<(), GalleryError> {
        self.sender
            .send(dimension)
            .map_err(|_| GalleryError::TrackerClosed)
    }

    /// Last emitted size.
    #[must_use]
    pub fn current(&self) -> Dimension {
        *self.current.borrow()
    }

    /// Receiver notified on every emitted size.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Dimension> {
        self.current.clone()
    }

    /// Stop the tracker. Pending resizes are discarded.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// Trailing-debounce tracker task for one drawable.
pub struct DimensionTracker {
    target: SurfaceTarget,
    quiet_period: Duration,
    drawable: Arc<dyn Drawable>,
    surface: Arc<dyn RenderSurface>,
    receiver: mpsc::UnboundedReceiver<Dimension>,
    current: watch::Sender<Dimension>,
    cancel_token: CancellationToken,
}

impl DimensionTracker {
    /// Measure the drawable and spawn the tracker task.
    ///
    /// `cancel_token` is typically a child of the owning view's token.
    pub fn spawn(
        target: SurfaceTarget,
        quiet_period: Duration,
        drawable: Arc<dyn Drawable>,
        surface: Arc<dyn RenderSurface>,
        cancel_token: CancellationToken,
    ) -> (DimensionTrackerHandle, JoinHandle<()>) {
        let initial = drawable.measure();
        let (sender, receiver) = mpsc::unbounded_channel();
        let (current, current_rx) = watch::channel(initial);

        let tracker = Self {
            target,
            quiet_period,
            drawable,
            surface,
            receiver,
            current,
            cancel_token: cancel_token.clone(),
        };

        let task = tokio::spawn(tracker.run(initial));

        let handle = DimensionTrackerHandle {
            sender,
            current: current_rx,
            cancel_token,
        };

        (handle, task)
    }

    /// Track the gallery canvas with the configured target and quiet period.
    pub fn spawn_canvas(
        config: &Config,
        drawable: Arc<dyn Drawable>,
        surface: Arc<dyn RenderSurface>,
        cancel_token: CancellationToken,
    ) -> (DimensionTrackerHandle, JoinHandle<()>) {
        Self::spawn(
            SurfaceTarget::new(config.canvas_target.clone()),
            config.canvas_debounce,
            drawable,
            surface,
            cancel_token,
        )
    }

    /// Track the share container with the configured target and quiet period.
    pub fn spawn_share_container(
        config: &Config,
        drawable: Arc<dyn Drawable>,
        surface: Arc<dyn RenderSurface>,
        cancel_token: CancellationToken,
    ) -> (DimensionTrackerHandle, JoinHandle<()>) {
        Self::spawn(
            SurfaceTarget::new(config.share_target.clone()),
            config.share_debounce,
            drawable,
            surface,
            cancel_token,
        )
    }

    #[instrument(
        skip_all,
        name = "gallery.dimension.tracker",
        fields(target_name = %self.target)
    )]
    async fn run(mut self, initial: Dimension) {
        debug!(
            target: "gallery.dimension",
            dimension = %initial,
            quiet_period_ms = u64::try_from(self.quiet_period.as_millis()).unwrap_or(u64::MAX),
            "Dimension tracker started"
        );
        self.apply(initial).await;

        let debounce = tokio::time::sleep(self.quiet_period);
        tokio::pin!(debounce);
        let mut pending: Option<Dimension> = None;

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    debug!(target: "gallery.dimension", "Dimension tracker cancelled");
                    break;
                }

                signal = self.receiver.recv() => {
                    let Some(dimension) = signal else {
                        debug!(target: "gallery.dimension", "All tracker handles dropped");
                        break;
                    };
                    trace!(
                        target: "gallery.dimension",
                        dimension = %dimension,
                        "Resize signal, rescheduling"
                    );
                    pending = Some(dimension);
                    debounce.as_mut().reset(Instant::now() + self.quiet_period);
                }

                () = &mut debounce, if pending.is_some() => {
                    if let Some(dimension) = pending.take() {
                        self.emit(dimension).await;
                    }
                }
            }
        }
    }

    async fn emit(&mut self, dimension: Dimension) {
        let unchanged = *self.current.borrow() == dimension;
        if unchanged {
            trace!(
                target: "gallery.dimension",
                dimension = %dimension,
                "Size unchanged after quiet period"
            );
            return;
        }

        self.current.send_replace(dimension);
        debug!(
            target: "gallery.dimension",
            dimension = %dimension,
            "Stable size emitted"
        );
        self.apply(dimension).await;
    }

    async fn apply(&self, dimension: Dimension) {
        let Err(e) = self.drawable.set_pixel_size(dimension) else {
            return;
        };

        metrics::record_dimension_fallback();
        debug!(
            target: "gallery.dimension",
            dimension = %dimension,
            error = %e,
            "Direct pixel size assignment failed, asking the engine"
        );

        if let Err(e) = self
            .surface
            .update_canvas_dimension(&self.target, dimension)
            .await
        {
            warn!(
                target: "gallery.dimension",
                target_name = %self.target,
                dimension = %dimension,
                error = %e,
                "Canvas dimension update failed"
            );
        }
    }
}
