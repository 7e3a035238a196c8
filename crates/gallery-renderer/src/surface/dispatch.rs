//! Fire-and-forget execution of render operations.
//!
//! Each participant id gets its own `TileWorker` task with an unbounded FIFO
//! mailbox. Operations for one id reach the surface strictly in issue order;
//! operations for different ids run concurrently. A newer pass can enqueue
//! while an older pass's calls are still in flight.
//!
//! A worker is retired once a `Stop` is enqueued for its id: its mailbox is
//! closed, it finishes the queued calls and exits. A later operation for the
//! same id spawns a fresh worker that first waits for the retired one, so
//! per-id order holds across the handover.
//!
//! Failed calls are logged here and nowhere else. They are never retried and
//! never reported back to the reconciler.

use common::types::UserId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::{RenderOp, RenderSurface, SurfaceTarget};
use crate::errors::GalleryError;
use crate::observability::metrics;

/// Handle to a `TileWorker` mailbox.
#[derive(Debug)]
struct TileWorkerHandle {
    sender: mpsc::UnboundedSender<RenderOp>,
    task: JoinHandle<()>,
}

/// Serial executor for one participant's surface calls.
struct TileWorker {
    user_id: UserId,
    target: SurfaceTarget,
    surface: Arc<dyn RenderSurface>,
    receiver: mpsc::UnboundedReceiver<RenderOp>,
}

impl TileWorker {
    fn spawn(
        runtime: &Handle,
        user_id: UserId,
        target: SurfaceTarget,
        surface: Arc<dyn RenderSurface>,
        predecessor: Option<JoinHandle<()>>,
    ) -> TileWorkerHandle {
        let (sender, receiver) = mpsc::unbounded_channel();

        let worker = Self {
            user_id,
            target,
            surface,
            receiver,
        };

        let task = runtime.spawn(worker.run(predecessor));

        TileWorkerHandle { sender, task }
    }

    #[instrument(
        skip_all,
        name = "gallery.surface.worker",
        fields(user_id = %self.user_id, target_name = %self.target)
    )]
    async fn run(mut self, predecessor: Option<JoinHandle<()>>) {
        if let Some(predecessor) = predecessor {
            if let Err(e) = predecessor.await {
                warn!(
                    target: "gallery.surface",
                    user_id = %self.user_id,
                    error = %e,
                    "Retired tile worker failed"
                );
            }
        }

        while let Some(op) = self.receiver.recv().await {
            self.execute(op).await;
        }

        debug!(
            target: "gallery.surface",
            user_id = %self.user_id,
            "Tile worker mailbox closed"
        );
    }

    async fn execute(&self, op: RenderOp) {
        let kind = op.kind();
        let started = Instant::now();
        let result = op.execute(self.surface.as_ref(), &self.target).await;
        let elapsed = started.elapsed();

        match result {
            Ok(()) => {
                metrics::record_surface_call(kind.as_str(), "success", elapsed);
                debug!(
                    target: "gallery.surface",
                    user_id = %self.user_id,
                    operation = kind.as_str(),
                    "Surface call completed"
                );
            }
            Err(e) => {
                metrics::record_surface_call(kind.as_str(), e.label(), elapsed);
                warn!(
                    target: "gallery.surface",
                    user_id = %self.user_id,
                    target_name = %self.target,
                    operation = kind.as_str(),
                    error = %e,
                    "Surface call failed"
                );
            }
        }
    }
}

/// Routes render operations to per-participant workers.
pub struct SurfaceDispatcher {
    surface: Arc<dyn RenderSurface>,
    target: SurfaceTarget,
    runtime: Handle,
    workers: HashMap<UserId, TileWorkerHandle>,
    /// Workers whose mailbox is closed, still finishing queued calls.
    retired: HashMap<UserId, JoinHandle<()>>,
}

impl SurfaceDispatcher {
    /// Create a dispatcher bound to the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Runtime` when called outside a runtime.
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        target: SurfaceTarget,
    ) -> Result<Self, GalleryError> {
        let runtime = Handle::try_current().map_err(|e| GalleryError::Runtime(e.to_string()))?;

        Ok(Self {
            surface,
            target,
            runtime,
            workers: HashMap::new(),
            retired: HashMap::new(),
        })
    }

    #[must_use]
    pub fn target(&self) -> &SurfaceTarget {
        &self.target
    }

    /// Number of worker tasks still alive, including retired workers that
    /// are finishing their queue.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        let retiring = self.retired.values().filter(|task| !task.is_finished()).count();
        self.workers.len() + retiring
    }

    /// Enqueue operations without waiting for them. Returns how many were
    /// enqueued.
    pub fn dispatch(&mut self, ops: impl IntoIterator<Item = RenderOp>) -> usize {
        let mut enqueued = 0;

        self.retired.retain(|_, task| !task.is_finished());

        for op in ops {
            let user_id = op.user_id();
            let is_stop = matches!(op, RenderOp::Stop { .. });
            metrics::record_render_op(op.kind().as_str());

            match self.worker_for(user_id).sender.send(op) {
                Ok(()) => enqueued += 1,
                Err(mpsc::error::SendError(op)) => {
                    // The worker task is gone (it can only stop by panicking
                    // while its sender is alive). Replace it once.
                    warn!(
                        target: "gallery.surface",
                        user_id = %user_id,
                        "Tile worker exited unexpectedly, respawning"
                    );
                    self.workers.remove(&user_id);
                    if self.worker_for(user_id).sender.send(op).is_ok() {
                        enqueued += 1;
                    }
                }
            }

            if is_stop {
                self.retire(user_id);
            }
        }

        enqueued
    }

    /// Close every mailbox and wait for queued calls to finish.
    pub async fn drain(mut self) {
        let tasks = self
            .workers
            .drain()
            .map(|(_, worker)| worker.task)
            .chain(self.retired.drain().map(|(_, task)| task))
            .collect::<Vec<_>>();

        for task in tasks {
            if let Err(e) = task.await {
                warn!(
                    target: "gallery.surface",
                    error = %e,
                    "Tile worker task failed"
                );
            }
        }
    }

    /// Close the id's mailbox. The worker exits after its queued calls.
    fn retire(&mut self, user_id: UserId) {
        if let Some(worker) = self.workers.remove(&user_id) {
            self.retired.insert(user_id, worker.task);
        }
    }

    fn worker_for(&mut self, user_id: UserId) -> &TileWorkerHandle {
        let Self {
            surface,
            target,
            runtime,
            workers,
            retired,
        } = self;

        workers.entry(user_id).or_insert_with(|| {
            TileWorker::spawn(
                runtime,
                user_id,
                target.clone(),
                Arc::clone(surface),
                retired.remove(&user_id),
            )
        })
    }
}
