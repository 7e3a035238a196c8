//! Recording surface for gallery tests.
//!
//! Implements both [`RenderSurface`] and [`ShareSurface`]. Every call is
//! appended to a log when it completes, so the log shows the order in which
//! calls finished, not the order they were issued.
//!
//! # Example
//!
//! ```rust,ignore
//! use gallery_test_utils::RecordingSurface;
//!
//! let surface = RecordingSurface::builder()
//!     .fail_calls_for(UserId(2))
//!     .delay_render_start_for(UserId(1), Duration::from_millis(50))
//!     .build();
//! ```

use async_trait::async_trait;
use common::types::{CellGeometry, Dimension, UserId};
use gallery_renderer::errors::SurfaceError;
use gallery_renderer::surface::{RenderSurface, ShareSurface, SurfaceTarget};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One completed call on the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    RenderStart {
        target: String,
        user_id: UserId,
        geometry: CellGeometry,
    },
    StopRender {
        target: String,
        user_id: UserId,
    },
    AdjustPosition {
        target: String,
        user_id: UserId,
        geometry: CellGeometry,
    },
    UpdateCanvasDimension {
        target: String,
        dimension: Dimension,
    },
    StartShareView {
        target: String,
        user_id: UserId,
    },
    StopShareView,
    UpdateSharingCanvasDimension(Dimension),
}

impl SurfaceCall {
    /// Participant the call concerns, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            SurfaceCall::RenderStart { user_id, .. }
            | SurfaceCall::StopRender { user_id, .. }
            | SurfaceCall::AdjustPosition { user_id, .. }
            | SurfaceCall::StartShareView { user_id, .. } => Some(*user_id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_render_start(&self) -> bool {
        matches!(self, SurfaceCall::RenderStart { .. })
    }

    #[must_use]
    pub fn is_stop_render(&self) -> bool {
        matches!(self, SurfaceCall::StopRender { .. })
    }

    #[must_use]
    pub fn is_adjust_position(&self) -> bool {
        matches!(self, SurfaceCall::AdjustPosition { .. })
    }
}

/// Mock media engine surface.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    failing_users: HashSet<UserId>,
    render_start_delays: HashMap<UserId, Duration>,
    reject_canvas_resize: bool,
    reject_share: bool,
}

impl RecordingSurface {
    /// Surface that accepts every call immediately.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn builder() -> RecordingSurfaceBuilder {
        RecordingSurfaceBuilder::default()
    }

    /// All completed calls, in completion order.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Completed calls for one participant, in completion order.
    pub fn calls_for(&self, user_id: UserId) -> Vec<SurfaceCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.user_id() == Some(user_id))
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Ids with an active tile: started and not stopped since.
    pub fn rendered_users(&self) -> HashSet<UserId> {
        let mut rendered = HashSet::new();
        for call in self.calls() {
            match call {
                SurfaceCall::RenderStart { user_id, .. } => {
                    rendered.insert(user_id);
                }
                SurfaceCall::StopRender { user_id, .. } => {
                    rendered.remove(&user_id);
                }
                _ => {}
            }
        }
        rendered
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn outcome_for(&self, user_id: UserId) -> Result<(), SurfaceError> {
        if self.failing_users.contains(&user_id) {
            return Err(SurfaceError::Rejected(format!("user {user_id} rejected")));
        }
        Ok(())
    }
}

#[async_trait]
impl RenderSurface for RecordingSurface {
    async fn render_start(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
        geometry: CellGeometry,
    ) -> Result<(), SurfaceError> {
        if let Some(delay) = self.render_start_delays.get(&user_id) {
            tokio::time::sleep(*delay).await;
        }
        self.record(SurfaceCall::RenderStart {
            target: target.to_string(),
            user_id,
            geometry,
        });
        self.outcome_for(user_id)
    }

    async fn stop_render(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::StopRender {
            target: target.to_string(),
            user_id,
        });
        self.outcome_for(user_id)
    }

    async fn adjust_position(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
        geometry: CellGeometry,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::AdjustPosition {
            target: target.to_string(),
            user_id,
            geometry,
        });
        self.outcome_for(user_id)
    }

    async fn update_canvas_dimension(
        &self,
        target: &SurfaceTarget,
        dimension: Dimension,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::UpdateCanvasDimension {
            target: target.to_string(),
            dimension,
        });
        if self.reject_canvas_resize {
            return Err(SurfaceError::Unsupported("canvas resize".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ShareSurface for RecordingSurface {
    async fn start_share_view(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::StartShareView {
            target: target.to_string(),
            user_id,
        });
        if self.reject_share {
            return Err(SurfaceError::Rejected("share view".to_string()));
        }
        Ok(())
    }

    async fn stop_share_view(&self) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::StopShareView);
        Ok(())
    }

    async fn update_sharing_canvas_dimension(
        &self,
        dimension: Dimension,
    ) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::UpdateSharingCanvasDimension(dimension));
        Ok(())
    }
}

/// Builder for [`RecordingSurface`].
#[derive(Debug, Default)]
pub struct RecordingSurfaceBuilder {
    failing_users: HashSet<UserId>,
    render_start_delays: HashMap<UserId, Duration>,
    reject_canvas_resize: bool,
    reject_share: bool,
}

impl RecordingSurfaceBuilder {
    /// Every tile call for `user_id` is recorded, then rejected.
    #[must_use]
    pub fn fail_calls_for(mut self, user_id: UserId) -> Self {
        self.failing_users.insert(user_id);
        self
    }

    /// `render_start` for `user_id` completes only after `delay`.
    #[must_use]
    pub fn delay_render_start_for(mut self, user_id: UserId, delay: Duration) -> Self {
        self.render_start_delays.insert(user_id, delay);
        self
    }

    /// `update_canvas_dimension` is recorded, then rejected.
    #[must_use]
    pub fn reject_canvas_resize(mut self) -> Self {
        self.reject_canvas_resize = true;
        self
    }

    /// `start_share_view` is recorded, then rejected.
    #[must_use]
    pub fn reject_share(mut self) -> Self {
        self.reject_share = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<RecordingSurface> {
        Arc::new(RecordingSurface {
            calls: Mutex::new(Vec::new()),
            failing_users: self.failing_users,
            render_start_delays: self.render_start_delays,
            reject_canvas_resize: self.reject_canvas_resize,
            reject_share: self.reject_share,
        })
    }
}
