//! Single-tile active speaker view.
//!
//! When the grid is not shown, one participant fills the canvas at 360p.
//! Focus follows the participant whose video the engine marks active, or
//! the most recent active speaker when no video is active.

use common::types::{CellGeometry, Dimension, Participant, UserId, VideoQuality};
use tracing::debug;

use crate::surface::RenderOp;

/// Decode quality used for the full-canvas tile.
pub const SPEAKER_QUALITY: VideoQuality = VideoQuality::Video360P;

/// Video activity state reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoActiveState {
    Active,
    Inactive,
}

/// Tracks which participant the speaker view should focus.
#[derive(Debug, Clone, Default)]
pub struct ActiveVideoTracker {
    active_video: Option<UserId>,
    active_speaker: Option<UserId>,
}

impl ActiveVideoTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_video_active_change(&mut self, state: VideoActiveState, user_id: UserId) {
        self.active_video = match state {
            VideoActiveState::Active => Some(user_id),
            VideoActiveState::Inactive => None,
        };
    }

    /// Loudest speakers first. An empty list keeps the previous speaker.
    pub fn on_active_speaker(&mut self, speakers: &[UserId]) {
        if let Some(first) = speakers.first() {
            self.active_speaker = Some(*first);
        }
    }

    /// Active video user, falling back to the last active speaker.
    #[must_use]
    pub fn focus(&self) -> Option<UserId> {
        self.active_video.or(self.active_speaker)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FocusedTile {
    user_id: UserId,
    video_on: bool,
}

/// Full-canvas rendering of the focused participant.
#[derive(Debug, Clone, Default)]
pub struct SpeakerView {
    previous: Option<FocusedTile>,
    rendered_canvas: Option<Dimension>,
}

impl SpeakerView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id currently drawn on the canvas, if any.
    #[must_use]
    pub fn rendered(&self) -> Option<UserId> {
        self.previous.filter(|t| t.video_on).map(|t| t.user_id)
    }

    /// Diff the focused participant against the last pass.
    ///
    /// Nothing happens, and nothing is recorded, until decode is ready.
    pub fn reconcile(
        &mut self,
        active: Option<&Participant>,
        decode_ready: bool,
        canvas: Dimension,
    ) -> Vec<RenderOp> {
        if !decode_ready {
            return Vec::new();
        }

        let now = active.map(|p| FocusedTile {
            user_id: p.user_id,
            video_on: p.video_on,
        });
        let now_on = now.filter(|t| t.video_on);
        let previous_on = self.previous.filter(|t| t.video_on);
        let geometry = CellGeometry::full_canvas(canvas, SPEAKER_QUALITY);

        let mut ops = Vec::new();
        match (previous_on, now_on) {
            (None, Some(now)) => {
                ops.push(RenderOp::Start {
                    user_id: now.user_id,
                    geometry,
                });
            }
            (Some(previous), None) => {
                ops.push(RenderOp::Stop {
                    user_id: previous.user_id,
                });
            }
            (Some(previous), Some(now)) if previous.user_id != now.user_id => {
                ops.push(RenderOp::Stop {
                    user_id: previous.user_id,
                });
                ops.push(RenderOp::Start {
                    user_id: now.user_id,
                    geometry,
                });
            }
            (Some(_), Some(now)) => {
                if self.rendered_canvas != Some(canvas) {
                    ops.push(RenderOp::Adjust {
                        user_id: now.user_id,
                        geometry,
                    });
                }
            }
            (None, None) => {}
        }

        if !ops.is_empty() {
            debug!(
                target: "gallery.speaker",
                focus = ?now_on.map(|t| t.user_id),
                previous = ?previous_on.map(|t| t.user_id),
                ops = ops.len(),
                "Speaker focus reconciled"
            );
        }

        self.previous = now;
        self.rendered_canvas = now_on.map(|_| canvas);
        ops
    }

    /// Stop the focused tile, if drawn, and forget it.
    pub fn teardown(&mut self) -> Vec<RenderOp> {
        let ops = self
            .rendered()
            .map(|user_id| RenderOp::Stop { user_id })
            .into_iter()
            .collect();
        self.previous = None;
        self.rendered_canvas = None;
        ops
    }
}
