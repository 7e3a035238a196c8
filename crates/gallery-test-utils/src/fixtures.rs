//! Pre-configured test data for gallery tests.

use common::types::{CellGeometry, Participant, UserId, VideoQuality};
use gallery_renderer::surface::SurfaceTarget;

/// Local session user in fixtures.
pub const LOCAL_USER: UserId = UserId(16_778_240);

/// Main canvas target used by fixtures.
#[must_use]
pub fn canvas_target() -> SurfaceTarget {
    SurfaceTarget::new("video-canvas")
}

/// Share canvas target used by fixtures.
#[must_use]
pub fn share_target() -> SurfaceTarget {
    SurfaceTarget::new("share-canvas")
}

/// Participants with video on, in the given order.
#[must_use]
pub fn participants(ids: &[u32]) -> Vec<Participant> {
    ids.iter()
        .map(|id| Participant::new(UserId(*id)).with_name(format!("user-{id}")))
        .collect()
}

#[must_use]
pub fn user_ids(ids: &[u32]) -> Vec<UserId> {
    ids.iter().copied().map(UserId).collect()
}

/// Two-column grid of 320x180 cells.
#[must_use]
pub fn grid_cells(count: u32, quality: VideoQuality) -> Vec<CellGeometry> {
    (0..count)
        .map(|i| CellGeometry::new(320, 180, (i % 2) * 320, (i / 2) * 180, quality))
        .collect()
}
