//! Tests for `GalleryView` against a recording surface.
//!
//! Verifies:
//! - Same-participant calls complete in issue order
//! - A failed call does not block later calls
//! - Dropping an attached view releases every tile
//! - Self video never reaches the surface without isolation
//! - Paged passes use the planner's visible slice
//! - Decode readiness recovery restarts tiles behind in-flight calls
//! - A quality-driven restart completes before a later reposition
//! - Views built from configuration use its target and isolation flag

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::time::Duration;

use common::types::{Dimension, UserId, VideoQuality};
use gallery_renderer::config::Config;
use gallery_renderer::gallery::GalleryView;
use gallery_renderer::pagination::{PaginationPlanner, MAX_TILES_PER_PAGE};
use gallery_renderer::reconciler::PassInput;
use gallery_renderer::self_video::SelfVideoPolicy;
use gallery_renderer::surface::OpKind;
use gallery_test_utils::*;

fn view(surface: std::sync::Arc<RecordingSurface>) -> GalleryView {
    GalleryView::new(surface, canvas_target(), SelfVideoPolicy::new(false)).unwrap()
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_same_user_calls_complete_in_issue_order() {
    let a = UserId(1);
    let b = UserId(2);
    let surface = RecordingSurface::builder()
        .delay_render_start_for(a, Duration::from_millis(100))
        .build();
    let mut gallery = view(surface.clone());

    let layout = grid_cells(2, VideoQuality::Video360P);
    let before = participants(&[1, 2]);
    let after = participants(&[2, 1]);
    let subs = user_ids(&[1, 2]);

    gallery.apply(&PassInput {
        participants: &before,
        layout: &layout,
        subscriptions: &subs,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    // Second pass is issued while A's start is still in flight.
    gallery.apply(&PassInput {
        participants: &after,
        layout: &layout,
        subscriptions: &subs,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    gallery.detach().await;

    let a_calls = surface.calls_for(a);
    assert_eq!(a_calls.len(), 3, "got {a_calls:?}");
    assert!(a_calls[0].is_render_start());
    assert!(a_calls[1].is_adjust_position());
    assert!(a_calls[2].is_stop_render());

    // Different participants are not serialized behind the slow one.
    let calls = surface.calls();
    let b_start = calls
        .iter()
        .position(|c| c.is_render_start() && c.user_id() == Some(b))
        .unwrap();
    let a_start = calls
        .iter()
        .position(|c| c.is_render_start() && c.user_id() == Some(a))
        .unwrap();
    assert!(b_start < a_start);
}

#[tokio::test(start_paused = true)]
async fn test_failed_call_does_not_block_later_calls() {
    let a = UserId(1);
    let surface = RecordingSurface::builder().fail_calls_for(a).build();
    let mut gallery = view(surface.clone());

    let layout = grid_cells(2, VideoQuality::Video360P);
    let roster = participants(&[1, 2]);
    let both = user_ids(&[1, 2]);
    let only_b = user_ids(&[2]);

    gallery.apply(&PassInput {
        participants: &roster,
        layout: &layout,
        subscriptions: &both,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    let ops = gallery.apply(&PassInput {
        participants: &roster,
        layout: &layout,
        subscriptions: &only_b,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    assert_eq!(ops.len(), 1);
    gallery.detach().await;

    let a_calls = surface.calls_for(a);
    assert_eq!(a_calls.len(), 2);
    assert!(a_calls[0].is_render_start());
    assert!(a_calls[1].is_stop_render());

    let b_calls = surface.calls_for(UserId(2));
    assert!(b_calls[0].is_render_start());
    assert!(b_calls.last().unwrap().is_stop_render());
}

#[tokio::test(start_paused = true)]
async fn test_drop_releases_subscribed_tiles() {
    let surface = RecordingSurface::new();
    let mut gallery = view(surface.clone());

    let layout = grid_cells(3, VideoQuality::Video180P);
    let roster = participants(&[1, 2, 3]);
    let subs = user_ids(&[1, 2, 3]);

    gallery.apply(&PassInput {
        participants: &roster,
        layout: &layout,
        subscriptions: &subs,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    settle().await;
    assert_eq!(surface.rendered_users().len(), 3);

    drop(gallery);
    settle().await;

    assert!(surface.rendered_users().is_empty());
    let stops = surface.calls().iter().filter(|c| c.is_stop_render()).count();
    assert_eq!(stops, 3);
}

#[tokio::test(start_paused = true)]
async fn test_detach_without_passes_issues_nothing() {
    let surface = RecordingSurface::new();
    let gallery = view(surface.clone());

    gallery.detach().await;

    assert_eq!(surface.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_self_video_never_reaches_surface() {
    let surface = RecordingSurface::new();
    let mut gallery = view(surface.clone());

    let layout = grid_cells(2, VideoQuality::Video360P);
    let mut roster = participants(&[1]);
    roster.insert(0, common::types::Participant::new(LOCAL_USER));
    let subs = vec![LOCAL_USER, UserId(1)];

    gallery.apply(&PassInput {
        participants: &roster,
        layout: &layout,
        subscriptions: &subs,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    gallery.detach().await;

    assert!(surface.calls_for(LOCAL_USER).is_empty());
    assert_eq!(surface.calls_for(UserId(1)).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_apply_page_renders_visible_slice() {
    let surface = RecordingSurface::new();
    let mut gallery = view(surface.clone());

    let canvas = Dimension::new(800, 600);
    let layout = TableLayout::new(1)
        .with_capacity_at(canvas, 6)
        .into_arc();
    let mut planner = PaginationPlanner::new(layout, MAX_TILES_PER_PAGE);

    let ids: Vec<u32> = (1..=13).collect();
    let roster = participants(&ids);
    let subs = user_ids(&ids);
    planner.set_total_size(roster.len());

    // No dimension yet: geometry is empty and the pass is gated.
    let ops = gallery.apply_page(&planner, &roster, &subs, true, Some(LOCAL_USER));
    assert!(ops.is_empty());

    let plan = planner.set_dimension(canvas);
    assert_eq!(plan.total_pages, 3);
    planner.set_page(2);

    let ops = gallery.apply_page(&planner, &roster, &subs, true, Some(LOCAL_USER));
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].user_id(), UserId(13));

    gallery.detach().await;
    assert!(surface.rendered_users().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_decode_ready_again_restarts_tiles_in_order() {
    let a = UserId(1);
    let surface = RecordingSurface::builder()
        .delay_render_start_for(a, Duration::from_millis(100))
        .build();
    let mut gallery = view(surface.clone());

    let layout = grid_cells(2, VideoQuality::Video360P);
    let roster = participants(&[1, 2]);
    let subs = user_ids(&[1, 2]);
    let pass = |decode_ready| PassInput {
        participants: &roster,
        layout: &layout,
        subscriptions: &subs,
        decode_ready,
        local_user: Some(LOCAL_USER),
    };

    assert_eq!(gallery.apply(&pass(true)).len(), 2);
    // Decoder lost and recovered while A's first start is still in flight.
    assert!(gallery.apply(&pass(false)).is_empty());
    let ops = gallery.apply(&pass(true));
    assert_eq!(ops.len(), 2);
    gallery.detach().await;

    let a_calls = surface.calls_for(a);
    assert_eq!(a_calls.len(), 3, "got {a_calls:?}");
    assert!(a_calls[0].is_render_start());
    assert!(a_calls[1].is_render_start());
    assert!(a_calls[2].is_stop_render());

    let b_starts = surface
        .calls_for(UserId(2))
        .iter()
        .filter(|c| c.is_render_start())
        .count();
    assert_eq!(b_starts, 2);
    assert!(surface.rendered_users().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_quality_restart_completes_before_reposition() {
    let a = UserId(1);
    let surface = RecordingSurface::builder()
        .delay_render_start_for(a, Duration::from_millis(100))
        .build();
    let mut gallery = view(surface.clone());

    let low = grid_cells(2, VideoQuality::Video180P);
    let high = grid_cells(2, VideoQuality::Video720P);
    let before = participants(&[1, 2]);
    let after = participants(&[2, 1]);
    let subs = user_ids(&[1, 2]);

    gallery.apply(&PassInput {
        participants: &before,
        layout: &low,
        subscriptions: &subs,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    let ops = gallery.apply(&PassInput {
        participants: &before,
        layout: &high,
        subscriptions: &subs,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    assert!(ops.iter().all(|op| op.kind() == OpKind::RenderStart));
    let ops = gallery.apply(&PassInput {
        participants: &after,
        layout: &high,
        subscriptions: &subs,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    assert!(ops.iter().all(|op| op.kind() == OpKind::AdjustPosition));
    gallery.detach().await;

    let a_calls = surface.calls_for(a);
    assert_eq!(a_calls.len(), 4, "got {a_calls:?}");
    assert!(matches!(
        &a_calls[0],
        SurfaceCall::RenderStart { geometry, .. } if geometry.quality == VideoQuality::Video180P
    ));
    assert!(matches!(
        &a_calls[1],
        SurfaceCall::RenderStart { geometry, .. } if geometry.quality == VideoQuality::Video720P
    ));
    assert!(matches!(
        &a_calls[2],
        SurfaceCall::AdjustPosition { geometry, .. } if *geometry == high[1]
    ));
    assert!(a_calls[3].is_stop_render());
}

#[tokio::test(start_paused = true)]
async fn test_view_from_config() {
    let config = Config {
        canvas_target: "grid".to_string(),
        cross_origin_isolated: true,
        ..Config::default()
    };
    let surface = RecordingSurface::new();
    let mut gallery = GalleryView::from_config(surface.clone(), &config).unwrap();

    let layout = grid_cells(2, VideoQuality::Video360P);
    let mut roster = participants(&[1]);
    roster.insert(0, common::types::Participant::new(LOCAL_USER));
    let subs = vec![LOCAL_USER, UserId(1)];

    gallery.apply(&PassInput {
        participants: &roster,
        layout: &layout,
        subscriptions: &subs,
        decode_ready: true,
        local_user: Some(LOCAL_USER),
    });
    gallery.detach().await;

    // Isolated pages draw self video on the canvas too.
    let local_calls = surface.calls_for(LOCAL_USER);
    assert_eq!(local_calls.len(), 2);
    assert!(matches!(
        &local_calls[0],
        SurfaceCall::RenderStart { target, .. } if target == "grid"
    ));
}
