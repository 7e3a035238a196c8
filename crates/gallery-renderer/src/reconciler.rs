//! Subscription reconciliation for the gallery canvas.
//!
//! Each pass diffs three inputs against the previous applied pass:
//!
//! - the desired subscription set (which ids should be drawn),
//! - the ordered visible participant list,
//! - the layout array, positionally parallel to that list.
//!
//! and emits the smallest set of [`RenderOp`]s that brings the surface in
//! line. The reconciler never calls the surface itself; the caller hands the
//! operations to a [`SurfaceDispatcher`](crate::surface::SurfaceDispatcher).
//!
//! # Pass Order
//!
//! 1. Stop removed ids.
//! 2. Start added ids at their cell. Ids missing from the roster are a benign
//!    race and are skipped.
//! 3. For ids subscribed in both passes:
//!    - ids that were never rendered (no cell when first subscribed) are
//!      started like additions;
//!    - if the grid was reshaped, re-start ids whose quality tier differs from
//!      the tier they were last rendered at and reposition the rest;
//!    - if the participant order changed, reposition ids whose index moved.
//! 4. On a decode readiness edge (not ready → ready), start every subscribed
//!    id fresh instead of step 3.
//!
//! Removals always precede additions, which bounds how many feeds the engine
//! decodes at once.
//!
//! # Grid Reshape Heuristic
//!
//! "Reshaped" means the tile count changed or the first cell's geometry
//! changed. This is an approximation of a per-cell diff: layouts are uniform
//! grids, so a change anywhere moves the first cell too in practice. A
//! layout that only moves trailing cells is not detected.
//!
//! # Geometry Identity
//!
//! Layout indices are only meaningful inside one pass. Snapshots store each
//! participant's placement keyed by id, so index moves are always computed
//! for the same participant. Quality comparisons use the geometry last
//! issued to the surface for that id, which a pass that emits nothing for
//! the id leaves untouched.
//!
//! # Snapshot Lifetime
//!
//! The diff snapshot is replaced only by passes that run (decode ready and
//! layout non-empty). Decode readiness and the desired subscription set are
//! recorded on every pass, so readiness edges and teardown always see the
//! latest values.

use common::types::{CellGeometry, Participant, UserId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::observability::metrics;
use crate::self_video::SelfVideoPolicy;
use crate::surface::RenderOp;

/// Inputs for one reconciliation pass.
#[derive(Debug, Clone, Copy)]
pub struct PassInput<'a> {
    /// Visible participants, in display order.
    pub participants: &'a [Participant],
    /// Cell geometry, positionally parallel to `participants`.
    pub layout: &'a [CellGeometry],
    /// Ids the engine wants drawn. Duplicates are ignored.
    pub subscriptions: &'a [UserId],
    /// Whether the engine can decode video yet.
    pub decode_ready: bool,
    /// Local session user, for self video exclusion.
    pub local_user: Option<UserId>,
}

/// Position of a participant within one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    index: usize,
    geometry: Option<CellGeometry>,
}

/// State of the last applied pass.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    order: Vec<UserId>,
    layout: Vec<CellGeometry>,
    placements: HashMap<UserId, Placement>,
    subscriptions: Vec<UserId>,
}

impl Snapshot {
    fn capture(input: &PassInput<'_>) -> Self {
        let order: Vec<UserId> = input.participants.iter().map(|p| p.user_id).collect();

        let mut placements = HashMap::with_capacity(order.len());
        for (index, user_id) in order.iter().enumerate() {
            // First occurrence wins, like a linear search over the roster.
            placements.entry(*user_id).or_insert(Placement {
                index,
                geometry: input.layout.get(index).copied(),
            });
        }

        Self {
            order,
            layout: input.layout.to_vec(),
            placements,
            subscriptions: dedup(input.subscriptions),
        }
    }

    fn geometry(&self, user_id: UserId) -> Option<CellGeometry> {
        self.placements.get(&user_id).and_then(|p| p.geometry)
    }
}

/// Partition of the desired subscription set against the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionDiff {
    /// In the previous set only, in previous order.
    pub removed: Vec<UserId>,
    /// In the current set only, in current order.
    pub added: Vec<UserId>,
    /// In both sets, in current order.
    pub unaltered: Vec<UserId>,
}

impl SubscriptionDiff {
    #[must_use]
    pub fn between(previous: &[UserId], current: &[UserId]) -> Self {
        let previous_set: HashSet<UserId> = previous.iter().copied().collect();
        let current_set: HashSet<UserId> = current.iter().copied().collect();

        let (unaltered, added): (Vec<UserId>, Vec<UserId>) = dedup(current)
            .into_iter()
            .partition(|id| previous_set.contains(id));

        let removed = dedup(previous)
            .into_iter()
            .filter(|id| !current_set.contains(id))
            .collect();

        Self {
            removed,
            added,
            unaltered,
        }
    }
}

/// Diffs successive gallery states into render operations.
///
/// One instance per render surface. Dropping it forgets all history; call
/// [`teardown`](Self::teardown) first to release subscribed tiles.
#[derive(Debug)]
pub struct RenderReconciler {
    policy: SelfVideoPolicy,
    previous: Option<Snapshot>,
    previous_decode_ready: Option<bool>,
    subscribed: Vec<UserId>,
    local_user: Option<UserId>,
    /// Geometry last sent by a start or adjust, per rendered id.
    issued: HashMap<UserId, CellGeometry>,
}

impl RenderReconciler {
    #[must_use]
    pub fn new(policy: SelfVideoPolicy) -> Self {
        Self {
            policy,
            previous: None,
            previous_decode_ready: None,
            subscribed: Vec::new(),
            local_user: None,
            issued: HashMap::new(),
        }
    }

    /// Desired subscriptions as of the latest pass.
    #[must_use]
    pub fn subscribed(&self) -> &[UserId] {
        &self.subscribed
    }

    /// Run one pass and return the operations to issue, in order.
    pub fn reconcile(&mut self, input: &PassInput<'_>) -> Vec<RenderOp> {
        let readiness_edge = self.previous_decode_ready == Some(false) && input.decode_ready;
        self.previous_decode_ready = Some(input.decode_ready);
        self.subscribed = dedup(input.subscriptions);
        self.local_user = input.local_user;

        if !input.decode_ready || input.layout.is_empty() {
            metrics::record_reconcile_pass("skipped");
            trace!(
                target: "gallery.reconciler",
                decode_ready = input.decode_ready,
                cells = input.layout.len(),
                "Pass skipped"
            );
            return Vec::new();
        }

        let current = Snapshot::capture(input);
        let previous = self.previous.take();
        let ops = self.diff(previous.as_ref(), &current, readiness_edge);
        self.previous = Some(current);
        self.record_issued(&ops);

        metrics::record_reconcile_pass("applied");
        ops
    }

    /// Release every subscribed tile and forget all history.
    pub fn teardown(&mut self) -> Vec<RenderOp> {
        let policy = self.policy;
        let local_user = self.local_user;

        let ops: Vec<RenderOp> = self
            .subscribed
            .drain(..)
            .filter(|id| !policy.excludes(*id, local_user))
            .map(|user_id| RenderOp::Stop { user_id })
            .collect();

        self.previous = None;
        self.previous_decode_ready = None;
        self.issued.clear();

        debug!(
            target: "gallery.reconciler",
            released = ops.len(),
            "Reconciler torn down"
        );
        ops
    }

    fn diff(
        &self,
        previous: Option<&Snapshot>,
        current: &Snapshot,
        readiness_edge: bool,
    ) -> Vec<RenderOp> {
        let previous_subscriptions = previous.map_or(&[][..], |p| p.subscriptions.as_slice());
        let diff = SubscriptionDiff::between(previous_subscriptions, &current.subscriptions);
        let excluded = |user_id: UserId| self.policy.excludes(user_id, self.local_user);

        let mut ops = Vec::new();
        let mut started = HashSet::new();

        for &user_id in &diff.removed {
            if !excluded(user_id) {
                ops.push(RenderOp::Stop { user_id });
            }
        }

        // Unaltered ids that never got a cell are still owed a start.
        let never_rendered = diff
            .unaltered
            .iter()
            .copied()
            .filter(|id| !self.issued.contains_key(id));

        for user_id in diff.added.iter().copied().chain(never_rendered) {
            if excluded(user_id) {
                continue;
            }
            match current.geometry(user_id) {
                Some(geometry) => {
                    ops.push(RenderOp::Start { user_id, geometry });
                    started.insert(user_id);
                }
                None => {
                    debug!(
                        target: "gallery.reconciler",
                        user_id = %user_id,
                        "Subscribed participant has no cell, skipping"
                    );
                }
            }
        }

        if readiness_edge {
            for &user_id in &current.subscriptions {
                if excluded(user_id) || started.contains(&user_id) {
                    continue;
                }
                if let Some(geometry) = current.geometry(user_id) {
                    ops.push(RenderOp::Start { user_id, geometry });
                    started.insert(user_id);
                }
            }

            debug!(
                target: "gallery.reconciler",
                started = started.len(),
                "Decode became ready, tiles started fresh"
            );
            return ops;
        }

        if let Some(previous) = previous {
            self.realign_unaltered(previous, current, &diff.unaltered, &started, &mut ops);
        }

        debug!(
            target: "gallery.reconciler",
            removed = diff.removed.len(),
            added = diff.added.len(),
            unaltered = diff.unaltered.len(),
            ops = ops.len(),
            "Pass applied"
        );
        ops
    }

    fn realign_unaltered(
        &self,
        previous: &Snapshot,
        current: &Snapshot,
        unaltered: &[UserId],
        started: &HashSet<UserId>,
        ops: &mut Vec<RenderOp>,
    ) {
        let candidates = unaltered
            .iter()
            .copied()
            .filter(|id| !self.policy.excludes(*id, self.local_user))
            .filter(|id| !started.contains(id));

        let mut realigned = HashSet::new();

        if grid_reshaped(&previous.layout, &current.layout) {
            for user_id in candidates.clone() {
                let Some(geometry) = current.geometry(user_id) else {
                    continue;
                };
                // A quality tier change needs a fresh render; repositioning
                // keeps the old decode resolution.
                let quality_changed = self
                    .issued
                    .get(&user_id)
                    .is_some_and(|last| last.quality != geometry.quality);

                if quality_changed {
                    ops.push(RenderOp::Start { user_id, geometry });
                } else {
                    ops.push(RenderOp::Adjust { user_id, geometry });
                }
                realigned.insert(user_id);
            }
        }

        if previous.order != current.order {
            for user_id in candidates {
                if realigned.contains(&user_id) {
                    continue;
                }
                let Some(now) = current.placements.get(&user_id) else {
                    continue;
                };
                let before = previous.placements.get(&user_id).map(|p| p.index);
                if before == Some(now.index) {
                    continue;
                }
                if let Some(geometry) = now.geometry {
                    ops.push(RenderOp::Adjust { user_id, geometry });
                }
            }
        }
    }

    fn record_issued(&mut self, ops: &[RenderOp]) {
        for op in ops {
            match *op {
                RenderOp::Start { user_id, geometry } => {
                    self.issued.insert(user_id, geometry);
                }
                // Repositioning keeps the tier the tile was started at.
                RenderOp::Adjust { user_id, geometry } => {
                    let quality = self
                        .issued
                        .get(&user_id)
                        .map_or(geometry.quality, |last| last.quality);
                    self.issued.insert(user_id, CellGeometry { quality, ..geometry });
                }
                RenderOp::Stop { user_id } => {
                    self.issued.remove(&user_id);
                }
            }
        }
    }
}

fn grid_reshaped(previous: &[CellGeometry], current: &[CellGeometry]) -> bool {
    previous.len() != current.len() || previous.first() != current.first()
}

fn dedup(ids: &[UserId]) -> Vec<UserId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use common::types::VideoQuality;

    const A: UserId = UserId(1);
    const B: UserId = UserId(2);
    const C: UserId = UserId(3);
    const D: UserId = UserId(4);
    const LOCAL: UserId = UserId(100);

    fn roster(ids: &[UserId]) -> Vec<Participant> {
        ids.iter().map(|id| Participant::new(*id)).collect()
    }

    /// Two-column grid of 320x180 cells.
    fn grid(count: usize, quality: VideoQuality) -> Vec<CellGeometry> {
        (0..count)
            .map(|i| {
                let i = u32::try_from(i).unwrap();
                CellGeometry::new(320, 180, (i % 2) * 320, (i / 2) * 180, quality)
            })
            .collect()
    }

    fn input<'a>(
        participants: &'a [Participant],
        layout: &'a [CellGeometry],
        subscriptions: &'a [UserId],
    ) -> PassInput<'a> {
        PassInput {
            participants,
            layout,
            subscriptions,
            decode_ready: true,
            local_user: Some(LOCAL),
        }
    }

    fn reconciler() -> RenderReconciler {
        RenderReconciler::new(SelfVideoPolicy::new(false))
    }

    fn start(user_id: UserId, geometry: CellGeometry) -> RenderOp {
        RenderOp::Start { user_id, geometry }
    }

    fn adjust(user_id: UserId, geometry: CellGeometry) -> RenderOp {
        RenderOp::Adjust { user_id, geometry }
    }

    #[test]
    fn test_first_pass_starts_every_visible_subscription() {
        let people = roster(&[A, B, C]);
        let layout = grid(3, VideoQuality::Video360P);
        let mut r = reconciler();

        let ops = r.reconcile(&input(&people, &layout, &[A, B, C]));

        assert_eq!(
            ops,
            vec![
                start(A, layout[0]),
                start(B, layout[1]),
                start(C, layout[2]),
            ]
        );
    }

    #[test]
    fn test_identical_pass_is_idempotent() {
        let people = roster(&[A, B, C]);
        let layout = grid(3, VideoQuality::Video360P);
        let mut r = reconciler();

        r.reconcile(&input(&people, &layout, &[A, B, C]));
        let ops = r.reconcile(&input(&people, &layout, &[A, B, C]));

        assert!(ops.is_empty(), "second identical pass emitted {ops:?}");
    }

    #[test]
    fn test_adding_one_participant_is_minimal() {
        let layout = grid(4, VideoQuality::Video360P);
        let before = roster(&[A, B, C]);
        let after = roster(&[A, B, C, D]);
        let mut r = reconciler();

        r.reconcile(&input(&before, &layout, &[A, B, C]));
        let ops = r.reconcile(&input(&after, &layout, &[A, B, C, D]));

        assert_eq!(ops, vec![start(D, layout[3])]);
    }

    #[test]
    fn test_removal_precedes_addition() {
        let layout = grid(2, VideoQuality::Video360P);
        let before = roster(&[A, C]);
        let after = roster(&[B, C]);
        let mut r = reconciler();

        r.reconcile(&input(&before, &layout, &[A, C]));
        let ops = r.reconcile(&input(&after, &layout, &[B, C]));

        let stop_a = ops
            .iter()
            .position(|op| *op == RenderOp::Stop { user_id: A })
            .expect("A should be stopped");
        let start_b = ops
            .iter()
            .position(|op| matches!(op, RenderOp::Start { user_id, .. } if *user_id == B))
            .expect("B should be started");
        assert!(stop_a < start_b);
    }

    #[test]
    fn test_local_user_never_started_or_stopped_without_isolation() {
        let layout = grid(3, VideoQuality::Video360P);
        let people = roster(&[LOCAL, A, B]);
        let mut r = reconciler();

        let mut ops = r.reconcile(&input(&people, &layout, &[LOCAL, A, B]));
        ops.extend(r.reconcile(&input(&people, &layout, &[A])));
        ops.extend(r.reconcile(&input(&people, &layout, &[LOCAL, A])));
        ops.extend(r.teardown());

        assert!(!ops.is_empty());
        assert!(ops.iter().all(|op| op.user_id() != LOCAL), "got {ops:?}");
    }

    #[test]
    fn test_local_user_rendered_when_cross_origin_isolated() {
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[LOCAL, A]);
        let mut r = RenderReconciler::new(SelfVideoPolicy::new(true));

        let ops = r.reconcile(&input(&people, &layout, &[LOCAL, A]));

        assert!(ops.contains(&start(LOCAL, layout[0])));
    }

    #[test]
    fn test_order_change_swaps_positions() {
        let layout = grid(3, VideoQuality::Video360P);
        let before = roster(&[A, B, C]);
        let after = roster(&[B, A, C]);
        let mut r = reconciler();

        r.reconcile(&input(&before, &layout, &[A, B, C]));
        let ops = r.reconcile(&input(&after, &layout, &[A, B, C]));

        assert_eq!(ops.len(), 2, "got {ops:?}");
        assert!(ops.contains(&adjust(A, layout[1])));
        assert!(ops.contains(&adjust(B, layout[0])));
        assert!(ops.iter().all(|op| op.user_id() != C));
    }

    #[test]
    fn test_readiness_edge_restarts_unaltered_subscriptions() {
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[A, B]);
        let mut r = reconciler();

        r.reconcile(&input(&people, &layout, &[A, B]));

        let mut not_ready = input(&people, &layout, &[A, B]);
        not_ready.decode_ready = false;
        assert!(r.reconcile(&not_ready).is_empty());

        let ops = r.reconcile(&input(&people, &layout, &[A, B]));
        assert_eq!(ops, vec![start(A, layout[0]), start(B, layout[1])]);
    }

    #[test]
    fn test_subscriptions_requested_before_decode_start_once() {
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[A, B]);
        let mut r = reconciler();

        let mut not_ready = input(&people, &layout, &[A, B]);
        not_ready.decode_ready = false;
        assert!(r.reconcile(&not_ready).is_empty());

        let ops = r.reconcile(&input(&people, &layout, &[A, B]));
        assert_eq!(ops.len(), 2, "each tile should start exactly once: {ops:?}");
    }

    #[test]
    fn test_empty_layout_skips_pass() {
        let people = roster(&[A]);
        let mut r = reconciler();

        assert!(r.reconcile(&input(&people, &[], &[A])).is_empty());
        assert_eq!(r.subscribed(), &[A]);
    }

    #[test]
    fn test_stale_subscription_skipped_silently() {
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[A, B]);
        let mut r = reconciler();

        let ops = r.reconcile(&input(&people, &layout, &[A, D]));

        assert_eq!(ops, vec![start(A, layout[0])]);
    }

    #[test]
    fn test_participant_beyond_layout_is_not_started() {
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[A, B, C]);
        let mut r = reconciler();

        let ops = r.reconcile(&input(&people, &layout, &[C]));

        assert!(ops.is_empty());
    }

    #[test]
    fn test_reshape_repositions_unaltered_tiles() {
        let people = roster(&[A, B]);
        let small = grid(2, VideoQuality::Video360P);
        let wide: Vec<CellGeometry> = small
            .iter()
            .map(|g| CellGeometry::new(g.width * 2, g.height * 2, g.x * 2, g.y * 2, g.quality))
            .collect();
        let mut r = reconciler();

        r.reconcile(&input(&people, &small, &[A, B]));
        let ops = r.reconcile(&input(&people, &wide, &[A, B]));

        assert_eq!(ops, vec![adjust(A, wide[0]), adjust(B, wide[1])]);
    }

    #[test]
    fn test_reshape_with_quality_change_restarts() {
        let people = roster(&[A, B]);
        let low = grid(2, VideoQuality::Video180P);
        let high = grid(2, VideoQuality::Video720P);
        let mut r = reconciler();

        r.reconcile(&input(&people, &low, &[A, B]));
        let ops = r.reconcile(&input(&people, &high, &[A, B]));

        assert_eq!(ops, vec![start(A, high[0]), start(B, high[1])]);
    }

    #[test]
    fn test_quality_compared_by_id_not_index() {
        // A and B swap while the grid shrinks; A's new cell has the quality
        // A already had, so it must be repositioned, not restarted.
        let before_layout = vec![
            CellGeometry::new(640, 360, 0, 0, VideoQuality::Video720P),
            CellGeometry::new(320, 180, 640, 0, VideoQuality::Video180P),
            CellGeometry::new(320, 180, 640, 180, VideoQuality::Video180P),
        ];
        let after_layout = vec![
            CellGeometry::new(480, 270, 0, 0, VideoQuality::Video180P),
            CellGeometry::new(480, 270, 480, 0, VideoQuality::Video720P),
        ];
        let mut r = reconciler();

        r.reconcile(&input(&roster(&[A, B, C]), &before_layout, &[A, B]));
        let ops = r.reconcile(&input(&roster(&[B, A]), &after_layout, &[A, B]));

        assert!(ops.contains(&adjust(A, after_layout[1])));
        assert!(ops.contains(&adjust(B, after_layout[0])));
        assert_eq!(ops.len(), 2, "got {ops:?}");
    }

    #[test]
    fn test_trailing_cell_change_is_not_detected() {
        let people = roster(&[A, B]);
        let before = grid(2, VideoQuality::Video360P);
        let mut after = before.clone();
        after[1].x += 10;
        let mut r = reconciler();

        r.reconcile(&input(&people, &before, &[A, B]));
        let ops = r.reconcile(&input(&people, &after, &[A, B]));

        assert!(ops.is_empty());
    }

    #[test]
    fn test_reshape_compares_against_last_rendered_quality() {
        let people = roster(&[A, B]);
        let low = grid(2, VideoQuality::Video180P);

        // Only the trailing cell moves up a tier: not a reshape, so B keeps
        // decoding at 180p.
        let mut trailing_high = low.clone();
        trailing_high[1].quality = VideoQuality::Video720P;

        let reshaped = vec![
            CellGeometry::new(480, 270, 0, 0, VideoQuality::Video180P),
            CellGeometry::new(480, 270, 480, 0, VideoQuality::Video720P),
        ];
        let mut r = reconciler();

        r.reconcile(&input(&people, &low, &[A, B]));
        assert!(r.reconcile(&input(&people, &trailing_high, &[A, B])).is_empty());
        let ops = r.reconcile(&input(&people, &reshaped, &[A, B]));

        assert_eq!(ops, vec![adjust(A, reshaped[0]), start(B, reshaped[1])]);
    }

    #[test]
    fn test_reposition_keeps_started_quality() {
        let before_layout = vec![
            CellGeometry::new(640, 360, 0, 0, VideoQuality::Video720P),
            CellGeometry::new(320, 180, 640, 0, VideoQuality::Video180P),
        ];
        let reshaped = vec![
            CellGeometry::new(480, 270, 0, 0, VideoQuality::Video720P),
            CellGeometry::new(480, 270, 480, 0, VideoQuality::Video180P),
        ];
        let mut r = reconciler();

        r.reconcile(&input(&roster(&[A, B]), &before_layout, &[A, B]));
        // Swap: each tile is repositioned into a cell of the other tier.
        let ops = r.reconcile(&input(&roster(&[B, A]), &before_layout, &[A, B]));
        assert_eq!(ops.len(), 2, "got {ops:?}");
        assert!(ops.iter().all(|op| matches!(op, RenderOp::Adjust { .. })));

        // Back in their original tiers after the reshape: nothing to restart.
        let ops = r.reconcile(&input(&roster(&[A, B]), &reshaped, &[A, B]));
        assert_eq!(ops, vec![adjust(A, reshaped[0]), adjust(B, reshaped[1])]);
    }

    #[test]
    fn test_subscription_without_cell_starts_once_cell_appears() {
        let single = grid(1, VideoQuality::Video360P);
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[A, B]);
        let mut r = reconciler();

        // B is subscribed before it reaches the roster.
        let ops = r.reconcile(&input(&people[..1], &single, &[A, B]));
        assert_eq!(ops, vec![start(A, single[0])]);

        let ops = r.reconcile(&input(&people, &layout, &[A, B]));
        assert_eq!(ops, vec![start(B, layout[1]), adjust(A, layout[0])]);

        // Rendered now, so an identical pass is quiet.
        assert!(r.reconcile(&input(&people, &layout, &[A, B])).is_empty());
    }

    #[test]
    fn test_teardown_forgets_rendered_tiles() {
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[A, B]);
        let mut r = reconciler();

        r.reconcile(&input(&people, &layout, &[A, B]));
        r.teardown();
        let ops = r.reconcile(&input(&people, &layout, &[A, B]));

        assert_eq!(ops, vec![start(A, layout[0]), start(B, layout[1])]);
    }

    #[test]
    fn test_teardown_stops_latest_subscriptions() {
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[A, B]);
        let mut r = reconciler();

        r.reconcile(&input(&people, &layout, &[A, B]));
        let ops = r.teardown();

        assert_eq!(
            ops,
            vec![RenderOp::Stop { user_id: A }, RenderOp::Stop { user_id: B }]
        );
        assert!(r.subscribed().is_empty());
        assert!(r.teardown().is_empty());
    }

    #[test]
    fn test_duplicate_subscriptions_are_ignored() {
        let layout = grid(2, VideoQuality::Video360P);
        let people = roster(&[A, B]);
        let mut r = reconciler();

        let ops = r.reconcile(&input(&people, &layout, &[A, A, B]));

        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn test_subscription_diff_partition() {
        let diff = SubscriptionDiff::between(&[A, B, C], &[C, D, B]);

        assert_eq!(diff.removed, vec![A]);
        assert_eq!(diff.added, vec![D]);
        assert_eq!(diff.unaltered, vec![C, B]);
    }
}
