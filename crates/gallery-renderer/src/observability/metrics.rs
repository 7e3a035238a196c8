//! Metrics definitions for the gallery renderer.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gallery_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `operation`: 6 values (`render_start`, `stop_render`, `adjust_position`,
//!   `start_share_view`, `stop_share_view`, `update_sharing_canvas_dimension`)
//! - `outcome`: success plus the `SurfaceError` labels (4 values)
//! - pass `outcome`: `applied`, `skipped` (2 values)
//!
//! Participant ids are never used as labels.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

// ============================================================================
// Reconciliation
// ============================================================================

/// Record one reconciliation pass.
///
/// Metric: `gallery_reconcile_passes_total`
/// Labels: `outcome` (applied, skipped)
pub fn record_reconcile_pass(outcome: &'static str) {
    counter!("gallery_reconcile_passes_total", "outcome" => outcome).increment(1);
}

/// Record one render operation handed to the dispatcher.
///
/// Metric: `gallery_render_ops_total`
/// Labels: `operation`
pub fn record_render_op(operation: &'static str) {
    counter!("gallery_render_ops_total", "operation" => operation).increment(1);
}

/// Set the number of subscribed tiles on a surface.
///
/// Metric: `gallery_tiles_subscribed`
pub fn set_tiles_subscribed(count: usize) {
    // usize to f64 conversion is safe for realistic tile counts
    #[allow(clippy::cast_precision_loss)]
    gauge!("gallery_tiles_subscribed").set(count as f64);
}

// ============================================================================
// Surface calls
// ============================================================================

/// Record a completed surface call and its latency.
///
/// Metrics: `gallery_surface_calls_total`, `gallery_surface_call_duration_seconds`
/// Labels: `operation`, `outcome`
pub fn record_surface_call(operation: &'static str, outcome: &'static str, duration: Duration) {
    counter!(
        "gallery_surface_calls_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gallery_surface_call_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
}

// ============================================================================
// Dimension tracking
// ============================================================================

/// Record a fallback to `update_canvas_dimension` after direct pixel size
/// assignment failed.
///
/// Metric: `gallery_dimension_fallbacks_total`
pub fn record_dimension_fallback() {
    counter!("gallery_dimension_fallbacks_total").increment(1);
}
