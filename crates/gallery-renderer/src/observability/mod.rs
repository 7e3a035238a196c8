//! Observability for the gallery renderer.
//!
//! # Logging
//!
//! All components log through `tracing` with explicit targets:
//!
//! | Target | Component |
//! |--------|-----------|
//! | `gallery.reconciler` | Subscription reconciliation passes |
//! | `gallery.surface` | Surface dispatch and call failures |
//! | `gallery.dimension` | Debounced canvas sizing |
//! | `gallery.pagination` | Page capacity planning |
//! | `gallery.speaker` | Single-tile active speaker view |
//! | `gallery.share` | Screen share viewing |
//! | `gallery.replay` | Scenario replay binary |
//!
//! Participant ids are logged as fields, display names never are.
//!
//! # Metrics
//!
//! | Metric | Type | Labels | Purpose |
//! |--------|------|--------|---------|
//! | `gallery_reconcile_passes_total` | Counter | `outcome` | Applied vs gated passes |
//! | `gallery_render_ops_total` | Counter | `operation` | Operations emitted |
//! | `gallery_surface_calls_total` | Counter | `operation`, `outcome` | Surface call results |
//! | `gallery_surface_call_duration_seconds` | Histogram | `operation` | Surface call latency |
//! | `gallery_dimension_fallbacks_total` | Counter | none | Pixel size assignment fallbacks |
//! | `gallery_tiles_subscribed` | Gauge | none | Current subscription size |

pub mod metrics;

use common::config::ObservabilityConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
