//! Gallery Replay
//!
//! Runs a recorded scenario through a `GalleryView` backed by a surface that
//! only logs, and prints the operations each pass produced.
//!
//! # Usage
//!
//! ```text
//! gallery-replay <scenario.json>
//! GALLERY_SCENARIO_PATH=scenario.json gallery-replay
//! ```

#![warn(clippy::pedantic)]

use anyhow::{bail, Context};
use async_trait::async_trait;
use common::types::{CellGeometry, Dimension, UserId};
use gallery_renderer::config::Config;
use gallery_renderer::errors::SurfaceError;
use gallery_renderer::gallery::GalleryView;
use gallery_renderer::observability::init_tracing;
use gallery_renderer::scenario::Scenario;
use gallery_renderer::surface::{OpKind, RenderOp, RenderSurface, SurfaceTarget};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Surface that accepts every call and logs it.
struct LoggingSurface;

#[async_trait]
impl RenderSurface for LoggingSurface {
    async fn render_start(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
        geometry: CellGeometry,
    ) -> Result<(), SurfaceError> {
        info!(
            target: "gallery.replay",
            target_name = %target,
            user_id = %user_id,
            cell = %geometry.dimension(),
            x = geometry.x,
            y = geometry.y,
            quality = geometry.quality.as_str(),
            "render_start"
        );
        Ok(())
    }

    async fn stop_render(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
    ) -> Result<(), SurfaceError> {
        info!(
            target: "gallery.replay",
            target_name = %target,
            user_id = %user_id,
            "stop_render"
        );
        Ok(())
    }

    async fn adjust_position(
        &self,
        target: &SurfaceTarget,
        user_id: UserId,
        geometry: CellGeometry,
    ) -> Result<(), SurfaceError> {
        info!(
            target: "gallery.replay",
            target_name = %target,
            user_id = %user_id,
            cell = %geometry.dimension(),
            x = geometry.x,
            y = geometry.y,
            "adjust_position"
        );
        Ok(())
    }

    async fn update_canvas_dimension(
        &self,
        target: &SurfaceTarget,
        dimension: Dimension,
    ) -> Result<(), SurfaceError> {
        info!(
            target: "gallery.replay",
            target_name = %target,
            dimension = %dimension,
            "update_canvas_dimension"
        );
        Ok(())
    }
}

fn scenario_path() -> anyhow::Result<PathBuf> {
    if let Some(arg) = std::env::args_os().nth(1) {
        return Ok(PathBuf::from(arg));
    }
    match std::env::var_os("GALLERY_SCENARIO_PATH") {
        Some(path) => Ok(PathBuf::from(path)),
        None => bail!("usage: gallery-replay <scenario.json> (or set GALLERY_SCENARIO_PATH)"),
    }
}

fn summarize(ops: &[RenderOp]) -> String {
    let count = |kind: OpKind| ops.iter().filter(|op| op.kind() == kind).count();
    format!(
        "{} start, {} stop, {} adjust",
        count(OpKind::RenderStart),
        count(OpKind::StopRender),
        count(OpKind::AdjustPosition)
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config.observability);

    let path = scenario_path()?;
    let scenario = Scenario::load(&path)
        .with_context(|| format!("Failed to load scenario {}", path.display()))?;

    if let Some(isolated) = scenario.cross_origin_isolated {
        config.cross_origin_isolated = isolated;
    }

    info!(
        target: "gallery.replay",
        scenario = %path.display(),
        passes = scenario.passes.len(),
        canvas_target = %config.canvas_target,
        cross_origin_isolated = config.cross_origin_isolated,
        "Starting replay"
    );

    let mut view = GalleryView::from_config(Arc::new(LoggingSurface), &config)
        .context("Failed to attach gallery view")?;

    for (index, pass) in scenario.passes.iter().enumerate() {
        let ops = view.apply(&pass.input(scenario.local_user));
        println!("pass {index}: {}", summarize(&ops));
    }

    view.detach().await;
    info!(target: "gallery.replay", "Replay complete");

    Ok(())
}
