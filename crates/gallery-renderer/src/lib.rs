//! Gallery Renderer Library
//!
//! Render reconciliation for canvas-based multi-tile video galleries. A
//! media engine composites many participants' video onto one drawable
//! surface; this crate decides which tiles to start, stop, and reposition
//! as the roster, viewport, and decode state change.
//!
//! # Architecture
//!
//! ```text
//! GalleryView (one per render surface)
//! ├── RenderReconciler (pure diff: inputs -> Vec<RenderOp>)
//! └── SurfaceDispatcher
//!     └── TileWorker (one per participant id, FIFO mailbox)
//!
//! DimensionTracker (one task per drawable, trailing debounce)
//! PaginationPlanner (capacity -> page size -> visible roster slice)
//! ```
//!
//! # Key Design Decisions
//!
//! - **Pure reconciler**: passes return operations and never await the surface
//! - **Per-id ordering**: calls for one participant reach the surface in issue
//!   order; different participants run concurrently
//! - **Best-effort surface**: failed calls are logged and counted, never retried
//! - **Guaranteed release**: dropping an attached view still stops its tiles
//!
//! # Modules
//!
//! - [`reconciler`] - Subscription diff and operation ordering
//! - [`surface`] - Render surface capability and dispatch
//! - [`gallery`] - View owning a reconciler and dispatcher
//! - [`pagination`] - Page capacity planning
//! - [`dimension`] - Debounced drawable sizing
//! - [`self_video`] - Local video exclusion from the canvas
//! - [`speaker`] - Single-tile active speaker view
//! - [`share`] - Remote screen share viewing
//! - [`layout`] - Layout engine interface
//! - [`scenario`] - Replay scenario documents
//! - [`config`] - Configuration from environment
//! - [`errors`] - Error types
//! - [`observability`] - Tracing setup and metrics

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dimension;
pub mod errors;
pub mod gallery;
pub mod layout;
pub mod observability;
pub mod pagination;
pub mod reconciler;
pub mod scenario;
pub mod self_video;
pub mod share;
pub mod speaker;
pub mod surface;
