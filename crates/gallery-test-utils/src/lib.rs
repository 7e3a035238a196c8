//! # Gallery Test Utilities
//!
//! Shared test utilities for the gallery renderer.
//!
//! This crate provides mock implementations of the external collaborators
//! (render surface, drawable, layout engine) and roster fixtures, so the
//! renderer can be tested without a media engine.
//!
//! ## Modules
//!
//! - `mock_surface` - Recording render/share surface with failure and delay injection
//! - `mock_drawable` - Drawable with scripted size and pixel assignment failures
//! - `mock_layout` - Table-driven capacity and uniform grid geometry
//! - `fixtures` - Participants and cell geometry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gallery_test_utils::*;
//!
//! #[tokio::test(start_paused = true)]
//! async fn test_example() {
//!     let surface = RecordingSurface::builder()
//!         .delay_render_start_for(UserId(1), Duration::from_millis(100))
//!         .build();
//!
//!     let mut view = GalleryView::from_config(surface.clone(), &Config::default()).unwrap();
//!     // Apply passes, detach, then inspect surface.calls()...
//! }
//! ```

pub mod fixtures;
pub mod mock_drawable;
pub mod mock_layout;
pub mod mock_surface;

// Re-export commonly used items
pub use fixtures::*;
pub use mock_drawable::*;
pub use mock_layout::*;
pub use mock_surface::*;
