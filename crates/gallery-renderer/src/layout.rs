//! Layout collaborator interface.
//!
//! Capacity and per-cell rectangles are computed outside this crate. The
//! gallery only consumes them.

use common::types::{CellGeometry, Dimension, Participant};

/// External layout engine for the gallery grid.
///
/// Implementations must be pure: the same input yields the same output.
pub trait LayoutProvider: Send + Sync {
    /// Maximum number of tiles presentable at the given viewport size.
    fn capacity(&self, dimension: Dimension) -> usize;

    /// Geometry for each visible participant, positionally parallel to
    /// `visible`.
    fn cell_geometry_for(&self, visible: &[Participant], dimension: Dimension)
        -> Vec<CellGeometry>;
}
