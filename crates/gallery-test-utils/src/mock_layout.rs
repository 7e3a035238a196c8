//! Layout engine stand-in.
//!
//! Capacity comes from a lookup table keyed by viewport size. Geometry is a
//! uniform grid with as many columns as the square root of the tile count,
//! rounded up.

use common::types::{CellGeometry, Dimension, Participant, VideoQuality};
use gallery_renderer::layout::LayoutProvider;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TableLayout {
    capacities: HashMap<Dimension, usize>,
    default_capacity: usize,
}

impl TableLayout {
    /// Layout whose capacity is `default_capacity` at every size.
    #[must_use]
    pub fn new(default_capacity: usize) -> Self {
        Self {
            capacities: HashMap::new(),
            default_capacity,
        }
    }

    /// Capacity at one specific viewport size.
    #[must_use]
    pub fn with_capacity_at(mut self, dimension: Dimension, capacity: usize) -> Self {
        self.capacities.insert(dimension, capacity);
        self
    }

    #[must_use]
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

/// Quality tier for a cell of the given height.
#[must_use]
pub fn quality_for_height(height: u32) -> VideoQuality {
    if height >= 720 {
        VideoQuality::Video720P
    } else if height >= 360 {
        VideoQuality::Video360P
    } else if height >= 180 {
        VideoQuality::Video180P
    } else {
        VideoQuality::Video90P
    }
}

impl LayoutProvider for TableLayout {
    fn capacity(&self, dimension: Dimension) -> usize {
        self.capacities
            .get(&dimension)
            .copied()
            .unwrap_or(self.default_capacity)
    }

    fn cell_geometry_for(
        &self,
        visible: &[Participant],
        dimension: Dimension,
    ) -> Vec<CellGeometry> {
        let count = u32::try_from(visible.len()).unwrap();
        if count == 0 || dimension.is_empty() {
            return Vec::new();
        }

        let columns = (1..=count).find(|c| c * c >= count).unwrap();
        let rows = count.div_ceil(columns);
        let width = dimension.width / columns;
        let height = dimension.height / rows;
        let quality = quality_for_height(height);

        (0..count)
            .map(|i| {
                CellGeometry::new(
                    width,
                    height,
                    (i % columns) * width,
                    (i / columns) * height,
                    quality,
                )
            })
            .collect()
    }
}
