//! Page capacity planning for the gallery grid.
//!
//! The layout engine reports how many tiles fit at a viewport size; the
//! planner caps that at the engine ceiling and splits the roster into pages.
//!
//! A selected page index is never clamped when capacity shrinks. Callers that
//! care check [`PaginationPlanner::is_page_in_range`].

use common::types::{CellGeometry, Dimension, Participant};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::layout::LayoutProvider;

/// Most tiles the engine will composite on one canvas.
pub const MAX_TILES_PER_PAGE: usize = 9;

/// Result of one capacity computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    /// Tiles per page.
    pub page_size: usize,
    /// Number of pages for `total_size` participants.
    pub total_pages: usize,
    /// Participants being paged.
    pub total_size: usize,
}

/// Compute page size and page count.
///
/// Zero capacity yields zero pages.
#[must_use]
pub fn plan_pages(capacity: usize, hard_max: usize, total_size: usize) -> PagePlan {
    let page_size = capacity.min(hard_max);
    let total_pages = if page_size == 0 {
        0
    } else {
        total_size.div_ceil(page_size)
    };

    PagePlan {
        page_size,
        total_pages,
        total_size,
    }
}

/// Tracks viewport size, roster size and page selection for one gallery.
pub struct PaginationPlanner {
    layout: Arc<dyn LayoutProvider>,
    hard_max: usize,
    dimension: Option<Dimension>,
    plan: PagePlan,
    page: usize,
}

impl PaginationPlanner {
    /// Create a planner. `hard_max` is clamped to `1..=MAX_TILES_PER_PAGE`.
    #[must_use]
    pub fn new(layout: Arc<dyn LayoutProvider>, hard_max: usize) -> Self {
        let hard_max = hard_max.clamp(1, MAX_TILES_PER_PAGE);

        Self {
            layout,
            hard_max,
            dimension: None,
            plan: PagePlan {
                page_size: hard_max,
                total_pages: 0,
                total_size: 0,
            },
            page: 0,
        }
    }

    /// Planner capped at the configured tiles per page.
    #[must_use]
    pub fn from_config(layout: Arc<dyn LayoutProvider>, config: &Config) -> Self {
        Self::new(layout, config.max_tiles_per_page)
    }

    #[must_use]
    pub fn plan(&self) -> PagePlan {
        self.plan
    }

    #[must_use]
    pub fn dimension(&self) -> Option<Dimension> {
        self.dimension
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Recompute after a viewport change.
    pub fn set_dimension(&mut self, dimension: Dimension) -> PagePlan {
        self.dimension = Some(dimension);
        self.recompute()
    }

    /// Recompute after a roster size change.
    pub fn set_total_size(&mut self, total_size: usize) -> PagePlan {
        self.plan.total_size = total_size;
        self.recompute()
    }

    /// Select a page. The index is stored as given, even when out of range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        if !self.is_page_in_range() {
            warn!(
                target: "gallery.pagination",
                page,
                total_pages = self.plan.total_pages,
                "Selected page is beyond the last page"
            );
        }
    }

    #[must_use]
    pub fn is_page_in_range(&self) -> bool {
        self.page < self.plan.total_pages
    }

    /// Roster indices shown on the selected page. Empty when out of range.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.page.saturating_mul(self.plan.page_size);
        let end = start
            .saturating_add(self.plan.page_size)
            .min(self.plan.total_size);

        if start >= end {
            return 0..0;
        }
        start..end
    }

    /// Participants shown on the selected page.
    #[must_use]
    pub fn visible_page<'a>(&self, roster: &'a [Participant]) -> &'a [Participant] {
        let range = self.visible_range();
        let end = range.end.min(roster.len());
        roster.get(range.start.min(end)..end).unwrap_or_default()
    }

    /// Cell geometry for `visible` at the current viewport size. Empty until
    /// a dimension is known.
    #[must_use]
    pub fn cell_geometry_for(&self, visible: &[Participant]) -> Vec<CellGeometry> {
        match self.dimension {
            Some(dimension) => self.layout.cell_geometry_for(visible, dimension),
            None => Vec::new(),
        }
    }

    fn recompute(&mut self) -> PagePlan {
        let capacity = match self.dimension {
            Some(dimension) => self.layout.capacity(dimension),
            None => self.hard_max,
        };

        let plan = plan_pages(capacity, self.hard_max, self.plan.total_size);
        if plan != self.plan {
            debug!(
                target: "gallery.pagination",
                page_size = plan.page_size,
                total_pages = plan.total_pages,
                total_size = plan.total_size,
                "Page plan changed"
            );
        }
        self.plan = plan;

        if !self.is_page_in_range() && self.page > 0 {
            warn!(
                target: "gallery.pagination",
                page = self.page,
                total_pages = plan.total_pages,
                "Selected page no longer exists after capacity change"
            );
        }
        plan
    }
}
