//! Self video exclusion from canvas compositing.
//!
//! Without cross-origin isolation the engine cannot draw the local camera
//! onto the shared canvas; a dedicated video element shows it instead, and
//! the gallery must never start or stop the local tile.

use common::types::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfVideoPolicy {
    cross_origin_isolated: bool,
}

impl SelfVideoPolicy {
    #[must_use]
    pub const fn new(cross_origin_isolated: bool) -> Self {
        Self {
            cross_origin_isolated,
        }
    }

    #[must_use]
    pub const fn cross_origin_isolated(&self) -> bool {
        self.cross_origin_isolated
    }

    /// True when `candidate` is the local user and must not be composited.
    #[must_use]
    pub fn excludes(&self, candidate: UserId, local_user: Option<UserId>) -> bool {
        !self.cross_origin_isolated && local_user == Some(candidate)
    }
}
