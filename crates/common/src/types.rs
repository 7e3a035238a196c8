//! Common data types for the gallery renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media engine identifier for a participant in the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A participant as reported by the call roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Engine-assigned id, unique within the session.
    pub user_id: UserId,
    /// Whether the participant is currently sending video.
    #[serde(default)]
    pub video_on: bool,
    /// Display name shown on the tile.
    #[serde(default)]
    pub display_name: String,
}

impl Participant {
    /// Create a participant with video on and an empty display name.
    #[must_use]
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            video_on: true,
            display_name: String::new(),
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the video-on flag.
    #[must_use]
    pub fn with_video(mut self, video_on: bool) -> Self {
        self.video_on = video_on;
        self
    }
}

/// Pixel size of a drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    /// The zero-sized dimension.
    pub const ZERO: Dimension = Dimension {
        width: 0,
        height: 0,
    };

    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Decode quality tier requested from the media engine for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "90p")]
    Video90P,
    #[serde(rename = "180p")]
    Video180P,
    #[serde(rename = "360p")]
    Video360P,
    #[serde(rename = "720p")]
    Video720P,
    #[serde(rename = "1080p")]
    Video1080P,
}

impl VideoQuality {
    /// Returns the quality tier as a string for logs and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            VideoQuality::Video90P => "90p",
            VideoQuality::Video180P => "180p",
            VideoQuality::Video360P => "360p",
            VideoQuality::Video720P => "720p",
            VideoQuality::Video1080P => "1080p",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rectangle and quality of one grid cell on the composite canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellGeometry {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
    pub quality: VideoQuality,
}

impl CellGeometry {
    #[must_use]
    pub const fn new(width: u32, height: u32, x: u32, y: u32, quality: VideoQuality) -> Self {
        Self {
            width,
            height,
            x,
            y,
            quality,
        }
    }

    /// A cell covering the whole canvas at the given quality.
    #[must_use]
    pub const fn full_canvas(dimension: Dimension, quality: VideoQuality) -> Self {
        Self::new(dimension.width, dimension.height, 0, 0, quality)
    }

    /// Size of the cell, ignoring position and quality.
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        Dimension::new(self.width, self.height)
    }
}
