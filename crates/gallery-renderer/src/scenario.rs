//! Recorded gallery scenarios for offline replay.
//!
//! A scenario is a JSON document listing successive pass inputs:
//!
//! ```json
//! {
//!   "local_user": 100,
//!   "passes": [
//!     {
//!       "participants": [{ "user_id": 1, "video_on": true }],
//!       "layout": [{ "width": 640, "height": 360, "x": 0, "y": 0, "quality": "360p" }],
//!       "subscriptions": [1],
//!       "decode_ready": true
//!     }
//!   ]
//! }
//! ```

use common::types::{CellGeometry, Participant, UserId};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::GalleryError;
use crate::reconciler::PassInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub local_user: Option<UserId>,
    /// Overrides the configured capability when present.
    #[serde(default)]
    pub cross_origin_isolated: Option<bool>,
    pub passes: Vec<ScenarioPass>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPass {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub layout: Vec<CellGeometry>,
    #[serde(default)]
    pub subscriptions: Vec<UserId>,
    #[serde(default = "default_decode_ready")]
    pub decode_ready: bool,
}

fn default_decode_ready() -> bool {
    true
}

impl ScenarioPass {
    #[must_use]
    pub fn input(&self, local_user: Option<UserId>) -> PassInput<'_> {
        PassInput {
            participants: &self.participants,
            layout: &self.layout,
            subscriptions: &self.subscriptions,
            decode_ready: self.decode_ready,
            local_user,
        }
    }
}

impl Scenario {
    /// Parse a scenario document.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Scenario` on malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, GalleryError> {
        serde_json::from_str(raw).map_err(|e| GalleryError::Scenario(e.to_string()))
    }

    /// Read and parse a scenario file.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Scenario` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GalleryError::Scenario(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::types::VideoQuality;

    #[test]
    fn test_parse_scenario_with_defaults() {
        let raw = r#"{
            "local_user": 100,
            "passes": [
                {
                    "participants": [{ "user_id": 1, "video_on": true }, { "user_id": 100 }],
                    "layout": [
                        { "width": 640, "height": 360, "x": 0, "y": 0, "quality": "360p" },
                        { "width": 640, "height": 360, "x": 640, "y": 0, "quality": "360p" }
                    ],
                    "subscriptions": [1, 100]
                },
                { "decode_ready": false }
            ]
        }"#;

        let scenario = Scenario::from_json(raw).unwrap();

        assert_eq!(scenario.local_user, Some(UserId(100)));
        assert_eq!(scenario.cross_origin_isolated, None);
        assert_eq!(scenario.passes.len(), 2);

        let first = scenario.passes.first().unwrap();
        assert!(first.decode_ready);
        assert_eq!(
            first.layout.first().map(|g| g.quality),
            Some(VideoQuality::Video360P)
        );

        let input = first.input(scenario.local_user);
        assert_eq!(input.participants.len(), 2);
        assert_eq!(input.subscriptions, &[UserId(1), UserId(100)]);

        let second = scenario.passes.get(1).unwrap();
        assert!(!second.decode_ready);
        assert!(second.layout.is_empty());
    }

    #[test]
    fn test_malformed_scenario_is_an_error() {
        let err = Scenario::from_json(r#"{ "passes": [ { "layout": 3 } ] }"#).unwrap_err();
        assert!(matches!(err, GalleryError::Scenario(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Scenario::load(Path::new("/nonexistent/gallery-scenario.json")).unwrap_err();
        assert!(err.to_string().contains("gallery-scenario.json"));
    }
}
