//! Playlist track model

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One playlist entry, owned by the controller for the playlist's lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    /// Where the audio lives; also drives transport selection
    pub media_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    /// Raw timed-text blob persisted alongside the track, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
}

impl Track {
    /// Minimal track for callers that only have an id and a source
    pub fn new(id: i64, media_url: impl Into<String>) -> Self {
        Self {
            id,
            media_url: media_url.into(),
            title: None,
            artist: None,
            album: None,
            duration: None,
            lyrics: None,
        }
    }
}
