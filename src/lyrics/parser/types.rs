//! Timed-text data types
//!
//! Owned, normalized representation shared by every parser entry point.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Latest representable timestamp: 999:99.999
pub(crate) const MAX_TIME_MS: u64 = 60_039_999;

/// Assumed tail window after the last line's start, used when no later
/// line exists to bound it.
pub(crate) const LAST_LINE_TAIL_MS: u64 = 10_000;

/// A single word inside a line, for word-level sync
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedWord {
    /// Start time in milliseconds
    pub start_ms: u64,
    /// End time in milliseconds, always greater than `start_ms`
    pub end_ms: u64,
    /// The word text
    pub text: String,
}

impl TimedWord {
    /// Check if the word is empty (whitespace only)
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A single line of timed text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedLine {
    /// Start time in milliseconds
    pub start_ms: u64,
    /// End time in milliseconds, filled from the next line's start
    pub end_ms: u64,
    /// Full line text
    pub text: String,
    /// Word timing, empty when only line-level sync is available
    #[serde(default)]
    pub words: Vec<TimedWord>,
}

impl TimedLine {
    /// Check if the line carries word-level timing
    pub fn has_word_timing(&self) -> bool {
        !self.words.is_empty()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A fully parsed timed-text document
///
/// Produced fresh on every parse and never mutated in place; a re-parse
/// yields a new document. Lines are sorted ascending by `start_ms`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedDocument {
    pub lines: Vec<TimedLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Track duration declared by the source, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hint: Option<Duration>,
}

impl TimedDocument {
    /// Whether the document carries any displayable lyric lines
    ///
    /// An empty document is the normal "no lyrics" state, not an error.
    pub fn has_lyrics(&self) -> bool {
        !self.lines.is_empty()
    }
}

/// Sort lines by start time and fill end times from the next line's start.
///
/// Called by every parser before the lines reach a document, so no
/// consumer can ever observe an unsorted line list.
pub(crate) fn normalize_lines(lines: &mut Vec<TimedLine>) {
    lines.sort_by_key(|line| line.start_ms);

    let mut next_start = u64::MAX;
    for line in lines.iter_mut().rev() {
        line.start_ms = line.start_ms.clamp(0, MAX_TIME_MS);

        if line.end_ms == 0 || line.end_ms <= line.start_ms {
            line.end_ms = if next_start == u64::MAX {
                line.start_ms.saturating_add(LAST_LINE_TAIL_MS)
            } else {
                next_start
            };
        }
        line.end_ms = line.end_ms.clamp(0, MAX_TIME_MS);

        for word in line.words.iter_mut() {
            word.start_ms = word.start_ms.clamp(0, MAX_TIME_MS);
            word.end_ms = word.end_ms.clamp(0, MAX_TIME_MS);
        }
        // Word spans must be strictly increasing; drop degenerate ones
        line.words.retain(|w| w.start_ms < w.end_ms);

        next_start = line.start_ms;
    }
}
