//! Timed-text parsing entry points
//!
//! Two producers feed one document shape: the bracketed-timestamp lyric
//! dialect (`parse`) and machine-transcription segments
//! (`from_transcript`). Both silently drop malformed and deny-listed
//! input — lyric display is a non-critical enhancement, so nothing here
//! returns an error for a corrupt blob.

mod lrc;
pub mod transcript;
pub mod types;

pub use transcript::{TranscriptSegment, TranscriptWord, segments_from_json};
pub use types::{TimedDocument, TimedLine, TimedWord};

use crate::lyrics::filter::SpamFilter;

/// Parse a raw timed-text blob into a normalized document
pub fn parse(raw: &str) -> TimedDocument {
    parse_with_filter(raw, SpamFilter::shared())
}

/// Parse with a caller-configured deny-list
pub fn parse_with_filter(raw: &str, filter: &SpamFilter) -> TimedDocument {
    lrc::parse_lrc(raw, filter)
}

/// Adapt machine-transcription segments into a document
pub fn from_transcript(segments: &[TranscriptSegment]) -> TimedDocument {
    transcript::from_transcript(segments, SpamFilter::shared())
}

/// Adapt transcript segments with a caller-configured deny-list
pub fn from_transcript_with_filter(
    segments: &[TranscriptSegment],
    filter: &SpamFilter,
) -> TimedDocument {
    transcript::from_transcript(segments, filter)
}

/// Serialize a document back to the bracketed-timestamp dialect
///
/// The inverse of `parse` for the sorted, filtered line set; spam lines
/// and input ordering are normalized away by design.
pub fn serialize(doc: &TimedDocument) -> String {
    lrc::serialize_lrc(doc)
}
