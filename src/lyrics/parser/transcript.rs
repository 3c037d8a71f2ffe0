//! Machine-transcript adapter
//!
//! Adapts word/segment-level transcription output (each segment has
//! start/end and optional per-word timing) into the same `TimedDocument`
//! shape the bracketed-timestamp parser produces, so both upstream
//! producers feed one downstream consumer.

use serde::{Deserialize, Serialize};

use super::types::{TimedDocument, TimedLine, TimedWord, normalize_lines};
use crate::lyrics::filter::SpamFilter;

/// One word of a transcript segment, times in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// One segment of a machine transcription, times in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<TranscriptWord>>,
}

fn secs_to_ms(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    }
}

/// Build a document from transcript segments
///
/// Segment text runs through the same deny-list as parsed lyric lines;
/// transcription models hallucinate credit lines too.
pub(crate) fn from_transcript(segments: &[TranscriptSegment], filter: &SpamFilter) -> TimedDocument {
    let mut lines = Vec::with_capacity(segments.len());

    for segment in segments {
        let text = segment.text.trim();
        if filter.is_spam(text) {
            continue;
        }

        let words = segment
            .words
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|w| !w.word.trim().is_empty())
            .map(|w| TimedWord {
                start_ms: secs_to_ms(w.start),
                end_ms: secs_to_ms(w.end),
                text: w.word.clone(),
            })
            .collect();

        lines.push(TimedLine {
            start_ms: secs_to_ms(segment.start),
            end_ms: secs_to_ms(segment.end),
            text: text.to_string(),
            words,
        });
    }

    normalize_lines(&mut lines);
    TimedDocument {
        lines,
        ..Default::default()
    }
}

/// Deserialize a JSON array of transcript segments
pub fn segments_from_json(raw: &str) -> serde_json::Result<Vec<TranscriptSegment>> {
    serde_json::from_str(raw)
}
