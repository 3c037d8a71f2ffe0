//! Lyric timing index
//!
//! Pure, stateless lookups over an already-parsed `TimedDocument`,
//! intended to be called from a high-frequency time-update callback.
//! The user calibration offset shifts the comparison time only; the
//! stored data never moves. Out-of-range positions and empty documents
//! are ordinary `None`/empty results, never errors.

use std::time::Duration;

use serde::Serialize;

use super::parser::types::{LAST_LINE_TAIL_MS, TimedDocument, TimedLine};

/// Playback position adjusted by the calibration offset, in ms
fn adjusted_ms(position: Duration, offset_ms: i64) -> i64 {
    position.as_millis() as i64 + offset_ms
}

/// Find the active line: the greatest index whose start time is at or
/// before the adjusted position. `None` before the first line.
///
/// Binary search; lines are sorted ascending by construction.
pub fn find_current_line_index(
    lines: &[TimedLine],
    position: Duration,
    offset_ms: i64,
) -> Option<usize> {
    let adjusted = adjusted_ms(position, offset_ms);
    let idx = lines.partition_point(|line| line.start_ms as i64 <= adjusted);
    idx.checked_sub(1)
}

/// Find the active word within a line
///
/// Returns the word whose span contains the adjusted position. Past the
/// last word's end, the last word stays active so highlighting does not
/// flicker at line end. Before the first word, or for lines without
/// word timing, returns `None` and the caller degrades to line-level
/// highlighting.
pub fn find_current_word_index(
    line: &TimedLine,
    position: Duration,
    offset_ms: i64,
) -> Option<usize> {
    if line.words.is_empty() {
        return None;
    }
    let adjusted = adjusted_ms(position, offset_ms);
    let idx = line
        .words
        .partition_point(|word| word.start_ms as i64 <= adjusted);
    idx.checked_sub(1)
}

/// Snapshot of the lyric position at one playback instant
#[derive(Debug, Clone, Serialize)]
pub struct LyricState<'a> {
    /// Active line index, `None` before the first line
    pub line_index: Option<usize>,
    pub line: Option<&'a TimedLine>,
    /// Active word within the line, `None` without word timing
    pub word_index: Option<usize>,
    /// Fraction of the active line elapsed, in `[0, 1]`
    ///
    /// Measured against the next line's start (or an assumed 10 s tail
    /// on the last line); drives interpolated highlighting when no word
    /// timing exists.
    pub progress: f32,
}

impl LyricState<'_> {
    fn inactive() -> Self {
        LyricState {
            line_index: None,
            line: None,
            word_index: None,
            progress: 0.0,
        }
    }
}

/// Compose line, word, and progress lookups for one instant
pub fn current_lyric_state(
    doc: &TimedDocument,
    position: Duration,
    offset_ms: i64,
) -> LyricState<'_> {
    let Some(line_index) = find_current_line_index(&doc.lines, position, offset_ms) else {
        return LyricState::inactive();
    };
    let line = &doc.lines[line_index];

    let window_end = doc
        .lines
        .get(line_index + 1)
        .map(|next| next.start_ms)
        .unwrap_or_else(|| line.start_ms.saturating_add(LAST_LINE_TAIL_MS));

    let progress = if window_end > line.start_ms {
        let elapsed = adjusted_ms(position, offset_ms) - line.start_ms as i64;
        (elapsed as f32 / (window_end - line.start_ms) as f32).clamp(0.0, 1.0)
    } else {
        1.0
    };

    LyricState {
        line_index: Some(line_index),
        line: Some(line),
        word_index: find_current_word_index(line, position, offset_ms),
        progress,
    }
}

/// One line of a context window around the active line
#[derive(Debug, Clone, Serialize)]
pub struct ContextLine<'a> {
    pub index: usize,
    pub line: &'a TimedLine,
    pub is_current: bool,
}

/// Collect up to `before + after + 1` lines centered on `current_index`,
/// clipped at document bounds, in display order.
pub fn surrounding_lines<'a>(
    lines: &'a [TimedLine],
    current_index: usize,
    before: usize,
    after: usize,
) -> Vec<ContextLine<'a>> {
    if current_index >= lines.len() {
        return Vec::new();
    }
    let start = current_index.saturating_sub(before);
    let end = (current_index + after).min(lines.len() - 1);

    (start..=end)
        .map(|index| ContextLine {
            index,
            line: &lines[index],
            is_current: index == current_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::parser::types::{TimedWord, normalize_lines};

    fn lines_at(starts: &[u64]) -> Vec<TimedLine> {
        let mut lines: Vec<TimedLine> = starts
            .iter()
            .enumerate()
            .map(|(i, &start_ms)| TimedLine {
                start_ms,
                text: format!("line {}", i),
                ..Default::default()
            })
            .collect();
        normalize_lines(&mut lines);
        lines
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_line_index_boundaries() {
        let lines = lines_at(&[0, 5000, 10000]);
        assert_eq!(find_current_line_index(&lines, secs(7.0), 0), Some(1));
        assert_eq!(find_current_line_index(&lines, secs(5.0), 0), Some(1));
        assert_eq!(find_current_line_index(&lines, secs(12.0), 0), Some(2));
        assert_eq!(find_current_line_index(&lines, secs(0.0), 0), Some(0));
        assert_eq!(find_current_line_index(&[], secs(3.0), 0), None);
    }

    #[test]
    fn test_before_first_line() {
        let lines = lines_at(&[2000, 5000]);
        assert_eq!(find_current_line_index(&lines, secs(1.0), 0), None);
        // Negative offset pushes the adjusted time before the first line
        assert_eq!(find_current_line_index(&lines, secs(2.5), -1000), None);
    }

    #[test]
    fn test_offset_is_equivalent_to_shifted_time() {
        let lines = lines_at(&[0, 1500, 5000, 10000, 60000]);
        for t in [0u64, 700, 1500, 4999, 5000, 30000, 70000] {
            for o in [-2000i64, -500, 0, 250, 2000] {
                let shifted = Duration::from_millis((t as i64 + o).max(0) as u64);
                if t as i64 + o >= 0 {
                    assert_eq!(
                        find_current_line_index(&lines, Duration::from_millis(t), o),
                        find_current_line_index(&lines, shifted, 0),
                        "t={} o={}",
                        t,
                        o
                    );
                }
            }
        }
    }

    fn word_line() -> TimedLine {
        TimedLine {
            start_ms: 1000,
            end_ms: 4000,
            text: "one two three".to_string(),
            words: vec![
                TimedWord {
                    start_ms: 1000,
                    end_ms: 1800,
                    text: "one".to_string(),
                },
                TimedWord {
                    start_ms: 2000,
                    end_ms: 2600,
                    text: "two".to_string(),
                },
                TimedWord {
                    start_ms: 2600,
                    end_ms: 3400,
                    text: "three".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_word_index_containment_and_sticky_tail() {
        let line = word_line();
        assert_eq!(find_current_word_index(&line, secs(1.2), 0), Some(0));
        assert_eq!(find_current_word_index(&line, secs(2.1), 0), Some(1));
        // Past the last word's end the last word stays active
        assert_eq!(find_current_word_index(&line, secs(3.9), 0), Some(2));
        // Before the first word
        assert_eq!(find_current_word_index(&line, secs(0.5), 0), None);
    }

    #[test]
    fn test_word_index_without_word_timing() {
        let line = TimedLine {
            start_ms: 0,
            end_ms: 5000,
            text: "no words".to_string(),
            words: Vec::new(),
        };
        assert_eq!(find_current_word_index(&line, secs(2.0), 0), None);
    }

    #[test]
    fn test_lyric_state_progress() {
        let doc = TimedDocument {
            lines: lines_at(&[0, 4000]),
            ..Default::default()
        };
        let state = current_lyric_state(&doc, secs(1.0), 0);
        assert_eq!(state.line_index, Some(0));
        assert!((state.progress - 0.25).abs() < 1e-6);

        // Last line measures against the assumed 10 s tail
        let state = current_lyric_state(&doc, secs(9.0), 0);
        assert_eq!(state.line_index, Some(1));
        assert!((state.progress - 0.5).abs() < 1e-6);

        // Clamped at 1.0 far past the tail
        let state = current_lyric_state(&doc, secs(60.0), 0);
        assert_eq!(state.progress, 1.0);
    }

    #[test]
    fn test_lyric_state_before_first_line() {
        let doc = TimedDocument {
            lines: lines_at(&[3000]),
            ..Default::default()
        };
        let state = current_lyric_state(&doc, secs(1.0), 0);
        assert_eq!(state.line_index, None);
        assert!(state.line.is_none());
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_surrounding_lines_window() {
        let lines = lines_at(&[0, 1000, 2000, 3000, 4000]);

        let window = surrounding_lines(&lines, 2, 1, 1);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].index, 1);
        assert!(window[1].is_current);
        assert_eq!(window[2].index, 3);

        // Clipped at the front
        let window = surrounding_lines(&lines, 0, 2, 1);
        assert_eq!(window.len(), 2);
        assert!(window[0].is_current);

        // Clipped at the back
        let window = surrounding_lines(&lines, 4, 1, 3);
        assert_eq!(window.len(), 2);
        assert!(window[1].is_current);

        // Out of range index is an empty window, not a panic
        assert!(surrounding_lines(&lines, 99, 2, 2).is_empty());
    }
}
