//! Bracketed-timestamp dialect parser
//!
//! Supports `[mm:ss.xx]text` and `[mm:ss:xx]text` line entries plus
//! `[key:value]` metadata tags. Malformed entries are dropped, never
//! reported as errors.

use std::time::Duration;

use super::types::{TimedDocument, TimedLine, normalize_lines};
use crate::lyrics::filter::SpamFilter;

/// Parse a leading timestamp: [mm:ss.xx] or [mm:ss:xx]
///
/// Returns (consumed bytes, time in ms). Fractional part precision:
/// 1 digit = deciseconds, 2 = centiseconds, 3 = milliseconds.
fn parse_time(src: &str) -> Option<(usize, u64)> {
    if !src.starts_with('[') {
        return None;
    }

    let end_bracket = src.find(']')?;
    let time_str = &src[1..end_bracket];

    // Metadata tags like [ar:Artist] start with a letter
    if let Some(first_char) = time_str.chars().next() {
        if first_char.is_alphabetic() {
            return None;
        }
    }

    let parts: Vec<&str> = time_str.split(|c| c == ':' || c == '.').collect();

    let time_ms = match parts.len() {
        2 => {
            let min: u64 = parts[0].parse().ok()?;
            let sec: u64 = parts[1].parse().ok()?;
            min * 60 * 1000 + sec * 1000
        }
        3 => {
            let min: u64 = parts[0].parse().ok()?;
            let sec: u64 = parts[1].parse().ok()?;
            let frac_str = parts[2];
            let mut frac: u64 = frac_str.parse().ok()?;

            match frac_str.len() {
                1 => frac *= 100,
                2 => frac *= 10,
                3 => {}
                _ => return None,
            }

            min * 60 * 1000 + sec * 1000 + frac
        }
        _ => return None,
    };

    Some((end_bracket + 1, time_ms))
}

/// Split a `[key:value]` metadata tag
fn parse_meta(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let (key, value) = inner.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_alphabetic()) {
        return None;
    }
    Some((key, value.trim()))
}

/// Parse a declared duration: `mm:ss` or a bare number of seconds
fn parse_duration_value(value: &str) -> Option<Duration> {
    if let Some((min, sec)) = value.split_once(':') {
        let min: u64 = min.trim().parse().ok()?;
        let sec: f64 = sec.trim().parse().ok()?;
        if !(0.0..60.0).contains(&sec) {
            return None;
        }
        Some(Duration::from_secs_f64(min as f64 * 60.0 + sec))
    } else {
        let secs: f64 = value.trim().parse().ok()?;
        (secs >= 0.0).then(|| Duration::from_secs_f64(secs))
    }
}

/// Apply a metadata tag to the document; later tags overwrite earlier ones
fn apply_meta(doc: &mut TimedDocument, key: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    match key.to_ascii_lowercase().as_str() {
        "ti" | "title" => doc.title = Some(value.to_string()),
        "ar" | "artist" => doc.artist = Some(value.to_string()),
        "al" | "album" => doc.album = Some(value.to_string()),
        "la" | "lang" | "language" => doc.language = Some(value.to_string()),
        "length" | "duration" => {
            if let Some(duration) = parse_duration_value(value) {
                doc.duration_hint = Some(duration);
            }
        }
        // Unknown keys are silently dropped
        _ => {}
    }
}

/// Extract all leading timestamps and the trailing text of one raw line
///
/// Standard LRC allows several timestamps per line as repetition
/// shorthand; each timestamp becomes its own entry.
fn parse_line(line: &str) -> (Vec<u64>, &str) {
    let mut timestamps = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        if let Some((consumed, time)) = parse_time(&line[pos..]) {
            timestamps.push(time);
            pos += consumed;
        } else {
            break;
        }
    }

    (timestamps, line[pos..].trim())
}

/// Parse bracketed-timestamp content into a document
pub(crate) fn parse_lrc(src: &str, filter: &SpamFilter) -> TimedDocument {
    let mut doc = TimedDocument::default();
    let mut lines = Vec::with_capacity(src.lines().size_hint().1.unwrap_or(128).min(1024));

    for raw_line in src.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let (timestamps, text) = parse_line(line);
        if timestamps.is_empty() {
            if let Some((key, value)) = parse_meta(line) {
                apply_meta(&mut doc, key, value);
            }
            // Anything else without a timestamp is unparseable, drop it
            continue;
        }

        if filter.is_spam(text) {
            continue;
        }

        for start_ms in timestamps {
            lines.push(TimedLine {
                start_ms,
                end_ms: 0,
                text: text.to_string(),
                words: Vec::new(),
            });
        }
    }

    normalize_lines(&mut lines);
    doc.lines = lines;
    doc
}

/// Write a timestamp in `[mm:ss.xxx]` form
pub(crate) fn write_timestamp(out: &mut String, time_ms: u64) {
    use std::fmt::Write;
    let ms = time_ms % 1000;
    let sec = (time_ms / 1000) % 60;
    let min = time_ms / 60_000;
    let _ = write!(out, "[{:02}:{:02}.{:03}]", min, sec, ms);
}

/// Serialize a document back to the bracketed dialect
///
/// Emits the normalized, sorted, filtered line set; not byte-identical
/// to arbitrary input by design.
pub(crate) fn serialize_lrc(doc: &TimedDocument) -> String {
    let capacity: usize = doc.lines.iter().map(|l| l.text.len() + 14).sum::<usize>() + 64;
    let mut out = String::with_capacity(capacity);

    if let Some(title) = &doc.title {
        out.push_str(&format!("[ti:{}]\n", title));
    }
    if let Some(artist) = &doc.artist {
        out.push_str(&format!("[ar:{}]\n", artist));
    }
    if let Some(album) = &doc.album {
        out.push_str(&format!("[al:{}]\n", album));
    }
    if let Some(language) = &doc.language {
        out.push_str(&format!("[la:{}]\n", language));
    }
    if let Some(duration) = doc.duration_hint {
        let total = duration.as_secs();
        out.push_str(&format!("[length:{:02}:{:02}]\n", total / 60, total % 60));
    }

    for line in &doc.lines {
        write_timestamp(&mut out, line.start_ms);
        out.push_str(&line.text);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> TimedDocument {
        parse_lrc(src, SpamFilter::shared())
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("[00:01.12]"), Some((10, 1120)));
        assert_eq!(parse_time("[00:10.254]"), Some((11, 10254)));
        assert_eq!(parse_time("[01:10.1]"), Some((9, 70100)));
        assert_eq!(parse_time("[00:05:25]"), Some((10, 5250)));
        assert_eq!(parse_time("[00:00.00]"), Some((10, 0)));
        assert_eq!(parse_time("[ar:Artist]"), None);
        assert_eq!(parse_time("no bracket"), None);
    }

    #[test]
    fn test_parse_basic() {
        let doc = parse("[00:00.00]First line\n[00:05.00]Second line\n[00:10.00]Third line");
        assert_eq!(doc.lines.len(), 3);
        assert_eq!(doc.lines[0].text, "First line");
        assert_eq!(doc.lines[1].start_ms, 5000);
        assert_eq!(doc.lines[0].end_ms, 5000);
    }

    #[test]
    fn test_parse_is_order_independent() {
        let forward = parse("[00:01.00]a\n[00:02.00]b\n[00:03.00]c");
        let scrambled = parse("[00:03.00]c\n[00:01.00]a\n[00:02.00]b");
        assert_eq!(forward.lines, scrambled.lines);
    }

    #[test]
    fn test_parse_multiple_timestamps() {
        let doc = parse("[00:12.50][01:30.00]Repeated line");
        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.lines[0].start_ms, 12500);
        assert_eq!(doc.lines[1].start_ms, 90000);
        assert_eq!(doc.lines[1].text, "Repeated line");
    }

    #[test]
    fn test_metadata_tags() {
        let doc = parse(
            "[ti:Old Title]\n[ti:Test Song]\n[ar:Test Artist]\n[al:Test Album]\n[la:en]\n[length:03:45]\n[00:01.00]hello",
        );
        assert_eq!(doc.title.as_deref(), Some("Test Song"));
        assert_eq!(doc.artist.as_deref(), Some("Test Artist"));
        assert_eq!(doc.album.as_deref(), Some("Test Album"));
        assert_eq!(doc.language.as_deref(), Some("en"));
        assert_eq!(doc.duration_hint, Some(Duration::from_secs(225)));
    }

    #[test]
    fn test_duration_as_bare_seconds() {
        let doc = parse("[length:200]\n[00:01.00]hello");
        assert_eq!(doc.duration_hint, Some(Duration::from_secs(200)));
    }

    #[test]
    fn test_spam_and_empty_lines_excluded() {
        let doc = parse(
            "[00:01.00]Lyrics by SpamSite\n[00:02.00]\n[00:03.00]♪♪♪\n[00:04.00]Real line",
        );
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].text, "Real line");
    }

    #[test]
    fn test_malformed_lines_dropped_silently() {
        let doc = parse("[aa:bb.cc]broken\nplain text without timestamp\n[00:01.00]ok");
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].text, "ok");
    }

    #[test]
    fn test_serialize_round_trip() {
        let doc = parse("[ti:Song]\n[00:03.00]c\n[00:01.12]a\n[00:02.00]b");
        let text = serialize_lrc(&doc);
        assert!(text.contains("[ti:Song]"));
        assert!(text.contains("[00:01.120]a"));
        let reparsed = parse(&text);
        assert_eq!(reparsed.lines, doc.lines);
        assert_eq!(reparsed.title, doc.title);
    }
}
