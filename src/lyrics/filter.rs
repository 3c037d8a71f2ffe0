//! Spam/attribution deny-list
//!
//! Lyric sources (subtitle sites, machine transcription) carry credit
//! lines and placeholder glyphs that should never reach the display.
//! Matching lines are silently excluded during parsing; they are not
//! errors.

use once_cell::sync::Lazy;
use regex::RegexSet;

/// Patterns excluded by default:
/// - subtitle-site credits and attribution lines
/// - URLs / site watermarks
/// - lines that are nothing but musical-note glyphs
/// - bracket-only placeholders like `[Chorus]` or `[]`
/// - common transcription filler credits
const DEFAULT_PATTERNS: &[&str] = &[
    r"(?i)(lyrics?|subtitles?|captions?|transcri\w+)\s+(by|from|provided|synced|made)\b",
    r"(?i)\b(www\.|https?://)\S+",
    r"(?i)\b\S+\.(com|net|org|cc)\b",
    r"^[\s♪♫♩♬∮•·~\-]+$",
    r"^\[[^\[\]]*\]$",
    r"(?i)^(thank you|thanks) for (watching|listening)\b",
];

static DEFAULT_SET: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new(DEFAULT_PATTERNS).expect("default deny-list patterns are valid")
});

static DEFAULT_FILTER: Lazy<SpamFilter> = Lazy::new(|| SpamFilter {
    set: DEFAULT_SET.clone(),
});

/// Deny-list matcher applied to every candidate lyric line
#[derive(Debug, Clone)]
pub struct SpamFilter {
    set: RegexSet,
}

impl Default for SpamFilter {
    fn default() -> Self {
        DEFAULT_FILTER.clone()
    }
}

impl SpamFilter {
    /// Shared default filter, compiled once
    pub fn shared() -> &'static SpamFilter {
        &DEFAULT_FILTER
    }

    /// Build a filter from the default patterns plus caller-supplied ones
    pub fn with_patterns<I, S>(extra: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(extra.into_iter().map(|p| p.as_ref().to_string()))
            .collect::<Vec<_>>();
        Ok(Self {
            set: RegexSet::new(&patterns)?,
        })
    }

    /// Check whether a line should be excluded
    ///
    /// Empty or whitespace-only text is also excluded here, so parsers
    /// need a single check.
    pub fn is_spam(&self, text: &str) -> bool {
        let trimmed = text.trim();
        trimmed.is_empty() || self.set.is_match(trimmed)
    }
}
