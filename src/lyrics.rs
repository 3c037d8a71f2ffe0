//! Timed-text parsing and lyric timing lookup
//!
//! - `parser`: bracketed-timestamp dialect + machine-transcript adapter,
//!   both producing one normalized `TimedDocument`
//! - `timing`: pure time → line/word/progress lookups over a document
//! - `filter`: the spam/attribution deny-list both parsers apply

pub mod filter;
pub mod parser;
pub mod timing;

pub use filter::SpamFilter;
pub use parser::{TimedDocument, TimedLine, TimedWord, TranscriptSegment, TranscriptWord};
pub use timing::{
    ContextLine, LyricState, current_lyric_state, find_current_line_index,
    find_current_word_index, surrounding_lines,
};
