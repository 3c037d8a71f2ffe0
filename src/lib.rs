//! Synchronized lyric playback
//!
//! Parses timed-text lyrics (LRC and word-level transcripts) into a
//! normalized document, answers "which line and word is active at this
//! playback position" in logarithmic time, and drives a playlist
//! state machine with shuffle, repeat, and a single shared audio
//! resource. The display module tracks how prominently lyrics are
//! rendered and the user's manual timing offset.

pub mod display;
pub mod lyrics;
pub mod player;

pub use display::{DisplayController, KaraokeLevel};
pub use lyrics::parser::types::{TimedDocument, TimedLine, TimedWord};
pub use lyrics::timing::{ContextLine, LyricState};
pub use player::{
    PlaybackSnapshot, PlayerController, PlayerEvent, RepeatMode, SilentResource, Track,
};
