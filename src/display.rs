//! Lyric display mode and timing-offset controls

use serde::{Deserialize, Serialize};

/// Manual timing offset is clamped to ±2 s
pub const OFFSET_LIMIT_MS: i64 = 2_000;

/// How prominently lyrics are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KaraokeLevel {
    #[default]
    Off,
    /// Compact line near the playback controls
    Mini,
    /// Context window with surrounding lines
    Theater,
    /// Full-screen word-by-word highlighting
    Hero,
}

/// Display-mode state for the lyric surface
///
/// Remembers the last active level so toggling off and back on returns
/// to the same presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayController {
    level: KaraokeLevel,
    last_active: KaraokeLevel,
    offset_ms: i64,
}

impl Default for DisplayController {
    fn default() -> Self {
        Self {
            level: KaraokeLevel::Off,
            last_active: KaraokeLevel::Mini,
            offset_ms: 0,
        }
    }
}

impl DisplayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> KaraokeLevel {
        self.level
    }

    pub fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// Switch to a specific level; any active level becomes the one
    /// restored by the next toggle
    pub fn set_level(&mut self, level: KaraokeLevel) {
        if level != KaraokeLevel::Off {
            self.last_active = level;
        }
        self.level = level;
    }

    /// Toggle between off and the last active level
    pub fn toggle(&mut self) {
        if self.level == KaraokeLevel::Off {
            self.level = self.last_active;
        } else {
            self.last_active = self.level;
            self.level = KaraokeLevel::Off;
        }
    }

    /// Nudge the timing offset, clamped to [`OFFSET_LIMIT_MS`]
    pub fn adjust_offset(&mut self, delta_ms: i64) {
        self.set_offset(self.offset_ms + delta_ms);
    }

    pub fn set_offset(&mut self, offset_ms: i64) {
        self.offset_ms = offset_ms.clamp(-OFFSET_LIMIT_MS, OFFSET_LIMIT_MS);
    }

    pub fn reset_offset(&mut self) {
        self.offset_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_restores_last_active_level() {
        let mut display = DisplayController::new();
        assert_eq!(display.level(), KaraokeLevel::Off);

        display.toggle();
        assert_eq!(display.level(), KaraokeLevel::Mini);

        display.set_level(KaraokeLevel::Hero);
        display.toggle();
        assert_eq!(display.level(), KaraokeLevel::Off);
        display.toggle();
        assert_eq!(display.level(), KaraokeLevel::Hero);
    }

    #[test]
    fn test_set_level_off_keeps_last_active() {
        let mut display = DisplayController::new();
        display.set_level(KaraokeLevel::Theater);
        display.set_level(KaraokeLevel::Off);
        display.toggle();
        assert_eq!(display.level(), KaraokeLevel::Theater);
    }

    #[test]
    fn test_offset_clamps_at_limit() {
        let mut display = DisplayController::new();
        display.adjust_offset(500);
        assert_eq!(display.offset_ms(), 500);
        display.adjust_offset(5_000);
        assert_eq!(display.offset_ms(), OFFSET_LIMIT_MS);
        display.set_offset(-9_999);
        assert_eq!(display.offset_ms(), -OFFSET_LIMIT_MS);
        display.reset_offset();
        assert_eq!(display.offset_ms(), 0);
    }

    #[test]
    fn test_level_serde_snake_case() {
        let json = serde_json::to_string(&KaraokeLevel::Theater).unwrap();
        assert_eq!(json, "\"theater\"");
        let level: KaraokeLevel = serde_json::from_str("\"hero\"").unwrap();
        assert_eq!(level, KaraokeLevel::Hero);
    }
}
