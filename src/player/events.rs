//! Player event channel
//!
//! Events notify the rendering layer of state changes; it may also just
//! poll `PlayerController::snapshot`. Unbounded sends are synchronous,
//! and the consumer can drain with `try_recv` from a plain loop — no
//! async runtime required.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::controller::PlaybackSnapshot;
use super::queue::RepeatMode;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A new playlist replaced the previous one wholesale
    PlaylistReplaced { len: usize, start_index: usize },
    /// The current track pointer moved
    TrackChanged { index: usize },
    /// Playback started (or resumed) for the current track
    Started { index: usize },
    Paused,
    /// Playback stopped at the end of the play order
    Stopped,
    SeekComplete { position: Duration },
    /// The resource never became ready within the bounded wait
    ReadyTimeout { index: usize },
    ShuffleToggled { enabled: bool },
    RepeatChanged { mode: RepeatMode },
    /// The controller was reset to its initial empty state
    Closed,
}

pub type PlayerEventSender = tokio::sync::mpsc::UnboundedSender<PlayerEvent>;
pub type PlayerEventReceiver = tokio::sync::mpsc::UnboundedReceiver<PlayerEvent>;

/// Create a new player event channel
pub fn player_event_channel() -> (PlayerEventSender, PlayerEventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Shared snapshot cell, written by the controller after every
/// transition and readable from any thread without borrowing it
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<RwLock<PlaybackSnapshot>>,
}

impl SharedSnapshot {
    pub fn get(&self) -> PlaybackSnapshot {
        self.inner.read().clone()
    }

    pub(crate) fn store(&self, snapshot: PlaybackSnapshot) {
        *self.inner.write() = snapshot;
    }
}
