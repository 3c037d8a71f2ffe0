//! Playback state machine
//!
//! Owns the playlist, the current-track pointer, the shuffle
//! permutation, the repeat mode, and the single shared audio resource.
//! All commands are synchronous state transitions; readiness waits are
//! reconciled on `tick` so a command can never be interleaved
//! mid-transition.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::events::{
    PlayerEvent, PlayerEventReceiver, PlayerEventSender, SharedSnapshot, player_event_channel,
};
use super::queue::{Navigator, RepeatMode, shuffled_order};
use super::resource::AudioResource;
use super::track::Track;
use super::transport::{Transport, TransportCapabilities, TransportKind, select_transport};
use crate::lyrics::parser;
use crate::lyrics::parser::types::TimedDocument;
use crate::lyrics::timing::{self, ContextLine, LyricState};

/// Bounded wait for the resource to become ready after a play request
const READY_WAIT: Duration = Duration::from_secs(10);

/// `previous` restarts the current track once this much has elapsed
const PREVIOUS_RESTART_THRESHOLD: Duration = Duration::from_secs(3);

/// Read-only view of the playback state for the rendering layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub current_time: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    pub shuffle_enabled: bool,
    pub repeat: RepeatMode,
}

/// A play request waiting for resource readiness
///
/// Tagged with the attach generation so a wait left over from a
/// previous track can never resurrect stale playback.
struct PendingPlay {
    generation: u64,
    requested_at: Instant,
}

/// The playback controller
///
/// Long-lived; `close` resets to the initial empty state rather than
/// consuming the controller.
pub struct PlayerController<R: AudioResource> {
    tracks: Vec<Track>,
    current_index: Option<usize>,
    is_playing: bool,
    current_time: Duration,
    duration: Option<Duration>,
    shuffle_enabled: bool,
    shuffle_order: Vec<usize>,
    repeat: RepeatMode,

    resource: R,
    capabilities: TransportCapabilities,
    transport: Option<Box<dyn Transport>>,
    attach_generation: u64,
    pending_play: Option<PendingPlay>,

    /// Parsed lyrics for the current track; `None` is the normal
    /// "no lyrics" state
    document: Option<TimedDocument>,

    events: PlayerEventSender,
    shared: SharedSnapshot,
}

impl<R: AudioResource> PlayerController<R> {
    /// Create a controller owning `resource`, with default transport
    /// capabilities. Returns the event stream for the rendering layer.
    pub fn new(resource: R) -> (Self, PlayerEventReceiver) {
        Self::with_capabilities(resource, TransportCapabilities::default())
    }

    pub fn with_capabilities(
        resource: R,
        capabilities: TransportCapabilities,
    ) -> (Self, PlayerEventReceiver) {
        let (events, receiver) = player_event_channel();
        let controller = Self {
            tracks: Vec::new(),
            current_index: None,
            is_playing: false,
            current_time: Duration::ZERO,
            duration: None,
            shuffle_enabled: false,
            shuffle_order: Vec::new(),
            repeat: RepeatMode::default(),
            resource,
            capabilities,
            transport: None,
            attach_generation: 0,
            pending_play: None,
            document: None,
            events,
            shared: SharedSnapshot::default(),
        };
        (controller, receiver)
    }

    // ---- Commands ----

    /// Replace the playlist wholesale and begin playback at `start_index`
    pub fn set_playlist(&mut self, tracks: Vec<Track>, start_index: usize) {
        self.teardown_binding();
        self.tracks = tracks;
        self.current_index = None;
        self.current_time = Duration::ZERO;
        self.duration = None;
        self.document = None;

        if self.tracks.is_empty() {
            self.is_playing = false;
            self.shuffle_order.clear();
            self.emit(PlayerEvent::PlaylistReplaced {
                len: 0,
                start_index: 0,
            });
            self.publish();
            return;
        }

        let start = start_index.min(self.tracks.len() - 1);
        self.shuffle_order = shuffled_order(self.tracks.len(), start);
        self.emit(PlayerEvent::PlaylistReplaced {
            len: self.tracks.len(),
            start_index: start,
        });
        self.play_track(start);
    }

    /// Switch to a specific track and request playback
    pub fn play_track(&mut self, index: usize) {
        if index >= self.tracks.len() {
            tracing::warn!(index, len = self.tracks.len(), "play_track out of range");
            return;
        }

        self.teardown_binding();
        let track = self.tracks[index].clone();

        self.transport = Some(select_transport(&track.media_url, self.capabilities));
        self.document = track.lyrics.as_deref().map(parser::parse);
        self.current_index = Some(index);
        self.current_time = Duration::ZERO;
        self.duration = track.duration;
        self.emit(PlayerEvent::TrackChanged { index });

        if let Err(e) = self.resource.attach(&track) {
            tracing::error!(index, error = %e, "failed to attach track");
            self.is_playing = false;
            self.publish();
            return;
        }
        if let Some(duration) = self.resource.duration() {
            self.duration = Some(duration);
        }

        self.request_play();
        self.publish();
    }

    /// Request playback of the current track
    pub fn play(&mut self) {
        if self.current_index.is_none() {
            return;
        }
        self.request_play();
        self.publish();
    }

    pub fn pause(&mut self) {
        self.resource.pause();
        self.is_playing = false;
        self.pending_play = None;
        self.emit(PlayerEvent::Paused);
        self.publish();
    }

    pub fn toggle(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance in play order; no-op at the end unless repeat-all wraps
    pub fn next(&mut self) {
        match self.navigator().map(|nav| nav.next_index()) {
            Some(Some(index)) => self.play_track(index),
            _ => tracing::debug!("next: end of play order"),
        }
    }

    /// Go back: restart the current track after 3 s, otherwise step to
    /// the predecessor. Never wraps at the start of play order.
    pub fn previous(&mut self) {
        if self.current_index.is_none() {
            return;
        }
        if self.current_time > PREVIOUS_RESTART_THRESHOLD {
            self.restart_current();
            return;
        }
        match self.navigator().and_then(|nav| nav.prev_index()) {
            Some(index) => self.play_track(index),
            None => self.restart_current(),
        }
    }

    /// Natural end of the current track, reported by the audio resource
    ///
    /// Distinct from a user-initiated `next`: repeat-one only captures
    /// natural track end, and auto-advance keeps playing.
    pub fn on_track_ended(&mut self) {
        let Some(index) = self.current_index else {
            return;
        };

        if self.repeat == RepeatMode::One {
            if let Err(e) = self.resource.seek(Duration::ZERO) {
                tracing::warn!(error = %e, "repeat-one restart seek failed");
            }
            self.current_time = Duration::ZERO;
            match self.resource.start() {
                Ok(()) => {
                    self.is_playing = true;
                    self.emit(PlayerEvent::Started { index });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "repeat-one restart failed");
                    self.is_playing = false;
                }
            }
            self.publish();
            return;
        }

        match self.navigator().and_then(|nav| nav.after_ended()) {
            Some(next) => self.play_track(next),
            None => {
                self.is_playing = false;
                self.pending_play = None;
                self.emit(PlayerEvent::Stopped);
                self.publish();
            }
        }
    }

    /// Seek within the current track, clamped to `[0, duration]`
    ///
    /// Silently rejected while the duration is unknown or zero.
    pub fn seek(&mut self, position: Duration) {
        let Some(duration) = self.duration.filter(|d| !d.is_zero()) else {
            tracing::debug!("seek ignored: duration unknown");
            return;
        };
        let clamped = position.min(duration);
        match self.resource.seek(clamped) {
            Ok(()) => {
                self.current_time = clamped;
                self.emit(PlayerEvent::SeekComplete { position: clamped });
            }
            Err(e) => tracing::warn!(error = %e, "seek failed"),
        }
        self.publish();
    }

    /// Seek from a possibly-negative second count; negatives clamp to 0
    pub fn seek_seconds(&mut self, seconds: f64) {
        let clamped = if seconds.is_finite() && seconds > 0.0 {
            Duration::from_secs_f64(seconds)
        } else {
            Duration::ZERO
        };
        self.seek(clamped);
    }

    /// Toggling on recomputes a fresh permutation anchored at the
    /// current track; toggling off only clears the flag.
    pub fn toggle_shuffle(&mut self) {
        if self.shuffle_enabled {
            self.shuffle_enabled = false;
        } else {
            self.shuffle_order =
                shuffled_order(self.tracks.len(), self.current_index.unwrap_or(0));
            self.shuffle_enabled = true;
        }
        self.emit(PlayerEvent::ShuffleToggled {
            enabled: self.shuffle_enabled,
        });
        self.publish();
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
        self.emit(PlayerEvent::RepeatChanged { mode: self.repeat });
        self.publish();
    }

    /// Periodic reconciliation with the audio resource
    ///
    /// Pulls position/duration, resolves pending play requests against
    /// readiness and the bounded wait, and detects natural track end.
    pub fn tick(&mut self) {
        if let Some(pending) = &self.pending_play {
            if pending.generation != self.attach_generation {
                // A wait left over from a previous attach; drop it
                self.pending_play = None;
            } else if self.resource.is_ready() {
                let index = self.current_index.unwrap_or(0);
                match self.resource.start() {
                    Ok(()) => {
                        self.is_playing = true;
                        self.emit(PlayerEvent::Started { index });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "deferred start failed");
                        self.is_playing = false;
                    }
                }
                self.pending_play = None;
            } else if pending.requested_at.elapsed() > READY_WAIT {
                let index = self.current_index.unwrap_or(0);
                tracing::warn!(index, "audio resource not ready within bounded wait");
                self.is_playing = false;
                self.pending_play = None;
                self.emit(PlayerEvent::ReadyTimeout { index });
            }
        }

        if self.current_index.is_some() {
            self.current_time = self.resource.position();
            if self.duration.is_none() {
                self.duration = self.resource.duration();
            }
            if self.is_playing && self.resource.has_ended() {
                self.on_track_ended();
                return;
            }
        }
        self.publish();
    }

    /// Reset to the initial empty state
    pub fn close(&mut self) {
        self.teardown_binding();
        self.tracks.clear();
        self.current_index = None;
        self.is_playing = false;
        self.current_time = Duration::ZERO;
        self.duration = None;
        self.shuffle_enabled = false;
        self.shuffle_order.clear();
        self.repeat = RepeatMode::default();
        self.document = None;
        self.emit(PlayerEvent::Closed);
        self.publish();
    }

    // ---- Queries ----

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_index: self.current_index,
            is_playing: self.is_playing,
            current_time: self.current_time,
            duration: self.duration,
            shuffle_enabled: self.shuffle_enabled,
            repeat: self.repeat,
        }
    }

    /// Shared snapshot cell the rendering layer can poll without
    /// borrowing the controller
    pub fn shared_snapshot(&self) -> SharedSnapshot {
        self.shared.clone()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    /// Parsed lyric document for the current track
    pub fn document(&self) -> Option<&TimedDocument> {
        self.document.as_ref()
    }

    /// Whether the current track has displayable lyrics
    pub fn has_lyrics(&self) -> bool {
        self.document.as_ref().is_some_and(|d| d.has_lyrics())
    }

    /// Lyric position at the current playback time
    pub fn lyric_state(&self, offset_ms: i64) -> Option<LyricState<'_>> {
        self.document
            .as_ref()
            .map(|doc| timing::current_lyric_state(doc, self.current_time, offset_ms))
    }

    /// Context window around the active lyric line
    pub fn context_window(
        &self,
        before: usize,
        after: usize,
        offset_ms: i64,
    ) -> Vec<ContextLine<'_>> {
        let Some(doc) = self.document.as_ref() else {
            return Vec::new();
        };
        let Some(current) =
            timing::find_current_line_index(&doc.lines, self.current_time, offset_ms)
        else {
            return Vec::new();
        };
        timing::surrounding_lines(&doc.lines, current, before, after)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    pub fn shuffle_order(&self) -> &[usize] {
        &self.shuffle_order
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Kind of the transport attached for the current track
    pub fn transport_kind(&self) -> Option<TransportKind> {
        self.transport.as_deref().map(|t| t.kind())
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }

    // ---- Internals ----

    fn navigator(&self) -> Option<Navigator<'_>> {
        let current = self.current_index?;
        Some(Navigator::new(
            self.tracks.len(),
            current,
            self.repeat,
            self.shuffle_enabled.then_some(self.shuffle_order.as_slice()),
        ))
    }

    /// Tear down the previous track's binding: stop audio, dispose the
    /// transport, invalidate any in-flight ready wait.
    fn teardown_binding(&mut self) {
        self.resource.detach();
        if let Some(mut transport) = self.transport.take() {
            transport.dispose();
        }
        self.attach_generation += 1;
        self.pending_play = None;
    }

    fn request_play(&mut self) {
        let Some(index) = self.current_index else {
            return;
        };
        if self.resource.is_ready() {
            match self.resource.start() {
                Ok(()) => {
                    self.is_playing = true;
                    self.emit(PlayerEvent::Started { index });
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "failed to start playback");
                    self.is_playing = false;
                }
            }
            self.pending_play = None;
        } else {
            tracing::debug!(index, "resource not ready, deferring play");
            self.pending_play = Some(PendingPlay {
                generation: self.attach_generation,
                requested_at: Instant::now(),
            });
            // Requested state; reconciled against readiness on tick
            self.is_playing = true;
        }
    }

    /// Restart the current track from the top, keeping play state
    fn restart_current(&mut self) {
        if let Err(e) = self.resource.seek(Duration::ZERO) {
            tracing::warn!(error = %e, "restart seek failed");
        }
        self.current_time = Duration::ZERO;
        self.emit(PlayerEvent::SeekComplete {
            position: Duration::ZERO,
        });
        self.publish();
    }

    fn emit(&self, event: PlayerEvent) {
        // The rendering layer may have dropped its receiver; snapshots
        // still carry the state
        let _ = self.events.send(event);
    }

    fn publish(&self) {
        self.shared.store(self.snapshot());
    }

    #[cfg(test)]
    fn expire_pending_wait(&mut self) {
        if let Some(pending) = &mut self.pending_play {
            pending.requested_at = Instant::now() - READY_WAIT - Duration::from_secs(1);
        }
    }
}
