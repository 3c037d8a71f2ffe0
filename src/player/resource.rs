//! Audio resource seam
//!
//! There is exactly one audio output at a time; the controller owns it
//! as an explicit handle, never a module-level global. `attach` must
//! tear down the previous track's binding so two streams can never be
//! audible at once.

use std::time::Duration;

use anyhow::Result;

use super::track::Track;

/// The single shared audio output the controller coordinates
pub trait AudioResource {
    /// Bind a track, tearing down the previous binding first
    fn attach(&mut self, track: &Track) -> Result<()>;

    /// Release the current binding, stopping any audible output
    fn detach(&mut self);

    /// Begin or resume audible playback; only valid once ready
    fn start(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current playback position within the attached track
    fn position(&self) -> Duration;

    /// Total duration, once known
    fn duration(&self) -> Option<Duration>;

    /// Whether the attached track can start playing right now
    fn is_ready(&self) -> bool;

    /// Whether the attached track reached its natural end
    fn has_ended(&self) -> bool;
}

/// Inaudible in-process resource
///
/// Drives the controller in tests and headless hosts; readiness and
/// playback progress are advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct SilentResource {
    attached: Option<String>,
    defer_ready: bool,
    ready: bool,
    playing: bool,
    position: Duration,
    duration: Option<Duration>,
    ended: bool,
}

impl SilentResource {
    /// Resource that is ready as soon as a track is attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource that stays unready until `make_ready` is called,
    /// simulating a slow media source
    pub fn deferred() -> Self {
        Self {
            defer_ready: true,
            ..Self::default()
        }
    }

    /// Simulate the media source reaching the ready state
    pub fn make_ready(&mut self) {
        if self.attached.is_some() {
            self.ready = true;
        }
    }

    /// Advance playback time; clamps at the duration and marks the
    /// track ended when it reaches it
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }
        self.position += elapsed;
        if let Some(duration) = self.duration {
            if self.position >= duration {
                self.position = duration;
                self.ended = true;
                self.playing = false;
            }
        }
    }

    /// URL of the currently attached track, if any
    pub fn attached_url(&self) -> Option<&str> {
        self.attached.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl AudioResource for SilentResource {
    fn attach(&mut self, track: &Track) -> Result<()> {
        self.detach();
        self.attached = Some(track.media_url.clone());
        self.ready = !self.defer_ready;
        self.duration = track.duration;
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = None;
        self.ready = false;
        self.playing = false;
        self.position = Duration::ZERO;
        self.duration = None;
        self.ended = false;
    }

    fn start(&mut self) -> Result<()> {
        anyhow::ensure!(self.attached.is_some(), "no track attached");
        anyhow::ensure!(self.ready, "resource not ready");
        self.playing = true;
        self.ended = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        anyhow::ensure!(self.attached.is_some(), "no track attached");
        self.position = position;
        self.ended = false;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn has_ended(&self) -> bool {
        self.ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_tears_down_previous_binding() {
        let mut resource = SilentResource::new();
        let mut first = Track::new(1, "a.mp3");
        first.duration = Some(Duration::from_secs(10));
        resource.attach(&first).unwrap();
        resource.start().unwrap();
        resource.advance(Duration::from_secs(4));

        resource.attach(&Track::new(2, "b.mp3")).unwrap();
        assert_eq!(resource.attached_url(), Some("b.mp3"));
        assert!(!resource.is_playing());
        assert_eq!(resource.position(), Duration::ZERO);
    }

    #[test]
    fn test_deferred_readiness() {
        let mut resource = SilentResource::deferred();
        resource.attach(&Track::new(1, "a.mp3")).unwrap();
        assert!(!resource.is_ready());
        assert!(resource.start().is_err());
        resource.make_ready();
        assert!(resource.start().is_ok());
    }

    #[test]
    fn test_natural_end() {
        let mut resource = SilentResource::new();
        let mut track = Track::new(1, "a.mp3");
        track.duration = Some(Duration::from_secs(3));
        resource.attach(&track).unwrap();
        resource.start().unwrap();
        resource.advance(Duration::from_secs(5));
        assert!(resource.has_ended());
        assert_eq!(resource.position(), Duration::from_secs(3));
    }
}
