//! Rodio-backed audio resource
//!
//! Decodes local files through a single long-lived output stream and
//! one `Sink`. Decoding is synchronous, so an attached track is ready
//! immediately; remote sources belong to a host-provided resource.

use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rodio::source::Source;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

use super::resource::AudioResource;
use super::track::Track;

pub struct RodioResource {
    // Dropping the stream silences the sink; keep it alive alongside
    _stream: OutputStream,
    sink: Sink,
    attached: bool,
    duration: Option<Duration>,
}

impl RodioResource {
    /// Open the default audio output device
    pub fn new() -> Result<Self> {
        let stream = OutputStreamBuilder::open_default_stream()
            .context("failed to open default audio output")?;
        let sink = Sink::connect_new(stream.mixer());
        sink.pause();
        Ok(Self {
            _stream: stream,
            sink,
            attached: false,
            duration: None,
        })
    }

    fn local_path(url: &str) -> Result<&str> {
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(path);
        }
        if url.contains("://") {
            bail!("unsupported media source: {url}");
        }
        Ok(url)
    }
}

impl AudioResource for RodioResource {
    fn attach(&mut self, track: &Track) -> Result<()> {
        self.detach();

        let path = Self::local_path(&track.media_url)?;
        let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
        let decoder = Decoder::new(BufReader::new(file))
            .with_context(|| format!("failed to decode {path}"))?;

        self.duration = decoder.total_duration().or(track.duration);
        self.sink.append(decoder);
        self.sink.pause();
        self.attached = true;
        tracing::debug!(url = %track.media_url, "audio source attached");
        Ok(())
    }

    fn detach(&mut self) {
        self.sink.stop();
        self.attached = false;
        self.duration = None;
    }

    fn start(&mut self) -> Result<()> {
        anyhow::ensure!(self.attached, "no track attached");
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        anyhow::ensure!(self.attached, "no track attached");
        self.sink
            .try_seek(position)
            .map_err(|e| anyhow::anyhow!("seek failed: {e}"))
    }

    fn position(&self) -> Duration {
        if self.attached {
            self.sink.get_pos()
        } else {
            Duration::ZERO
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_ready(&self) -> bool {
        self.attached
    }

    fn has_ended(&self) -> bool {
        self.attached && self.sink.empty()
    }
}
