//! Per-track transport strategy
//!
//! Adaptive-bitrate sources need a library-backed transport unless the
//! platform decodes them natively; everything else streams
//! progressively. The strategy is selected at track-attach time from
//! the URL shape and must be fully disposed on track change or close —
//! a leaked transport keeps doing duplicate network and decode work.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Plain progressive download / local file
    Progressive,
    /// Adaptive-bitrate playlist handled natively by the platform
    NativeAdaptive,
    /// Adaptive-bitrate playlist handled by the library transport
    Adaptive,
}

/// What the attached playback platform can do on its own
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportCapabilities {
    /// Platform decodes adaptive playlists without library support
    pub native_adaptive: bool,
}

/// Transport attached to exactly one track
pub trait Transport {
    fn kind(&self) -> TransportKind;

    /// Release all internal resources; idempotent
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Whether a URL names an adaptive-bitrate playlist
pub fn is_adaptive_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.ends_with(".m3u8") || path.contains("/hls/")
}

/// Pick the transport for a track URL; deterministic fallback from
/// native support to the library transport
pub fn select_transport(url: &str, caps: TransportCapabilities) -> Box<dyn Transport> {
    if is_adaptive_url(url) {
        if caps.native_adaptive {
            Box::new(ProgressiveTransport {
                kind: TransportKind::NativeAdaptive,
                disposed: false,
            })
        } else {
            Box::new(AdaptiveTransport::new(url))
        }
    } else {
        Box::new(ProgressiveTransport {
            kind: TransportKind::Progressive,
            disposed: false,
        })
    }
}

/// Pass-through transport: the platform pulls the bytes itself
struct ProgressiveTransport {
    kind: TransportKind,
    disposed: bool,
}

impl Transport for ProgressiveTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    fn dispose(&mut self) {
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Library-backed adaptive transport
///
/// Owns the playlist binding and segment buffer for one track.
struct AdaptiveTransport {
    playlist_url: Option<String>,
    segment_buffer: Vec<u8>,
}

impl AdaptiveTransport {
    fn new(url: &str) -> Self {
        Self {
            playlist_url: Some(url.to_string()),
            segment_buffer: Vec::new(),
        }
    }
}

impl Transport for AdaptiveTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Adaptive
    }

    fn dispose(&mut self) {
        if self.playlist_url.take().is_some() {
            tracing::debug!("adaptive transport disposed");
        }
        self.segment_buffer = Vec::new();
    }

    fn is_disposed(&self) -> bool {
        self.playlist_url.is_none()
    }
}
