//! Playback: playlist state machine, audio resource seam, transports

pub mod controller;
pub mod events;
pub mod queue;
pub mod resource;
pub mod rodio_output;
pub mod track;
pub mod transport;

pub use controller::{PlaybackSnapshot, PlayerController};
pub use events::{PlayerEvent, PlayerEventReceiver, PlayerEventSender, SharedSnapshot};
pub use queue::RepeatMode;
pub use resource::{AudioResource, SilentResource};
pub use rodio_output::RodioResource;
pub use track::Track;
pub use transport::{TransportCapabilities, TransportKind};
