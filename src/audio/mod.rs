//! Audio system for playing sounds and music
//!
//! Playback goes through an [`AudioBackend`]; [`NullBackend`] runs without
//! an output device. Supports WAV, MP3, OGG, and FLAC files.

mod backend;
mod system;

pub use backend::{
    AudioBackend, AudioError, NullBackend, PlaybackState, SUPPORTED_EXTENSIONS, SoundId,
    check_format,
};
pub use system::AudioSystem;
