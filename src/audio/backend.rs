//! Playback backends

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Playback state of a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    Playing,
    #[default]
    Stopped,
}

/// Sound loaded into a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(u32);

/// Errors that can occur during audio operations
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported audio format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("unknown sound {0:?}")]
    UnknownSound(SoundId),
    #[error("playback error: {0}")]
    Playback(String),
}

/// Formats every backend is expected to decode
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["wav", "mp3", "ogg", "flac"];

/// Check a path has a supported audio extension
///
/// # Errors
///
/// Returns [`AudioError::UnsupportedFormat`] for any other extension
pub fn check_format(path: &Path) -> Result<(), AudioError> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        });

    if supported {
        Ok(())
    } else {
        Err(AudioError::UnsupportedFormat(path.to_path_buf()))
    }
}

/// Device side of the audio system
///
/// Mixing and output are the backend's job; [`AudioSystem`](super::AudioSystem)
/// only keeps names and music state.
pub trait AudioBackend {
    /// Load a sound without playing it
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be decoded
    fn load(&mut self, path: &Path, looping: bool) -> Result<SoundId, AudioError>;

    /// Start playback from the beginning
    ///
    /// # Errors
    ///
    /// Returns an error if the sound is unknown or the device fails
    fn play(&mut self, sound: SoundId) -> Result<(), AudioError>;

    /// Stop playback
    ///
    /// # Errors
    ///
    /// Returns an error if the sound is unknown
    fn stop(&mut self, sound: SoundId) -> Result<(), AudioError>;

    /// Release a sound
    fn unload(&mut self, sound: SoundId);

    fn state(&self, sound: SoundId) -> PlaybackState;
}

#[derive(Debug)]
struct NullSound {
    path: PathBuf,
    looping: bool,
    state: PlaybackState,
}

/// Backend without an output device
///
/// Validates files and tracks playback state so the rest of the engine
/// behaves the same on headless machines and in tests.
#[derive(Debug, Default)]
pub struct NullBackend {
    sounds: FxHashMap<SoundId, NullSound>,
    next_id: u32,
}

impl NullBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path a sound was loaded from
    #[must_use]
    pub fn path(&self, sound: SoundId) -> Option<&Path> {
        self.sounds.get(&sound).map(|s| s.path.as_path())
    }

    #[must_use]
    pub fn is_looping(&self, sound: SoundId) -> bool {
        self.sounds.get(&sound).is_some_and(|s| s.looping)
    }

    fn sound_mut(&mut self, sound: SoundId) -> Result<&mut NullSound, AudioError> {
        self.sounds
            .get_mut(&sound)
            .ok_or(AudioError::UnknownSound(sound))
    }
}

impl AudioBackend for NullBackend {
    fn load(&mut self, path: &Path, looping: bool) -> Result<SoundId, AudioError> {
        check_format(path)?;
        if !path.is_file() {
            return Err(AudioError::NotFound(path.to_path_buf()));
        }

        let id = SoundId(self.next_id);
        self.next_id += 1;
        self.sounds.insert(
            id,
            NullSound {
                path: path.to_path_buf(),
                looping,
                state: PlaybackState::Stopped,
            },
        );
        Ok(id)
    }

    fn play(&mut self, sound: SoundId) -> Result<(), AudioError> {
        self.sound_mut(sound)?.state = PlaybackState::Playing;
        Ok(())
    }

    fn stop(&mut self, sound: SoundId) -> Result<(), AudioError> {
        self.sound_mut(sound)?.state = PlaybackState::Stopped;
        Ok(())
    }

    fn unload(&mut self, sound: SoundId) {
        self.sounds.remove(&sound);
    }

    fn state(&self, sound: SoundId) -> PlaybackState {
        self.sounds
            .get(&sound)
            .map_or(PlaybackState::Stopped, |s| s.state)
    }
}
