//! Named sounds and background music

use std::path::Path;

use log::{debug, warn};
use rustc_hash::FxHashMap;

use super::backend::{AudioBackend, AudioError, NullBackend, PlaybackState, SoundId};

/// Keeps sounds by name and tracks the background track
pub struct AudioSystem {
    backend: Box<dyn AudioBackend>,
    sounds: FxHashMap<String, SoundId>,
    music: Option<SoundId>,
}

impl AudioSystem {
    #[must_use]
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            sounds: FxHashMap::default(),
            music: None,
        }
    }

    /// Load a sound under a name, replacing any previous sound of that name.
    ///
    /// The sound does not loop and does not start playing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot load the file
    pub fn load_sound(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), AudioError> {
        let name = name.into();
        let id = self.backend.load(path.as_ref(), false)?;
        debug!("Loaded sound '{name}' from {}", path.as_ref().display());
        if let Some(old) = self.sounds.insert(name, id) {
            self.backend.unload(old);
        }
        Ok(())
    }

    /// Play a sound by name, returning false if no such sound is loaded
    pub fn play_sound(&mut self, name: &str) -> bool {
        let Some(&id) = self.sounds.get(name) else {
            return false;
        };
        match self.backend.play(id) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to play '{name}': {e}");
                false
            }
        }
    }

    /// Stop a sound by name, returning false if no such sound is loaded
    pub fn stop_sound(&mut self, name: &str) -> bool {
        let Some(&id) = self.sounds.get(name) else {
            return false;
        };
        self.backend.stop(id).is_ok()
    }

    /// Start a looping background track, stopping the previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the track cannot be loaded or played. The
    /// previous track is stopped either way.
    pub fn play_background_music(&mut self, path: impl AsRef<Path>) -> Result<(), AudioError> {
        self.stop_music();

        let id = self.backend.load(path.as_ref(), true)?;
        if let Err(e) = self.backend.play(id) {
            self.backend.unload(id);
            return Err(e);
        }
        debug!("Playing background music {}", path.as_ref().display());
        self.music = Some(id);
        Ok(())
    }

    /// Stop and release the background track
    pub fn stop_music(&mut self) {
        if let Some(id) = self.music.take() {
            if let Err(e) = self.backend.stop(id) {
                warn!("Failed to stop background music: {e}");
            }
            self.backend.unload(id);
        }
    }

    /// Stop every sound, including the background track
    pub fn stop_all(&mut self) {
        for (name, &id) in &self.sounds {
            if let Err(e) = self.backend.stop(id) {
                warn!("Failed to stop '{name}': {e}");
            }
        }
        self.stop_music();
    }

    #[must_use]
    pub fn is_playing(&self, name: &str) -> bool {
        self.sounds
            .get(name)
            .is_some_and(|&id| self.backend.state(id) == PlaybackState::Playing)
    }

    #[must_use]
    pub fn is_music_playing(&self) -> bool {
        self.music
            .is_some_and(|id| self.backend.state(id) == PlaybackState::Playing)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Unload a sound by name
    pub fn remove(&mut self, name: &str) -> bool {
        match self.sounds.remove(name) {
            Some(id) => {
                self.backend.unload(id);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new(Box::new(NullBackend::new()))
    }
}

impl std::fmt::Debug for AudioSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSystem")
            .field("sound_count", &self.sounds.len())
            .field("music", &self.music)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sound_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"RIFF").unwrap();
        path
    }

    #[test]
    fn test_load_and_play() {
        let dir = tempfile::tempdir().unwrap();
        let mut audio = AudioSystem::default();
        audio.load_sound("jump", sound_file(&dir, "jump.wav")).unwrap();

        assert!(audio.contains("jump"));
        assert!(!audio.is_playing("jump"));
        assert!(audio.play_sound("jump"));
        assert!(audio.is_playing("jump"));
        assert!(audio.stop_sound("jump"));
        assert!(!audio.is_playing("jump"));
    }

    #[test]
    fn test_play_unknown_sound() {
        let mut audio = AudioSystem::default();
        assert!(!audio.play_sound("missing"));
        assert!(!audio.stop_sound("missing"));
        assert!(!audio.remove("missing"));
    }

    #[test]
    fn test_background_music_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let mut audio = AudioSystem::default();

        audio
            .play_background_music(sound_file(&dir, "theme.ogg"))
            .unwrap();
        assert!(audio.is_music_playing());

        let result = audio.play_background_music(dir.path().join("missing.ogg"));
        assert!(matches!(result, Err(AudioError::NotFound(_))));
        assert!(!audio.is_music_playing());

        audio
            .play_background_music(sound_file(&dir, "boss.mp3"))
            .unwrap();
        assert!(audio.is_music_playing());
    }

    #[test]
    fn test_stop_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut audio = AudioSystem::default();
        audio.load_sound("a", sound_file(&dir, "a.wav")).unwrap();
        audio.load_sound("b", sound_file(&dir, "b.flac")).unwrap();
        audio
            .play_background_music(sound_file(&dir, "theme.ogg"))
            .unwrap();
        audio.play_sound("a");
        audio.play_sound("b");

        audio.stop_all();
        assert!(!audio.is_playing("a"));
        assert!(!audio.is_playing("b"));
        assert!(!audio.is_music_playing());
        assert_eq!(audio.sound_count(), 2);
    }
}
