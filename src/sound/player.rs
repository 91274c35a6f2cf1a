//! Audio player implementation using rodio.
//!
//! This module provides the `RodioAudioPlayer` which uses the rodio v0.20
//! audio library for cross-platform cue playback.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::cue::SoundCue;
use super::embedded::{get_builtin_sound, DEFAULT1_SOUND_DATA};
use super::error::AudioError;

/// An audio player that uses rodio for cue playback.
///
/// This player is thread-safe and can be shared across threads using `Arc`.
/// Playback is non-blocking; cues continue playing in the background.
pub struct RodioAudioPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Whether cue playback is disabled.
    disabled: AtomicBool,
}

// SAFETY: cpal marks its stream `!Send`/`!Sync` conservatively for mobile
// backends. The player never touches `_stream` after construction — it only
// keeps it alive — and all playback goes through `OutputStreamHandle`, which
// is itself `Send + Sync`, so sharing the player across threads is safe on
// the desktop backends this crate targets.
unsafe impl Send for RodioAudioPlayer {}
unsafe impl Sync for RodioAudioPlayer {}

impl RodioAudioPlayer {
    /// Creates a new audio player.
    ///
    /// # Arguments
    ///
    /// * `disabled` - If true, all cue playback will be silently skipped.
    ///
    /// # Errors
    ///
    /// Returns `AudioError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, AudioError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| AudioError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Creates a disabled audio player.
    ///
    /// All calls to `play` will silently succeed without producing sound.
    ///
    /// # Errors
    ///
    /// May still fail if unable to initialize the audio stream.
    pub fn disabled() -> Result<Self, AudioError> {
        Self::new(true)
    }

    /// Plays a cue at the given volume.
    ///
    /// This method is non-blocking; the cue plays in the background. The
    /// volume is clamped to `[0.0, 1.0]`. If a file-backed cue cannot be
    /// played, playback automatically falls back to the default embedded
    /// cue so a phase transition is never silent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cue file cannot be opened and the fallback also fails
    /// - The audio data cannot be decoded
    /// - Audio playback fails
    pub fn play(&self, cue: &SoundCue, volume: f32) -> Result<(), AudioError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Cue playback disabled, skipping");
            return Ok(());
        }

        let volume = volume.clamp(0.0, 1.0);

        match cue {
            SoundCue::File { name, path } => {
                debug!("Playing cue file: {}", name);
                match self.play_file(path, volume) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        warn!(
                            "Failed to play cue '{}': {}, falling back to embedded",
                            name, e
                        );
                        self.play_embedded(DEFAULT1_SOUND_DATA, volume)
                    }
                }
            }
            SoundCue::Builtin { name } => {
                debug!("Playing built-in cue: {}", name);
                let data = get_builtin_sound(name).unwrap_or(DEFAULT1_SOUND_DATA);
                self.play_embedded(data, volume)
            }
        }
    }

    /// Plays a cue file from the filesystem.
    fn play_file(&self, path: &std::path::Path, volume: f32) -> Result<(), AudioError> {
        let file = File::open(path)
            .map_err(|e| AudioError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let reader = BufReader::new(file);
        let decoder = Decoder::new(reader).map_err(|e| AudioError::DecodeError(e.to_string()))?;

        self.play_decoder(decoder, volume)
    }

    /// Plays embedded cue data.
    fn play_embedded(&self, data: &'static [u8], volume: f32) -> Result<(), AudioError> {
        let cursor = Cursor::new(data);
        let decoder = Decoder::new(cursor)
            .map_err(|e| AudioError::DecodeError(format!("embedded cue: {}", e)))?;

        self.play_decoder(decoder, volume)
    }

    /// Plays a decoded audio source at the given volume.
    fn play_decoder<R>(&self, decoder: Decoder<R>, volume: f32) -> Result<(), AudioError>
    where
        R: std::io::Read + std::io::Seek + Send + Sync + 'static,
    {
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| AudioError::StreamError(e.to_string()))?;

        sink.set_volume(volume);
        sink.append(decoder);
        sink.detach(); // Non-blocking: cue continues after function returns

        debug!("Cue playback started (detached, volume {})", volume);
        Ok(())
    }

    /// Returns true if cue playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Enables cue playback.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
        debug!("Cue playback enabled");
    }

    /// Disables cue playback.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
        debug!("Cue playback disabled");
    }

    /// Returns true if the audio system is available.
    ///
    /// This always returns true if the player was successfully created,
    /// as the audio stream is initialized during construction.
    #[must_use]
    pub fn is_available(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for RodioAudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAudioPlayer")
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Creates an audio player, returning None if audio is unavailable.
///
/// This is a convenience function for optional sound support.
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player(disabled: bool) -> Option<Arc<RodioAudioPlayer>> {
    match RodioAudioPlayer::new(disabled) {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, cues disabled: {}", e);
            None
        }
    }
}
