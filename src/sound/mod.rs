//! Audio cue playback for phase transitions.
//!
//! This module provides the AudioPlayer collaborator the engine's host
//! uses to sound a cue when a phase boundary is crossed:
//!
//! - Built-in cue identifiers backed by embedded data
//! - User-supplied cue files
//! - Non-blocking playback at a caller-supplied volume
//! - Graceful degradation when audio is unavailable
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomoflow::sound::{AudioPlayer, RodioAudioPlayer, get_default_cue};
//!
//! // Create a player (may fail if no audio device)
//! let player = RodioAudioPlayer::new(false).expect("audio init");
//!
//! // Play the default cue at half volume
//! let cue = get_default_cue();
//! player.play(&cue, 0.5).expect("playback failed");
//! ```

mod cue;
mod embedded;
mod error;
mod player;

pub use cue::{get_default_cue, resolve_cue, SoundCue, BUILTIN_CUE_IDS};
pub use embedded::{get_builtin_sound, get_embedded_sound_format};
pub use error::AudioError;
pub use player::{try_create_player, RodioAudioPlayer};

/// Trait for audio cue playback implementations.
///
/// This trait abstracts the playback functionality, allowing for different
/// implementations (e.g., rodio-based, mock for testing). Volume is in
/// `[0.0, 1.0]`; implementations clamp out-of-range values.
pub trait AudioPlayer: Send + Sync {
    /// Plays a cue at the given volume.
    ///
    /// This method should be non-blocking; the cue plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, cue: &SoundCue, volume: f32) -> Result<(), AudioError>;

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;

    /// Returns true if cue playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Enables cue playback.
    fn enable(&self);

    /// Disables cue playback.
    fn disable(&self);
}

impl AudioPlayer for RodioAudioPlayer {
    fn play(&self, cue: &SoundCue, volume: f32) -> Result<(), AudioError> {
        RodioAudioPlayer::play(self, cue, volume)
    }

    fn is_available(&self) -> bool {
        RodioAudioPlayer::is_available(self)
    }

    fn is_disabled(&self) -> bool {
        RodioAudioPlayer::is_disabled(self)
    }

    fn enable(&self) {
        RodioAudioPlayer::enable(self)
    }

    fn disable(&self) {
        RodioAudioPlayer::disable(self)
    }
}

/// Mock audio player for testing.
#[derive(Debug, Default)]
pub struct MockAudioPlayer {
    play_calls: std::sync::Mutex<Vec<(SoundCue, f32)>>,
    available: std::sync::atomic::AtomicBool,
    disabled: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockAudioPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: std::sync::Mutex::new(Vec::new()),
            available: std::sync::atomic::AtomicBool::new(true),
            disabled: std::sync::atomic::AtomicBool::new(false),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available
            .store(available, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<(SoundCue, f32)> {
        self.play_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl AudioPlayer for MockAudioPlayer {
    fn play(&self, cue: &SoundCue, volume: f32) -> Result<(), AudioError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AudioError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(std::sync::atomic::Ordering::SeqCst) {
            return Ok(());
        }
        self.play_calls
            .lock()
            .unwrap()
            .push((cue.clone(), volume.clamp(0.0, 1.0)));
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled
            .store(false, std::sync::atomic::Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Verify all public types are accessible
        let _: fn(bool) -> Result<RodioAudioPlayer, AudioError> = RodioAudioPlayer::new;
        let _: fn() -> SoundCue = get_default_cue;
        let _: fn(&str) -> SoundCue = resolve_cue;
        let _: fn(&str) -> Option<&'static [u8]> = get_builtin_sound;
    }

    #[test]
    fn test_mock_records_cue_and_volume() {
        let mock = MockAudioPlayer::new();
        let cue = SoundCue::builtin("default2");

        mock.play(&cue, 0.3).unwrap();

        let calls = mock.get_play_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, cue);
        assert_eq!(calls[0].1, 0.3);
    }

    #[test]
    fn test_mock_clamps_volume() {
        let mock = MockAudioPlayer::new();
        mock.play(&get_default_cue(), 7.0).unwrap();

        assert_eq!(mock.get_play_calls()[0].1, 1.0);
    }

    #[test]
    fn test_mock_failure_injection() {
        let mock = MockAudioPlayer::new();
        mock.set_should_fail(true);

        let result = mock.play(&get_default_cue(), 1.0);
        assert!(result.is_err());
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_mock_disabled_skips_recording() {
        let mock = MockAudioPlayer::new();
        mock.disable();

        assert!(mock.play(&get_default_cue(), 1.0).is_ok());
        assert_eq!(mock.play_count(), 0);

        mock.enable();
        assert!(mock.play(&get_default_cue(), 1.0).is_ok());
        assert_eq!(mock.play_count(), 1);
    }

    #[test]
    fn test_mock_clear_calls() {
        let mock = MockAudioPlayer::new();
        mock.play(&get_default_cue(), 1.0).unwrap();
        assert_eq!(mock.play_count(), 1);

        mock.clear_calls();
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_mock_availability() {
        let mock = MockAudioPlayer::new();
        assert!(mock.is_available());

        mock.set_available(false);
        assert!(!mock.is_available());
    }
}
