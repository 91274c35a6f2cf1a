//! Audio playback error types.
//!
//! Playback failures never reach the timer state machine: the alert layer
//! logs them and the countdown continues unaffected.

use thiserror::Error;

/// Errors that can occur in the audio playback system.
#[derive(Debug, Error)]
pub enum AudioError {
    /// Audio device is not available (e.g., no output device connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Cue file was not found at the specified path.
    #[error("サウンドファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio data.
    #[error("サウンドデータのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("サウンド再生エラー: {0}")]
    PlaybackError(String),
}

impl AudioError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the cue data itself.
    #[must_use]
    pub fn is_cue_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if playback should fall back to the embedded cue.
    #[must_use]
    pub fn should_fallback_to_embedded(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }
}
