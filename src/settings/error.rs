//! Settings store error types.
//!
//! Persistence failures are never fatal to the timer: callers log these
//! errors and continue with defaults or the prior in-memory values.

use thiserror::Error;

/// Errors that can occur in the settings persistence layer.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The backing store could not be read.
    #[error("設定の読み込みに失敗しました: {0}")]
    ReadFailed(String),

    /// The backing store could not be written.
    #[error("設定の書き込みに失敗しました: {0}")]
    WriteFailed(String),

    /// The stored data could not be serialized or deserialized.
    #[error("設定データの変換に失敗しました: {0}")]
    SerializeFailed(String),
}

impl SettingsError {
    /// Returns true if this error occurred on the read path.
    #[must_use]
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::ReadFailed(_))
    }

    /// Returns true if this error occurred on the write path.
    #[must_use]
    pub fn is_write_error(&self) -> bool {
        matches!(self, Self::WriteFailed(_))
    }
}
