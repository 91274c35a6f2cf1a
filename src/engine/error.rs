//! Timer engine error types.
//!
//! Validation failures are reported synchronously to the caller of the
//! mutating command and never corrupt existing state; the engine remains
//! fully usable after any error.

use thiserror::Error;

/// Errors that can occur when issuing commands to the timer engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A duration or interval argument was below the minimum of 1.
    #[error("不正な入力です: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// Builds the rejection for a duration below one minute.
    pub(crate) fn duration_too_short(field: &str, minutes: u32) -> Self {
        Self::InvalidInput(format!(
            "{}は1分以上で指定してください（指定値: {}分）",
            field, minutes
        ))
    }

    /// Builds the rejection for an interval below one cycle.
    pub(crate) fn interval_too_short(count: u32) -> Self {
        Self::InvalidInput(format!(
            "長い休憩の間隔は1サイクル以上で指定してください（指定値: {}）",
            count
        ))
    }
}
