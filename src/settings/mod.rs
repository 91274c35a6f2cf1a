//! Settings persistence for the interval timer.
//!
//! This module provides the key-value persistence layer the engine's
//! configuration is seeded from and mirrored into:
//!
//! - [`SettingsStore`]: the string key-value contract
//! - [`StoredSettings`]: a typed view with documented defaults for absent
//!   or unparseable values
//! - [`MemorySettingsStore`]: in-process store, also used as the test double
//! - [`JsonFileSettingsStore`]: flat JSON file on disk
//!
//! Writes are fire-and-forget from the engine's point of view: a failed
//! write is logged and the timer proceeds with its in-memory state.

mod error;
mod file;

pub use error::SettingsError;
pub use file::JsonFileSettingsStore;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::warn;

use crate::types::TimerConfig;

// ============================================================================
// Keys and defaults
// ============================================================================

/// Persisted setting keys.
pub mod keys {
    /// Work duration in seconds.
    pub const WORK_DURATION: &str = "workDuration";
    /// Short break duration in seconds.
    pub const BREAK_DURATION: &str = "breakDuration";
    /// Long break duration in seconds.
    pub const LONG_BREAK_DURATION: &str = "longBreakDuration";
    /// Completed work cycles before a long break.
    pub const LONG_BREAK_INTERVAL: &str = "longBreakInterval";
    /// Rolling completed-cycle counter.
    pub const COMPLETED_CYCLES: &str = "completedCycles";
    /// Playback volume, 0.0-1.0.
    pub const VOLUME: &str = "volume";
    /// Selected audio cue identifier.
    pub const AUDIO: &str = "audio";
}

/// Default work duration (25 minutes).
pub const DEFAULT_WORK_SECS: u32 = 1500;
/// Default short break duration (5 minutes).
pub const DEFAULT_BREAK_SECS: u32 = 300;
/// Default long break duration (15 minutes).
pub const DEFAULT_LONG_BREAK_SECS: u32 = 900;
/// Default long break interval.
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;
/// Default completed cycle count.
pub const DEFAULT_COMPLETED_CYCLES: u32 = 0;
/// Default playback volume.
pub const DEFAULT_VOLUME: f32 = 1.0;
/// Default audio cue identifier (first built-in cue).
pub const DEFAULT_AUDIO: &str = "default1";

// ============================================================================
// SettingsStore
// ============================================================================

/// String key-value persistence contract.
///
/// Any key-value mechanism (in-memory map, file, embedded database, OS
/// preference store) satisfies this interface.
pub trait SettingsStore: Send + Sync {
    /// Reads the value for `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;

    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// Reads a parseable value from the store, falling back to `default` when
/// the key is absent, unreadable, or unparseable.
///
/// Read and parse failures are logged, never propagated.
pub fn read_or_default<T>(store: &dyn SettingsStore, key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match store.get(key) {
        Ok(Some(raw)) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("設定 '{}' の値 '{}' を解析できません。既定値を使用します", key, raw);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            warn!("設定 '{}' の読み込みに失敗しました: {}", key, e);
            default
        }
    }
}

/// Writes a value to the store, logging failures instead of propagating
/// them.
pub fn write_logged(store: &dyn SettingsStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        warn!("設定 '{}' の保存に失敗しました: {}", key, e);
    }
}

// ============================================================================
// StoredSettings
// ============================================================================

/// Typed view of every persisted setting, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSettings {
    /// Work duration in seconds
    pub work_secs: u32,
    /// Short break duration in seconds
    pub break_secs: u32,
    /// Long break duration in seconds
    pub long_break_secs: u32,
    /// Long break interval in completed cycles
    pub long_break_interval: u32,
    /// Rolling completed-cycle counter
    pub completed_cycles: u32,
    /// Playback volume in 0.0-1.0
    pub volume: f32,
    /// Selected audio cue identifier
    pub audio: String,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            work_secs: DEFAULT_WORK_SECS,
            break_secs: DEFAULT_BREAK_SECS,
            long_break_secs: DEFAULT_LONG_BREAK_SECS,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
            completed_cycles: DEFAULT_COMPLETED_CYCLES,
            volume: DEFAULT_VOLUME,
            audio: DEFAULT_AUDIO.to_string(),
        }
    }
}

impl StoredSettings {
    /// Loads every setting from the store, substituting the documented
    /// default for any value that is absent or unparseable.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let audio = match store.get(keys::AUDIO) {
            Ok(Some(id)) if !id.trim().is_empty() => id,
            Ok(_) => DEFAULT_AUDIO.to_string(),
            Err(e) => {
                warn!("設定 '{}' の読み込みに失敗しました: {}", keys::AUDIO, e);
                DEFAULT_AUDIO.to_string()
            }
        };

        let volume: f32 = read_or_default(store, keys::VOLUME, DEFAULT_VOLUME);

        Self {
            work_secs: read_or_default(store, keys::WORK_DURATION, DEFAULT_WORK_SECS),
            break_secs: read_or_default(store, keys::BREAK_DURATION, DEFAULT_BREAK_SECS),
            long_break_secs: read_or_default(
                store,
                keys::LONG_BREAK_DURATION,
                DEFAULT_LONG_BREAK_SECS,
            ),
            long_break_interval: read_or_default(
                store,
                keys::LONG_BREAK_INTERVAL,
                DEFAULT_LONG_BREAK_INTERVAL,
            ),
            completed_cycles: read_or_default(
                store,
                keys::COMPLETED_CYCLES,
                DEFAULT_COMPLETED_CYCLES,
            ),
            volume: volume.clamp(0.0, 1.0),
            audio,
        }
    }

    /// Returns the timer configuration slice of these settings.
    ///
    /// Individual fields that fail validation are replaced by their
    /// defaults, so a corrupt store can never produce a zero-length phase.
    pub fn config(&self) -> TimerConfig {
        let mut config = TimerConfig {
            work_secs: self.work_secs,
            break_secs: self.break_secs,
            long_break_secs: self.long_break_secs,
            long_break_interval: self.long_break_interval,
        };
        if config.validate().is_err() {
            warn!("保存されたタイマー設定が不正です。不正な値を既定値に戻します");
            if config.work_secs < 1 {
                config.work_secs = DEFAULT_WORK_SECS;
            }
            if config.break_secs < 1 {
                config.break_secs = DEFAULT_BREAK_SECS;
            }
            if config.long_break_secs < 1 {
                config.long_break_secs = DEFAULT_LONG_BREAK_SECS;
            }
            if config.long_break_interval < 1 {
                config.long_break_interval = DEFAULT_LONG_BREAK_INTERVAL;
            }
        }
        config
    }
}

// ============================================================================
// MemorySettingsStore
// ============================================================================

/// In-process settings store backed by a `HashMap`.
///
/// Used as the default store for hosts that opt out of persistence and as
/// the test double; `set_should_fail` injects persistence failures.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
    should_fail: AtomicBool,
}

impl MemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `get`/`set` fail, for testing the
    /// fire-and-forget persistence path.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    /// Returns true if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SettingsError::ReadFailed("注入された失敗".to_string()));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SettingsError::WriteFailed("注入された失敗".to_string()));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
