//! Pomoflow Interval Timer Library
//!
//! This library provides the core functionality for a work/break interval
//! timer. It includes:
//! - Timer engine with the Work / Break / LongBreak phase state machine
//! - Tick-driven countdown loop with serialized command dispatch
//! - Settings persistence with defaults for absent or corrupt values
//! - Audio cue routing for phase-completion notifications
//! - Type definitions for configuration, state, and snapshots
//!
//! The engine is host-agnostic: any frontend that can send commands and
//! consume [`engine::TimerEvent`]s can present the timer.

pub mod alert;
pub mod engine;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{TimerConfig, TimerPhase, TimerSnapshot, TimerState};

// Re-export engine types
pub use engine::{EngineError, TimerCommand, TimerDriver, TimerEngine, TimerEvent, TimerHandle};

// Re-export settings types
pub use settings::{
    JsonFileSettingsStore, MemorySettingsStore, SettingsError, SettingsStore, StoredSettings,
};

// Re-export sound types
pub use sound::{
    get_default_cue, resolve_cue, AudioError, AudioPlayer, MockAudioPlayer, RodioAudioPlayer,
    SoundCue,
};

// Re-export alert types
pub use alert::{AlertConfig, AlertRouter};
