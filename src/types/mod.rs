//! Core data types for the interval timer.
//!
//! This module defines the data structures used for:
//! - Phase tracking (Work / Break / LongBreak / Paused)
//! - Timer configuration with validation
//! - The mutable timer state and its read-only snapshot

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the timer.
///
/// `Paused` is a modifier state: it is only ever entered through an explicit
/// stop command, never by countdown expiry, and the pre-pause phase is
/// remembered so a later start resumes where the user left off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Currently in a work session
    Work,
    /// Currently in a short break
    Break,
    /// Currently in a long break
    LongBreak,
    /// Timer is paused
    Paused,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Work => "work",
            TimerPhase::Break => "break",
            TimerPhase::LongBreak => "long_break",
            TimerPhase::Paused => "paused",
        }
    }

    /// Returns true if this phase has a countdown of its own.
    pub fn is_countdown(&self) -> bool {
        matches!(
            self,
            TimerPhase::Work | TimerPhase::Break | TimerPhase::LongBreak
        )
    }
}

impl Default for TimerPhase {
    fn default() -> Self {
        TimerPhase::Work
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Configuration for the interval timer.
///
/// Durations are stored in seconds; the engine's setter commands accept
/// minutes and convert. All four fields are persisted to the settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Work duration in seconds
    pub work_secs: u32,
    /// Short break duration in seconds
    pub break_secs: u32,
    /// Long break duration in seconds
    pub long_break_secs: u32,
    /// Number of completed work cycles before a long break is inserted
    pub long_break_interval: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_interval: 4,
        }
    }
}

impl TimerConfig {
    /// Creates a new configuration with the specified work duration.
    pub fn with_work_secs(mut self, secs: u32) -> Self {
        self.work_secs = secs;
        self
    }

    /// Creates a new configuration with the specified break duration.
    pub fn with_break_secs(mut self, secs: u32) -> Self {
        self.break_secs = secs;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_secs(mut self, secs: u32) -> Self {
        self.long_break_secs = secs;
        self
    }

    /// Creates a new configuration with the specified long break interval.
    pub fn with_long_break_interval(mut self, count: u32) -> Self {
        self.long_break_interval = count;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_secs < 1 {
            return Err("作業時間は1秒以上で指定してください".to_string());
        }
        if self.break_secs < 1 {
            return Err("休憩時間は1秒以上で指定してください".to_string());
        }
        if self.long_break_secs < 1 {
            return Err("長い休憩時間は1秒以上で指定してください".to_string());
        }
        if self.long_break_interval < 1 {
            return Err("長い休憩の間隔は1サイクル以上で指定してください".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The mutable state of the timer.
///
/// Owned by the engine; hosts only ever see a [`TimerSnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase of the timer
    pub phase: TimerPhase,
    /// Remaining seconds in the current phase
    pub seconds_remaining: u32,
    /// Whether the countdown is actively ticking
    pub running: bool,
    /// Number of completed work cycles
    pub completed_cycles: u32,
    /// Timer configuration
    pub config: TimerConfig,
    /// Phase that was active when the timer was paused
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_phase: Option<TimerPhase>,
}

impl TimerState {
    /// Creates a new state in the Work phase, not running, with the full
    /// work duration on the clock.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            phase: TimerPhase::Work,
            seconds_remaining: config.work_secs,
            running: false,
            completed_cycles: 0,
            config,
            previous_phase: None,
        }
    }

    /// Creates a state seeded with a previously persisted cycle count.
    pub fn seeded(config: TimerConfig, completed_cycles: u32) -> Self {
        Self {
            completed_cycles,
            ..Self::new(config)
        }
    }

    /// Starts or resumes the countdown.
    ///
    /// Resuming from pause restores the remembered phase; the remaining
    /// seconds are untouched either way. Idempotent while running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        if self.phase == TimerPhase::Paused {
            // Fall back to Work if the remembered phase was lost
            self.phase = self.previous_phase.take().unwrap_or(TimerPhase::Work);
        }
        self.running = true;
    }

    /// Pauses the countdown, remembering the current phase.
    ///
    /// No-op if the timer is not running.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.previous_phase = Some(self.phase);
        self.phase = TimerPhase::Paused;
        self.running = false;
    }

    /// Returns to the Work phase with a full work countdown.
    ///
    /// The completed cycle count is preserved.
    pub fn reset(&mut self) {
        self.running = false;
        self.phase = TimerPhase::Work;
        self.seconds_remaining = self.config.work_secs;
        self.previous_phase = None;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown reached zero, meaning a phase
    /// transition must be applied before the state is observed again.
    pub fn tick(&mut self) -> bool {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining == 0
    }

    /// Completes the current Work phase: increments the cycle counter and
    /// enters either Break or LongBreak.
    ///
    /// A long break is inserted when the incremented counter reaches the
    /// configured interval, and the counter restarts at 1 (the next work
    /// session is counted as the first of the new round).
    pub fn complete_work(&mut self) {
        self.completed_cycles += 1;
        if self.completed_cycles >= self.config.long_break_interval {
            self.phase = TimerPhase::LongBreak;
            self.seconds_remaining = self.config.long_break_secs;
            self.completed_cycles = 1;
        } else {
            self.phase = TimerPhase::Break;
            self.seconds_remaining = self.config.break_secs;
        }
    }

    /// Completes a Break or LongBreak phase: enters Work with a full
    /// work countdown.
    pub fn complete_break(&mut self) {
        self.phase = TimerPhase::Work;
        self.seconds_remaining = self.config.work_secs;
    }

    /// Returns true if the countdown is actively ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns true if the timer is paused.
    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Paused
    }

    /// Creates a read-only snapshot of the current state.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            running: self.running,
            completed_cycles: self.completed_cycles,
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Read-only view of the timer state, emitted to the host after every
/// accepted tick or command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Current phase
    pub phase: TimerPhase,
    /// Remaining seconds in the current phase
    #[serde(rename = "secondsRemaining")]
    pub seconds_remaining: u32,
    /// Whether the countdown is ticking
    pub running: bool,
    /// Completed work cycles
    #[serde(rename = "completedCycles")]
    pub completed_cycles: u32,
    /// Current configuration
    pub config: TimerConfig,
}

impl TimerSnapshot {
    /// Formats the remaining time as `M:SS` for display.
    pub fn display_time(&self) -> String {
        format!(
            "{}:{:02}",
            self.seconds_remaining / 60,
            self.seconds_remaining % 60
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
