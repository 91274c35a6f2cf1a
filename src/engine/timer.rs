//! Timer engine for the interval timer.
//!
//! This module provides the core state machine:
//! - Phase transitions (Work → Break/LongBreak → Work)
//! - Countdown and long-break cycle accounting
//! - Event firing for the host's rendering and audio cues
//! - Synchronous mirroring of every persisted field into the settings store

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::settings::{keys, write_logged, SettingsStore, StoredSettings};
use crate::types::{TimerPhase, TimerSnapshot, TimerState};

use super::error::EngineError;

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Fired after every accepted tick or mutating command, carrying the
    /// full read-only state for rendering.
    Tick {
        /// Current state snapshot
        snapshot: TimerSnapshot,
    },
    /// Fired exactly once per phase transition, so the host can play the
    /// matching cue.
    PhaseCompleted {
        /// The phase whose countdown just finished
        previous: TimerPhase,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// The phase state machine, countdown, and cycle counter.
///
/// Constructed once per session, seeded from the settings store, and driven
/// either directly (`tick()` per second) or through
/// [`TimerDriver`](super::TimerDriver). All commands are serialized by the
/// caller; the engine itself never spawns anything.
///
/// Event sends and settings writes are fire-and-forget: no failure of
/// either ever escapes a command or corrupts the state machine.
pub struct TimerEngine {
    /// Current timer state
    state: TimerState,
    /// Persistence adapter the config is mirrored into
    settings: Arc<dyn SettingsStore>,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Creates a new engine seeded from the settings store.
    ///
    /// Absent or unparseable settings fall back to the documented
    /// defaults; the initial phase is Work with the full work duration on
    /// the clock, not running.
    pub fn new(settings: Arc<dyn SettingsStore>, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        let stored = StoredSettings::load(settings.as_ref());
        let state = TimerState::seeded(stored.config(), stored.completed_cycles);

        debug!(
            "Timer engine seeded: work={}s break={}s long_break={}s interval={} cycles={}",
            state.config.work_secs,
            state.config.break_secs,
            state.config.long_break_secs,
            state.config.long_break_interval,
            state.completed_cycles,
        );

        Self {
            state,
            settings,
            event_tx,
        }
    }

    /// Starts the countdown, resuming the remembered phase if paused.
    ///
    /// Idempotent: calling start while running changes nothing and must
    /// never create a second tick source.
    pub fn start(&mut self) {
        if self.state.is_running() {
            return;
        }
        self.state.start();
        self.persist();
        self.emit_snapshot();
    }

    /// Stops the countdown and enters the Paused phase, remembering the
    /// phase that was active. No-op if not running.
    pub fn stop(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.state.stop();
        self.persist();
        self.emit_snapshot();
    }

    /// Stops the countdown and returns to Work with a full work duration.
    ///
    /// The completed-cycle count is preserved.
    pub fn reset(&mut self) {
        self.state.reset();
        self.persist();
        self.emit_snapshot();
    }

    /// Sets the work duration in minutes.
    ///
    /// While stopped in the Work phase the remaining seconds are rewritten
    /// immediately; otherwise the new duration applies the next time Work
    /// is entered.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` for `minutes < 1`; the prior
    /// state is retained.
    pub fn set_work_duration(&mut self, minutes: u32) -> Result<(), EngineError> {
        if minutes < 1 {
            return Err(EngineError::duration_too_short("作業時間", minutes));
        }
        self.state.config.work_secs = minutes * 60;
        if !self.state.is_running() && self.state.phase == TimerPhase::Work {
            self.state.seconds_remaining = self.state.config.work_secs;
        }
        self.persist();
        self.emit_snapshot();
        Ok(())
    }

    /// Sets the short break duration in minutes.
    ///
    /// Same contract as [`set_work_duration`](Self::set_work_duration),
    /// gated on the Break phase.
    pub fn set_break_duration(&mut self, minutes: u32) -> Result<(), EngineError> {
        if minutes < 1 {
            return Err(EngineError::duration_too_short("休憩時間", minutes));
        }
        self.state.config.break_secs = minutes * 60;
        if !self.state.is_running() && self.state.phase == TimerPhase::Break {
            self.state.seconds_remaining = self.state.config.break_secs;
        }
        self.persist();
        self.emit_snapshot();
        Ok(())
    }

    /// Sets the long break duration in minutes.
    ///
    /// The running countdown is never rewritten, even when the current
    /// phase is LongBreak; the new duration applies the next time a long
    /// break starts.
    pub fn set_long_break_duration(&mut self, minutes: u32) -> Result<(), EngineError> {
        if minutes < 1 {
            return Err(EngineError::duration_too_short("長い休憩時間", minutes));
        }
        self.state.config.long_break_secs = minutes * 60;
        self.persist();
        self.emit_snapshot();
        Ok(())
    }

    /// Sets the number of completed work cycles before a long break.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` for `count < 1`.
    pub fn set_long_break_interval(&mut self, count: u32) -> Result<(), EngineError> {
        if count < 1 {
            return Err(EngineError::interval_too_short(count));
        }
        self.state.config.long_break_interval = count;
        self.persist();
        self.emit_snapshot();
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// Ignored unless running. When the countdown reaches zero the phase
    /// transition is applied within the same call, so a zero or negative
    /// countdown is never observable between ticks.
    pub fn tick(&mut self) {
        if !self.state.is_running() {
            return;
        }

        let completed = self.state.tick();
        if completed {
            self.handle_phase_complete();
        }
        self.emit_snapshot();
    }

    /// Applies the transition rule after a countdown reached zero.
    fn handle_phase_complete(&mut self) {
        let previous = self.state.phase;
        match previous {
            TimerPhase::Work => {
                self.state.complete_work();
                // Cycle counter changed; mirror it immediately
                self.persist();
            }
            TimerPhase::Break | TimerPhase::LongBreak => {
                self.state.complete_break();
            }
            // Paused never counts down, so it never completes
            TimerPhase::Paused => return,
        }

        debug!(
            "Phase completed: {} -> {} (cycles={})",
            previous.as_str(),
            self.state.phase.as_str(),
            self.state.completed_cycles,
        );

        self.emit(TimerEvent::PhaseCompleted { previous });
    }

    /// Returns a read-only snapshot of the current state.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot()
    }

    /// Returns a reference to the current timer state.
    pub fn get_state(&self) -> &TimerState {
        &self.state
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }

    /// Mirrors every persisted field into the settings store.
    ///
    /// Write failures are logged and ignored; persistence never blocks the
    /// timer.
    fn persist(&self) {
        let store = self.settings.as_ref();
        let config = &self.state.config;
        write_logged(store, keys::WORK_DURATION, &config.work_secs.to_string());
        write_logged(store, keys::BREAK_DURATION, &config.break_secs.to_string());
        write_logged(
            store,
            keys::LONG_BREAK_DURATION,
            &config.long_break_secs.to_string(),
        );
        write_logged(
            store,
            keys::LONG_BREAK_INTERVAL,
            &config.long_break_interval.to_string(),
        );
        write_logged(
            store,
            keys::COMPLETED_CYCLES,
            &self.state.completed_cycles.to_string(),
        );
    }

    fn emit_snapshot(&self) {
        self.emit(TimerEvent::Tick {
            snapshot: self.state.snapshot(),
        });
    }

    /// Sends an event to the host, logging instead of propagating when the
    /// receiver is gone.
    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("タイマーイベントの送信に失敗しました（受信側が閉じられています）");
        }
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
