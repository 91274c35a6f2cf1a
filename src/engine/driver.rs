//! Tick-driven event loop for the timer engine.
//!
//! The engine itself is a plain state machine; this module supplies the
//! single tick source and the serialized command dispatch the engine's
//! contract requires. One `tokio::select!` loop owns the engine, so no two
//! commands or ticks ever interleave mid-mutation, starting twice can
//! never create a duplicate tick source, and no tick applies after a stop
//! has been processed.

use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, warn};

use super::timer::TimerEngine;

/// Commands the host can send to a running driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Stop,
    /// Return to Work with a full work duration
    Reset,
    /// Set the work duration in minutes
    SetWorkDuration {
        /// New duration in minutes
        minutes: u32,
    },
    /// Set the short break duration in minutes
    SetBreakDuration {
        /// New duration in minutes
        minutes: u32,
    },
    /// Set the long break duration in minutes
    SetLongBreakDuration {
        /// New duration in minutes
        minutes: u32,
    },
    /// Set the long break interval in completed cycles
    SetLongBreakInterval {
        /// New interval in cycles
        count: u32,
    },
    /// Stop the loop; used when the host view unmounts
    Shutdown,
}

/// Cloneable handle for sending commands into the driver loop.
///
/// Sends are fire-and-forget; validation failures inside the engine are
/// logged by the driver. Hosts that need synchronous validation errors can
/// call the [`TimerEngine`] command methods directly instead of using a
/// driver.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: mpsc::UnboundedSender<TimerCommand>,
}

impl TimerHandle {
    /// Sends a command to the driver. No-op once the driver has shut down.
    pub fn send(&self, command: TimerCommand) {
        if self.tx.send(command).is_err() {
            warn!("タイマーは既に終了しています。コマンドは無視されます");
        }
    }

    /// Starts or resumes the countdown.
    pub fn start(&self) {
        self.send(TimerCommand::Start);
    }

    /// Pauses the countdown.
    pub fn stop(&self) {
        self.send(TimerCommand::Stop);
    }

    /// Resets to the Work phase.
    pub fn reset(&self) {
        self.send(TimerCommand::Reset);
    }

    /// Sets the work duration in minutes.
    pub fn set_work_duration(&self, minutes: u32) {
        self.send(TimerCommand::SetWorkDuration { minutes });
    }

    /// Sets the short break duration in minutes.
    pub fn set_break_duration(&self, minutes: u32) {
        self.send(TimerCommand::SetBreakDuration { minutes });
    }

    /// Sets the long break duration in minutes.
    pub fn set_long_break_duration(&self, minutes: u32) {
        self.send(TimerCommand::SetLongBreakDuration { minutes });
    }

    /// Sets the long break interval in completed cycles.
    pub fn set_long_break_interval(&self, count: u32) {
        self.send(TimerCommand::SetLongBreakInterval { count });
    }

    /// Shuts the driver down.
    pub fn shutdown(&self) {
        self.send(TimerCommand::Shutdown);
    }
}

/// Drives a [`TimerEngine`] with a once-per-second tick and serialized
/// command dispatch.
pub struct TimerDriver {
    engine: TimerEngine,
    command_rx: mpsc::UnboundedReceiver<TimerCommand>,
}

impl TimerDriver {
    /// Wraps an engine, returning the driver and the handle for issuing
    /// commands to it.
    pub fn new(engine: TimerEngine) -> (Self, TimerHandle) {
        let (tx, command_rx) = mpsc::unbounded_channel();
        (Self { engine, command_rx }, TimerHandle { tx })
    }

    /// Runs the loop until a `Shutdown` command arrives or every handle is
    /// dropped. Should be spawned as a tokio task.
    pub async fn run(mut self) {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick fires immediately; consume it so the
        // countdown starts a full second after start
        ticker.tick().await;

        debug!("Timer driver loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.engine.tick();
                }
                command = self.command_rx.recv() => {
                    match command {
                        None | Some(TimerCommand::Shutdown) => break,
                        Some(command) => self.apply(command),
                    }
                }
            }
        }

        debug!("Timer driver loop stopped");
    }

    fn apply(&mut self, command: TimerCommand) {
        let result = match command {
            TimerCommand::Start => {
                self.engine.start();
                Ok(())
            }
            TimerCommand::Stop => {
                self.engine.stop();
                Ok(())
            }
            TimerCommand::Reset => {
                self.engine.reset();
                Ok(())
            }
            TimerCommand::SetWorkDuration { minutes } => self.engine.set_work_duration(minutes),
            TimerCommand::SetBreakDuration { minutes } => self.engine.set_break_duration(minutes),
            TimerCommand::SetLongBreakDuration { minutes } => {
                self.engine.set_long_break_duration(minutes)
            }
            TimerCommand::SetLongBreakInterval { count } => {
                self.engine.set_long_break_interval(count)
            }
            TimerCommand::Shutdown => unreachable!("handled by the loop"),
        };

        if let Err(e) = result {
            warn!("コマンドを拒否しました: {}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
