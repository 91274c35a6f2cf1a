//! Timer engine: the work/break state machine and its tick loop.
//!
//! This module provides the core countdown logic:
//!
//! - `TimerEngine` - the command surface over the phase state machine
//! - `TimerDriver` / `TimerHandle` - the serialized once-per-second loop
//! - `TimerEvent` - snapshot and phase-completion notifications
//! - `EngineError` - synchronous validation failures
//!
//! The engine is deterministic and clock-free: every countdown change goes
//! through `tick()`. The driver supplies real time; tests call `tick()`
//! directly.

mod driver;
mod error;
mod timer;

pub use driver::{TimerCommand, TimerDriver, TimerHandle};
pub use error::EngineError;
pub use timer::{TimerEngine, TimerEvent};
