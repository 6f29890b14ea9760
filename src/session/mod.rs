//! Capture/display session: the state machine that turns a camera into a
//! cloaked preview, plus the controller that runs it off the UI thread.

mod controller;
mod runner;

pub use controller::{CameraFactory, CloakController, DisplayFactory};
pub use runner::Session;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where a session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Countdown {
        remaining: u32,
    },
    WarmingUp,
    CapturingBackground,
    Running,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => f.write_str("idle"),
            Phase::Countdown { remaining } => write!(f, "counting down ({remaining}s left)"),
            Phase::WarmingUp => f.write_str("warming up"),
            Phase::CapturingBackground => f.write_str("capturing background"),
            Phase::Running => f.write_str("running"),
            Phase::Stopped => f.write_str("stopped"),
        }
    }
}

/// Why a session ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop flag was raised
    StopRequested,
    /// The display asked to quit
    QuitSignal,
}

/// Progress reports emitted by a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Phase(Phase),
    Notice(String),
    /// Last event of every session
    Finished(Result<StopReason, String>),
}

/// Shared stop flag. One side raises it, the session polls it.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
