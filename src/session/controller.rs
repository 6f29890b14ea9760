use super::{Phase, Session, SessionEvent, StopHandle, StopReason};
use crate::capture::CaptureSource;
use crate::config::SessionConfig;
use crate::error::CloakError;
use crate::output::DisplaySink;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Opens the camera for a session; called on the session thread
pub type CameraFactory =
    Arc<dyn Fn(&SessionConfig) -> Result<Box<dyn CaptureSource>, CloakError> + Send + Sync>;

/// Builds the display sink for a session; called on the session thread
pub type DisplayFactory = Arc<dyn Fn() -> anyhow::Result<Box<dyn DisplaySink>> + Send + Sync>;

/// A session thread plus the receiving end of its own event channel
struct ActiveSession {
    stop: StopHandle,
    handle: JoinHandle<()>,
    events: Receiver<SessionEvent>,
}

/// Runs at most one session at a time on a background thread.
///
/// The presentation layer only calls `start`, `stop` and `poll`, and reads
/// `phase`/`status`. Frames never leave the session thread; the only traffic
/// back is [`SessionEvent`]s over a channel. Each session gets its own
/// channel, so events from an earlier session never reach a later one.
pub struct CloakController {
    config: SessionConfig,
    open_camera: CameraFactory,
    open_display: DisplayFactory,
    active: Option<ActiveSession>,
    phase: Phase,
    status: String,
}

impl CloakController {
    pub fn new(config: SessionConfig, open_camera: CameraFactory, open_display: DisplayFactory) -> Self {
        Self {
            config,
            open_camera,
            open_display,
            active: None,
            phase: Phase::Idle,
            status: status_for(Phase::Idle),
        }
    }

    /// Begin a new session with the requested cloak color.
    ///
    /// Returns false if a session is still active. Events left over from a
    /// finished previous session are applied and its thread joined first, so
    /// its camera is released before a new one is opened.
    pub fn start(&mut self, color: &str) -> bool {
        if self.is_active() {
            tracing::warn!("Start ignored, a session is already active");
            return false;
        }
        if self.active.is_some() {
            self.poll();
            self.reap();
        }

        let stop = StopHandle::new();
        let session_stop = stop.clone();
        let (events, events_rx) = mpsc::channel();
        let config = self.config.clone();
        let open_camera = Arc::clone(&self.open_camera);
        let open_display = Arc::clone(&self.open_display);
        let color = color.to_string();

        let spawned = thread::Builder::new()
            .name("cloak-session".into())
            .spawn(move || {
                let mut display = match open_display() {
                    Ok(display) => display,
                    Err(err) => {
                        tracing::error!("Failed to open display: {:#}", err);
                        let reason = format!("Failed to open display: {err:#}");
                        for event in [
                            SessionEvent::Phase(Phase::Stopped),
                            SessionEvent::Finished(Err(reason)),
                        ] {
                            if let Err(error) = events.send(event) {
                                tracing::debug!("Session event dropped, receiver gone: {}", error);
                            }
                        }
                        return;
                    }
                };

                let mut session = Session::new(config, color, session_stop).with_events(events);
                let _ = session.run(|cfg| open_camera(cfg), &mut display);
            });

        match spawned {
            Ok(handle) => {
                self.active = Some(ActiveSession {
                    stop,
                    handle,
                    events: events_rx,
                });
                self.phase = Phase::Idle;
                self.status = "Starting...".to_string();
                true
            }
            Err(err) => {
                tracing::error!("Failed to spawn session thread: {}", err);
                self.status = format!("Failed to start: {err}");
                false
            }
        }
    }

    /// Ask the active session to stop; it winds down within one frame
    pub fn stop(&mut self) {
        if let Some(active) = &self.active {
            active.stop.request_stop();
            self.status = "Stopping...".to_string();
        }
    }

    /// Drain pending session events, updating `phase` and `status`.
    ///
    /// Once the session reports `Finished` its thread is joined and the
    /// phase returns to [`Phase::Idle`], ready for the next start.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let events: Vec<SessionEvent> = match &self.active {
            Some(active) => active.events.try_iter().collect(),
            None => return Vec::new(),
        };

        for event in &events {
            match event {
                SessionEvent::Phase(phase) => {
                    self.phase = *phase;
                    self.status = status_for(*phase);
                }
                SessionEvent::Notice(message) => self.status = message.clone(),
                SessionEvent::Finished(Ok(StopReason::StopRequested)) => {
                    self.status = "Stopped".to_string();
                }
                SessionEvent::Finished(Ok(StopReason::QuitSignal)) => {
                    self.status = "Stopped from preview window".to_string();
                }
                SessionEvent::Finished(Err(reason)) => self.status = reason.clone(),
            }
        }

        if events.iter().any(|e| matches!(e, SessionEvent::Finished(_))) {
            self.reap();
            self.phase = Phase::Idle;
        }

        events
    }

    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Stop any active session and wait for its thread to exit
    pub fn shutdown(&mut self) {
        self.stop();
        self.reap();
        self.phase = Phase::Idle;
    }

    fn reap(&mut self) {
        if let Some(active) = self.active.take() {
            if active.handle.join().is_err() {
                tracing::error!("Session thread panicked");
                self.status = "Session crashed".to_string();
            }
        }
    }
}

impl Drop for CloakController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn status_for(phase: Phase) -> String {
    match phase {
        Phase::Idle => "Ready to start".to_string(),
        Phase::Countdown { remaining } => format!("Capturing background in {remaining} seconds..."),
        Phase::WarmingUp => "Warming up camera...".to_string(),
        Phase::CapturingBackground => "Capturing background...".to_string(),
        Phase::Running => "Cloak active".to_string(),
        Phase::Stopped => "Stopped".to_string(),
    }
}
