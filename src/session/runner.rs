use super::{Phase, SessionEvent, StopHandle, StopReason};
use crate::capture::CaptureSource;
use crate::color::{resolve, ColorProfile};
use crate::composite::compose;
use crate::config::SessionConfig;
use crate::error::CloakError;
use crate::mask::build_mask;
use crate::output::{DisplaySink, FrameViews, SinkControl};
use image::RgbImage;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

/// How often an interruptible wait re-checks the stop flag
const STOP_POLL: Duration = Duration::from_millis(100);

/// Running averages of the per-frame stages
#[derive(Default)]
struct FrameStats {
    frames: u64,
    capture: Duration,
    mask: Duration,
    composite: Duration,
    display: Duration,
}

impl FrameStats {
    fn log(&self) {
        let per_frame = |total: Duration| total.as_secs_f64() * 1000.0 / self.frames as f64;
        let capture_ms = per_frame(self.capture);
        let mask_ms = per_frame(self.mask);
        let composite_ms = per_frame(self.composite);
        let display_ms = per_frame(self.display);
        let total_ms = capture_ms + mask_ms + composite_ms + display_ms;

        tracing::info!(
            "Frame {}: capture={:.1}ms, mask={:.1}ms, composite={:.1}ms, display={:.1}ms, fps={:.1}",
            self.frames,
            capture_ms,
            mask_ms,
            composite_ms,
            display_ms,
            1000.0 / total_ms
        );
    }
}

/// One cloaking session, from countdown to teardown.
///
/// The camera is opened inside [`Session::run`] and owned there, so it is
/// released exactly once on every exit path.
pub struct Session {
    config: SessionConfig,
    color: String,
    stop: StopHandle,
    events: Option<Sender<SessionEvent>>,
    phase: Phase,
}

impl Session {
    pub fn new(config: SessionConfig, color: impl Into<String>, stop: StopHandle) -> Self {
        Self {
            config,
            color: color.into(),
            stop,
            events: None,
            phase: Phase::Idle,
        }
    }

    /// Report phase changes and notices on `events`
    pub fn with_events(mut self, events: Sender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Drive the session until it stops.
    ///
    /// `open_camera` is called once the countdown has elapsed. The session
    /// always ends in [`Phase::Stopped`] followed by a `Finished` event.
    pub fn run<C, F, D>(&mut self, open_camera: F, display: &mut D) -> Result<StopReason, CloakError>
    where
        C: CaptureSource,
        F: FnOnce(&SessionConfig) -> Result<C, CloakError>,
        D: DisplaySink + ?Sized,
    {
        let outcome = self.drive(open_camera, display);
        self.enter(Phase::Stopped);

        match &outcome {
            Ok(reason) => tracing::info!("Session ended: {:?}", reason),
            Err(err) => tracing::error!("Session aborted: {}", err),
        }
        self.emit(SessionEvent::Finished(
            outcome.as_ref().copied().map_err(|e| e.to_string()),
        ));

        outcome
    }

    fn drive<C, F, D>(&mut self, open_camera: F, display: &mut D) -> Result<StopReason, CloakError>
    where
        C: CaptureSource,
        F: FnOnce(&SessionConfig) -> Result<C, CloakError>,
        D: DisplaySink + ?Sized,
    {
        tracing::info!("Using {} as the invisibility cloak color", self.color);

        if !self.countdown() {
            return Ok(StopReason::StopRequested);
        }

        let mut camera = open_camera(&self.config)?;
        let (width, height) = camera.resolution();
        tracing::info!("Camera open, delivering {}x{}", width, height);

        self.enter(Phase::WarmingUp);
        self.notice("Capturing background... Please move out of the frame.");
        for _ in 0..self.config.warmup_frames {
            if self.stop.is_stop_requested() {
                return Ok(StopReason::StopRequested);
            }
            self.read(&mut camera)?;
        }
        if self.stop.is_stop_requested() {
            return Ok(StopReason::StopRequested);
        }

        self.enter(Phase::CapturingBackground);
        let background = self.read(&mut camera)?;
        let (width, height) = background.dimensions();
        self.notice(format!("Background captured successfully ({width}x{height})"));
        if self.stop.is_stop_requested() {
            return Ok(StopReason::StopRequested);
        }

        let resolved = resolve(&self.color);
        if let Some(name) = &resolved.fallback_from {
            self.notice(format!("Color {name:?} not supported. Using default red color."));
        }
        let profile = resolved.profile;

        self.enter(Phase::Running);
        self.notice(format!(
            "Put on your {} cloak and step back into the frame.",
            profile.color
        ));

        self.process(&mut camera, &background, &profile, display)
    }

    /// Per-frame loop: read, mask, composite, display
    fn process<C, D>(
        &mut self,
        camera: &mut C,
        background: &RgbImage,
        profile: &ColorProfile,
        display: &mut D,
    ) -> Result<StopReason, CloakError>
    where
        C: CaptureSource,
        D: DisplaySink + ?Sized,
    {
        let mut stats = FrameStats::default();

        loop {
            if self.stop.is_stop_requested() {
                return Ok(StopReason::StopRequested);
            }

            let capture_start = Instant::now();
            let frame = self.read(camera)?;
            if frame.dimensions() != background.dimensions() {
                return Err(CloakError::FrameSizeChanged {
                    expected: background.dimensions(),
                    actual: frame.dimensions(),
                });
            }
            stats.capture += capture_start.elapsed();

            let mask_start = Instant::now();
            let mask = build_mask(&frame, profile);
            stats.mask += mask_start.elapsed();

            let composite_start = Instant::now();
            let composite = compose(&frame, background, &mask)?;
            stats.composite += composite_start.elapsed();

            let display_start = Instant::now();
            let control = display
                .show(&FrameViews {
                    original: &frame,
                    mask: &mask,
                    composite: &composite,
                })
                .map_err(|e| CloakError::Display(format!("{e:#}")))?;
            stats.display += display_start.elapsed();

            stats.frames += 1;
            if self.config.stats_interval > 0 && stats.frames % self.config.stats_interval == 0 {
                stats.log();
            }

            if control == SinkControl::Quit {
                return Ok(StopReason::QuitSignal);
            }
        }
    }

    /// Count down, returning false if a stop arrived first
    fn countdown(&mut self) -> bool {
        for remaining in (1..=self.config.countdown_secs).rev() {
            self.enter(Phase::Countdown { remaining });
            if !self.wait(Duration::from_secs(1)) {
                return false;
            }
        }
        !self.stop.is_stop_requested()
    }

    /// Sleep for `total`, waking early (and returning false) on stop
    fn wait(&self, total: Duration) -> bool {
        let deadline = Instant::now() + total;
        loop {
            if self.stop.is_stop_requested() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(STOP_POLL.min(deadline - now));
        }
    }

    fn read<C: CaptureSource>(&self, camera: &mut C) -> Result<RgbImage, CloakError> {
        camera.capture_frame().map_err(|e| CloakError::ReadFailure {
            phase: self.phase,
            reason: format!("{e:#}"),
        })
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        tracing::info!("Session {}", phase);
        self.emit(SessionEvent::Phase(phase));
    }

    fn notice(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.emit(SessionEvent::Notice(message));
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            if let Err(error) = events.send(event) {
                tracing::debug!("Session event dropped, receiver gone: {}", error);
            }
        }
    }
}
