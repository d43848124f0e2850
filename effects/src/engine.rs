use crate::config::{FieldConfig, TrailConfig};
use crate::field::ParticleField;
use crate::schedule::{FrameLoop, FrameScheduler};
use crate::surface::{Surface, SurfaceError};
use crate::theme::ThemeFlag;
use crate::trail::CursorTrail;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// What happened on one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// State advanced and the surface was painted.
    Drawn,
    /// State advanced but painting failed; the frame was dropped.
    Skipped(SurfaceError),
    /// The loop is stopped; nothing ran.
    Stopped,
}

fn absorb(engine: &str, result: Result<(), SurfaceError>) -> FrameOutcome {
    match result {
        Ok(()) => FrameOutcome::Drawn,
        Err(err) => {
            log::debug!("{engine}: skipping frame: {err}");
            FrameOutcome::Skipped(err)
        }
    }
}

// =============================================================
// Background
// =============================================================

/// Particle field backdrop plus its redraw loop.
///
/// All host notifications arrive through the `on_*` ports; the host calls
/// [`Self::frame`] from its redraw callback.
pub struct BackgroundEngine {
    pub field: ParticleField,
    frames: FrameLoop,
}

impl BackgroundEngine {
    #[must_use]
    pub fn new(config: FieldConfig, theme: ThemeFlag, seed: u64) -> Self {
        Self { field: ParticleField::new(config, theme, seed), frames: FrameLoop::new() }
    }

    /// Build the pool for the initial viewport and request the first frame.
    pub fn start(&mut self, sched: &mut impl FrameScheduler, width: f64, height: f64) {
        self.field.initialize(width, height);
        self.frames.start(sched);
        log::info!("background: started at {width}x{height}");
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.field.on_resize(width, height);
    }

    pub fn on_theme_change(&mut self) {
        self.field.on_theme_change();
    }

    /// Advance by `dt_secs` and paint. Draw failures are logged and absorbed.
    pub fn tick(&mut self, surface: &mut impl Surface, dt_secs: f64) -> FrameOutcome {
        self.field.tick(dt_secs);
        absorb("background", self.field.draw(surface))
    }

    /// Scheduled redraw at `timestamp_ms`.
    pub fn frame(
        &mut self,
        surface: &mut impl Surface,
        sched: &mut impl FrameScheduler,
        timestamp_ms: f64,
    ) -> FrameOutcome {
        match self.frames.on_frame(sched, timestamp_ms) {
            Some(dt) => self.tick(surface, dt),
            None => FrameOutcome::Stopped,
        }
    }

    /// Scheduled redraw with no surface available: keep the loop alive and
    /// leave the state untouched.
    pub fn skip_frame(&mut self, sched: &mut impl FrameScheduler, timestamp_ms: f64) -> FrameOutcome {
        match self.frames.on_frame(sched, timestamp_ms) {
            Some(_) => {
                log::debug!("background: no surface, skipping frame");
                FrameOutcome::Skipped(SurfaceError::Unavailable)
            }
            None => FrameOutcome::Stopped,
        }
    }

    /// Stop redrawing. Idempotent.
    pub fn shutdown(&mut self, sched: &mut impl FrameScheduler) {
        if self.frames.is_running() {
            log::info!("background: shutdown");
        }
        self.frames.stop(sched);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }
}

// =============================================================
// Cursor
// =============================================================

/// Cursor trail overlay plus its redraw loop.
pub struct CursorEngine {
    pub trail: CursorTrail,
    frames: FrameLoop,
}

impl CursorEngine {
    #[must_use]
    pub fn new(config: TrailConfig) -> Self {
        Self { trail: CursorTrail::new(config), frames: FrameLoop::new() }
    }

    pub fn start(&mut self, sched: &mut impl FrameScheduler, width: f64, height: f64) {
        self.trail.on_resize(width, height);
        self.frames.start(sched);
        log::info!("cursor: started at {width}x{height}");
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.trail.on_resize(width, height);
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.trail.on_pointer_move(x, y);
    }

    pub fn on_pointer_over_target(&mut self, is_interactive: bool) {
        self.trail.on_pointer_over_target(is_interactive);
    }

    /// Advance the spring chain by `dt_secs` and paint. Draw failures are
    /// logged and absorbed.
    pub fn tick(&mut self, surface: &mut impl Surface, dt_secs: f64) -> FrameOutcome {
        self.trail.tick(dt_secs);
        absorb("cursor", self.trail.draw(surface))
    }

    pub fn frame(
        &mut self,
        surface: &mut impl Surface,
        sched: &mut impl FrameScheduler,
        timestamp_ms: f64,
    ) -> FrameOutcome {
        match self.frames.on_frame(sched, timestamp_ms) {
            Some(dt) => self.tick(surface, dt),
            None => FrameOutcome::Stopped,
        }
    }

    pub fn skip_frame(&mut self, sched: &mut impl FrameScheduler, timestamp_ms: f64) -> FrameOutcome {
        match self.frames.on_frame(sched, timestamp_ms) {
            Some(_) => {
                log::debug!("cursor: no surface, skipping frame");
                FrameOutcome::Skipped(SurfaceError::Unavailable)
            }
            None => FrameOutcome::Stopped,
        }
    }

    /// Stop redrawing. Idempotent.
    pub fn shutdown(&mut self, sched: &mut impl FrameScheduler) {
        if self.frames.is_running() {
            log::info!("cursor: shutdown");
        }
        self.frames.stop(sched);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }
}
