//! Redraw scheduling: a start/stop controller over a host frame scheduler.
//!
//! The host provides a [`FrameScheduler`] (in the browser,
//! `requestAnimationFrame` / `cancelAnimationFrame`). [`FrameLoop`] owns the
//! pending handle so that stopping always cancels the outstanding request and
//! no callback runs after the owning view is gone.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use crate::consts::MAX_TICK_SECS;

/// Opaque id for one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Host-side per-frame callback scheduling.
pub trait FrameScheduler {
    /// Ask for one callback on the next redraw opportunity. `None` means the
    /// host could not schedule it.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a request that has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Start/stop state of a perpetual redraw loop.
#[derive(Debug, Default)]
pub struct FrameLoop {
    running: bool,
    pending: Option<FrameHandle>,
    last_timestamp_ms: Option<f64>,
}

impl FrameLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Handle of the request currently outstanding, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Begin the loop by requesting the first frame. No-op while running.
    pub fn start(&mut self, sched: &mut impl FrameScheduler) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_timestamp_ms = None;
        self.pending = sched.request_frame();
        if self.pending.is_none() {
            log::debug!("frame loop: host refused the first frame request");
        }
    }

    /// A scheduled frame fired at `timestamp_ms`.
    ///
    /// Returns the elapsed seconds since the previous frame (0 on the first)
    /// and requests the next frame, or `None` if the loop has been stopped.
    pub fn on_frame(&mut self, sched: &mut impl FrameScheduler, timestamp_ms: f64) -> Option<f64> {
        self.pending = None;
        if !self.running {
            return None;
        }

        let dt_secs = self
            .last_timestamp_ms
            .map_or(0.0, |prev| ((timestamp_ms - prev) / 1000.0).max(0.0));
        self.last_timestamp_ms = Some(timestamp_ms);
        self.pending = sched.request_frame();
        Some(dt_secs)
    }

    /// Stop the loop and cancel any outstanding request. Idempotent.
    pub fn stop(&mut self, sched: &mut impl FrameScheduler) {
        self.running = false;
        self.last_timestamp_ms = None;
        if let Some(handle) = self.pending.take() {
            sched.cancel_frame(handle);
        }
    }
}

/// Clamp a frame delta into `[0, MAX_TICK_SECS]`; non-finite deltas count as 0.
#[must_use]
pub fn clamp_dt(dt_secs: f64) -> f64 {
    if dt_secs.is_finite() { dt_secs.clamp(0.0, MAX_TICK_SECS) } else { 0.0 }
}

/// A scheduler that only counts requests and cancellations.
///
/// Useful for headless hosts that drive frames by hand, and for asserting
/// that a stopped loop stays stopped.
#[derive(Debug, Default)]
pub struct CountingScheduler {
    pub requests: u32,
    pub cancels: Vec<FrameHandle>,
    next_id: i32,
}

impl CountingScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.requests += 1;
        self.next_id += 1;
        Some(FrameHandle(self.next_id))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancels.push(handle);
    }
}
