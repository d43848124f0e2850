//! Damped spring integration.
//!
//! Each spring follows `a = (-k·(x - target) - c·v) / m`, integrated with
//! semi-implicit Euler. A tick is split into sub-steps no longer than
//! [`MAX_SPRING_SUBSTEP_SECS`] so stiff springs stay stable at low frame rates.

#[cfg(test)]
#[path = "spring_test.rs"]
mod spring_test;

use serde::Deserialize;

use crate::consts::MAX_SPRING_SUBSTEP_SECS;
use crate::geom::Point;
use crate::schedule::clamp_dt;

/// Stiffness / damping / mass triple for one spring.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl SpringParams {
    #[must_use]
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self { stiffness, damping, mass }
    }

    /// Whether semi-implicit Euler steps of `h` seconds settle on the target
    /// instead of ringing forever or diverging.
    ///
    /// The step matrix has determinant `1 - h·c/m` and trace
    /// `2 - h·c/m - h²·k/m`; both eigenvalues lie inside the unit circle
    /// exactly when `c > 0` and `2·h·c/m + h²·k/m < 4`.
    #[must_use]
    pub fn is_stable_at(&self, h: f64) -> bool {
        let k = self.stiffness / self.mass;
        let c = self.damping / self.mass;
        k > 0.0 && c > 0.0 && 2.0 * h * c + h * h * k < 4.0
    }

    fn accel(&self, displacement: f64, velocity: f64) -> f64 {
        (-self.stiffness * displacement - self.damping * velocity) / self.mass
    }
}

/// Split `dt` into equal sub-steps no longer than the stability limit.
/// At most [`MAX_TICK_SECS`](crate::consts::MAX_TICK_SECS) is integrated per call.
pub(crate) fn substeps(dt: f64) -> (u32, f64) {
    let dt = clamp_dt(dt);
    if dt <= 0.0 {
        return (0, 0.0);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (dt / MAX_SPRING_SUBSTEP_SECS).ceil().max(1.0) as u32;
    (n, dt / f64::from(n))
}

/// Scalar spring state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spring1 {
    pub value: f64,
    pub velocity: f64,
}

impl Spring1 {
    #[must_use]
    pub fn at(value: f64) -> Self {
        Self { value, velocity: 0.0 }
    }

    /// Advance by `dt` seconds toward `target`.
    pub fn step(&mut self, target: f64, params: SpringParams, dt: f64) {
        let (n, h) = substeps(dt);
        for _ in 0..n {
            self.substep(target, params, h);
        }
    }

    fn substep(&mut self, target: f64, params: SpringParams, h: f64) {
        self.velocity += params.accel(self.value - target, self.velocity) * h;
        self.value += self.velocity * h;
    }
}

/// Two-dimensional spring state: a position chasing a moving target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spring2 {
    pub position: Point,
    pub velocity: Point,
}

impl Spring2 {
    /// One integration step of exactly `h` seconds. The trail drives this
    /// link by link inside each sub-step.
    pub(crate) fn substep(&mut self, target: Point, params: SpringParams, h: f64) {
        let offset = self.position.sub(target);
        self.velocity.x += params.accel(offset.x, self.velocity.x) * h;
        self.velocity.y += params.accel(offset.y, self.velocity.y) * h;
        self.position = self.position.add(self.velocity.scale(h));
    }
}
