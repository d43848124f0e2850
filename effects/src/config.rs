//! Tunable configuration for both engines.
//!
//! Every field has a default (see [`crate::consts`]), so a host can pass `{}`
//! or any subset of keys. Keys are camelCase to match the JavaScript side.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    FONT_SIZE_MIN_PX, FONT_SIZE_SPAN_PX, HEAD_BLEND_MODE, HEAD_COLOR, HEAD_HOVER_SCALE, HEAD_HOVER_SIZE_PX,
    HEAD_RING_WIDTH_PX, HEAD_SIZE_DAMPING, HEAD_SIZE_MASS, HEAD_SIZE_PX, HEAD_SIZE_STIFFNESS, MAX_SPRING_SUBSTEP_SECS,
    OPACITY_MIN, OPACITY_SPAN, PARTICLE_COUNT, SPEED_MIN, SPEED_SPAN, SYMBOLS, TRAIL_BASE_DAMPING, TRAIL_DAMPING_STEP, TRAIL_HOVER_COLOR, TRAIL_HOVER_SIZE_FACTOR,
    TRAIL_MASS, TRAIL_STIFFNESS, WRAP_MARGIN_PX,
};
use crate::spring::SpringParams;

/// Error returned by [`EffectsConfig::from_json`] and [`EffectsConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse effects config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid effects config: {field} {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsConfig {
    pub field: FieldConfig,
    pub trail: TrailConfig,
}

impl EffectsConfig {
    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field.validate()?;
        self.trail.validate()
    }
}

/// A uniform random range `[min, min + span)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RandomRange {
    pub min: f64,
    pub span: f64,
}

impl RandomRange {
    #[must_use]
    pub const fn new(min: f64, span: f64) -> Self {
        Self { min, span }
    }

    /// Map a unit sample in `[0, 1)` into the range.
    #[must_use]
    pub fn at(&self, unit: f64) -> f64 {
        self.min + unit * self.span
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.span.is_finite() {
            return Err(invalid(field, "must be finite"));
        }
        if self.min < 0.0 || self.span < 0.0 {
            return Err(invalid(field, "must be non-negative"));
        }
        Ok(())
    }
}

/// Particle field tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Sprite pool cardinality.
    pub count: usize,
    pub symbols: Vec<String>,
    pub wrap_margin: f64,
    pub font_size: RandomRange,
    /// Upward drift in pixels per 60 Hz frame.
    pub speed: RandomRange,
    /// Sampled values are clamped into `[0, 1]`.
    pub opacity: RandomRange,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            symbols: SYMBOLS.iter().map(|s| (*s).to_owned()).collect(),
            wrap_margin: WRAP_MARGIN_PX,
            font_size: RandomRange::new(FONT_SIZE_MIN_PX, FONT_SIZE_SPAN_PX),
            speed: RandomRange::new(SPEED_MIN, SPEED_SPAN),
            opacity: RandomRange::new(OPACITY_MIN, OPACITY_SPAN),
        }
    }
}

impl FieldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(invalid("field.symbols", "must not be empty"));
        }
        if !self.wrap_margin.is_finite() || self.wrap_margin < 0.0 {
            return Err(invalid("field.wrapMargin", "must be finite and non-negative"));
        }
        self.font_size.validate("field.fontSize")?;
        self.speed.validate("field.speed")?;
        self.opacity.validate("field.opacity")
    }
}

/// Appearance of one trail point behind the head.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrailPointStyle {
    /// Diameter in CSS pixels.
    pub size: f64,
    pub opacity: f64,
    pub color: String,
}

impl TrailPointStyle {
    fn new(size: f64, opacity: f64, color: &str) -> Self {
        Self { size, opacity, color: color.to_owned() }
    }
}

/// Appearance of the head marker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadStyle {
    pub size: f64,
    pub hover_size: f64,
    pub hover_scale: f64,
    pub color: String,
    pub ring_width: f64,
    /// Spring animating the drawn diameter and the hover restyle.
    pub size_spring: SpringParams,
    /// Canvas composite operation for the head only, e.g. `"difference"`.
    pub blend_mode: String,
}

impl Default for HeadStyle {
    fn default() -> Self {
        Self {
            size: HEAD_SIZE_PX,
            hover_size: HEAD_HOVER_SIZE_PX,
            hover_scale: HEAD_HOVER_SCALE,
            color: HEAD_COLOR.to_owned(),
            ring_width: HEAD_RING_WIDTH_PX,
            size_spring: SpringParams::new(HEAD_SIZE_STIFFNESS, HEAD_SIZE_DAMPING, HEAD_SIZE_MASS),
            blend_mode: HEAD_BLEND_MODE.to_owned(),
        }
    }
}

/// Cursor trail tuning. The chain has `points.len() + 1` links; link 0 is
/// the head.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrailConfig {
    pub stiffness: f64,
    pub mass: f64,
    /// Damping of the head link.
    pub base_damping: f64,
    /// Extra damping added per link along the chain.
    pub damping_step: f64,
    pub head: HeadStyle,
    /// Trail points ordered from nearest the head to the tail.
    pub points: Vec<TrailPointStyle>,
    pub hover_color: String,
    pub hover_size_factor: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            stiffness: TRAIL_STIFFNESS,
            mass: TRAIL_MASS,
            base_damping: TRAIL_BASE_DAMPING,
            damping_step: TRAIL_DAMPING_STEP,
            head: HeadStyle::default(),
            points: vec![
                TrailPointStyle::new(12.0, 0.7, "#0891b2"),
                TrailPointStyle::new(10.0, 0.6, "#2563eb"),
                TrailPointStyle::new(8.0, 0.5, "#7c3aed"),
                TrailPointStyle::new(6.0, 0.4, "#9333ea"),
            ],
            hover_color: TRAIL_HOVER_COLOR.to_owned(),
            hover_size_factor: TRAIL_HOVER_SIZE_FACTOR,
        }
    }
}

impl TrailConfig {
    /// Number of springs in the chain, head included.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.points.len() + 1
    }

    /// Spring parameters for link `index`; damping grows along the chain.
    #[must_use]
    pub fn link_params(&self, index: usize) -> SpringParams {
        #[allow(clippy::cast_precision_loss)]
        let damping = self.base_damping + self.damping_step * index as f64;
        SpringParams::new(self.stiffness, damping, self.mass)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(invalid("trail.stiffness", "must be positive"));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(invalid("trail.mass", "must be positive"));
        }
        if !(self.base_damping.is_finite() && self.base_damping >= 0.0) {
            return Err(invalid("trail.baseDamping", "must be non-negative"));
        }
        if !(self.damping_step.is_finite() && self.damping_step >= 0.0) {
            return Err(invalid("trail.dampingStep", "must be non-negative"));
        }
        if !(0..self.chain_len()).all(|i| self.link_params(i).is_stable_at(MAX_SPRING_SUBSTEP_SECS)) {
            return Err(invalid("trail", "link springs do not settle at the 1/120 s step"));
        }
        let spring = self.head.size_spring;
        if !(spring.stiffness > 0.0 && spring.mass > 0.0 && spring.damping >= 0.0) {
            return Err(invalid("trail.head.sizeSpring", "needs positive stiffness and mass"));
        }
        if !spring.is_stable_at(MAX_SPRING_SUBSTEP_SECS) {
            return Err(invalid("trail.head.sizeSpring", "does not settle at the 1/120 s step"));
        }
        if self.points.iter().any(|p| !(p.size.is_finite() && p.size >= 0.0)) {
            return Err(invalid("trail.points", "sizes must be non-negative"));
        }
        Ok(())
    }
}
