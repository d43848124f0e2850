//! Shared numeric and style constants for the effects crate.
//!
//! These are the visual tuning defaults. Everything here can be overridden
//! through [`crate::config::EffectsConfig`].

// ── Frame timing ────────────────────────────────────────────────

/// Reference frame rate that per-frame speeds are expressed against.
pub const REFERENCE_FPS: f64 = 60.0;

/// Upper bound on a single tick's elapsed time (seconds). Longer gaps
/// (background tabs, debugger pauses) are treated as one slow frame.
pub const MAX_TICK_SECS: f64 = 1.0 / 15.0;

/// Largest integration sub-step for spring updates (seconds).
pub const MAX_SPRING_SUBSTEP_SECS: f64 = 1.0 / 120.0;

// ── Particle field ──────────────────────────────────────────────

/// Default sprite pool cardinality.
pub const PARTICLE_COUNT: usize = 25;

/// Distance past the top edge before a sprite is recycled, and below the
/// bottom edge where it re-enters.
pub const WRAP_MARGIN_PX: f64 = 50.0;

/// Code-punctuation glyphs drawn by the field.
pub const SYMBOLS: &[&str] = &["{ }", "< />", "&&", "||", "=>", ";;", "[]", "$", "!=", "01"];

/// Font family used for every glyph.
pub const SYMBOL_FONT_FAMILY: &str = "\"JetBrains Mono\", monospace";

pub const FONT_SIZE_MIN_PX: f64 = 14.0;
pub const FONT_SIZE_SPAN_PX: f64 = 20.0;

/// Upward drift in pixels per reference frame.
pub const SPEED_MIN: f64 = 0.1;
pub const SPEED_SPAN: f64 = 0.5;

pub const OPACITY_MIN: f64 = 0.1;
pub const OPACITY_SPAN: f64 = 0.5;

// ── Cursor trail ────────────────────────────────────────────────

pub const TRAIL_STIFFNESS: f64 = 300.0;
pub const TRAIL_MASS: f64 = 0.5;

/// Damping of the head link; each following link adds [`TRAIL_DAMPING_STEP`].
pub const TRAIL_BASE_DAMPING: f64 = 25.0;
pub const TRAIL_DAMPING_STEP: f64 = 5.0;

/// Head marker diameter in CSS pixels.
pub const HEAD_SIZE_PX: f64 = 16.0;
pub const HEAD_HOVER_SIZE_PX: f64 = 24.0;
pub const HEAD_HOVER_SCALE: f64 = 0.8;
pub const HEAD_COLOR: &str = "#ffffff";
pub const HEAD_RING_WIDTH_PX: f64 = 2.0;
/// The head inverts whatever is under it; trail points blend normally.
pub const HEAD_BLEND_MODE: &str = "difference";

/// Spring driving the head marker's diameter.
pub const HEAD_SIZE_STIFFNESS: f64 = 500.0;
pub const HEAD_SIZE_DAMPING: f64 = 25.0;
pub const HEAD_SIZE_MASS: f64 = 1.0;

/// Trail point diameter multiplier while hovering an interactive target.
pub const TRAIL_HOVER_SIZE_FACTOR: f64 = 1.5;
pub const TRAIL_HOVER_COLOR: &str = "#22d3ee";
