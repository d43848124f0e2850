//! The 2D raster surface both engines paint onto.
//!
//! [`Surface`] is the narrow set of drawing calls the engines need. The browser
//! implementation lives in [`crate::canvas2d`]; [`RecordingSurface`] records
//! calls instead of drawing them, for headless hosts and tests.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::geom::Point;

/// A drawing call failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The underlying context rejected the call.
    #[error("draw call failed: {0}")]
    Draw(String),
    /// No surface is attached (e.g. the canvas was detached).
    #[error("no drawing surface available")]
    Unavailable,
}

/// Minimal 2D raster drawing interface.
///
/// Colors are CSS color strings. Coordinates are CSS pixels.
pub trait Surface {
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the call.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) -> Result<(), SurfaceError>;

    /// Reset the given region to fully transparent.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the call.
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the call.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) -> Result<(), SurfaceError>;

    /// Set the alpha applied to every subsequent draw call.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the call.
    fn set_global_alpha(&mut self, alpha: f64) -> Result<(), SurfaceError>;

    /// Set the compositing mode for subsequent draws (`"source-over"`,
    /// `"difference"`, ...).
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the call.
    fn set_composite(&mut self, op: &str) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the call.
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<(), SurfaceError>;

    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the call.
    fn stroke_circle(&mut self, center: Point, radius: f64, line_width: f64, color: &str) -> Result<(), SurfaceError>;
}

/// One recorded drawing call. Alpha is the global alpha in effect at the time.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { x: f64, y: f64, w: f64, h: f64, color: String },
    ClearRect { x: f64, y: f64, w: f64, h: f64 },
    FillText { text: String, x: f64, y: f64, font: String, color: String, alpha: f64 },
    FillCircle { center: Point, radius: f64, color: String, alpha: f64 },
    StrokeCircle { center: Point, radius: f64, line_width: f64, color: String, alpha: f64 },
    Composite { op: String },
}

/// The canvas default compositing mode.
pub const SOURCE_OVER: &str = "source-over";

/// A [`Surface`] that records draw calls instead of rasterizing them.
#[derive(Debug)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    alpha: f64,
    composite: String,
    failing: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self { ops: Vec::new(), alpha: 1.0, composite: SOURCE_OVER.to_owned(), failing: false }
    }
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    /// Global alpha currently in effect.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Compositing mode currently in effect.
    #[must_use]
    pub fn composite(&self) -> &str {
        &self.composite
    }

    /// Drop recorded ops, keeping alpha and composite state.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Recorded text draws, in order.
    pub fn texts(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::FillText { .. }))
    }

    /// Recorded filled circles, in order.
    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::FillCircle { .. }))
    }

    fn record(&mut self, op: DrawOp) -> Result<(), SurfaceError> {
        if self.failing {
            return Err(SurfaceError::Draw("recording surface set to fail".into()));
        }
        self.ops.push(op);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) -> Result<(), SurfaceError> {
        self.record(DrawOp::FillRect { x, y, w, h, color: color.to_owned() })
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), SurfaceError> {
        self.record(DrawOp::ClearRect { x, y, w, h })
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) -> Result<(), SurfaceError> {
        let alpha = self.alpha;
        self.record(DrawOp::FillText {
            text: text.to_owned(),
            x,
            y,
            font: font.to_owned(),
            color: color.to_owned(),
            alpha,
        })
    }

    fn set_global_alpha(&mut self, alpha: f64) -> Result<(), SurfaceError> {
        if self.failing {
            return Err(SurfaceError::Draw("recording surface set to fail".into()));
        }
        self.alpha = alpha;
        Ok(())
    }

    fn set_composite(&mut self, op: &str) -> Result<(), SurfaceError> {
        self.record(DrawOp::Composite { op: op.to_owned() })?;
        op.clone_into(&mut self.composite);
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<(), SurfaceError> {
        let alpha = self.alpha;
        self.record(DrawOp::FillCircle { center, radius, color: color.to_owned(), alpha })
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, line_width: f64, color: &str) -> Result<(), SurfaceError> {
        let alpha = self.alpha;
        self.record(DrawOp::StrokeCircle { center, radius, line_width, color: color.to_owned(), alpha })
    }
}
