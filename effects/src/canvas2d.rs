//! [`Surface`] for the browser's `CanvasRenderingContext2d`.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. Fallible canvas calls surface their
//! JavaScript exception as [`SurfaceError::Draw`].

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::geom::Point;
use crate::surface::{Surface, SurfaceError};

fn js_err(err: JsValue) -> SurfaceError {
    SurfaceError::Draw(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl Surface for CanvasRenderingContext2d {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) -> Result<(), SurfaceError> {
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) -> Result<(), SurfaceError> {
        self.set_font(font);
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill_text(self, text, x, y).map_err(js_err)
    }

    fn set_global_alpha(&mut self, alpha: f64) -> Result<(), SurfaceError> {
        CanvasRenderingContext2d::set_global_alpha(self, alpha);
        Ok(())
    }

    fn set_composite(&mut self, op: &str) -> Result<(), SurfaceError> {
        self.set_global_composite_operation(op).map_err(js_err)
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<(), SurfaceError> {
        self.begin_path();
        self.arc(center.x, center.y, radius, 0.0, 2.0 * PI).map_err(js_err)?;
        self.set_fill_style_str(color);
        self.fill();
        Ok(())
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, line_width: f64, color: &str) -> Result<(), SurfaceError> {
        self.begin_path();
        self.arc(center.x, center.y, radius, 0.0, 2.0 * PI).map_err(js_err)?;
        self.set_line_width(line_width);
        self.set_stroke_style_str(color);
        self.stroke();
        Ok(())
    }
}
