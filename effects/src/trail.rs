//! Cursor trail: a head marker and a chain of spring-lagged trail points.
//!
//! Link 0 (the head) chases the raw pointer; link `i` chases link `i - 1`.
//! Damping grows along the chain, so each link lags further behind than the
//! one before it. Pointer input only records the target; all motion happens
//! in [`CursorTrail::tick`].
//!
//! Hover restyling is animated too. The head's drawn diameter and a 0..1
//! hover mix both ride the head size spring. The mix scales and recolors the
//! trail points and fades in the head ring.

#[cfg(test)]
#[path = "trail_test.rs"]
mod trail_test;

use crate::config::TrailConfig;
use crate::geom::Point;
use crate::schedule::clamp_dt;
use crate::spring::{Spring1, Spring2, SpringParams, substeps};
use crate::surface::{SOURCE_OVER, Surface, SurfaceError};

/// One spring in the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub spring: Spring2,
    pub params: SpringParams,
}

impl Link {
    #[must_use]
    pub fn position(&self) -> Point {
        self.spring.position
    }
}

/// Pointer-following trail state.
pub struct CursorTrail {
    config: TrailConfig,
    pointer: Point,
    links: Vec<Link>,
    hovering: bool,
    /// Drawn head diameter, hover scale included.
    head_diameter: Spring1,
    /// 0 when idle, 1 when fully restyled for hover.
    hover_mix: Spring1,
    width: f64,
    height: f64,
}

impl CursorTrail {
    /// Build a chain at the origin with the hover flag cleared.
    #[must_use]
    pub fn new(config: TrailConfig) -> Self {
        let links = (0..config.chain_len())
            .map(|i| Link { spring: Spring2::default(), params: config.link_params(i) })
            .collect();
        let head_diameter = Spring1::at(config.head.size);
        Self {
            config,
            pointer: Point::ORIGIN,
            links,
            hovering: false,
            head_diameter,
            hover_mix: Spring1::at(0.0),
            width: 0.0,
            height: 0.0,
        }
    }

    /// Overlay size, used to clear the previous frame.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Record a new raw pointer target. Motion happens on the next tick.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Point::new(x, y);
    }

    /// Set whether the pointer is over an interactive element.
    pub fn on_pointer_over_target(&mut self, is_interactive: bool) {
        self.hovering = is_interactive;
    }

    /// Integrate every link toward its target over `dt_secs`.
    pub fn tick(&mut self, dt_secs: f64) {
        let dt = clamp_dt(dt_secs);
        let (steps, h) = substeps(dt);
        for _ in 0..steps {
            let mut target = self.pointer;
            for link in &mut self.links {
                link.spring.substep(target, link.params, h);
                target = link.spring.position;
            }
        }
        let spring = self.config.head.size_spring;
        self.head_diameter.step(self.head_target_diameter(), spring, dt);
        self.hover_mix.step(if self.hovering { 1.0 } else { 0.0 }, spring, dt);
    }

    /// Clear the overlay, then draw trail points tail-first and the head on top.
    ///
    /// # Errors
    ///
    /// Returns the first failing draw call.
    pub fn draw(&self, surface: &mut impl Surface) -> Result<(), SurfaceError> {
        surface.clear_rect(0.0, 0.0, self.width, self.height)?;

        let mix = self.hover_mix.value;
        let size_factor = 1.0 + (self.config.hover_size_factor - 1.0) * mix;
        for (link, style) in self.links.iter().skip(1).zip(&self.config.points).rev() {
            let color = blend_color(&style.color, &self.config.hover_color, mix);
            surface.set_global_alpha(style.opacity.clamp(0.0, 1.0))?;
            surface.fill_circle(link.position(), (style.size * size_factor / 2.0).max(0.0), &color)?;
        }

        surface.set_global_alpha(1.0)?;
        if let Some(head) = self.links.first() {
            let head_style = &self.config.head;
            let radius = self.head_radius();
            surface.set_composite(&head_style.blend_mode)?;
            surface.fill_circle(head.position(), radius, &head_style.color)?;
            let ring_alpha = self.ring_alpha();
            if ring_alpha > 0.0 {
                let ring_radius = (radius - head_style.ring_width / 2.0).max(0.0);
                surface.set_global_alpha(ring_alpha)?;
                surface.stroke_circle(head.position(), ring_radius, head_style.ring_width, &head_style.color)?;
                surface.set_global_alpha(1.0)?;
            }
            surface.set_composite(SOURCE_OVER)?;
        }
        Ok(())
    }

    fn head_target_diameter(&self) -> f64 {
        let head = &self.config.head;
        if self.hovering { head.hover_size * head.hover_scale } else { head.size }
    }

    /// Ring opacity: present only while hovering, fading in with the mix.
    fn ring_alpha(&self) -> f64 {
        if self.hovering { self.hover_mix.value.clamp(0.0, 1.0) } else { 0.0 }
    }

    /// Drawn head radius.
    #[must_use]
    pub fn head_radius(&self) -> f64 {
        (self.head_diameter.value / 2.0).max(0.0)
    }

    // --- Queries ---

    #[must_use]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Link positions, head first.
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.links.iter().map(Link::position).collect()
    }

    /// Current (animated) drawn head diameter.
    #[must_use]
    pub fn head_diameter(&self) -> f64 {
        self.head_diameter.value
    }

    /// Current hover restyle progress; springs past 0..1 briefly.
    #[must_use]
    pub fn hover_mix(&self) -> f64 {
        self.hover_mix.value
    }
}

/// Mix two `#rrggbb` colors. Any other CSS color switches at the midpoint.
fn blend_color(from: &str, to: &str, t: f64) -> String {
    if t <= 0.0 {
        return from.to_owned();
    }
    if t >= 1.0 {
        return to.to_owned();
    }
    match (parse_hex(from), parse_hex(to)) {
        (Some(a), Some(b)) => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let mix = |i: usize| {
                let (a, b) = (f64::from(a[i]), f64::from(b[i]));
                (a + (b - a) * t).round() as u8
            };
            format!("#{:02x}{:02x}{:02x}", mix(0), mix(1), mix(2))
        }
        _ => (if t < 0.5 { from } else { to }).to_owned(),
    }
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let Ok(rgb) = u32::from_str_radix(hex, 16) else {
        return None;
    };
    let [_, r, g, b] = rgb.to_be_bytes();
    Some([r, g, b])
}
