//! Particle field: a pool of code-symbol glyphs drifting up the viewport.
//!
//! The pool has a fixed cardinality and is rebuilt from scratch on every
//! resize. In steady state sprites are recycled in place: once a sprite
//! climbs past the top margin it re-enters below the bottom edge with a new
//! column and glyph.

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::config::FieldConfig;
use crate::consts::{REFERENCE_FPS, SYMBOL_FONT_FAMILY};
use crate::schedule::clamp_dt;
use crate::surface::{Surface, SurfaceError};
use crate::theme::{Palette, PaletteCache, ThemeFlag};

/// One drifting glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Font size in CSS pixels.
    pub size: f64,
    /// Upward drift in pixels per 60 Hz frame.
    pub speed: f64,
    pub opacity: f64,
}

impl Sprite {
    /// CSS font shorthand for this sprite.
    #[must_use]
    pub fn font(&self) -> String {
        format!("{}px {SYMBOL_FONT_FAMILY}", self.size)
    }
}

/// Owns the sprite pool and paints it over a themed background.
pub struct ParticleField {
    config: FieldConfig,
    theme: ThemeFlag,
    palette: PaletteCache,
    rng: SmallRng,
    sprites: Vec<Sprite>,
    width: f64,
    height: f64,
    rebuilds: u64,
}

impl ParticleField {
    /// Create an empty field. Call [`Self::initialize`] once the viewport
    /// size is known.
    #[must_use]
    pub fn new(config: FieldConfig, theme: ThemeFlag, seed: u64) -> Self {
        Self {
            config,
            theme,
            palette: PaletteCache::default(),
            rng: SmallRng::seed_from_u64(seed),
            sprites: Vec::new(),
            width: 0.0,
            height: 0.0,
            rebuilds: 0,
        }
    }

    /// Rebuild the pool for a `width` x `height` viewport.
    ///
    /// A non-positive or non-finite dimension leaves the pool empty until the
    /// next valid resize.
    pub fn initialize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.rebuilds += 1;
        self.palette.invalidate();
        self.sprites.clear();

        if !viewport_is_drawable(width, height) {
            log::debug!("particle field: empty pool for {width}x{height} viewport");
            return;
        }

        let config = &self.config;
        let rng = &mut self.rng;
        self.sprites = (0..config.count)
            .map(|_| Sprite {
                x: rng.random::<f64>() * width,
                y: rng.random::<f64>() * height,
                text: random_symbol(rng, &config.symbols),
                size: config.font_size.at(rng.random()),
                speed: config.speed.at(rng.random()),
                opacity: config.opacity.at(rng.random()).clamp(0.0, 1.0),
            })
            .collect();
    }

    /// Viewport changed: discard the pool and rebuild it.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.initialize(width, height);
    }

    /// The host flipped the theme; colors are recomputed on the next draw.
    pub fn on_theme_change(&mut self) {
        self.palette.invalidate();
    }

    /// Advance every sprite by `dt_secs` and recycle the ones that left the
    /// top of the viewport.
    pub fn tick(&mut self, dt_secs: f64) {
        let frames = clamp_dt(dt_secs) * REFERENCE_FPS;
        let margin = self.config.wrap_margin;
        for sprite in &mut self.sprites {
            sprite.y -= sprite.speed * frames;
            if sprite.y < -margin {
                sprite.y = self.height + margin;
                sprite.x = self.rng.random::<f64>() * self.width;
                sprite.text = random_symbol(&mut self.rng, &self.config.symbols);
            }
        }
    }

    /// Paint the background and every sprite.
    ///
    /// # Errors
    ///
    /// Returns the first failing draw call; the frame is left partially drawn.
    pub fn draw(&mut self, surface: &mut impl Surface) -> Result<(), SurfaceError> {
        let palette = self.palette.resolve(&self.theme);
        surface.set_global_alpha(1.0)?;
        surface.fill_rect(0.0, 0.0, self.width, self.height, palette.background)?;

        for sprite in &self.sprites {
            surface.set_global_alpha(sprite.opacity)?;
            surface.fill_text(&sprite.text, sprite.x, sprite.y, &sprite.font(), palette.symbol)?;
        }
        surface.set_global_alpha(1.0)
    }

    // --- Queries ---

    #[must_use]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    #[must_use]
    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// How many times the pool has been rebuilt.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Palette the next draw will use.
    #[must_use]
    pub fn palette(&self) -> Palette {
        self.theme.get().palette()
    }

    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

fn viewport_is_drawable(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

fn random_symbol(rng: &mut SmallRng, symbols: &[String]) -> String {
    symbols.choose(rng).cloned().unwrap_or_default()
}
