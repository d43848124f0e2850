//! Light/dark theme selection and the palettes each engine paints with.
//!
//! The host owns the current theme and hands a [`ThemeFlag`] to each engine at
//! construction. Engines only read the flag; the host flips it when the page's
//! mode changes and then notifies the engine.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::cell::Cell;
use std::rc::Rc;

/// Which page mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Map a "dark mode is on" boolean to a theme.
    #[must_use]
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette::DARK,
            Self::Light => Palette::LIGHT,
        }
    }
}

/// Colors used by the particle field backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub symbol: &'static str,
    pub highlight: &'static str,
}

impl Palette {
    pub const DARK: Self = Self { background: "#020617", symbol: "#334155", highlight: "#0f172a" };
    pub const LIGHT: Self = Self { background: "#f8fafc", symbol: "#e2e8f0", highlight: "#f1f5f9" };
}

/// Shared, host-owned theme state.
///
/// Cloning yields another handle to the same cell.
#[derive(Debug, Clone, Default)]
pub struct ThemeFlag(Rc<Cell<Theme>>);

impl ThemeFlag {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self(Rc::new(Cell::new(theme)))
    }

    #[must_use]
    pub fn get(&self) -> Theme {
        self.0.get()
    }

    pub fn set(&self, theme: Theme) {
        self.0.set(theme);
    }
}

/// Palette cache that engines invalidate on theme-change notifications.
#[derive(Debug, Default)]
pub(crate) struct PaletteCache {
    cached: Option<(Theme, Palette)>,
}

impl PaletteCache {
    /// Current palette for `flag`, recomputed when invalidated or stale.
    pub(crate) fn resolve(&mut self, flag: &ThemeFlag) -> Palette {
        let theme = flag.get();
        match self.cached {
            Some((cached_theme, palette)) if cached_theme == theme => palette,
            _ => {
                let palette = theme.palette();
                self.cached = Some((theme, palette));
                palette
            }
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.cached = None;
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}
