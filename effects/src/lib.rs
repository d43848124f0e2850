//! Decorative canvas effects for the portfolio page: a drifting code-symbol
//! backdrop and a spring-chained cursor trail.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but the
//! engines themselves never touch the DOM. They take viewport, pointer and
//! theme notifications through plain method calls, paint through the
//! [`surface::Surface`] trait, and ask for redraws through
//! [`schedule::FrameScheduler`]. The [`web`] module is the only place that
//! wires those ports to `window`, `requestAnimationFrame` and a real canvas.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::BackgroundEngine`] and [`engine::CursorEngine`]: state plus redraw loop |
//! | [`field`] | Particle field sprite pool |
//! | [`trail`] | Cursor trail spring chain |
//! | [`spring`] | Damped spring integration |
//! | [`hover`] | Interactive-element detection for the hover state |
//! | [`schedule`] | Start/stop frame loop over a host scheduler |
//! | [`theme`] | Light/dark theme flag and palettes |
//! | [`surface`] | Drawing trait plus a recording implementation |
//! | [`canvas2d`] | `Surface` for the browser 2D context |
//! | [`config`] | Serde-loaded tuning with defaults |
//! | [`web`] | wasm-bindgen mount points |
//! | [`consts`] | Default tuning constants |

pub mod canvas2d;
pub mod config;
pub mod consts;
pub mod engine;
pub mod field;
pub mod geom;
pub mod hover;
pub mod schedule;
pub mod spring;
pub mod surface;
pub mod theme;
pub mod trail;
pub mod web;
