//! Browser host: mounts the engines on `<canvas>` elements and wires DOM
//! events into their ports.
//!
//! ARCHITECTURE
//! ============
//! Each mount owns its engine behind `Rc<RefCell<_>>`. DOM closures hold only
//! a `Weak` so dropping the handle tears everything down. The
//! `requestAnimationFrame` closure lives in a shared slot that the
//! [`RafScheduler`] reads whenever the frame loop asks for the next frame;
//! shutdown cancels the pending request and then empties the slot.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement, MouseEvent, MutationObserver,
    MutationObserverInit, MutationRecord, Window,
};

use crate::config::EffectsConfig;
use crate::engine::{BackgroundEngine, CursorEngine};
use crate::hover::{ElementInfo, is_interactive};
use crate::schedule::{FrameHandle, FrameScheduler};
use crate::theme::{Theme, ThemeFlag};

/// Error returned when an engine cannot be mounted.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for MountError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Install the console logger and panic hook.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A host that already installed a logger keeps its own.
    console_log::init_with_level(log::Level::Info).unwrap_or_default();
}

// =============================================================
// Shared plumbing
// =============================================================

type FrameCallback = Closure<dyn FnMut(f64)>;
type FrameSlot = Rc<RefCell<Option<FrameCallback>>>;
type Listener = Closure<dyn FnMut(Event)>;

/// [`FrameScheduler`] backed by `requestAnimationFrame`.
struct RafScheduler {
    window: Window,
    callback: FrameSlot,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let slot = self.callback.borrow();
        let callback = slot.as_ref()?;
        match self.window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => Some(FrameHandle(id)),
            Err(err) => {
                log::debug!("requestAnimationFrame failed: {err:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0) {
            log::debug!("cancelAnimationFrame failed: {err:?}");
        }
    }
}

fn window() -> Result<Window, MountError> {
    web_sys::window().ok_or(MountError::NoWindow)
}

fn document(window: &Window) -> Result<Document, MountError> {
    window.document().ok_or(MountError::NoDocument)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, MountError> {
    canvas
        .get_context("2d")?
        .ok_or(MountError::NoContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| MountError::NoContext)
}

/// Window inner size in CSS pixels; 0 when unavailable.
fn viewport(window: &Window) -> (f64, f64) {
    let dim = |v: Result<JsValue, JsValue>| v.map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
    (dim(window.inner_width()), dim(window.inner_height()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn size_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64) {
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
}

fn read_theme(document: &Document) -> Theme {
    Theme::from_dark(document.document_element().is_some_and(|root| root.class_list().contains("dark")))
}

fn load_config(json: Option<&str>) -> EffectsConfig {
    match json.map(EffectsConfig::from_json) {
        None => EffectsConfig::default(),
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            log::warn!("effects: {err}; using defaults");
            EffectsConfig::default()
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Build the frame closure. It upgrades `weak` on every call and does
/// nothing once the host is gone or already borrowed.
fn frame_callback<H: 'static>(weak: Weak<RefCell<H>>, run: fn(&mut H, f64)) -> FrameCallback {
    Closure::<dyn FnMut(f64)>::new(move |timestamp_ms: f64| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut host) = shared.try_borrow_mut() else {
            log::debug!("frame callback re-entered; skipping");
            return;
        };
        run(&mut *host, timestamp_ms);
    })
}

/// Build an event listener. `read` pulls what it needs out of the event
/// before the host is borrowed, so a throwing DOM getter cannot leave the
/// `RefCell` locked; `apply` then runs while the host is alive.
fn listener<H: 'static, T: 'static>(
    weak: Weak<RefCell<H>>,
    read: impl Fn(&Event) -> T + 'static,
    apply: impl Fn(&mut H, T) + 'static,
) -> Listener {
    Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let value = read(&event);
        let Some(shared) = weak.upgrade() else {
            return;
        };
        if let Ok(mut host) = shared.try_borrow_mut() {
            apply(&mut *host, value);
        }
    })
}

/// Registered window listeners, removed on shutdown.
struct Listeners {
    target: EventTarget,
    entries: Vec<(&'static str, Listener)>,
}

impl Listeners {
    fn new(target: EventTarget) -> Self {
        Self { target, entries: Vec::new() }
    }

    fn add(&mut self, event: &'static str, callback: Listener) -> Result<(), MountError> {
        self.target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        self.entries.push((event, callback));
        Ok(())
    }

    fn remove_all(&mut self) {
        for (event, callback) in self.entries.drain(..) {
            if let Err(err) = self.target.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
                log::debug!("removeEventListener({event}) failed: {err:?}");
            }
        }
    }
}

// =============================================================
// Background
// =============================================================

struct BackgroundHost {
    engine: BackgroundEngine,
    sched: RafScheduler,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    theme: ThemeFlag,
    document: Document,
}

impl BackgroundHost {
    fn frame(&mut self, timestamp_ms: f64) {
        let Self { engine, sched, canvas, ctx, .. } = self;
        if canvas.is_connected() {
            engine.frame(ctx, sched, timestamp_ms);
        } else {
            engine.skip_frame(sched, timestamp_ms);
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        size_canvas(&self.canvas, width, height);
        self.engine.on_resize(width, height);
    }

    fn theme_changed(&mut self) {
        self.theme.set(read_theme(&self.document));
        self.engine.on_theme_change();
    }

    fn shutdown(&mut self) {
        let Self { engine, sched, .. } = self;
        engine.shutdown(sched);
    }
}

/// Live particle backdrop. Call `shutdown` (or drop it) when the view unmounts.
#[wasm_bindgen]
pub struct BackgroundHandle {
    host: Rc<RefCell<BackgroundHost>>,
    frame_slot: FrameSlot,
    listeners: Listeners,
    observer: Option<(MutationObserver, Closure<dyn FnMut(js_sys::Array)>)>,
}

/// Mount the particle backdrop on `canvas`.
///
/// `config_json` is an optional [`EffectsConfig`] document; invalid config
/// falls back to the defaults with a warning.
///
/// # Errors
///
/// Fails if there is no window/document or the canvas has no 2d context.
#[wasm_bindgen(js_name = mountBackground)]
pub fn mount_background(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<BackgroundHandle, JsValue> {
    Ok(BackgroundHandle::mount(canvas, config_json.as_deref())?)
}

impl BackgroundHandle {
    fn mount(canvas: HtmlCanvasElement, config_json: Option<&str>) -> Result<Self, MountError> {
        let window = window()?;
        let document = document(&window)?;
        let ctx = context_2d(&canvas)?;
        let config = load_config(config_json);
        let theme = ThemeFlag::new(read_theme(&document));
        let frame_slot: FrameSlot = Rc::new(RefCell::new(None));

        let host = Rc::new(RefCell::new(BackgroundHost {
            engine: BackgroundEngine::new(config.field, theme.clone(), random_seed()),
            sched: RafScheduler { window: window.clone(), callback: Rc::clone(&frame_slot) },
            canvas,
            ctx,
            theme,
            document: document.clone(),
        }));
        *frame_slot.borrow_mut() = Some(frame_callback(Rc::downgrade(&host), BackgroundHost::frame));

        let mut listeners = Listeners::new(window.clone().into());
        let resize_window = window.clone();
        listeners.add(
            "resize",
            listener(
                Rc::downgrade(&host),
                move |_event| viewport(&resize_window),
                |host: &mut BackgroundHost, (width, height)| host.resize(width, height),
            ),
        )?;

        let observer = observe_theme(&document, Rc::downgrade(&host))?;

        {
            let (width, height) = viewport(&window);
            let mut host = host.borrow_mut();
            size_canvas(&host.canvas, width, height);
            let BackgroundHost { engine, sched, .. } = &mut *host;
            engine.start(sched, width, height);
        }

        Ok(Self { host, frame_slot, listeners, observer: Some(observer) })
    }
}

/// Watch the root element's `class` attribute for theme flips.
fn observe_theme(
    document: &Document,
    weak: Weak<RefCell<BackgroundHost>>,
) -> Result<(MutationObserver, Closure<dyn FnMut(js_sys::Array)>), MountError> {
    let root = document.document_element().ok_or(MountError::NoDocument)?;
    let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |records: js_sys::Array| {
        let class_changed = records.iter().any(|record| {
            record
                .dyn_ref::<MutationRecord>()
                .is_some_and(|r| r.attribute_name().as_deref() == Some("class"))
        });
        if !class_changed {
            return;
        }
        if let Some(shared) = weak.upgrade()
            && let Ok(mut host) = shared.try_borrow_mut()
        {
            host.theme_changed();
        }
    });
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_attributes(true);
    observer.observe_with_options(&root, &init)?;
    Ok((observer, callback))
}

#[wasm_bindgen]
impl BackgroundHandle {
    /// Stop redrawing and detach every listener. Idempotent.
    pub fn shutdown(&mut self) {
        match self.host.try_borrow_mut() {
            Ok(mut host) => host.shutdown(),
            Err(_) => log::warn!("background: shutdown while a frame is running"),
        }
        self.listeners.remove_all();
        if let Some((observer, _callback)) = self.observer.take() {
            observer.disconnect();
        }
        self.frame_slot.borrow_mut().take();
    }
}

impl Drop for BackgroundHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================
// Cursor
// =============================================================

struct CursorHost {
    engine: CursorEngine,
    sched: RafScheduler,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CursorHost {
    fn frame(&mut self, timestamp_ms: f64) {
        let Self { engine, sched, canvas, ctx } = self;
        if canvas.is_connected() {
            engine.frame(ctx, sched, timestamp_ms);
        } else {
            engine.skip_frame(sched, timestamp_ms);
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        size_canvas(&self.canvas, width, height);
        self.engine.on_resize(width, height);
    }

    fn shutdown(&mut self) {
        let Self { engine, sched, .. } = self;
        engine.shutdown(sched);
    }
}

/// Live cursor trail overlay.
#[wasm_bindgen]
pub struct CursorHandle {
    host: Rc<RefCell<CursorHost>>,
    frame_slot: FrameSlot,
    listeners: Listeners,
}

/// Mount the cursor trail on an overlay `canvas`.
///
/// # Errors
///
/// Fails if there is no window or the canvas has no 2d context.
#[wasm_bindgen(js_name = mountCursor)]
pub fn mount_cursor(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<CursorHandle, JsValue> {
    Ok(CursorHandle::mount(canvas, config_json.as_deref())?)
}

/// Target element followed by its ancestors, described for the hover check.
fn element_chain(target: Option<EventTarget>) -> Vec<ElementInfo> {
    let mut chain = Vec::new();
    let mut current = target.as_ref().and_then(|t| t.dyn_ref::<Element>()).cloned();
    while let Some(el) = current {
        chain.push(ElementInfo::from_attributes(
            el.tag_name(),
            el.get_attribute("role"),
            el.get_attribute("class").as_deref(),
        ));
        current = el.parent_element();
    }
    chain
}

impl CursorHandle {
    fn mount(canvas: HtmlCanvasElement, config_json: Option<&str>) -> Result<Self, MountError> {
        let window = window()?;
        let ctx = context_2d(&canvas)?;
        let config = load_config(config_json);
        let frame_slot: FrameSlot = Rc::new(RefCell::new(None));

        let host = Rc::new(RefCell::new(CursorHost {
            engine: CursorEngine::new(config.trail),
            sched: RafScheduler { window: window.clone(), callback: Rc::clone(&frame_slot) },
            canvas,
            ctx,
        }));
        *frame_slot.borrow_mut() = Some(frame_callback(Rc::downgrade(&host), CursorHost::frame));

        let mut listeners = Listeners::new(window.clone().into());
        listeners.add(
            "mousemove",
            listener(
                Rc::downgrade(&host),
                |event| event.dyn_ref::<MouseEvent>().map(|m| (f64::from(m.client_x()), f64::from(m.client_y()))),
                |host: &mut CursorHost, position| {
                    if let Some((x, y)) = position {
                        host.engine.on_pointer_move(x, y);
                    }
                },
            ),
        )?;
        listeners.add(
            "mouseover",
            listener(
                Rc::downgrade(&host),
                |event| is_interactive(&element_chain(event.target())),
                |host: &mut CursorHost, interactive| host.engine.on_pointer_over_target(interactive),
            ),
        )?;
        let resize_window = window.clone();
        listeners.add(
            "resize",
            listener(
                Rc::downgrade(&host),
                move |_event| viewport(&resize_window),
                |host: &mut CursorHost, (width, height)| host.resize(width, height),
            ),
        )?;

        {
            let (width, height) = viewport(&window);
            let mut host = host.borrow_mut();
            size_canvas(&host.canvas, width, height);
            let CursorHost { engine, sched, .. } = &mut *host;
            engine.start(sched, width, height);
        }

        Ok(Self { host, frame_slot, listeners })
    }
}

#[wasm_bindgen]
impl CursorHandle {
    /// Stop redrawing and remove pointer listeners. Idempotent.
    pub fn shutdown(&mut self) {
        match self.host.try_borrow_mut() {
            Ok(mut host) => host.shutdown(),
            Err(_) => log::warn!("cursor: shutdown while a frame is running"),
        }
        self.listeners.remove_all();
        self.frame_slot.borrow_mut().take();
    }
}

impl Drop for CursorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
