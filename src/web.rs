//! Browser host (`wasm32` + `web` feature).
//!
//! `createBackdrop()` appends a full-viewport canvas behind the page content,
//! builds the renderer on it and returns a [`Backdrop`] handle. While running,
//! the handle draws from `requestAnimationFrame`, reading `window.scrollY`
//! each frame, and forwards window resizes to the animator. Dropping the
//! handle (`free()` from JS) cancels the pending frame, detaches the resize
//! listener and removes the canvas.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::{
    animator::InstancedGridAnimator,
    error::GridGlowError,
    host::{HostEvent, ViewportSize},
    options::Options,
    renderer::GridRenderer,
    scene::SceneGraph,
};

type SharedAnimator = Rc<RefCell<InstancedGridAnimator<GridRenderer>>>;
/// The frame closure, stored so it can re-request itself.
type FrameLoop = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Inline style pinning the canvas behind the page.
const CANVAS_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "0"),
    ("right", "0"),
    ("bottom", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("z-index", "-1"),
];

fn js_error(e: &GridGlowError) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn web_error(what: &str, e: &JsValue) -> GridGlowError {
    GridGlowError::Web(format!("{what}: {e:?}"))
}

/// Size the canvas backing store to the window in physical pixels.
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> ViewportSize {
    let ratio = window.device_pixel_ratio();
    let css_px = |v: Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    let width = (css_px(window.inner_width()) * ratio).round() as u32;
    let height = (css_px(window.inner_height()) * ratio).round() as u32;
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }
    ViewportSize::new(width, height)
}

fn schedule(
    window: &Window,
    frame_loop: &FrameLoop,
    handle: &Cell<Option<i32>>,
) -> Result<(), JsValue> {
    let callback = frame_loop.borrow();
    let Some(callback) = callback.as_ref() else {
        return Ok(());
    };
    let id = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    handle.set(Some(id));
    Ok(())
}

/// Handle to a running page background.
#[wasm_bindgen]
pub struct Backdrop {
    window: Window,
    canvas: HtmlCanvasElement,
    animator: SharedAnimator,
    frame_loop: FrameLoop,
    frame_handle: Rc<Cell<Option<i32>>>,
    on_resize: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl Backdrop {
    /// Start (or resume) drawing once per display refresh.
    ///
    /// # Errors
    ///
    /// Fails if `requestAnimationFrame` is unavailable.
    pub fn start(&self) -> Result<(), JsValue> {
        self.animator.borrow_mut().start();
        if self.frame_handle.get().is_none() {
            schedule(&self.window, &self.frame_loop, &self.frame_handle)?;
        }
        Ok(())
    }

    /// Stop drawing and cancel the pending frame.
    ///
    /// # Errors
    ///
    /// Fails if the pending frame cannot be cancelled.
    pub fn stop(&self) -> Result<(), JsValue> {
        self.animator.borrow_mut().stop();
        if let Some(id) = self.frame_handle.take() {
            self.window.cancel_animation_frame(id)?;
        }
        Ok(())
    }

    /// Whether frames are being drawn.
    #[wasm_bindgen(js_name = "isRunning")]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.animator.borrow().is_running()
    }

    /// JSON Schema of the options accepted by `createBackdrop`.
    ///
    /// # Errors
    ///
    /// Fails if the schema cannot be serialized.
    #[wasm_bindgen(js_name = "optionsSchema")]
    pub fn options_schema() -> Result<String, JsValue> {
        serde_json::to_string(&Options::json_schema())
            .map_err(|e| js_error(&GridGlowError::OptionsParse(e.to_string())))
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        if let Some(id) = self.frame_handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        let _ = self.window.remove_event_listener_with_callback(
            "resize",
            self.on_resize.as_ref().unchecked_ref(),
        );
        // The frame closure holds an Rc to its own slot; clearing the slot
        // breaks the cycle.
        let _ = self.frame_loop.borrow_mut().take();
        self.canvas.remove();
        log::info!("backdrop detached");
    }
}

/// Attach the background to the page and start it.
///
/// `options_json` is an optional JSON object in the shape described by
/// `Backdrop.optionsSchema()`; missing fields use defaults.
///
/// # Errors
///
/// Fails on malformed options, missing DOM, or when no GPU context can be
/// created.
#[wasm_bindgen(js_name = "createBackdrop")]
#[allow(clippy::future_not_send)]
pub async fn create_backdrop(
    options_json: Option<String>,
) -> Result<Backdrop, JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let options = match options_json {
        Some(json) => Options::from_json(&json).map_err(|e| js_error(&e))?,
        None => Options::default(),
    };
    let backdrop = mount(&options).await.map_err(|e| js_error(&e))?;
    backdrop.start()?;
    Ok(backdrop)
}

#[allow(clippy::future_not_send)]
async fn mount(options: &Options) -> Result<Backdrop, GridGlowError> {
    let window = web_sys::window()
        .ok_or_else(|| GridGlowError::Web("no window".to_owned()))?;
    let document = window
        .document()
        .ok_or_else(|| GridGlowError::Web("no document".to_owned()))?;
    let body = document
        .body()
        .ok_or_else(|| GridGlowError::Web("no document body".to_owned()))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| web_error("create canvas", &e))?
        .dyn_into()
        .map_err(|e| web_error("canvas element", &JsValue::from(e)))?;
    let style = canvas.style();
    for (name, value) in CANVAS_STYLE {
        style
            .set_property(name, value)
            .map_err(|e| web_error("canvas style", &e))?;
    }
    let _ = body
        .append_child(&canvas)
        .map_err(|e| web_error("append canvas", &e))?;

    let viewport = fit_canvas(&window, &canvas);
    let scene = SceneGraph::from_options(options);
    let renderer = GridRenderer::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        viewport,
        &scene,
        options,
    )
    .await?;
    let animator: SharedAnimator = Rc::new(RefCell::new(
        InstancedGridAnimator::new(renderer, options, viewport),
    ));

    let frame_loop: FrameLoop = Rc::new(RefCell::new(None));
    let frame_handle = Rc::new(Cell::new(None));
    let frame_closure = {
        let window = window.clone();
        let animator = Rc::clone(&animator);
        let frame_loop = Rc::clone(&frame_loop);
        let frame_handle = Rc::clone(&frame_handle);
        Closure::wrap(Box::new(move || {
            frame_handle.set(None);
            let scroll_offset = window.scroll_y().unwrap_or(0.0);
            let running = match animator.try_borrow_mut() {
                Ok(mut animator) => {
                    match animator.handle_event(HostEvent::Frame { scroll_offset }) {
                        Ok(_) => {}
                        Err(e) if e.is_surface_stale() => {
                            let viewport = animator.viewport();
                            if let Err(e) = animator.resize(viewport) {
                                log::error!("resize after surface loss failed: {e}");
                            }
                        }
                        Err(e) => log::error!("{e}"),
                    }
                    animator.is_running()
                }
                Err(_) => true,
            };
            if running {
                if let Err(e) = schedule(&window, &frame_loop, &frame_handle) {
                    log::error!("requestAnimationFrame failed: {e:?}");
                }
            }
        }) as Box<dyn FnMut()>)
    };
    *frame_loop.borrow_mut() = Some(frame_closure);

    let on_resize = {
        let window = window.clone();
        let canvas = canvas.clone();
        let animator = Rc::clone(&animator);
        Closure::wrap(Box::new(move || {
            let viewport = fit_canvas(&window, &canvas);
            match animator.try_borrow_mut() {
                Ok(mut animator) => {
                    if let Err(e) = animator.handle_event(HostEvent::Resized {
                        width: viewport.width,
                        height: viewport.height,
                    }) {
                        log::error!("{e}");
                    }
                }
                Err(_) => log::warn!("resize skipped: animator busy"),
            }
        }) as Box<dyn FnMut()>)
    };
    window
        .add_event_listener_with_callback(
            "resize",
            on_resize.as_ref().unchecked_ref(),
        )
        .map_err(|e| web_error("resize listener", &e))?;

    log::info!(
        "backdrop mounted at {}x{}",
        viewport.width,
        viewport.height
    );

    Ok(Backdrop {
        window,
        canvas,
        animator,
        frame_loop,
        frame_handle,
        on_resize,
    })
}
