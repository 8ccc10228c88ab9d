use crate::constants::CANVAS_SELECTOR;
use globe_core::{fit_extent, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

pub fn query_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .query_selector(CANVAS_SELECTOR)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("missing {}", CANVAS_SELECTOR))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
}

/// Inner window size in CSS pixels and the display's pixel ratio.
pub fn window_size(window: &web::Window) -> (f32, f32, f32) {
    let css = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    (
        css(window.inner_width()),
        css(window.inner_height()),
        window.device_pixel_ratio() as f32,
    )
}

pub fn window_viewport(window: &web::Window) -> globe_core::Result<Viewport> {
    let (width, height, dpr) = window_size(window);
    Viewport::new(width, height, dpr)
}

/// Sizes the canvas backing store to the viewport's render target, shrunk to
/// fit `max_dim` when the display asks for more than the device allows.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    viewport: &Viewport,
    max_dim: u32,
) {
    let (w, h) = viewport.surface_size();
    let (w_px, h_px) = fit_extent(w, h, max_dim);
    canvas.set_width(w_px);
    canvas.set_height(h_px);
}

/// Adds `handler` for `event` on `target` for the lifetime of the page.
pub fn add_listener<E>(target: &web::EventTarget, event: &str, mut handler: impl FnMut(E) + 'static)
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
{
    let closure = Closure::wrap(Box::new(move |ev: E| handler(ev)) as Box<dyn FnMut(E)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!("[dom] add {event} listener failed: {:?}", e);
    }
    closure.forget();
}
