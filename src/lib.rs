#![cfg(target_arch = "wasm32")]
use crate::constants::TEXTURE_URL;
use globe_core::{CancelToken, EventQueue, FrameClock, GlobeApp, TextureImage};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;
mod texture;

thread_local! {
    static LOOP_TOKEN: RefCell<Option<CancelToken>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("globe-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stops the render loop after the current frame.
#[wasm_bindgen]
pub fn stop() {
    LOOP_TOKEN.with(|t| {
        if let Some(token) = t.borrow().as_ref() {
            token.cancel();
        }
    });
}

fn spawn_texture_load(
    document: web::Document,
    max_dim: u32,
    slot: Rc<RefCell<Option<TextureImage>>>,
) {
    spawn_local(async move {
        match texture::load_image(&document, TEXTURE_URL, max_dim).await {
            Ok(image) => *slot.borrow_mut() = Some(image),
            Err(e) => log::warn!("[texture] {:?}; keeping placeholder", e),
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::query_canvas(&document)?;

    let viewport = dom::window_viewport(&window)?;
    dom::sync_canvas_backing_size(&canvas, &viewport, render::max_texture_dimension(None));
    let app = GlobeApp::new(viewport)?;
    let sink = overlay::DomOverlaySink::bind(&document, app.markers());

    let queue = Rc::new(RefCell::new(EventQueue::default()));
    events::wire_input_handlers(&window, &canvas, queue.clone());

    let gpu = frame::init_gpu(&canvas, &app.scene).await;
    let pending_texture = Rc::new(RefCell::new(None));
    let max_dim = render::max_texture_dimension(gpu.as_ref());
    spawn_texture_load(document.clone(), max_dim, pending_texture.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        app,
        clock: FrameClock::new(),
        queue,
        sink,
        canvas,
        gpu,
        pending_texture,
    }));
    let token = CancelToken::new();
    LOOP_TOKEN.with(|t| *t.borrow_mut() = Some(token.clone()));
    log::info!("[loop] starting");
    frame::start_loop(frame_ctx, token);
    Ok(())
}
