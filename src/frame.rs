use crate::dom;
use crate::overlay::DomOverlaySink;
use crate::render;
use globe_core::{CancelToken, EventQueue, FrameClock, GlobeApp, InputEvent, Scene, TextureImage};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub app: GlobeApp,
    pub clock: FrameClock,
    pub queue: Rc<RefCell<EventQueue>>,
    pub sink: DomOverlaySink,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState>,
    /// Filled by the texture loader; consumed by the next frame.
    pub pending_texture: Rc<RefCell<Option<TextureImage>>>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let time = self.clock.tick();
        let events: Vec<InputEvent> = self.queue.borrow_mut().drain().collect();
        let out = self.app.step(time, events, &mut self.sink);
        if out.resized {
            let max_dim = render::max_texture_dimension(self.gpu.as_ref());
            dom::sync_canvas_backing_size(&self.canvas, &self.app.viewport, max_dim);
        }

        let Some(g) = self.gpu.as_mut() else {
            return;
        };
        if let Some(image) = self.pending_texture.borrow_mut().take() {
            g.set_globe_texture(&image);
        }
        match g.render(&out) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.reconfigure(),
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement, scene: &Scene) -> Option<render::GpuState> {
    match render::GpuState::new(canvas, scene).await {
        Ok(g) => Some(g),
        Err(e) => {
            // markers still track the globe without a renderer
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Drives `frame_ctx` from `requestAnimationFrame` until `token` is cancelled.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>, token: CancelToken) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if token.is_cancelled() {
            log::info!("[loop] stopped");
            return;
        }
        frame_ctx.borrow_mut().frame();
        if !token.is_cancelled() {
            request_frame(&tick_clone);
        }
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
