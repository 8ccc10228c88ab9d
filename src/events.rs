use crate::constants::DRAG_END_EVENTS;
use crate::dom;
use globe_core::{EventQueue, InputEvent};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Listeners only record what happened; the frame loop drains `queue`.
pub fn wire_input_handlers(
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    queue: Rc<RefCell<EventQueue>>,
) {
    wire_resize(window, queue.clone());
    wire_pointer(window, canvas, queue.clone());
    wire_wheel(canvas, queue);
}

fn wire_resize(window: &web::Window, queue: Rc<RefCell<EventQueue>>) {
    let w = window.clone();
    dom::add_listener(window.as_ref(), "resize", move |_: web::Event| {
        let (width, height, device_pixel_ratio) = dom::window_size(&w);
        queue.borrow_mut().push(InputEvent::Resize {
            width,
            height,
            device_pixel_ratio,
        });
    });
}

fn wire_pointer(
    window: &web::Window,
    canvas: &web::HtmlCanvasElement,
    queue: Rc<RefCell<EventQueue>>,
) {
    // Moves and releases are tracked window-wide so a drag can leave the canvas.
    let q = queue.clone();
    dom::add_listener(window.as_ref(), "pointermove", move |ev: web::PointerEvent| {
        q.borrow_mut().push(InputEvent::PointerMove {
            x: ev.client_x() as f32,
            y: ev.client_y() as f32,
        });
    });

    let q = queue.clone();
    let target = canvas.clone();
    dom::add_listener(canvas.as_ref(), "pointerdown", move |ev: web::PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        _ = target.set_pointer_capture(ev.pointer_id());
        q.borrow_mut().push(InputEvent::PointerDown {
            x: ev.client_x() as f32,
            y: ev.client_y() as f32,
        });
    });

    for event in DRAG_END_EVENTS {
        let q = queue.clone();
        dom::add_listener(window.as_ref(), event, move |_: web::PointerEvent| {
            q.borrow_mut().push(InputEvent::PointerUp);
        });
    }
}

fn wire_wheel(canvas: &web::HtmlCanvasElement, queue: Rc<RefCell<EventQueue>>) {
    dom::add_listener(canvas.as_ref(), "wheel", move |ev: web::WheelEvent| {
        ev.prevent_default();
        queue.borrow_mut().push(InputEvent::Wheel {
            delta_y: ev.delta_y() as f32,
        });
    });
}

