use crate::core::{ScrollDriver, Stage};
use crate::{dom, input};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct WindowWiring {
    pub window: web::Window,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub stage: Rc<RefCell<Stage>>,
}

pub fn wire_window_events(w: WindowWiring) {
    wire_resize(&w);
    wire_beforeunload(&w);
    wire_wheel(&w);
    wire_scroll(&w);
}

fn wire_resize(w: &WindowWiring) {
    let w = w.clone();
    let target = w.window.clone();
    let closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&w.canvas);
        let (width, height) = dom::viewport_size(&w.window);
        let layout = dom::measure_layout(&w.window, &w.document);
        // Invalid sizes are logged by the stage and skipped.
        _ = w.stage.borrow_mut().resize(width, height, &layout);
    }) as Box<dyn FnMut()>);
    _ = target.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_beforeunload(w: &WindowWiring) {
    let w = w.clone();
    let target = w.window.clone();
    let closure = Closure::wrap(Box::new(move || {
        w.stage.borrow_mut().reset_scroll();
        w.window.scroll_to_with_x_and_y(0.0, 0.0);
    }) as Box<dyn FnMut()>);
    _ = target.add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Non-passive so the native scroll can be cancelled while emulated or locked.
fn wire_wheel(w: &WindowWiring) {
    let w = w.clone();
    let target = w.window.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let Ok(mut stage) = w.stage.try_borrow_mut() else {
            return;
        };
        let delta = input::wheel_pixels(&ev, stage.viewport().height());
        if stage.scroll_mut().on_wheel(delta) {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(false);
    _ = target.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        closure.as_ref().unchecked_ref(),
        &opts,
    );
    closure.forget();
}

fn wire_scroll(w: &WindowWiring) {
    let w = w.clone();
    let target = w.window.clone();
    let closure = Closure::wrap(Box::new(move || {
        let y = dom::scroll_y(&w.window);
        if let Ok(mut stage) = w.stage.try_borrow_mut() {
            if stage.scroll().is_stopped() {
                return;
            }
            stage.scroll_mut().on_native_scroll(y);
        }
    }) as Box<dyn FnMut()>);
    _ = target.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
    closure.forget();
}
