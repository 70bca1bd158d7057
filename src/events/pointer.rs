use crate::core::Stage;
use crate::input;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Feed window-level pointer movement into the parallax cursor.
pub fn wire_pointermove(stage: Rc<RefCell<Stage>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let (x, y) = input::pointer_client(&ev);
        if let Ok(mut s) = stage.try_borrow_mut() {
            s.pointer_move(x, y);
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }

    closure.forget();
}
